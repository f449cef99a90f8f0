//! HTTP client for the authenticate call.

use tracing::{debug, instrument, trace};

use crate::auth::Token;
use crate::error::{EndpointError, ProtocolError};
use crate::types::ServiceUrl;

use super::endpoints::ErrorResponse;

/// Issues `POST <base>/v1/authenticate` over a shared transport.
///
/// The same instance serves both the session and the key manager endpoint;
/// only the base URL differs between the two calls.
#[derive(Debug, Clone)]
pub struct AuthenticationApi {
    client: reqwest::Client,
}

impl AuthenticationApi {
    /// Wrap an already configured HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Authenticate against the service at `base` and return its token.
    #[instrument(skip(self), fields(base = %base))]
    pub async fn authenticate(&self, base: &ServiceUrl) -> Result<Token, EndpointError> {
        let url = base.authenticate_url();
        debug!(%url, "authenticate");

        let response = self.client.post(&url).send().await?;

        self.handle_response(response).await
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Token, EndpointError> {
        let status = response.status();
        trace!(status = %status, "authenticate response");

        if status.is_success() {
            let token = response.json::<Token>().await?;
            Ok(token)
        } else {
            Err(self.parse_error_response(response).await.into())
        }
    }

    async fn parse_error_response(&self, response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(body) => ProtocolError::new(status, body.into_message()),
            Err(_) => ProtocolError::new(status, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base(server: &MockServer, prefix: &str) -> ServiceUrl {
        ServiceUrl::new(format!("{}{}", server.uri(), prefix)).unwrap()
    }

    #[tokio::test]
    async fn returns_token_from_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessionauth/v1/authenticate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "sessionToken",
                "token": "abc123"
            })))
            .mount(&server)
            .await;

        let api = AuthenticationApi::new(reqwest::Client::new());
        let token = api
            .authenticate(&base(&server, "/sessionauth"))
            .await
            .unwrap();

        assert_eq!(token, Token::new("sessionToken", "abc123"));
    }

    #[tokio::test]
    async fn error_status_becomes_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/keyauth/v1/authenticate"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "message": "Invalid certificate"
            })))
            .mount(&server)
            .await;

        let api = AuthenticationApi::new(reqwest::Client::new());
        let err = api
            .authenticate(&base(&server, "/keyauth"))
            .await
            .unwrap_err();

        match err {
            EndpointError::Protocol(e) => {
                assert_eq!(e.status, 401);
                assert!(e.is_auth_error());
                assert_eq!(e.message.as_deref(), Some("Invalid certificate (code 401)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessionauth/v1/authenticate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let api = AuthenticationApi::new(reqwest::Client::new());
        let err = api
            .authenticate(&base(&server, "/sessionauth"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EndpointError::Transport(TransportError::Decode { .. })
        ));
    }
}
