//! TLS material for certificate authentication.
//!
//! A [`TlsConfig`] names the server trust store and the client key store
//! used by the authentication transport. It is attached to a single client;
//! nothing here mutates process-wide state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use p12_keystore::KeyStore;
use reqwest::{Certificate, ClientBuilder, Identity};
use tracing::debug;

use crate::error::TlsError;

/// Environment variable naming the server trust store file.
pub const ENV_TRUSTSTORE: &str = "SYMPHONY_TRUSTSTORE";
/// Environment variable holding the trust store password.
pub const ENV_TRUSTSTORE_PASSWORD: &str = "SYMPHONY_TRUSTSTORE_PASSWORD";
/// Environment variable naming the client key store file.
pub const ENV_KEYSTORE: &str = "SYMPHONY_KEYSTORE";
/// Environment variable holding the key store password.
pub const ENV_KEYSTORE_PASSWORD: &str = "SYMPHONY_KEYSTORE_PASSWORD";
/// Environment variable selecting the key store format.
pub const ENV_KEYSTORE_TYPE: &str = "SYMPHONY_KEYSTORE_TYPE";

pub(crate) const USER_AGENT: &str = concat!("symphony-auth/", env!("CARGO_PKG_VERSION"));

/// Format of the client key store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStoreType {
    /// PKCS#12 archive holding certificate chain and private key.
    #[default]
    Pkcs12,
    /// PEM file holding certificate chain and private key.
    Pem,
}

impl KeyStoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStoreType::Pkcs12 => "pkcs12",
            KeyStoreType::Pem => "pem",
        }
    }
}

impl fmt::Display for KeyStoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyStoreType {
    type Err = TlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pkcs12" | "p12" | "pfx" => Ok(KeyStoreType::Pkcs12),
            "pem" => Ok(KeyStoreType::Pem),
            _ => Err(TlsError::UnknownKeyStoreType(s.to_string())),
        }
    }
}

/// A password for a trust or key store.
///
/// # Security
///
/// The value is never exposed in Debug output to prevent accidental logging.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    ///
    /// Use this only when opening the store it protects.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Trust store and key store settings for the authentication transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    trust_store: Option<PathBuf>,
    trust_store_password: Option<Secret>,
    key_store: Option<PathBuf>,
    key_store_password: Option<Secret>,
    key_store_type: KeyStoreType,
}

impl TlsConfig {
    /// Create a configuration with a PKCS#12 client key store.
    pub fn new(
        trust_store: impl Into<PathBuf>,
        trust_store_password: impl Into<String>,
        key_store: impl Into<PathBuf>,
        key_store_password: impl Into<String>,
    ) -> Self {
        Self {
            trust_store: Some(trust_store.into()),
            trust_store_password: Some(Secret::new(trust_store_password)),
            key_store: Some(key_store.into()),
            key_store_password: Some(Secret::new(key_store_password)),
            key_store_type: KeyStoreType::Pkcs12,
        }
    }

    /// Override the key store format.
    pub fn with_key_store_type(mut self, key_store_type: KeyStoreType) -> Self {
        self.key_store_type = key_store_type;
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// Returns `Ok(None)` when none of the store variables is set.
    pub fn from_env() -> Result<Option<Self>, TlsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, TlsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let trust_store = get(ENV_TRUSTSTORE).map(PathBuf::from);
        let key_store = get(ENV_KEYSTORE).map(PathBuf::from);

        if trust_store.is_none() && key_store.is_none() {
            return Ok(None);
        }

        let key_store_type = match get(ENV_KEYSTORE_TYPE) {
            Some(t) => t.parse()?,
            None => KeyStoreType::default(),
        };

        Ok(Some(Self {
            trust_store,
            trust_store_password: get(ENV_TRUSTSTORE_PASSWORD).map(Secret::new),
            key_store,
            key_store_password: get(ENV_KEYSTORE_PASSWORD).map(Secret::new),
            key_store_type,
        }))
    }

    pub fn trust_store(&self) -> Option<&Path> {
        self.trust_store.as_deref()
    }

    pub fn trust_store_password(&self) -> Option<&Secret> {
        self.trust_store_password.as_ref()
    }

    pub fn key_store(&self) -> Option<&Path> {
        self.key_store.as_deref()
    }

    pub fn key_store_password(&self) -> Option<&Secret> {
        self.key_store_password.as_ref()
    }

    pub fn key_store_type(&self) -> KeyStoreType {
        self.key_store_type
    }

    /// Build an HTTP client that trusts the configured trust store and
    /// presents the configured client certificate.
    ///
    /// The trust store must be a PEM bundle or a single DER certificate.
    /// Its password is not needed for either format.
    pub fn build_client(&self) -> Result<reqwest::Client, TlsError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        if let Some(path) = self.trust_store() {
            for cert in load_trust_store(path)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        if let Some(path) = self.key_store() {
            builder = self.apply_identity(builder, path)?;
        }

        builder.build().map_err(|e| TlsError::Client {
            message: e.to_string(),
        })
    }

    fn apply_identity(&self, builder: ClientBuilder, path: &Path) -> Result<ClientBuilder, TlsError> {
        let bytes = read_store(path)?;
        debug!(path = %path.display(), key_store_type = %self.key_store_type, "loading client key store");

        let pem = match self.key_store_type {
            KeyStoreType::Pem => bytes,
            KeyStoreType::Pkcs12 => {
                let password = self.key_store_password().map(Secret::expose).unwrap_or("");
                pkcs12_to_pem(path, &bytes, password)?
            }
        };

        let identity = Identity::from_pem(&pem).map_err(|e| TlsError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(builder.identity(identity))
    }
}

/// Unpack a PKCS#12 archive into a PEM bundle of its certificate chain and
/// private key, leaf certificate first.
fn pkcs12_to_pem(path: &Path, der: &[u8], password: &str) -> Result<Vec<u8>, TlsError> {
    let invalid = |message: String| TlsError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    let keystore = KeyStore::from_pkcs12(der, password).map_err(|e| invalid(e.to_string()))?;
    let (alias, entry) = keystore
        .private_key_chain()
        .ok_or_else(|| invalid("no private key entry".to_string()))?;

    if entry.chain().is_empty() {
        return Err(invalid(format!("private key '{}' has no certificate", alias)));
    }
    debug!(alias, certificates = entry.chain().len(), "unpacked PKCS#12 key store");

    let mut pem = String::new();
    for cert in entry.chain() {
        pem.push_str(&pem_block("CERTIFICATE", cert.as_der()));
    }
    pem.push_str(&pem_block("PRIVATE KEY", entry.key()));

    Ok(pem.into_bytes())
}

fn pem_block(label: &str, der: &[u8]) -> String {
    let encoded = STANDARD.encode(der);
    let mut block = format!("-----BEGIN {}-----\n", label);
    for (i, c) in encoded.chars().enumerate() {
        if i > 0 && i % 64 == 0 {
            block.push('\n');
        }
        block.push(c);
    }
    block.push_str(&format!("\n-----END {}-----\n", label));
    block
}

fn read_store(path: &Path) -> Result<Vec<u8>, TlsError> {
    std::fs::read(path).map_err(|source| TlsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_trust_store(path: &Path) -> Result<Vec<Certificate>, TlsError> {
    let bytes = read_store(path)?;
    let invalid = |message: String| TlsError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    let certs = if bytes.starts_with(b"-----BEGIN") {
        Certificate::from_pem_bundle(&bytes).map_err(|e| invalid(e.to_string()))?
    } else {
        vec![Certificate::from_der(&bytes).map_err(|e| invalid(e.to_string()))?]
    };

    if certs.is_empty() {
        return Err(invalid("no certificates found".to_string()));
    }

    debug!(path = %path.display(), count = certs.len(), "loaded trust store");
    Ok(certs)
}
