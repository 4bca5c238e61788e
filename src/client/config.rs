use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::transport::v2::SendEncoding;

/// Production panel host.
pub const DEFAULT_BASE_URL: &str = "https://bpanel.opilo.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Protocol generation spoken by a client.
pub enum ApiVersion {
    /// `GET httpsend` only.
    V1,
    /// Full JSON API: send, inbox, status, credit.
    #[default]
    V2,
}

impl ApiVersion {
    pub fn number(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Path segment appended to the base URL, e.g. `/ws/api/v2/`.
    pub fn segment(self) -> String {
        format!("/ws/api/v{}/", self.number())
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    /// Accepts `1`, `2`, `v1`, `v2` (case-insensitive, surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.strip_prefix('v').unwrap_or(normalized.as_str()) {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            _ => Err(ConfigError::UnknownApiVersion(s.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
/// Configuration problems detected while building a client, before any request is sent.
pub enum ConfigError {
    #[error("unknown API version: {0:?}")]
    UnknownApiVersion(String),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone)]
/// Connection settings shared by both protocol generations.
pub struct ConnectionConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub send_encoding: SendEncoding,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
            send_encoding: SendEncoding::default(),
        }
    }
}

impl ConnectionConfig {
    /// Resolve the versioned endpoint, e.g. `https://bpanel.opilo.com/ws/api/v2/`.
    pub fn endpoint(&self, version: ApiVersion) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}{}",
            self.base_url.trim().trim_end_matches('/'),
            version.segment()
        );
        let url = Url::parse(&raw).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "expected an http(s) URL".to_owned(),
            });
        }
        Ok(url)
    }
}
