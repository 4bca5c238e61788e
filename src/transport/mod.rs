//! Transport layer: HTTP request descriptions and wire-format details
//! (serialization/deserialization) for both protocol generations.

mod auth;
mod count;
mod error;
pub mod v1;
pub mod v2;

use std::fmt;

pub use auth::{attach_auth, attach_auth_json};
pub use error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Clone, PartialEq)]
/// Transport-agnostic description of one API call.
///
/// `path` is relative to the versioned endpoint (`.../ws/api/vN/`). Credentials are
/// already part of `query` or `json`.
pub struct HttpRequest {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(String, String)>,
    pub json: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(path: &'static str, query: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            path,
            query,
            json: None,
        }
    }

    /// Value of the first query parameter named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self
            .query
            .iter()
            .map(|(k, v)| {
                if k == crate::domain::Password::FIELD {
                    (k.as_str(), "***")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect::<Vec<_>>();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &query)
            .field("json", &self.json.as_ref().map(|_| "<body>"))
            .finish()
    }
}
