use serde::Deserialize;

/// Error payload shape shared by top-level error envelopes and failed send items.
///
/// Opilo reports either a bare code, a bare message, or an object carrying
/// either or both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(super) enum ErrorRecord {
    Code(i64),
    Message(String),
    Detailed {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        code: Option<i64>,
    },
}

impl ErrorRecord {
    pub(super) fn into_parts(self) -> (Option<i64>, String) {
        match self {
            Self::Code(code) => (Some(code), describe_code(Some(code))),
            Self::Message(message) => (None, message),
            Self::Detailed { message, code } => {
                (code, message.unwrap_or_else(|| describe_code(code)))
            }
        }
    }
}

fn describe_code(code: Option<i64>) -> String {
    match code {
        Some(code) => format!("error code {code}"),
        None => "unspecified error".to_owned(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Vendor-level failure reported inside a 2xx response.
pub struct ApiFailure {
    pub code: Option<i64>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelopeJson {
    error: ErrorRecord,
}

/// Detect a top-level `{"error": ...}` envelope.
pub fn decode_error_envelope(body: &str) -> Option<ApiFailure> {
    let envelope = serde_json::from_str::<ErrorEnvelopeJson>(body).ok()?;
    let (code, message) = envelope.error.into_parts();
    Some(ApiFailure { code, message })
}
