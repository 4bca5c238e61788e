#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected} send results, got {actual}")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("invalid message id: {value}")]
    InvalidMessageId { value: String },

    #[error("duplicate message id: {id}")]
    DuplicateMessageId { id: u64 },

    #[error("expected messages keyed by id, got a list of {count}")]
    UnkeyedMessages { count: usize },

    #[error("invalid received_at for message {id}: {value:?}")]
    InvalidTimestamp {
        id: u64,
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("unknown delivery status for message {id}: {value}")]
    UnknownStatus { id: u64, value: String },

    #[error("response has no status for requested sms id {id}")]
    MissingSmsId { id: u64 },

    #[error("response contains unknown sms id key: {key}")]
    UnknownSmsIdKey { key: String },

    #[error("invalid {field}: {value:?}")]
    InvalidCount { field: &'static str, value: String },
}
