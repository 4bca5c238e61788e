use chrono::NaiveDateTime;

use crate::domain::response::TIMESTAMP_FORMAT;
use crate::domain::validation::ValidationError;
use crate::domain::value::{OutgoingSms, SmsId};

/// Field name used when a send batch is empty or malformed (`messages`).
pub const MESSAGES_FIELD: &str = "messages";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ordered, non-empty batch of messages for `sms/send`.
///
/// Result lists returned for a batch follow this order one-to-one.
pub struct SendSms {
    messages: Vec<OutgoingSms>,
}

impl SendSms {
    /// A batch holding a single message.
    pub fn one(message: OutgoingSms) -> Self {
        Self {
            messages: vec![message],
        }
    }

    pub fn batch(messages: Vec<OutgoingSms>) -> Result<Self, ValidationError> {
        if messages.is_empty() {
            return Err(ValidationError::EmptyBatch {
                field: MESSAGES_FIELD,
            });
        }
        Ok(Self { messages })
    }

    /// One message per recipient, all sharing `from` and `text`.
    pub fn broadcast<I, S>(
        from: impl Into<String>,
        recipients: I,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let from = from.into();
        let text = text.into();
        let messages = recipients
            .into_iter()
            .map(|to| OutgoingSms::new(from.clone(), to, text.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::batch(messages)
    }

    pub fn messages(&self) -> &[OutgoingSms] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<OutgoingSms> for SendSms {
    fn from(value: OutgoingSms) -> Self {
        Self::one(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Read-state filter for `inbox`.
pub enum ReadFilter {
    #[default]
    All,
    Read,
    NotRead,
}

impl ReadFilter {
    /// Parameter name used by Opilo (`read`).
    pub const FIELD: &'static str = "read";

    /// Wire value, or `None` for [`ReadFilter::All`] which is expressed by omission.
    pub fn as_param(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Read => Some("read"),
            Self::NotRead => Some("not_read"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Lower bound for `min_received_at`.
pub enum ReceivedAfter {
    At(NaiveDateTime),
    /// Sent as given, for callers that already hold the panel's string form.
    Raw(String),
}

impl ReceivedAfter {
    /// Wire value, or `None` when a raw value is blank.
    pub fn as_param(&self) -> Option<String> {
        match self {
            Self::At(at) => Some(at.format(TIMESTAMP_FORMAT).to_string()),
            Self::Raw(raw) => {
                let raw = raw.trim();
                (!raw.is_empty()).then(|| raw.to_owned())
            }
        }
    }
}

impl From<NaiveDateTime> for ReceivedAfter {
    fn from(value: NaiveDateTime) -> Self {
        Self::At(value)
    }
}

impl From<String> for ReceivedAfter {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for ReceivedAfter {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Filters for `inbox`. Default values mean "no filter" and are not sent.
pub struct CheckInbox {
    /// Only messages with an id of at least this value; `0` disables the filter.
    pub min_id: u64,
    pub min_received_at: Option<ReceivedAfter>,
    pub read: ReadFilter,
    pub line_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Non-empty list of ids for `sms/status`.
pub struct CheckStatus {
    ids: Vec<SmsId>,
}

impl CheckStatus {
    pub fn new(ids: Vec<SmsId>) -> Result<Self, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::EmptyBatch {
                field: SmsId::FIELD,
            });
        }
        Ok(Self { ids })
    }

    /// Normalize a single id into a one-element list.
    pub fn one(id: SmsId) -> Self {
        Self { ids: vec![id] }
    }

    pub fn ids(&self) -> &[SmsId] {
        &self.ids
    }
}

impl From<SmsId> for CheckStatus {
    fn from(value: SmsId) -> Self {
        Self::one(value)
    }
}
