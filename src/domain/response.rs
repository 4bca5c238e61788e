use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::domain::value::SmsId;

/// Timestamp layout used by Opilo for `received_at` and `min_received_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
/// A per-message failure inside an otherwise successful `sms/send` response.
pub struct SendError {
    pub message: String,
    pub code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome for one message of a batch.
pub enum SendResult {
    Sent(SmsId),
    Failed(SendError),
}

impl SendResult {
    pub fn sms_id(&self) -> Option<SmsId> {
        match self {
            Self::Sent(id) => Some(*id),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SendError> {
        match self {
            Self::Sent(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendSmsResponse {
    /// One outcome per requested message, in request order.
    Items(Vec<SendResult>),
    /// Body of the v1 `httpsend` endpoint, returned untouched.
    Raw(String),
}

impl SendSmsResponse {
    pub fn items(&self) -> Option<&[SendResult]> {
        match self {
            Self::Items(items) => Some(items),
            Self::Raw(_) => None,
        }
    }

    pub fn into_items(self) -> Option<Vec<SendResult>> {
        match self {
            Self::Items(items) => Some(items),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Items(_) => None,
            Self::Raw(body) => Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A message received on one of the account's lines.
pub struct IncomingSms {
    opilo_id: SmsId,
    from: String,
    to: String,
    text: String,
    received_at: NaiveDateTime,
}

impl IncomingSms {
    pub fn new(
        opilo_id: SmsId,
        from: String,
        to: String,
        text: String,
        received_at: NaiveDateTime,
    ) -> Self {
        Self {
            opilo_id,
            from,
            to,
            text,
            received_at,
        }
    }

    pub fn opilo_id(&self) -> SmsId {
        self.opilo_id
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Local (zone-less) receive time as reported by the panel.
    pub fn received_at(&self) -> NaiveDateTime {
        self.received_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Received messages ordered by ascending id.
pub struct Inbox {
    messages: Vec<IncomingSms>,
}

impl Inbox {
    pub(crate) fn new(messages: Vec<IncomingSms>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[IncomingSms] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Largest id in the inbox, useful as the next `min_id` when polling.
    pub fn last_id(&self) -> Option<SmsId> {
        self.messages.last().map(IncomingSms::opilo_id)
    }
}

impl IntoIterator for Inbox {
    type Item = IncomingSms;
    type IntoIter = std::vec::IntoIter<IncomingSms>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
/// Delivery state reported by `sms/status`.
pub enum DeliveryStatus {
    NotFound,
    Queued,
    Sent,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    /// Convert a numeric wire code into a known status.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            -1 => Self::NotFound,
            0 => Self::Queued,
            1 => Self::Sent,
            2 => Self::Delivered,
            3 => Self::Failed,
            _ => return None,
        })
    }

    /// Convert a textual wire value (case-insensitive) into a known status.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim().to_ascii_lowercase().as_str() {
            "not_found" => Self::NotFound,
            "queued" => Self::Queued,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "failed" => Self::Failed,
            _ => return None,
        })
    }

    pub fn code(self) -> i64 {
        match self {
            Self::NotFound => -1,
            Self::Queued => 0,
            Self::Sent => 1,
            Self::Delivered => 2,
            Self::Failed => 3,
        }
    }

    /// Whether the message will not change state anymore.
    pub fn is_final(self) -> bool {
        matches!(self, Self::NotFound | Self::Delivered | Self::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One status per requested id; a response that skips any requested id is rejected.
pub struct CheckStatusResponse {
    pub statuses: BTreeMap<SmsId, DeliveryStatus>,
}

impl CheckStatusResponse {
    pub fn get(&self, id: SmsId) -> Option<DeliveryStatus> {
        self.statuses.get(&id).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credit {
    pub sms_page_count: u64,
}
