use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::{
    Account, CheckInbox, Inbox, IncomingSms, ReadFilter, ReceivedAfter, SmsId, TIMESTAMP_FORMAT,
};
use crate::transport::{DecodeError, HttpRequest, attach_auth};

pub const INBOX_PATH: &str = "inbox";

const MIN_ID_FIELD: &str = "min_id";
const MIN_RECEIVED_AT_FIELD: &str = "min_received_at";
const LINE_NUMBER_FIELD: &str = "line_number";

#[derive(Debug, Clone, Deserialize)]
struct InboxJsonResponse {
    messages: InboxMessagesJson,
}

// An empty inbox may be serialized as `[]` instead of `{}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum InboxMessagesJson {
    Keyed(BTreeMap<String, IncomingSmsJson>),
    List(Vec<serde_json::Value>),
}

#[derive(Debug, Clone, Deserialize)]
struct IncomingSmsJson {
    from: String,
    to: String,
    text: String,
    received_at: String,
}

/// Build the `inbox` call; filters left at their defaults are omitted.
pub fn encode_check_inbox(account: &Account, options: &CheckInbox) -> HttpRequest {
    let mut params = Vec::<(String, String)>::new();

    if options.min_id > 0 {
        params.push((MIN_ID_FIELD.to_owned(), options.min_id.to_string()));
    }
    if let Some(min_received_at) = options
        .min_received_at
        .as_ref()
        .and_then(ReceivedAfter::as_param)
    {
        params.push((MIN_RECEIVED_AT_FIELD.to_owned(), min_received_at));
    }
    if let Some(read) = options.read.as_param() {
        params.push((ReadFilter::FIELD.to_owned(), read.to_owned()));
    }
    if let Some(line_number) = options
        .line_number
        .as_deref()
        .map(str::trim)
        .filter(|line| !line.is_empty())
    {
        params.push((LINE_NUMBER_FIELD.to_owned(), line_number.to_owned()));
    }

    HttpRequest::get(INBOX_PATH, attach_auth(account, &params))
}

/// Decode `inbox`, ordering messages by ascending numeric id.
pub fn decode_inbox_response(json: &str) -> Result<Inbox, DecodeError> {
    let parsed: InboxJsonResponse = serde_json::from_str(json)?;

    let entries = match parsed.messages {
        InboxMessagesJson::Keyed(entries) => entries,
        InboxMessagesJson::List(items) if items.is_empty() => BTreeMap::new(),
        InboxMessagesJson::List(items) => {
            return Err(DecodeError::UnkeyedMessages { count: items.len() });
        }
    };

    let mut by_id = BTreeMap::<u64, IncomingSms>::new();
    for (key, value) in entries {
        let id = key
            .trim()
            .parse::<u64>()
            .map_err(|_| DecodeError::InvalidMessageId { value: key.clone() })?;

        let received_at = parse_received_at(&value.received_at).map_err(|source| {
            DecodeError::InvalidTimestamp {
                id,
                value: value.received_at.clone(),
                source,
            }
        })?;

        let sms = IncomingSms::new(SmsId::new(id), value.from, value.to, value.text, received_at);
        if by_id.insert(id, sms).is_some() {
            return Err(DecodeError::DuplicateMessageId { id });
        }
    }

    Ok(Inbox::new(by_id.into_values().collect()))
}

// chrono accepts unpadded fields and extra spaces; only the exact layout is allowed.
fn parse_received_at(raw: &str) -> Result<NaiveDateTime, Option<chrono::ParseError>> {
    let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(Some)?;
    if parsed.format(TIMESTAMP_FORMAT).to_string() != raw {
        return Err(None);
    }
    Ok(parsed)
}
