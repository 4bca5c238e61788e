use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::envelope::ErrorRecord;
use crate::domain::{
    Account, MESSAGES_FIELD, OutgoingSms, SendError, SendResult, SendSms, SendSmsResponse, SmsId,
};
use crate::transport::count::TransportCount;
use crate::transport::{DecodeError, HttpRequest, Method, attach_auth, attach_auth_json};

pub const SEND_PATH: &str = "sms/send";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Where the `sms/send` payload is placed.
pub enum SendEncoding {
    /// JSON request body: `{"username", "password", "messages": [...]}`.
    #[default]
    JsonBody,
    /// Query string with indexed keys: `messages[0][from]=...`.
    Query,
}

#[derive(Debug, Clone, Deserialize)]
struct SendSmsJsonResponse {
    messages: Vec<SendItemJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SendItemJson {
    Sent {
        id: TransportCount,
    },
    Failed {
        error: ErrorRecord,
        #[serde(default)]
        code: Option<i64>,
    },
}

pub fn encode_send_sms(
    account: &Account,
    request: &SendSms,
    encoding: SendEncoding,
) -> HttpRequest {
    match encoding {
        SendEncoding::JsonBody => {
            let messages = request
                .messages()
                .iter()
                .map(|sms| {
                    json!({
                        (OutgoingSms::FROM_FIELD): sms.from(),
                        (OutgoingSms::TO_FIELD): sms.to(),
                        (OutgoingSms::TEXT_FIELD): sms.text(),
                    })
                })
                .collect::<Vec<_>>();

            let mut body = Map::new();
            body.insert(MESSAGES_FIELD.to_owned(), Value::Array(messages));

            HttpRequest {
                method: Method::Post,
                path: SEND_PATH,
                query: Vec::new(),
                json: Some(Value::Object(attach_auth_json(account, body))),
            }
        }
        SendEncoding::Query => {
            let mut params = Vec::<(String, String)>::with_capacity(request.len() * 3);
            for (index, sms) in request.messages().iter().enumerate() {
                for (field, value) in [
                    (OutgoingSms::FROM_FIELD, sms.from()),
                    (OutgoingSms::TO_FIELD, sms.to()),
                    (OutgoingSms::TEXT_FIELD, sms.text()),
                ] {
                    params.push((
                        format!("{MESSAGES_FIELD}[{index}][{field}]"),
                        value.to_owned(),
                    ));
                }
            }

            HttpRequest {
                method: Method::Post,
                path: SEND_PATH,
                query: attach_auth(account, &params),
                json: None,
            }
        }
    }
}

/// Decode `sms/send`, pairing the i-th result with the i-th requested message.
pub fn decode_send_sms_response(
    request: &SendSms,
    json: &str,
) -> Result<SendSmsResponse, DecodeError> {
    let parsed: SendSmsJsonResponse = serde_json::from_str(json)?;

    if parsed.messages.len() != request.len() {
        return Err(DecodeError::ResultCountMismatch {
            expected: request.len(),
            actual: parsed.messages.len(),
        });
    }

    let items = parsed
        .messages
        .into_iter()
        .map(|item| match item {
            SendItemJson::Sent { id } => id
                .into_u64()
                .map(|id| SendResult::Sent(SmsId::new(id)))
                .map_err(|value| DecodeError::InvalidMessageId { value }),
            SendItemJson::Failed { error, code } => {
                let (record_code, message) = error.into_parts();
                Ok(SendResult::Failed(SendError {
                    message,
                    code: record_code.or(code),
                }))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SendSmsResponse::Items(items))
}
