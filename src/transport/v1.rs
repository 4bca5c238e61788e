//! Protocol generation 1: a single `GET httpsend` with a query string.

use super::{HttpRequest, attach_auth};
use crate::domain::{
    Account, MESSAGES_FIELD, OutgoingSms, SendSms, SendSmsResponse, ValidationError,
};

pub const HTTPSEND_PATH: &str = "httpsend";

/// Build the `httpsend` call.
///
/// v1 has no per-message batches: every message must share sender and text, and
/// recipients are joined with `,`.
pub fn encode_httpsend(
    account: &Account,
    request: &SendSms,
) -> Result<HttpRequest, ValidationError> {
    let messages = request.messages();
    let Some(first) = messages.first() else {
        return Err(ValidationError::EmptyBatch {
            field: MESSAGES_FIELD,
        });
    };

    if let Some(index) = messages
        .iter()
        .position(|m| m.from() != first.from() || m.text() != first.text())
    {
        return Err(ValidationError::NotABroadcast { index });
    }

    let to = messages
        .iter()
        .map(OutgoingSms::to)
        .collect::<Vec<_>>()
        .join(",");

    let params = [
        (OutgoingSms::FROM_FIELD.to_owned(), first.from().to_owned()),
        (OutgoingSms::TO_FIELD.to_owned(), to),
        (OutgoingSms::TEXT_FIELD.to_owned(), first.text().to_owned()),
    ];

    Ok(HttpRequest::get(HTTPSEND_PATH, attach_auth(account, &params)))
}

/// v1 responses have no structured shape; the body is handed back as-is.
pub fn decode_httpsend_response(body: &str) -> SendSmsResponse {
    SendSmsResponse::Raw(body.to_owned())
}
