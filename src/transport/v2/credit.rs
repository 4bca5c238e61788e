use serde::Deserialize;

use crate::domain::{Account, Credit};
use crate::transport::count::TransportCount;
use crate::transport::{DecodeError, HttpRequest, attach_auth};

pub const CREDIT_PATH: &str = "credit";

const SMS_PAGE_COUNT_FIELD: &str = "sms_page_count";

#[derive(Debug, Clone, Deserialize)]
struct CreditJsonResponse {
    sms_page_count: TransportCount,
}

pub fn encode_get_credit(account: &Account) -> HttpRequest {
    HttpRequest::get(CREDIT_PATH, attach_auth(account, &[]))
}

pub fn decode_credit_response(json: &str) -> Result<Credit, DecodeError> {
    let parsed: CreditJsonResponse = serde_json::from_str(json)?;
    let sms_page_count = parsed
        .sms_page_count
        .into_u64()
        .map_err(|value| DecodeError::InvalidCount {
            field: SMS_PAGE_COUNT_FIELD,
            value,
        })?;
    Ok(Credit { sms_page_count })
}
