use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::domain::{Account, CheckStatus, CheckStatusResponse, DeliveryStatus, SmsId};
use crate::transport::{DecodeError, HttpRequest, attach_auth};

pub const STATUS_PATH: &str = "sms/status";

#[derive(Debug, Clone, Deserialize)]
struct CheckStatusJsonResponse {
    status_array: BTreeMap<String, TransportDeliveryStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TransportDeliveryStatus {
    Code(i64),
    Name(String),
}

impl TransportDeliveryStatus {
    fn into_known(self, id: u64) -> Result<DeliveryStatus, DecodeError> {
        let (known, raw) = match self {
            Self::Code(code) => (DeliveryStatus::from_code(code), code.to_string()),
            Self::Name(name) => {
                let known = match name.trim().parse::<i64>() {
                    Ok(code) => DeliveryStatus::from_code(code),
                    Err(_) => DeliveryStatus::from_name(&name),
                };
                (known, name)
            }
        };
        known.ok_or(DecodeError::UnknownStatus { id, value: raw })
    }
}

/// Build the `sms/status` call; ids are always sent list-shaped (`ids[0]`, `ids[1]`, ...).
pub fn encode_check_status(account: &Account, request: &CheckStatus) -> HttpRequest {
    let params = request
        .ids()
        .iter()
        .enumerate()
        .map(|(index, id)| (format!("{}[{index}]", SmsId::FIELD), id.to_string()))
        .collect::<Vec<_>>();

    HttpRequest::get(STATUS_PATH, attach_auth(account, &params))
}

/// Decode `sms/status`. Every requested id must be answered, and nothing else.
pub fn decode_check_status_response(
    request: &CheckStatus,
    json: &str,
) -> Result<CheckStatusResponse, DecodeError> {
    let parsed: CheckStatusJsonResponse = serde_json::from_str(json)?;
    let requested = request.ids().iter().copied().collect::<HashSet<_>>();

    let statuses = parsed
        .status_array
        .into_iter()
        .map(|(key, value)| {
            let id = match_sms_id_key(&requested, &key)?;
            Ok((id, value.into_known(id.get())?))
        })
        .collect::<Result<BTreeMap<SmsId, DeliveryStatus>, DecodeError>>()?;

    if let Some(missing) = request.ids().iter().find(|id| !statuses.contains_key(id)) {
        return Err(DecodeError::MissingSmsId { id: missing.get() });
    }

    Ok(CheckStatusResponse { statuses })
}

fn match_sms_id_key(requested: &HashSet<SmsId>, key: &str) -> Result<SmsId, DecodeError> {
    key.trim()
        .parse::<u64>()
        .ok()
        .map(SmsId::new)
        .filter(|id| requested.contains(id))
        .ok_or_else(|| DecodeError::UnknownSmsIdKey {
            key: key.to_owned(),
        })
}
