use serde_json::{Map, Value};

use crate::domain::{Account, Password, Username};

/// Return `params` followed by the account credentials.
pub fn attach_auth(account: &Account, params: &[(String, String)]) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(params.len() + 2);
    out.extend_from_slice(params);
    out.push((
        Username::FIELD.to_owned(),
        account.username().as_str().to_owned(),
    ));
    out.push((
        Password::FIELD.to_owned(),
        account.password().as_str().to_owned(),
    ));
    out
}

/// JSON-body counterpart of [`attach_auth`].
pub fn attach_auth_json(account: &Account, mut body: Map<String, Value>) -> Map<String, Value> {
    body.insert(
        Username::FIELD.to_owned(),
        Value::from(account.username().as_str()),
    );
    body.insert(
        Password::FIELD.to_owned(),
        Value::from(account.password().as_str()),
    );
    body
}
