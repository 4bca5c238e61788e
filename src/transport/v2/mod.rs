//! Protocol generation 2: JSON responses, one endpoint per operation.

mod check_status;
mod credit;
mod envelope;
mod inbox;
mod send_sms;

pub use check_status::{decode_check_status_response, encode_check_status};
pub use credit::{decode_credit_response, encode_get_credit};
pub use envelope::decode_error_envelope;
pub use inbox::{decode_inbox_response, encode_check_inbox};
pub use send_sms::{SendEncoding, decode_send_sms_response, encode_send_sms};
