//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{CheckInbox, CheckStatus, MESSAGES_FIELD, ReadFilter, ReceivedAfter, SendSms};
pub use response::{
    CheckStatusResponse, Credit, DeliveryStatus, Inbox, IncomingSms, SendError, SendResult,
    SendSmsResponse, TIMESTAMP_FORMAT,
};
pub use validation::ValidationError;
pub use value::{Account, OutgoingSms, Password, SmsId, Username};
