//! Typed Rust client for the Opilo SMS gateway HTTP API.
//!
//! Opilo exposes two incompatible protocol generations. Both are modeled behind
//! one set of domain types: a domain layer of strong types, a transport layer
//! for wire-format quirks, and a small client layer orchestrating requests.
//!
//! - [`V2Client`] speaks the JSON API: send (with per-message results), inbox,
//!   delivery status and credit.
//! - [`V1Client`] only knows `httpsend` and returns its body untouched.
//!
//! Both implement [`SmsGateway`]; [`OpiloClientBuilder::build`] picks one.
//!
//! ```rust,no_run
//! use opilo::{Account, OutgoingSms, SendResult, SendSms, V2Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), opilo::OpiloError> {
//!     let client = V2Client::new(Account::new("username", "password")?)?;
//!     let sms = OutgoingSms::new("3000", "9121231234", "hello")?;
//!     let response = client.send_sms(SendSms::one(sms)).await?;
//!     for result in response.items().unwrap_or_default() {
//!         match result {
//!             SendResult::Sent(id) => println!("queued as {id}"),
//!             SendResult::Failed(err) => println!("rejected: {}", err.message),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ApiVersion, BoxFuture, ConfigError, ConnectionConfig, DEFAULT_BASE_URL, HttpResponse,
    HttpTransport, OpiloClientBuilder, OpiloError, ReqwestTransport, SmsGateway, V1Client,
    V2Client,
};
pub use domain::{
    Account, CheckInbox, CheckStatus, CheckStatusResponse, Credit, DeliveryStatus, Inbox,
    IncomingSms, OutgoingSms, ReadFilter, ReceivedAfter, SendError, SendResult, SendSms,
    SendSmsResponse, SmsId, TIMESTAMP_FORMAT, ValidationError,
};
pub use transport::v2::SendEncoding;
pub use transport::{DecodeError, HttpRequest, Method};
