use std::sync::Arc;

use url::Url;

use super::{
    ApiVersion, BoxFuture, HttpTransport, OpiloClientBuilder, OpiloError, SmsGateway, execute,
};
use crate::domain::{
    Account, CheckInbox, CheckStatus, CheckStatusResponse, Credit, Inbox, SendSms,
    SendSmsResponse,
};
use crate::transport::v1::{decode_httpsend_response, encode_httpsend};

#[derive(Clone)]
/// Client for the first protocol generation.
///
/// v1 can only send: one text from one sender to one or more recipients. The
/// response body is returned untouched as [`SendSmsResponse::Raw`]. Through
/// [`SmsGateway`], `check_inbox`, `check_status` and `get_credit` return
/// [`OpiloError::Unsupported`] without contacting the server.
pub struct V1Client {
    account: Account,
    endpoint: Url,
    http: Arc<dyn HttpTransport>,
}

impl V1Client {
    /// Create a client for the production host.
    pub fn new(account: Account) -> Result<Self, OpiloError> {
        OpiloClientBuilder::new(account).build_v1()
    }

    pub(super) fn from_parts(
        account: Account,
        endpoint: Url,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            account,
            endpoint,
            http,
        }
    }

    /// Versioned endpoint all paths are resolved against.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one text from `from` to every recipient in `to`.
    pub async fn send<I, S>(
        &self,
        from: impl Into<String>,
        to: I,
        text: impl Into<String>,
    ) -> Result<String, OpiloError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = SendSms::broadcast(from, to, text)?;
        let response = self.send_sms(request).await?;
        Ok(response.raw().unwrap_or_default().to_owned())
    }

    /// Send a broadcast batch through `httpsend`.
    ///
    /// Errors:
    /// - [`OpiloError::Validation`] if messages differ in sender or text,
    /// - [`OpiloError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`OpiloError::Transport`] for network failures.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, OpiloError> {
        let http_request = encode_httpsend(&self.account, &request)?;
        let body = execute(self.http.as_ref(), &self.endpoint, http_request).await?;
        Ok(decode_httpsend_response(&body))
    }

    fn unsupported<T>(operation: &'static str) -> Result<T, OpiloError> {
        tracing::debug!(operation, "operation not available in API v1; no request sent");
        Err(OpiloError::Unsupported {
            version: ApiVersion::V1,
            operation,
        })
    }
}

impl SmsGateway for V1Client {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V1
    }

    fn send_sms<'a>(
        &'a self,
        request: SendSms,
    ) -> BoxFuture<'a, Result<SendSmsResponse, OpiloError>> {
        Box::pin(V1Client::send_sms(self, request))
    }

    fn check_inbox<'a>(&'a self, _options: CheckInbox) -> BoxFuture<'a, Result<Inbox, OpiloError>> {
        Box::pin(async { Self::unsupported::<Inbox>("check_inbox") })
    }

    fn check_status<'a>(
        &'a self,
        _request: CheckStatus,
    ) -> BoxFuture<'a, Result<CheckStatusResponse, OpiloError>> {
        Box::pin(async { Self::unsupported::<CheckStatusResponse>("check_status") })
    }

    fn get_credit<'a>(&'a self) -> BoxFuture<'a, Result<Credit, OpiloError>> {
        Box::pin(async { Self::unsupported::<Credit>("get_credit") })
    }
}
