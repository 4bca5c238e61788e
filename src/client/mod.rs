//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod config;
#[cfg(test)]
mod fake;
mod v1;
mod v2;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    Account, CheckInbox, CheckStatus, CheckStatusResponse, Credit, Inbox, SendSms,
    SendSmsResponse, ValidationError,
};
use crate::transport::v2::SendEncoding;
use crate::transport::{DecodeError, HttpRequest, Method};

pub use config::{ApiVersion, ConfigError, ConnectionConfig, DEFAULT_BASE_URL};
pub use v1::V1Client;
pub use v2::V2Client;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The "send a request, get status and body" capability the clients depend on.
///
/// [`ReqwestTransport`] is used unless another implementation is supplied through
/// [`OpiloClientBuilder::transport`].
pub trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        url: Url,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        url: Url,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                Method::Get => self.client.get(url),
                Method::Post => self.client.post(url),
            };
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(json) = request.json.as_ref() {
                builder = builder.json(json);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`V1Client`], [`V2Client`] and [`SmsGateway`].
///
/// `Transport`, `HttpStatus`, `Api` and `Parse` are communication failures (see
/// [`OpiloError::is_communication`]): the whole operation was aborted and no partial
/// result exists. Per-message send failures are not errors; they are reported as
/// [`crate::SendResult::Failed`].
pub enum OpiloError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Opilo answered 2xx with an `{"error": ...}` envelope.
    #[error("API error: {message} (code {code:?})")]
    Api {
        code: Option<i64>,
        message: String,
        body: String,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {source}")]
    Parse {
        #[source]
        source: DecodeError,
        body: String,
    },

    /// The operation does not exist in the selected protocol generation.
    #[error("{operation} is not supported by API {version}")]
    Unsupported {
        version: ApiVersion,
        operation: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// One of the domain constructors or encoders rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl OpiloError {
    /// `true` for failures that happened while talking to the gateway.
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::HttpStatus { .. } | Self::Api { .. } | Self::Parse { .. }
        )
    }

    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body kept for diagnostics.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { body, .. } => body.as_deref(),
            Self::Api { body, .. } | Self::Parse { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// The four gateway operations, implemented once per protocol generation.
///
/// Obtain one with [`OpiloClientBuilder::build`]; the generation is fixed at
/// construction.
pub trait SmsGateway: Send + Sync {
    fn api_version(&self) -> ApiVersion;

    /// Send a batch; v2 yields one [`crate::SendResult`] per message in order, v1 the raw body.
    fn send_sms<'a>(
        &'a self,
        request: SendSms,
    ) -> BoxFuture<'a, Result<SendSmsResponse, OpiloError>>;

    fn check_inbox<'a>(&'a self, options: CheckInbox) -> BoxFuture<'a, Result<Inbox, OpiloError>>;

    fn check_status<'a>(
        &'a self,
        request: CheckStatus,
    ) -> BoxFuture<'a, Result<CheckStatusResponse, OpiloError>>;

    fn get_credit<'a>(&'a self) -> BoxFuture<'a, Result<Credit, OpiloError>>;
}

#[derive(Clone)]
/// Builder for Opilo clients.
///
/// Use this to pick the protocol generation and customize the base URL, timeout,
/// user-agent, `sms/send` encoding, or the HTTP transport itself.
pub struct OpiloClientBuilder {
    account: Account,
    version: ApiVersion,
    config: ConnectionConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl OpiloClientBuilder {
    /// Create a builder targeting v2 on the production host.
    pub fn new(account: Account) -> Self {
        Self {
            account,
            version: ApiVersion::default(),
            config: ConnectionConfig::default(),
            transport: None,
        }
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    /// Replace all connection settings at once.
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the panel host, e.g. `https://bpanel.opilo.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Choose how v2 `sms/send` payloads are transmitted.
    pub fn send_encoding(mut self, encoding: SendEncoding) -> Self {
        self.config.send_encoding = encoding;
        self
    }

    /// Use a custom transport. Timeout and user-agent settings are then ignored.
    pub fn transport(mut self, transport: impl HttpTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build a client for the configured protocol generation.
    pub fn build(self) -> Result<Box<dyn SmsGateway>, OpiloError> {
        match self.version {
            ApiVersion::V1 => Ok(Box::new(self.build_v1()?)),
            ApiVersion::V2 => Ok(Box::new(self.build_v2()?)),
        }
    }

    /// Build a [`V1Client`], ignoring the configured version.
    pub fn build_v1(self) -> Result<V1Client, OpiloError> {
        let endpoint = self.config.endpoint(ApiVersion::V1)?;
        let http = self.http()?;
        Ok(V1Client::from_parts(self.account, endpoint, http))
    }

    /// Build a [`V2Client`], ignoring the configured version.
    pub fn build_v2(self) -> Result<V2Client, OpiloError> {
        let endpoint = self.config.endpoint(ApiVersion::V2)?;
        let http = self.http()?;
        Ok(V2Client::from_parts(
            self.account,
            endpoint,
            self.config.send_encoding,
            http,
        ))
    }

    fn http(&self) -> Result<Arc<dyn HttpTransport>, OpiloError> {
        if let Some(transport) = self.transport.as_ref() {
            return Ok(Arc::clone(transport));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.config.user_agent.as_ref() {
            builder = builder.user_agent(user_agent.clone());
        }

        let client = builder
            .build()
            .map_err(|err| OpiloError::Transport(Box::new(err)))?;
        Ok(Arc::new(ReqwestTransport::new(client)))
    }
}

/// Send one request and return the body of a 2xx response.
async fn execute(
    http: &dyn HttpTransport,
    endpoint: &Url,
    request: HttpRequest,
) -> Result<String, OpiloError> {
    let path = request.path;
    let url = endpoint
        .join(path)
        .map_err(|err| ConfigError::InvalidBaseUrl {
            url: endpoint.to_string(),
            reason: err.to_string(),
        })?;

    tracing::debug!(
        method = request.method.as_str(),
        path,
        params = request.query.len(),
        json_body = request.json.is_some(),
        "dispatching Opilo request"
    );

    let response = http
        .execute(url, request)
        .await
        .map_err(OpiloError::Transport)?;

    if !(200..=299).contains(&response.status) {
        tracing::warn!(status = response.status, path, "Opilo returned a non-success status");
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };
        return Err(OpiloError::HttpStatus {
            status: response.status,
            body,
        });
    }

    Ok(response.body)
}

fn parse_failed(source: DecodeError, body: String) -> OpiloError {
    tracing::debug!(error = %source, "failed to decode Opilo response");
    OpiloError::Parse { source, body }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::fake::FakeTransport;
    use super::*;
    use crate::domain::{OutgoingSms, SmsId};

    fn account() -> Account {
        Account::new("user", "secret-password").unwrap()
    }

    #[test]
    fn build_selects_protocol_generation() {
        let gateway = OpiloClientBuilder::new(account()).build().unwrap();
        assert_eq!(gateway.api_version(), ApiVersion::V2);

        let gateway = OpiloClientBuilder::new(account())
            .api_version(ApiVersion::V1)
            .build()
            .unwrap();
        assert_eq!(gateway.api_version(), ApiVersion::V1);
    }

    #[test]
    fn build_rejects_invalid_base_url_before_any_request() {
        let transport = FakeTransport::new(200, "{}");
        let result = OpiloClientBuilder::new(account())
            .base_url("not a url")
            .transport(transport.clone())
            .build();

        assert!(matches!(
            result,
            Err(OpiloError::Config(ConfigError::InvalidBaseUrl { .. }))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn builder_overrides_are_applied() {
        let client = OpiloClientBuilder::new(account())
            .base_url("https://example.invalid")
            .timeout(Duration::from_secs(5))
            .user_agent("opilo-tests")
            .send_encoding(SendEncoding::Query)
            .build_v2()
            .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://example.invalid/ws/api/v2/"
        );
        assert_eq!(client.send_encoding(), SendEncoding::Query);

        let client = OpiloClientBuilder::new(account())
            .config(ConnectionConfig {
                base_url: "http://localhost:9000".to_owned(),
                ..Default::default()
            })
            .build_v1()
            .unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:9000/ws/api/v1/");
    }

    #[tokio::test]
    async fn gateway_trait_dispatches_to_v2() {
        let transport = FakeTransport::new(200, r#"{"sms_page_count": 7}"#);
        let gateway = OpiloClientBuilder::new(account())
            .base_url("https://example.invalid")
            .transport(transport.clone())
            .build()
            .unwrap();

        let credit = gateway.get_credit().await.unwrap();
        assert_eq!(credit.sms_page_count, 7);
        assert_eq!(
            transport.last_url().as_deref(),
            Some("https://example.invalid/ws/api/v2/credit")
        );
    }

    #[tokio::test]
    async fn every_operation_fails_on_server_error() {
        let transport = FakeTransport::new(500, "Internal Server Error");
        let gateway = OpiloClientBuilder::new(account())
            .transport(transport)
            .build()
            .unwrap();

        let sms = OutgoingSms::new("3000", "9121231234", "hey").unwrap();
        let errors = vec![
            gateway.send_sms(SendSms::one(sms)).await.unwrap_err(),
            gateway.check_inbox(CheckInbox::default()).await.unwrap_err(),
            gateway
                .check_status(CheckStatus::one(SmsId::new(1)))
                .await
                .unwrap_err(),
            gateway.get_credit().await.unwrap_err(),
        ];

        for err in errors {
            assert!(err.is_communication());
            assert_eq!(err.status(), Some(500));
            assert_eq!(err.body(), Some("Internal Server Error"));
        }
    }

    #[tokio::test]
    async fn every_operation_fails_on_unparseable_body() {
        let transport = FakeTransport::new(200, "<html>maintenance</html>");
        let gateway = OpiloClientBuilder::new(account())
            .transport(transport)
            .build()
            .unwrap();

        let sms = OutgoingSms::new("3000", "9121231234", "hey").unwrap();
        let errors = vec![
            gateway.send_sms(SendSms::one(sms)).await.unwrap_err(),
            gateway.check_inbox(CheckInbox::default()).await.unwrap_err(),
            gateway
                .check_status(CheckStatus::one(SmsId::new(1)))
                .await
                .unwrap_err(),
            gateway.get_credit().await.unwrap_err(),
        ];

        for err in errors {
            assert!(matches!(err, OpiloError::Parse { .. }), "got {err:?}");
            assert_eq!(err.body(), Some("<html>maintenance</html>"));
        }
    }

    #[tokio::test]
    async fn transport_failures_are_wrapped() {
        let gateway = OpiloClientBuilder::new(account())
            .transport(FakeTransport::failing("connection refused"))
            .build()
            .unwrap();

        let err = gateway.get_credit().await.unwrap_err();
        assert!(matches!(err, OpiloError::Transport(_)));
        assert!(err.is_communication());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[tokio::test]
    #[traced_test]
    async fn requests_are_logged_without_credentials() {
        let transport = FakeTransport::new(200, r#"{"sms_page_count": 1}"#);
        let gateway = OpiloClientBuilder::new(account())
            .transport(transport)
            .build()
            .unwrap();

        gateway.get_credit().await.unwrap();

        assert!(logs_contain("dispatching Opilo request"));
        assert!(logs_contain("credit"));
        assert!(!logs_contain("secret-password"));
    }

    #[test]
    fn non_communication_errors_are_classified() {
        let err = OpiloError::Unsupported {
            version: ApiVersion::V1,
            operation: "check_inbox",
        };
        assert!(!err.is_communication());
        assert_eq!(err.to_string(), "check_inbox is not supported by API v1");
        assert_eq!(err.body(), None);

        let err = OpiloError::from(ValidationError::Empty { field: "to" });
        assert!(!err.is_communication());
    }
}
