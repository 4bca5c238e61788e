use std::sync::Arc;

use url::Url;

use super::{
    ApiVersion, BoxFuture, HttpTransport, OpiloClientBuilder, OpiloError, SmsGateway, execute,
    parse_failed,
};
use crate::domain::{
    Account, CheckInbox, CheckStatus, CheckStatusResponse, Credit, Inbox, SendSms,
    SendSmsResponse,
};
use crate::transport::HttpRequest;
use crate::transport::v2::{
    SendEncoding, decode_check_status_response, decode_credit_response, decode_error_envelope,
    decode_inbox_response, decode_send_sms_response, encode_check_inbox, encode_check_status,
    encode_get_credit, encode_send_sms,
};

#[derive(Clone)]
/// Client for the second protocol generation.
///
/// All responses are JSON. A 2xx body of the form `{"error": ...}` is reported as
/// [`OpiloError::Api`].
pub struct V2Client {
    account: Account,
    endpoint: Url,
    send_encoding: SendEncoding,
    http: Arc<dyn HttpTransport>,
}

impl V2Client {
    /// Create a client for the production host.
    ///
    /// For more customization, use [`OpiloClientBuilder`].
    pub fn new(account: Account) -> Result<Self, OpiloError> {
        OpiloClientBuilder::new(account).build_v2()
    }

    pub(super) fn from_parts(
        account: Account,
        endpoint: Url,
        send_encoding: SendEncoding,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            account,
            endpoint,
            send_encoding,
            http,
        }
    }

    /// Versioned endpoint all paths are resolved against.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn send_encoding(&self) -> SendEncoding {
        self.send_encoding
    }

    /// Send a batch of messages.
    ///
    /// The result always holds exactly one [`crate::SendResult`] per message, in request
    /// order. Rejected messages are [`crate::SendResult::Failed`], not errors.
    ///
    /// Errors:
    /// - [`OpiloError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`OpiloError::Api`] when Opilo returns an error envelope,
    /// - [`OpiloError::Parse`] when the body is malformed or the result count differs.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, OpiloError> {
        let http_request = encode_send_sms(&self.account, &request, self.send_encoding);
        let body = self.call(http_request).await?;
        decode_send_sms_response(&request, &body).map_err(|source| parse_failed(source, body))
    }

    /// Fetch received messages matching `options`, ordered by ascending id.
    pub async fn check_inbox(&self, options: CheckInbox) -> Result<Inbox, OpiloError> {
        let http_request = encode_check_inbox(&self.account, &options);
        let body = self.call(http_request).await?;
        decode_inbox_response(&body).map_err(|source| parse_failed(source, body))
    }

    /// Look up delivery status for already sent message ids.
    pub async fn check_status(
        &self,
        request: CheckStatus,
    ) -> Result<CheckStatusResponse, OpiloError> {
        let http_request = encode_check_status(&self.account, &request);
        let body = self.call(http_request).await?;
        decode_check_status_response(&request, &body).map_err(|source| parse_failed(source, body))
    }

    /// Remaining credit in SMS pages.
    pub async fn get_credit(&self) -> Result<Credit, OpiloError> {
        let http_request = encode_get_credit(&self.account);
        let body = self.call(http_request).await?;
        decode_credit_response(&body).map_err(|source| parse_failed(source, body))
    }

    async fn call(&self, request: HttpRequest) -> Result<String, OpiloError> {
        let body = execute(self.http.as_ref(), &self.endpoint, request).await?;

        if let Some(failure) = decode_error_envelope(&body) {
            tracing::warn!(
                code = ?failure.code,
                message = %failure.message,
                "Opilo returned an error envelope"
            );
            return Err(OpiloError::Api {
                code: failure.code,
                message: failure.message,
                body,
            });
        }

        Ok(body)
    }
}

impl SmsGateway for V2Client {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    fn send_sms<'a>(
        &'a self,
        request: SendSms,
    ) -> BoxFuture<'a, Result<SendSmsResponse, OpiloError>> {
        Box::pin(V2Client::send_sms(self, request))
    }

    fn check_inbox<'a>(&'a self, options: CheckInbox) -> BoxFuture<'a, Result<Inbox, OpiloError>> {
        Box::pin(V2Client::check_inbox(self, options))
    }

    fn check_status<'a>(
        &'a self,
        request: CheckStatus,
    ) -> BoxFuture<'a, Result<CheckStatusResponse, OpiloError>> {
        Box::pin(V2Client::check_status(self, request))
    }

    fn get_credit<'a>(&'a self) -> BoxFuture<'a, Result<Credit, OpiloError>> {
        Box::pin(V2Client::get_credit(self))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::super::fake::FakeTransport;
    use super::*;
    use crate::domain::{
        DeliveryStatus, OutgoingSms, ReadFilter, SendError, SendResult, SmsId, TIMESTAMP_FORMAT,
    };
    use crate::transport::{DecodeError, Method};

    fn make_client(transport: FakeTransport, encoding: SendEncoding) -> V2Client {
        OpiloClientBuilder::new(Account::new("user", "pass").unwrap())
            .base_url("https://example.invalid")
            .send_encoding(encoding)
            .transport(transport)
            .build_v2()
            .unwrap()
    }

    #[tokio::test]
    async fn send_sms_posts_json_and_parses_ids() {
        let transport = FakeTransport::new(200, r#"{"messages": [{"id": 12345}]}"#);
        let client = make_client(transport.clone(), SendEncoding::JsonBody);

        let sms = OutgoingSms::new("9121231234", "9123214321", "hey").unwrap();
        let response = client.send_sms(SendSms::one(sms)).await.unwrap();
        assert_eq!(
            response.items(),
            Some(&[SendResult::Sent(SmsId::new(12345))][..])
        );

        assert_eq!(
            transport.last_url().as_deref(),
            Some("https://example.invalid/ws/api/v2/sms/send")
        );
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.json,
            Some(json!({
                "username": "user",
                "password": "pass",
                "messages": [{"from": "9121231234", "to": "9123214321", "text": "hey"}]
            }))
        );
    }

    #[tokio::test]
    async fn send_sms_query_encoding_puts_payload_in_query() {
        let transport = FakeTransport::new(200, r#"{"messages": [{"id": 1}]}"#);
        let client = make_client(transport.clone(), SendEncoding::Query);

        let sms = OutgoingSms::new("3000", "9123214321", "hey").unwrap();
        client.send_sms(SendSms::one(sms)).await.unwrap();

        let request = transport.last_request().unwrap();
        assert!(request.json.is_none());
        assert_eq!(request.query_param("messages[0][to]"), Some("9123214321"));
        assert_eq!(request.query_param("password"), Some("pass"));
    }

    #[tokio::test]
    async fn send_sms_keeps_partial_failures_as_data() {
        let json = r#"
        {
          "messages": [
            {"id": 1},
            {"error": {"message": "Invalid number", "code": 5}},
            {"id": 3}
          ]
        }
        "#;
        let client = make_client(FakeTransport::new(200, json), SendEncoding::JsonBody);

        let request = SendSms::broadcast("3000", ["1", "bad", "3"], "hey").unwrap();
        let items = client
            .send_sms(request)
            .await
            .unwrap()
            .into_items()
            .unwrap();

        assert_eq!(
            items,
            vec![
                SendResult::Sent(SmsId::new(1)),
                SendResult::Failed(SendError {
                    message: "Invalid number".to_owned(),
                    code: Some(5),
                }),
                SendResult::Sent(SmsId::new(3)),
            ]
        );
    }

    #[tokio::test]
    async fn send_sms_rejects_result_count_mismatch() {
        let client = make_client(
            FakeTransport::new(200, r#"{"messages": [{"id": 1}]}"#),
            SendEncoding::JsonBody,
        );
        let request = SendSms::broadcast("3000", ["1", "2"], "hey").unwrap();

        let err = client.send_sms(request).await.unwrap_err();
        match err {
            OpiloError::Parse { source, body } => {
                assert!(matches!(
                    source,
                    DecodeError::ResultCountMismatch {
                        expected: 2,
                        actual: 1
                    }
                ));
                assert_eq!(body, r#"{"messages": [{"id": 1}]}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_inbox_sends_filters_and_sorts_messages() {
        let json = r#"
        {
          "messages": {
            "54321": {
              "from": "9123214321",
              "to": "9121231234",
              "text": "Hello mate",
              "received_at": "2012-05-25 02:10:27"
            },
            "12345": {
              "from": "9121231234",
              "to": "9123214321",
              "text": "سلام دوست عزیز",
              "received_at": "2016-03-15 14:27:30"
            }
          }
        }
        "#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone(), SendEncoding::JsonBody);

        let options = CheckInbox {
            min_id: 100,
            min_received_at: NaiveDate::from_ymd_opt(2012, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(Into::into),
            read: ReadFilter::Read,
            line_number: None,
        };
        let inbox = client.check_inbox(options).await.unwrap();

        assert_eq!(inbox.len(), 2);
        let first = &inbox.messages()[0];
        assert_eq!(first.opilo_id(), SmsId::new(12345));
        assert_eq!(first.text(), "سلام دوست عزیز");
        assert_eq!(
            first.received_at().format(TIMESTAMP_FORMAT).to_string(),
            "2016-03-15 14:27:30"
        );
        let second = &inbox.messages()[1];
        assert_eq!(second.opilo_id(), SmsId::new(54321));
        assert_eq!(second.from(), "9123214321");
        assert_eq!(
            second.received_at().format(TIMESTAMP_FORMAT).to_string(),
            "2012-05-25 02:10:27"
        );

        assert_eq!(
            transport.last_url().as_deref(),
            Some("https://example.invalid/ws/api/v2/inbox")
        );
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.query_param("min_id"), Some("100"));
        assert_eq!(request.query_param("min_received_at"), Some("2012-01-01 00:00:00"));
        assert_eq!(request.query_param("read"), Some("read"));
        assert_eq!(request.query_param("line_number"), None);
    }

    #[tokio::test]
    async fn check_status_parses_known_statuses() {
        let transport = FakeTransport::new(200, r#"{"status_array": {"10": 2, "11": "failed"}}"#);
        let client = make_client(transport.clone(), SendEncoding::JsonBody);

        let request = CheckStatus::new(vec![SmsId::new(10), SmsId::new(11)]).unwrap();
        let response = client.check_status(request).await.unwrap();

        assert_eq!(response.get(SmsId::new(10)), Some(DeliveryStatus::Delivered));
        assert_eq!(response.get(SmsId::new(11)), Some(DeliveryStatus::Failed));

        assert_eq!(
            transport.last_url().as_deref(),
            Some("https://example.invalid/ws/api/v2/sms/status")
        );
        let request = transport.last_request().unwrap();
        assert_eq!(request.query_param("ids[0]"), Some("10"));
        assert_eq!(request.query_param("ids[1]"), Some("11"));
    }

    #[tokio::test]
    async fn check_status_fails_loudly_on_unknown_status() {
        let client = make_client(
            FakeTransport::new(200, r#"{"status_array": {"10": 99}}"#),
            SendEncoding::JsonBody,
        );

        let err = client
            .check_status(CheckStatus::one(SmsId::new(10)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OpiloError::Parse {
                source: DecodeError::UnknownStatus { id: 10, .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn get_credit_parses_page_count() {
        let transport = FakeTransport::new(200, r#"{"sms_page_count": 33}"#);
        let client = make_client(transport.clone(), SendEncoding::JsonBody);

        let credit = client.get_credit().await.unwrap();
        assert_eq!(credit.sms_page_count, 33);

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.query.len(), 2);
    }

    #[tokio::test]
    async fn error_envelope_maps_to_api_error() {
        let body = r#"{"error": {"code": 401, "message": "Invalid credentials"}}"#;
        let client = make_client(FakeTransport::new(200, body), SendEncoding::JsonBody);

        let err = client.get_credit().await.unwrap_err();
        match err {
            OpiloError::Api {
                code,
                message,
                body: raw,
            } => {
                assert_eq!(code, Some(401));
                assert_eq!(message, "Invalid credentials");
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_envelope_with_code_only_maps_to_api_error() {
        let client = make_client(
            FakeTransport::new(200, r#"{"error": {"code": 401}}"#),
            SendEncoding::JsonBody,
        );

        let err = client.get_credit().await.unwrap_err();
        assert!(matches!(
            err,
            OpiloError::Api {
                code: Some(401),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn check_status_rejects_unanswered_ids() {
        let client = make_client(
            FakeTransport::new(200, r#"{"status_array": {"10": 2}}"#),
            SendEncoding::JsonBody,
        );

        let request = CheckStatus::new(vec![SmsId::new(10), SmsId::new(11)]).unwrap();
        let err = client.check_status(request).await.unwrap_err();
        assert!(matches!(
            err,
            OpiloError::Parse {
                source: DecodeError::MissingSmsId { id: 11 },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let client = make_client(
            FakeTransport::new(401, r#"{"error": "Unauthorized"}"#),
            SendEncoding::JsonBody,
        );

        let err = client.get_credit().await.unwrap_err();
        assert!(matches!(err, OpiloError::HttpStatus { status: 401, .. }));
        assert_eq!(err.body(), Some(r#"{"error": "Unauthorized"}"#));
    }
}
