use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use url::Url;

use super::{BoxFuture, HttpResponse, HttpTransport};
use crate::transport::HttpRequest;

#[derive(Debug, Clone)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    calls: usize,
    last_url: Option<String>,
    last_request: Option<HttpRequest>,
    response: Result<HttpResponse, String>,
}

impl FakeTransport {
    pub fn new(response_status: u16, response_body: impl Into<String>) -> Self {
        Self::with_response(Ok(HttpResponse {
            status: response_status,
            body: response_body.into(),
        }))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_response(Err(message.into()))
    }

    fn with_response(response: Result<HttpResponse, String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                calls: 0,
                last_url: None,
                last_request: None,
                response,
            })),
        }
    }

    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    pub fn last_url(&self) -> Option<String> {
        self.state.lock().unwrap().last_url.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().unwrap().last_request.clone()
    }
}

impl HttpTransport for FakeTransport {
    fn execute<'a>(
        &'a self,
        url: Url,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = {
                let mut state = self.state.lock().unwrap();
                state.calls += 1;
                state.last_url = Some(url.to_string());
                state.last_request = Some(request);
                state.response.clone()
            };
            response.map_err(|message| Box::<dyn StdError + Send + Sync>::from(message))
        })
    }
}
