use std::time::Duration;

use hyper::body::{Body, Incoming};
use hyper::{Request, Response};
use hyper_util::client::legacy::{Client, Error as ClientError, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tokio::time::timeout;

#[derive(Debug)]
pub enum SendError {
    Send(ClientError),
    Timeout(Duration),
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Send(err) => write!(f, "send failed: {err}"),
            SendError::Timeout(after) => {
                write!(f, "no response within {}ms", after.as_millis())
            }
        }
    }
}

impl std::error::Error for SendError {}

/// Plain-HTTP client for the outbound leg of the dispatcher.
///
/// Generic over the request body so the edge can hand the inbound
/// `hyper::body::Incoming` straight through while tests send owned bodies.
pub struct HttpClient<B = Incoming> {
    client: Client<HttpConnector, B>,
    response_timeout: Duration,
}

impl<B> HttpClient<B>
where
    B: Body + Send + Unpin + 'static,
    B::Data: Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    pub fn new(response_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(response_timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            response_timeout,
        }
    }

    /// Issue `req` and wait for the response head, bounded by the configured
    /// timeout. The response body streams in after this resolves and is not
    /// covered by the bound.
    pub async fn send(&self, req: Request<B>) -> Result<Response<Incoming>, SendError> {
        match timeout(self.response_timeout, self.client.request(req)).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(err)) => Err(SendError::Send(err)),
            Err(_) => Err(SendError::Timeout(self.response_timeout)),
        }
    }
}
