//! Inbound edge of the dispatcher: the TCP accept loop, HTTP/1.1 connection
//! serving and the per-request forwarding path.

use std::sync::Arc;

use carousel_lb::{RoundRobin, UpstreamPool};
use carousel_transport::http_client::HttpClient;
use tokio::net::TcpListener;

pub mod dispatch;
pub mod listener;

pub use dispatch::ProxyBody;

/// State shared by every in-flight request: the immutable target pool, the
/// rotation cursor and the outbound client.
pub struct DispatchState {
    pub pool: UpstreamPool,
    pub rotation: RoundRobin,
    pub client: HttpClient,
}

/// Listening front end. Owns the TCP listener and the shared dispatch state.
pub struct HttpListener {
    listener: TcpListener,
    state: Arc<DispatchState>,
}
