use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use carousel_bridge::{build_forward_request, relay_response};
use http_body_util::{BodyExt, Full, combinators::BoxBody};
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::{Request, Response, StatusCode};
use log::{error, warn};

use crate::DispatchState;

/// Relayed bodies are the upstream's own stream; error bodies are short owned
/// buffers. Both ride behind one boxed type.
pub type ProxyBody = BoxBody<Bytes, hyper::Error>;

/// Forward one inbound request: take the next turn of the rotation, bridge
/// the request across, and relay whatever comes back. Every upstream failure
/// is absorbed here and turned into a 502; nothing propagates past the
/// handler boundary, so neither the process nor unrelated requests are
/// affected.
pub async fn dispatch(
    state: Arc<DispatchState>,
    peer: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<ProxyBody>, Infallible> {
    let target = match state.rotation.pick(&state.pool) {
        Some(target) => target,
        None => {
            error!("No upstream targets available");
            return Ok(bad_gateway());
        }
    };

    let outbound = match build_forward_request(target, peer, req) {
        Ok(outbound) => outbound,
        Err(err) => {
            warn!("Could not build forward request for {}: {}", target, err);
            return Ok(bad_gateway());
        }
    };

    match state.client.send(outbound).await {
        Ok(resp) => match relay_response(target, resp) {
            Ok(resp) => Ok(resp.map(|body| body.boxed())),
            Err(err) => {
                warn!("Could not relay response from {}: {}", target, err);
                Ok(bad_gateway())
            }
        },
        Err(err) => {
            warn!("Upstream {} failed: {}", target, err);
            Ok(bad_gateway())
        }
    }
}

fn bad_gateway() -> Response<ProxyBody> {
    let body = Full::new(Bytes::from_static(b"Bad Gateway"))
        .map_err(|never| match never {})
        .boxed();

    let mut resp = Response::new(body);
    *resp.status_mut() = StatusCode::BAD_GATEWAY;
    resp.headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    resp
}
