//! Translation between the inbound request and the outbound leg: rebuilds the
//! URI against the chosen target, carries headers across and stamps the
//! identifying headers. Generic over the body type so a streaming body moves
//! through without being touched.

use std::net::SocketAddr;

use http::{HeaderName, HeaderValue, Request, Response, Uri, header};

/// Marker set on every forwarded request so upstreams can tell the request
/// came through this dispatcher.
pub const DISPATCHER_MARKER: &str = "carousel";

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_LOAD_BALANCER: HeaderName = HeaderName::from_static("x-load-balancer");
pub const X_UPSTREAM_SERVER: HeaderName = HeaderName::from_static("x-upstream-server");

// Connection management is per hop; hyper negotiates each side itself.
static HOP_HEADERS: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug)]
pub enum BridgeError {
    InvalidUri(String),
    InvalidHeader,
    Build(http::Error),
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::InvalidUri(uri) => write!(f, "invalid forward uri: {uri}"),
            BridgeError::InvalidHeader => write!(f, "invalid header value"),
            BridgeError::Build(e) => write!(f, "request build error: {e}"),
        }
    }
}

impl std::error::Error for BridgeError {}

/// Rebuild the inbound request against `target`, keeping the method and
/// path+query, carrying the caller's headers over, and stamping
/// `x-forwarded-for` and `x-load-balancer` (add-or-overwrite).
pub fn build_forward_request<B>(
    target: &str,
    peer: SocketAddr,
    req: Request<B>,
) -> Result<Request<B>, BridgeError> {
    let (parts, body) = req.into_parts();

    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let forward = format!("{target}{path}");
    let uri: Uri = forward.parse().map_err(|_| BridgeError::InvalidUri(forward))?;

    let authority = uri.authority().map(|a| a.as_str().to_string());

    let mut outbound = Request::builder()
        .method(parts.method)
        .uri(uri)
        .body(body)
        .map_err(BridgeError::Build)?;

    let headers = outbound.headers_mut();
    for (name, value) in parts.headers.iter() {
        // content-length is dropped with the rest of the framing headers;
        // hyper reframes the outbound body from the stream it is handed
        if HOP_HEADERS.contains(name) || name == &header::CONTENT_LENGTH {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    // HTTP/1.1 requires a host; a caller that sent none gets the target's
    if !headers.contains_key(header::HOST) {
        if let Some(authority) = authority {
            let host = HeaderValue::from_str(&authority).map_err(|_| BridgeError::InvalidHeader)?;
            headers.insert(header::HOST, host);
        }
    }

    let caller =
        HeaderValue::from_str(&peer.ip().to_string()).map_err(|_| BridgeError::InvalidHeader)?;
    headers.insert(X_FORWARDED_FOR, caller);
    headers.insert(X_LOAD_BALANCER, HeaderValue::from_static(DISPATCHER_MARKER));

    Ok(outbound)
}

/// Strip the connection-management headers off the upstream response and
/// stamp `x-upstream-server` with the target that served it. Status, payload
/// headers and body relay as-is.
pub fn relay_response<B>(target: &str, mut resp: Response<B>) -> Result<Response<B>, BridgeError> {
    for name in &HOP_HEADERS {
        resp.headers_mut().remove(name);
    }

    let served_by = HeaderValue::from_str(target).map_err(|_| BridgeError::InvalidHeader)?;
    resp.headers_mut().insert(X_UPSTREAM_SERVER, served_by);

    Ok(resp)
}
