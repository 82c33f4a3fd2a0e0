use std::{convert::Infallible, net::SocketAddr};

use bytes::Bytes;
use clap::Parser;
use http_body_util::Full;
use hyper::{Request, Response, body::Incoming, service::service_fn};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(version, about = "Minimal HTTP/1.1 backend for driving carousel by hand")]
struct Cli {
    #[arg(long, default_value_t = 9001)]
    port: u16,

    /// Name echoed in every response body
    #[arg(long, default_value = "backend")]
    name: String,
}

async fn handle_request(
    name: String,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let via = req
        .headers()
        .get("x-load-balancer")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    let body = format!("{} {} {} via={}\n", name, req.method(), req.uri().path(), via);
    Ok(Response::new(Full::new(Bytes::from(body))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let addr: SocketAddr = format!("127.0.0.1:{}", cli.port).parse()?;

    let listener = TcpListener::bind(addr).await?;
    println!("HTTP/1.1 backend '{}' listening on http://{}", cli.name, addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let name = cli.name.clone();
        let service = service_fn(move |req| handle_request(name.clone(), req));

        tokio::spawn(async move {
            let _ = hyper::server::conn::http1::Builder::new()
                .serve_connection(io, service)
                .await;
        });
    }
}
