use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use carousel_config::config::Config;
use carousel_lb::{RoundRobin, UpstreamPool};
use carousel_transport::http_client::HttpClient;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use log::{debug, error, info};
use tokio::net::TcpListener;

use crate::dispatch::dispatch;
use crate::{DispatchState, HttpListener};

impl HttpListener {
    /// Bind the listening socket and assemble the shared dispatch state.
    pub async fn bind(config: &Config) -> io::Result<Self> {
        let addr = format!("{}:{}", config.listen.address, config.listen.port);
        let listener = TcpListener::bind(&addr).await?;

        let state = Arc::new(DispatchState {
            pool: UpstreamPool::new(config.upstreams.clone()),
            rotation: RoundRobin::new(),
            client: HttpClient::new(Duration::from_millis(config.proxy.upstream_timeout_ms)),
        });

        info!("Dispatcher listening on {}", listener.local_addr()?);
        info!(
            "Upstream targets ({}): {}",
            state.pool.len(),
            state.pool.targets().join(", ")
        );

        Ok(Self { listener, state })
    }

    /// Address the listener is actually bound to. Differs from the configured
    /// port when binding port 0.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the process is terminated. Each connection is
    /// served on its own task, so one slow upstream never holds up another
    /// caller.
    pub async fn run(self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(err) => {
                    error!("Accept failed: {}", err);
                    continue;
                }
            };

            debug!("New connection from {}", peer);

            let state = self.state.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| dispatch(state.clone(), peer, req));

                if let Err(err) = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    debug!("Connection from {} ended: {:?}", peer, err);
                }
            });
        }
    }
}
