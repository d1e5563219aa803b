use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use where_is_bus_tracking::TrackingService;

use crate::routes;

/// A bound, not yet running HTTP server.
pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    /// Bind `addr`; port 0 picks a free port, see [`Server::local_addr`].
    pub async fn bind(addr: SocketAddr, service: Arc<TrackingService>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let app = routes::create_router(service);

        Ok(Self { listener, app })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
