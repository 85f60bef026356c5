use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::http::connection::Connection;
use crate::rpc::service::RpcService;

pub async fn run(listen_addr: &str, service: Arc<RpcService>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("Listening on {}", listen_addr);

    loop {
        let (socket, peer) = listener.accept().await?;

        let service = service.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, service);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
