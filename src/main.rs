use std::sync::Arc;

use serde_json::json;

use courier::config::Config;
use courier::rpc::envelope::ResponseSlot;
use courier::rpc::error::HandlerError;
use courier::rpc::proto::{ApiRequest, ProtocolDescriptor};
use courier::rpc::service::RpcService;
use courier::server;

async fn hello(req: ApiRequest, res: ResponseSlot) -> Result<(), HandlerError> {
    let name = req
        .args
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("stranger");
    res.succ(json!({ "reply": format!("Hello, {name}!") }));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let listen_addr = cfg.listen_addr.clone();

    let mut service = RpcService::new(cfg);
    service.implement(
        ProtocolDescriptor::new(
            "Hello",
            "src/shared/protocols/PtlHello.proto",
            json!({
                "type": "object",
                "required": ["name"],
                "fields": { "name": { "type": "string" } }
            }),
            json!({
                "type": "object",
                "fields": { "reply": { "type": "string" } }
            }),
        ),
        hello,
    )?;

    let service = Arc::new(service);

    tokio::select! {
        res = server::listener::run(&listen_addr, service) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
