use codebreak::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("CODEBREAK_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    let server = CodebreakServer::builder().bind(&bind).build().await?;
    tracing::info!(addr = %server.local_addr()?, "connect with ws://<host>/ws/{{session}}/{{player}}");
    server.run().await?;
    Ok(())
}
