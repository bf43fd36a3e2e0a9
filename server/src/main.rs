use tokio::net::TcpListener;
use todo_core::CollectionStore;
use todo_server::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().inspect_err(|error| {
        tracing::error!(%error, "invalid configuration");
    })?;

    let addr = config.bind_address();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    todo_server::run(listener, CollectionStore::in_memory()).await?;
    Ok(())
}
