use skillswap_server::{config::Config, start_server};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("skillswap_server=debug,skillswap_core=info,tower_http=debug")
            }),
        )
        .init();

    let config = Config::load()?;
    start_server(config).await
}
