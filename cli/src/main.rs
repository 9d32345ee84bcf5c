use crate::cli::{Args, Command};
use clap::Parser;
use sparql_gateway_web::ServerConfig;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Serve { bind } => {
            let config = ServerConfig::from_env(bind);
            for binding in &config.bindings {
                tracing::info!(
                    endpoint = %binding.name,
                    backend = %binding.backend_url,
                    "registered endpoint binding"
                );
            }
            sparql_gateway_web::serve(config).await
        }
    }
}
