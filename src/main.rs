mod config;
mod notes;
mod pr;
mod web;

#[cfg(test)]
mod test_support;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Web form that turns completed Azure DevOps pull requests into release notes
/// written by a chat-completion model.
#[derive(Parser, Debug)]
#[command(name = "release-notes", version, about)]
struct Cli {
    /// Address to listen on (overrides [server].bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// Config file path (defaults to .release-notes.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    debug!(
        azure = %config.azure.base_url(),
        openai = %config.openai.base_url(),
        model = %config.openai.model,
        "resolved upstreams"
    );

    let bind = config.server.bind.clone();
    let app = web::build_router(web::AppContext::new(config)?);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
    }
}
