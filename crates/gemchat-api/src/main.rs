//! gemchat entry point.
//!
//! Binary name: `gemchat`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then starts
//! the web app or prints shell completions.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use gemchat_infra::config::{default_config_path, load_config, load_config_strict};
use gemchat_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "gemchat", &mut std::io::stdout());
        }

        Commands::Serve { port, host } => {
            let mut config = match &cli.config {
                Some(path) => load_config_strict(path).await?,
                None => load_config(&default_config_path()).await,
            };
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }

            let addr = format!("{}:{}", config.host, config.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, models = ?config.models, "starting web app");

            if !cli.quiet {
                println!();
                println!(
                    "  {} {} listening on {}",
                    console::style("🤖").bold(),
                    config.page_title,
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(AppState::new(config));

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
