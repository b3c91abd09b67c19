//! cryptosim - simulated crypto trading from the terminal
//!
//! # Usage
//! ```sh
//! cryptosim                       # interactive shell with live prices
//! cryptosim login ada@example.com secret
//! cryptosim buy btc 0.1
//! cryptosim portfolio --watch
//! ```
//!
//! Configuration comes from the environment (or a `.env` file); see
//! `Config::from_env`. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::Result;
use clap::Parser;
use cryptosim::config::Config;
use cryptosim::interfaces::{App, Cli, Command};
use tokio::io::BufReader;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let config = Config::from_env()?;
    info!(
        "cryptosim {}: storage {:?} at {:?}, tick {}ms",
        env!("CARGO_PKG_VERSION"),
        config.storage.backend,
        config.storage.data_dir,
        config.simulation.tick_interval_ms
    );

    // Ticks and commands share one thread so they never interleave mid-command
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(config, cli.command.unwrap_or(Command::Shell)))
}

async fn run(config: Config, command: Command) -> Result<()> {
    let mut app = App::open(config).await?;
    let stdout = std::io::stdout();

    match command {
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            app.run_shell(stdin, stdout.lock()).await
        }
        Command::Portfolio { watch: true } => app.watch_portfolio(stdout.lock()).await,
        command => {
            let text = app.execute(command).await?;
            if !text.is_empty() {
                println!("{}", text.trim_end());
            }
            Ok(())
        }
    }
}
