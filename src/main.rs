use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use counterfact::cli::Cli;
use counterfact::config::Config;
use counterfact::counter::{FactService, NumbersApiClient};
use counterfact::logging::init_tracing;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_file = init_tracing(cli.log.as_deref());

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    config.validate()?;
    tracing::info!(
        base_url = %config.facts.base_url,
        screen = ?config.ui.start_screen,
        log_file = ?log_file,
        "Starting counterfact"
    );

    let service: Arc<dyn FactService> = Arc::new(
        NumbersApiClient::new(&config.facts).context("Failed to build fact client")?,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime
        .block_on(counterfact::ui::run(config, service))
        .context("Terminal UI failed")?;

    tracing::info!("Exited cleanly");
    Ok(())
}
