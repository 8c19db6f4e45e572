mod bluetooth;
mod command;
mod config;
mod menu;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use bluetooth::Controller;
use command::{SharedRunner, SystemRunner};
use config::AppConfig;
use menu::picker::Picker;

#[derive(Parser)]
#[command(
    name = "btmenu",
    about = "Launcher-driven Bluetooth menu for adapters and devices"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the picker pipeline on stdout stays clean.
    let directive = if cli.debug { "btmenu=debug" } else { "btmenu=info" };
    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    info!("btmenu starting");

    let config = AppConfig::load();
    let runner: SharedRunner = Arc::new(SystemRunner);
    let controller = Controller::new(
        runner.clone(),
        Duration::from_secs(config.scan_window_secs),
        Duration::from_secs(config.power_on_grace_secs),
    );
    let picker = Picker::new(runner, &config);

    menu::run(&controller, &picker).await;

    info!("btmenu exiting");
    Ok(())
}
