use anyhow::Result;
use clap::Parser;

use saferide::{app::load_config, cli, cli::Cli, utils::init_logger};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    // An explicit --config wins; otherwise layer global config, local
    // overrides, and environment on top of the defaults.
    let config = if let Some(config_path) = &cli.config {
        let toml_str = std::fs::read_to_string(config_path)?;
        toml::from_str(&toml_str)?
    } else {
        load_config().unwrap_or_default()
    };

    cli::handle_command(cli.command, &config).await
}
