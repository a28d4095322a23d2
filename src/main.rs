mod cli;

use clap::Parser;
use cli::Cli;
use sentences_app::config::Config;
use sentences_app::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.apply_to(Config::from_env());
    init_tracing(&config.log_level);
    tracing::debug!(?config, "starting");

    cli::run(cli.command, &config)
}
