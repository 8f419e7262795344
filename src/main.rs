mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use huffpack::config::CodecConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CodecConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run(cli, &config)
}
