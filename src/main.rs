use anyhow::Result;
use clap::Parser;
use genmake::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli::log_filter(&args)))
        .format_timestamp(None)
        .init();
    info!("Starting genmake v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args)
}
