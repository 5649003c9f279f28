use anyhow::Result;
use clap::Parser;
use docker_pins::{
    catalog::default_catalog,
    cli::Cli,
    config::Config,
    registry::HyperTransport,
    resolve::TagResolver,
    service::{UpdateOptions, UpdateService},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let options = UpdateOptions {
        output: cli.output.unwrap_or(config.output),
        dry_run: cli.dry_run,
    };

    let resolver = TagResolver::new(HyperTransport::new(), config.registries);
    let pins = UpdateService::run(&default_catalog(), &resolver, &options).await?;

    if options.dry_run {
        print!("{}", pins.to_ini());
    }

    Ok(())
}
