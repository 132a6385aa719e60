mod cli;
mod fetch;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use tripfetch::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the report, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    // Flags are the top layer, so validation waits until they are applied
    let mut config = Config::load_layers(cli.config)?;

    match cli.command.unwrap_or_else(|| Commands::Fetch(Default::default())) {
        Commands::Fetch(args) => {
            args.apply(&mut config);
            config.validate()?;
            fetch::run(config, &mut std::io::stdout()).await?
        }
        Commands::List(args) => {
            args.apply(&mut config);
            config.validate()?;
            fetch::list(&config, &mut std::io::stdout().lock())?
        }
    }

    Ok(())
}
