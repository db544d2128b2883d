mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    ovalguide_search::init_logging();

    let cli = Cli::parse();

    // Init doesn't need config
    if let Commands::Init { path } = &cli.command {
        return commands::init::run_init(path);
    }

    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    config.search.validate()?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),
        Commands::Lookup { query } => {
            commands::lookup::execute(query, &config.search).await?;
        }
        Commands::Results { query } => {
            commands::results::execute(query, &config.search).await?;
        }
        Commands::Interactive => {
            commands::interactive::execute(&config.search).await?;
        }
    }

    Ok(())
}
