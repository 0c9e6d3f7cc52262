use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use murmur::app::AppContext;
use murmur::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.db)?;

    match cli.command {
        Commands::Collect(args) => {
            commands::collect(&ctx, &args).await?;
        }
        Commands::List => {
            commands::list_profiles(&ctx)?;
        }
        Commands::Show { username, limit } => {
            commands::show_profile(&ctx, &username, limit)?;
        }
        Commands::Export { path } => {
            commands::export_profiles(&ctx, &path)?;
        }
    }

    Ok(())
}
