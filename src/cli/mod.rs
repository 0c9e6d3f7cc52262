pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "murmur")]
#[command(about = "Collects public profiles and posts through a real browser", long_about = None)]
pub struct Cli {
    /// SQLite database path (default: data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect profiles and recent posts
    Collect(CollectArgs),
    /// List collected profiles
    List,
    /// Show the latest collection for a profile
    Show {
        /// Username, with or without the leading @
        username: String,

        /// Number of posts to print
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Export the latest collection of every profile as JSON
    Export {
        /// Output file
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
    /// Usernames to collect, in order
    #[arg(required = true)]
    pub usernames: Vec<String>,

    /// Posts to collect per profile (overrides config)
    #[arg(short = 'n', long)]
    pub max_posts: Option<usize>,

    /// Remote-debugging port of the browser to attach to (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Launch a new browser instead of attaching to a running one
    #[arg(long)]
    pub launch: bool,

    /// Newest posts first
    #[arg(long)]
    pub descending: bool,

    /// Keep posts inside the configured freshness window
    #[arg(long)]
    pub keep_fresh: bool,

    /// Also write the batch as a JSON document
    #[arg(long)]
    pub json: bool,
}
