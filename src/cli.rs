use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Optional path to config file (YAML)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan browser history and write the title -> URL snapshot
    Build {
        /// Snapshot file to write (defaults to the cache directory)
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Home directory to scan for browser profiles
        #[arg(long)]
        home: Option<PathBuf>,
    },
    /// Resolve a window title to a domain via web search
    Resolve {
        /// Raw window title
        title: Option<String>,
    },
    /// List discovered history stores as JSON
    Locate {
        /// Home directory to scan for browser profiles
        #[arg(long)]
        home: Option<PathBuf>,
    },
    /// Print a window title with browser decoration removed
    Clean {
        /// Raw window title
        title: Option<String>,
    },
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
