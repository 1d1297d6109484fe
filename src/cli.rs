use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "skillswap", version, about = "TUI for trading skills with credits")]
pub struct Args {
    /// Path to an alternative config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Theme name (e.g., "Catppuccin Mocha", "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,
}
