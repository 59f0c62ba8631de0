use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ct")]
#[command(about = "Translate source-code comments line by line")]
#[command(version)]
pub struct Args {
    /// Translation provider (mtran, openai)
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<String>,

    /// Source language code, or "auto"
    #[arg(short = 'f', long = "from", global = true)]
    pub from: Option<String>,

    /// Target language code (e.g., zh-Hant, ja, en)
    #[arg(short = 't', long = "to", global = true)]
    pub to: Option<String>,

    /// Path to the config file (defaults to ~/.config/ct/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a single comment line (reads stdin if TEXT is omitted)
    Line {
        /// The source line, comment markers included
        text: Option<String>,

        /// Skip the persistent translation cache
        #[arg(short = 'n', long)]
        no_cache: bool,
    },
    /// Translate the comment on one line of a file
    File {
        /// File containing the comment
        file: String,

        /// 1-based line number
        #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..))]
        line: u32,

        /// Rewrite the line in place
        #[arg(short = 'w', long)]
        write: bool,

        /// Skip the persistent translation cache
        #[arg(short = 'n', long)]
        no_cache: bool,
    },
    /// Run a JSON-lines translation session over stdin/stdout
    Serve,
    /// Configure display mode and provider settings
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// List common language codes
    Languages,
}
