mod color;

use clap::{Parser, Subcommand};
pub use color::ColorMode;
use std::path::PathBuf;

/// Compile function-style filter queries into document-store filters
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file with the compiler profile
    #[arg(long, env = "FILTER_QUERY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Comma separated fields a bare literal is matched against (overrides config)
    #[arg(long, value_delimiter = ',', global = true)]
    pub fields: Option<Vec<String>>,

    /// Reject input left over after a complete query
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print JSON on a single line
    #[arg(short, long, global = true)]
    pub compact: bool,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a query and print the filter document as JSON
    Compile {
        /// Query text, e.g. 'and(eq(name, "x"), gt(count, 2))'
        query: String,
    },
    /// Print the tokens of a query
    Tokens {
        query: String,

        /// Print tokens as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the parsed syntax tree of a query as JSON
    Ast { query: String },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
