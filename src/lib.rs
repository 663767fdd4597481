//! Filter-query compiler.
//!
//! Turns a function-call style query into an ordered filter document for a
//! document-store query engine:
//!
//! ```text
//! and(eq(name, "x"), gt(count, 2))   ->  {"$and": [{"name": "x"}, {"count": {"$gt": 2}}]}
//! "sith"                             ->  {"$or": [{"title": "sith"}, {"email": "sith"}]}
//! ```
//!
//! The pipeline is [`scanner`] -> [`parser`] -> [`compiler`]; [`compile_query`]
//! runs all three stages.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod parser;
pub mod scanner;

use anyhow::Context;
use comfy_table::Table;
use serde::Serialize;
use std::path::Path;

pub use cli::{ColorMode, Commands, cli_parse};
pub use compiler::{Document, FilterCompiler, FilterValue};
pub use config::{CompilerConfig, ConfigError, load_config};
pub use error::{Expected, LexError, ParseError, QueryError, QueryResult};
pub use parser::{Node, Program, QueryParser};
pub use scanner::{Scanner, Token, TokenKind, tokenize};

/// Scans, parses and compiles `text` in one pass.
///
/// # Example
///
/// ```
/// use filter_query::{CompilerConfig, compile_query, doc};
///
/// let config = CompilerConfig::default();
/// let filter = compile_query("gt(count, 2)", &config).unwrap();
/// assert_eq!(filter, doc! { "count" => doc! { "$gt" => 2i64 } });
/// ```
pub fn compile_query(text: &str, config: &CompilerConfig) -> QueryResult<Document> {
    let program = QueryParser::new(text).strict(config.strict).run()?;
    Ok(FilterCompiler::new(&config.literal_comparison_fields).compile(&program))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    // RUST_LOG, when set, wins over -v. A logger installed earlier by the
    // embedding process stays in place.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .ok();
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.context("Failed to serialize output")
}

fn token_table(tokens: &[Token]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Kind", "Text", "Offset"]);
    for (index, token) in tokens.iter().enumerate() {
        table.add_row(vec![
            index.to_string(),
            token.kind.to_string(),
            token.text.clone(),
            token.offset.to_string(),
        ]);
    }
    table.to_string()
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    init_logging(cli.verbose);
    cli.color.apply();

    let config = load_config(cli.config.as_deref())
        .context("Failed to load config")?
        .with_fields(cli.fields.clone())
        .with_strict(cli.strict);

    log::info!(
        "profile '{}', literal fields {:?}, strict {}",
        config.profile_name,
        config.literal_comparison_fields,
        config.strict
    );
    if let Some(config_path) = &cli.config {
        log::info!("config file: {}", config_path.display());
    }

    let output_text = match &cli.command {
        Commands::Compile { query } => {
            let document = compile_query(query, &config)?;
            to_json(&document, cli.compact)?
        }
        Commands::Tokens { query, json } => {
            let tokens = tokenize(query)?;
            if *json {
                to_json(&tokens, cli.compact)?
            } else {
                token_table(&tokens)
            }
        }
        Commands::Ast { query } => {
            let program = QueryParser::new(query).strict(config.strict).run()?;
            to_json(&program, cli.compact)?
        }
    };

    println!("{output_text}");
    if let Some(path) = &cli.output {
        write_output_file(path, &output_text)?;
    }

    Ok(())
}
