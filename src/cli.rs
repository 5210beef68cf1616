use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ssql")]
#[command(author, version, about = "Run named SQL statements from statement files")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Glob pattern for statement files (overrides config)
    #[arg(long, global = true)]
    pub sql: Option<String>,

    /// Database path or URI (overrides config)
    #[arg(long, global = true)]
    pub dsn: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every statement name
    List,

    /// Print the SQL text of a statement
    Show {
        /// Statement name (namespace.tag)
        name: String,
    },

    /// Load statement files and report what was found
    Check,

    /// Execute a statement and print the number of affected rows
    Exec {
        /// Statement name (namespace.tag)
        name: String,

        /// Positional arguments, bound as text
        args: Vec<String>,
    },

    /// Run a query and print each row as a JSON object
    Query {
        /// Statement name (namespace.tag)
        name: String,

        /// Positional arguments, bound as text
        args: Vec<String>,
    },
}
