mod cli;

use ssql::config::{self, Config};
use ssql::{output, Db, Querier, Registry};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

fn load_statements(config: &Config) -> Result<Registry> {
    let statements = &config.statements;
    Registry::load_with(&statements.pattern, statements.on_duplicate)
        .with_context(|| format!("Failed to load statements from '{}'", statements.pattern))
}

fn open_db(config: &Config) -> Result<Db> {
    Db::connect(&config.database, &config.statements)
        .with_context(|| format!("Failed to open database '{}'", config.database.dsn))
}

fn list(config: &Config) -> Result<()> {
    let registry = load_statements(config)?;
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(())
}

fn show(config: &Config, name: &str) -> Result<()> {
    let registry = load_statements(config)?;
    let sql = registry.lookup(name)?;
    println!("{}", sql);
    Ok(())
}

fn check(config: &Config) -> Result<()> {
    let registry = load_statements(config)?;
    let namespaces: Vec<&str> = registry.namespaces().collect();

    println!(
        "{} statement(s) in {} namespace(s)",
        registry.len(),
        namespaces.len()
    );
    for namespace in namespaces {
        if let Some(file) = registry.file(namespace) {
            match file.origin() {
                Some(origin) => println!("  {:<24} {:>4}  {}", namespace, file.len(), origin.display()),
                None => println!("  {:<24} {:>4}", namespace, file.len()),
            }
        }
    }
    Ok(())
}

fn exec(config: &Config, name: &str, args: &[String]) -> Result<()> {
    let db = open_db(config)?;
    let result = db.exec(name, rusqlite::params_from_iter(args))?;
    println!("{} row(s) affected", result.rows_affected);
    Ok(())
}

fn query(config: &Config, name: &str, args: &[String]) -> Result<()> {
    let db = open_db(config)?;
    let rows = db.query(name, rusqlite::params_from_iter(args), output::collect_rows)?;
    for row in rows {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick a level from the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ssql=debug,ssql_db=trace,ssql_statements=debug".to_string()
        } else {
            "ssql=info,ssql_db=info,ssql_statements=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(pattern) = cli.sql {
        config.statements.pattern = pattern;
    }
    if let Some(dsn) = cli.dsn {
        config.database.dsn = dsn;
    }

    match cli.command {
        Commands::List => list(&config),
        Commands::Show { name } => show(&config, &name),
        Commands::Check => check(&config),
        Commands::Exec { name, args } => exec(&config, &name, &args),
        Commands::Query { name, args } => query(&config, &name, &args),
    }
}
