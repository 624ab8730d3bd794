//! # Schema Migration CLI
//!
//! Applies or resets the Kasir POS schema.
//!
//! ## Usage
//! ```bash
//! # Apply pending migrations (default command)
//! cargo run -p kasir-db --bin migrate -- up
//!
//! # Drop every table, ledger included
//! cargo run -p kasir-db --bin migrate -- reset
//!
//! # reset + up
//! cargo run -p kasir-db --bin migrate -- fresh --db ./data/kasir.db
//!
//! # Show applied / total
//! cargo run -p kasir-db --bin migrate -- status
//! ```
//!
//! The database path defaults to `DATABASE_PATH`, then `./kasir.db`.

use std::env;

use kasir_db::{migrations, Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Up,
    Reset,
    Fresh,
    Status,
}

impl Command {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Command::Up),
            "reset" => Some(Command::Reset),
            "fresh" => Some(Command::Fresh),
            "status" => Some(Command::Status),
            _ => None,
        }
    }
}

fn print_help() {
    println!("Kasir POS Migration Tool");
    println!();
    println!("Usage: migrate [COMMAND] [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  up        Apply pending migrations (default)");
    println!("  reset     Drop all tables");
    println!("  fresh     Drop all tables, then apply all migrations");
    println!("  status    Show applied / total migrations");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>    Database file path (default: $DATABASE_PATH or ./kasir.db)");
    println!("  -h, --help         Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kasir_db=info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut command = Command::Up;
    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| String::from("./kasir.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => match Command::parse(other) {
                Some(c) => command = c,
                None => {
                    eprintln!("Unknown argument: {other}");
                    print_help();
                    std::process::exit(2);
                }
            },
        }
        i += 1;
    }

    println!("Database: {}", db_path);

    let config = DbConfig::new(&db_path).run_migrations(false);
    let db = Database::new(config).await?;

    match command {
        Command::Up => {
            migrations::run_migrations(db.pool()).await?;
            println!("✓ Migrations applied");
        }
        Command::Reset => {
            migrations::reset(db.pool()).await?;
            println!("✓ All tables dropped");
        }
        Command::Fresh => {
            migrations::fresh(db.pool()).await?;
            println!("✓ Schema recreated");
        }
        Command::Status => {}
    }

    let (total, applied) = migrations::migration_status(db.pool()).await?;
    println!("Migrations: {applied}/{total} applied");

    db.close().await;
    Ok(())
}
