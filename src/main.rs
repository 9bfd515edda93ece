//! Userload CLI - Import CSV user exports into PostgreSQL
//!
//! # Main Commands
//!
//! ```bash
//! userload serve                    # Start HTTP server (port 3000)
//! userload import users.csv        # Import a CSV into the users table
//! userload report                  # Print the age distribution report
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! userload parse users.csv         # Parse + map CSV, print rows as JSON
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use userload::{build_batch, db, import_file, parse_file, AppConfig};

#[derive(Parser)]
#[command(name = "userload")]
#[command(about = "Import CSV user exports into PostgreSQL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file, map it to the target schema, and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a CSV file into the users table (one transaction)
    Import {
        /// Input CSV file (default: CSV_FILE_PATH from the environment)
        input: Option<PathBuf>,
    },

    /// Print the age distribution report for the current table
    Report,

    /// Start HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Import { input } => cmd_import(input.as_deref()).await,

        Commands::Report => cmd_report().await,

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let parsed = parse_file(input)?;
    eprintln!("   Encoding: {}", parsed.encoding);
    eprintln!("   Columns: {}", parsed.headers.join(", "));
    eprintln!("✅ Parsed {} records", parsed.rows.len());

    let users: Vec<Value> = build_batch(&parsed)
        .iter()
        .map(|record| serde_json::to_value(&record.user))
        .collect::<Result<_, _>>()?;

    let json = serde_json::to_string_pretty(&users)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_import(input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let path = match input {
        Some(path) => path,
        None => config.require_csv_path()?,
    };

    let pool = db::connect(&config.database_url).await?;
    db::ensure_schema(&pool).await?;

    let summary = import_file(&pool, path).await?;
    eprintln!("✅ Imported {} rows", summary.inserted);

    Ok(())
}

async fn cmd_report() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database_url).await?;
    db::ensure_schema(&pool).await?;

    let report = db::report::age_report(&pool).await?;
    print!("{}", report.render());

    Ok(())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }

    let pool = db::connect(&config.database_url).await.map_err(|e| {
        format!(
            "Failed to connect to PostgreSQL. Check .env and server status: {}",
            e
        )
    })?;
    db::ping(&pool).await?;
    db::ensure_schema(&pool).await?;
    println!("✅ Successfully connected to PostgreSQL");

    userload::server::start_server(config, pool).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
