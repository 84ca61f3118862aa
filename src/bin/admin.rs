//! CLI administration tool for urlshort.
//!
//! Manages URL records and shows statistics directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List records (newest first)
//! cargo run --bin admin -- urls list --active --search example
//!
//! # Show one record without counting an access
//! cargo run --bin admin -- urls show aB3xY9
//!
//! # Shorten a URL
//! cargo run --bin admin -- urls create https://www.example.com
//!
//! # Deactivate / reactivate
//! cargo run --bin admin -- urls deactivate aB3xY9
//! cargo run --bin admin -- urls activate aB3xY9
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database settings as the server: `DATABASE_URL` or the `DB_*` parts.

use urlshort::application::services::UrlService;
use urlshort::config::{self, StorageBackend};
use urlshort::domain::entities::{UrlPatch, UrlRecord};
use urlshort::domain::repositories::UrlFilter;
use urlshort::infrastructure::persistence::PgUrlRepository;
use urlshort::server::connect_pool;
use urlshort::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing urlshort.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage URL records
    Urls {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UrlAction {
    /// List records, newest first
    List {
        /// Only active records
        #[arg(long, conflicts_with = "inactive")]
        active: bool,

        /// Only inactive records
        #[arg(long)]
        inactive: bool,

        /// Substring to match against long or short URL
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 25)]
        page_size: u32,
    },

    /// Show a record (does not count as an access)
    Show { short_url: String },

    /// Create a short URL
    Create { long_url: String },

    /// Deactivate a record
    Deactivate {
        short_url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Reactivate a record
    Activate { short_url: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage_backend != StorageBackend::Postgres {
        anyhow::bail!("The admin tool requires STORAGE_BACKEND=postgres");
    }
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = connect_pool(&config, database_url)
        .await
        .context("Failed to connect to database")?;

    let service = UrlService::new(
        Arc::new(PgUrlRepository::new(Arc::new(pool.clone()))),
        CodeGenerator::from_os_rng(),
    );

    match cli.command {
        Commands::Urls { action } => handle_url_action(action, &service).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches URL management commands.
async fn handle_url_action(action: UrlAction, service: &UrlService) -> Result<()> {
    match action {
        UrlAction::List {
            active,
            inactive,
            search,
            page,
            page_size,
        } => {
            let is_active = match (active, inactive) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            list_urls(service, is_active, search, page, page_size).await?;
        }
        UrlAction::Show { short_url } => {
            let record = service
                .get(&short_url)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            print_record(&record);
        }
        UrlAction::Create { long_url } => {
            let record = service
                .create(long_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create short URL: {}", e))?;

            println!("{}", "✅ Short URL created".green().bold());
            println!();
            print_record(&record);
        }
        UrlAction::Deactivate { short_url, yes } => {
            deactivate_url(service, short_url, yes).await?;
        }
        UrlAction::Activate { short_url } => {
            let patch = UrlPatch {
                long_url: None,
                is_active: Some(true),
            };
            let record = service
                .update(&short_url, patch)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "✅ URL activated".green().bold());
            println!();
            print_record(&record);
        }
    }

    Ok(())
}

/// Prints one page of records as a table.
///
/// ```text
/// 📋 Short URLs (page 1/3, 61 total)
///
///   Code     Accesses  Created           Status    Long URL
///   ────────────────────────────────────────────────────────────────────
///   aB3xY9   12        2026-01-15 10:30  ACTIVE    https://www.example.com
/// ```
async fn list_urls(
    service: &UrlService,
    is_active: Option<bool>,
    search: Option<String>,
    page: u32,
    page_size: u32,
) -> Result<()> {
    if page == 0 || page_size == 0 {
        anyhow::bail!("--page and --page-size must be at least 1");
    }

    let offset = i64::from(page - 1) * i64::from(page_size);
    let filter = UrlFilter::new(offset, i64::from(page_size))
        .with_active(is_active)
        .with_search(search);

    let (records, total) = service
        .list(filter)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list URLs: {}", e))?;

    let total_pages = (total + i64::from(page_size) - 1) / i64::from(page_size);
    println!(
        "{}",
        format!("📋 Short URLs (page {page}/{total_pages}, {total} total)")
            .bright_blue()
            .bold()
    );
    println!();

    if records.is_empty() {
        println!("{}", "  No URLs found".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:<9} {:<17} {:<9} {}",
        "Code".bright_white().bold(),
        "Accesses".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold(),
        "Long URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for record in &records {
        println!(
            "  {:<8} {:<9} {:<17} {:<9} {}",
            record.short_url.cyan(),
            record.access_count,
            record
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status_label(record.is_active),
            record.long_url
        );
    }
    println!();

    Ok(())
}

/// Deactivates a record after confirmation (default: No).
async fn deactivate_url(service: &UrlService, short_url: String, skip_confirm: bool) -> Result<()> {
    let record = service
        .get(&short_url)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    if !record.is_active {
        println!("{}", "⚠️  This URL is already inactive".yellow());
        return Ok(());
    }

    print_record(&record);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Deactivate this URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .deactivate(&short_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to deactivate URL: {}", e))?;

    println!();
    println!("{}", "✅ URL deactivated".green().bold());

    Ok(())
}

/// Displays record totals.
async fn handle_stats(service: &UrlService) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let totals = service
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  URLs:      {}",
        totals.total.to_string().bright_green().bold()
    );
    println!(
        "  Active:    {}",
        totals.active.to_string().bright_green().bold()
    );
    println!(
        "  Inactive:  {}",
        (totals.total - totals.active).to_string().bright_black()
    );
    println!(
        "  Accesses:  {}",
        totals.accesses.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}

fn status_label(is_active: bool) -> ColoredString {
    if is_active {
        "ACTIVE".green()
    } else {
        "INACTIVE".red()
    }
}

fn print_record(record: &UrlRecord) {
    println!("  Code:          {}", record.short_url.cyan().bold());
    println!("  Long URL:      {}", record.long_url.bright_white());
    println!("  Status:        {}", status_label(record.is_active));
    println!(
        "  Accesses:      {}",
        record.access_count.to_string().bright_green()
    );
    println!(
        "  Created:       {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!(
        "  Last accessed: {}",
        record
            .last_accessed
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    println!();
}
