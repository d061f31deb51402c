//! CLI administration tool for redirecter.
//!
//! Manages rows in the `redirects` table and checks the database without
//! going through the HTTP service. Changes become visible to a running service
//! after its next reload (`POST /redirecter/reload` on the admin listener, or
//! the scheduled reload).
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations
//! cargo run --bin redirecter-admin -- db migrate
//!
//! # Add a redirect, optionally scoped to a domain
//! cargo run --bin redirecter-admin -- redirect add /old-page /new-page
//! cargo run --bin redirecter-admin -- redirect add /blog/x /articles/x --domain example.com
//!
//! # List the table as the service would load it
//! cargo run --bin redirecter-admin -- redirect list --domain example.com
//!
//! # Remove a redirect
//! cargo run --bin redirecter-admin -- redirect remove /old-page
//!
//! # Check database connection
//! cargo run --bin redirecter-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, as for the service.

use redirecter::config::{CacheConfig, DatabaseConfig};
use redirecter::domain::Snapshot;
use redirecter::domain::entities::NewRedirect;
use redirecter::domain::repositories::RedirectRepository;
use redirecter::infrastructure::persistence::PgRedirectRepository;
use redirecter::utils::extract_domain::normalize_domain;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::{Connection, PgConnection};
use std::time::Duration;

/// CLI tool for managing redirecter.
#[derive(Parser)]
#[command(name = "redirecter-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage redirect rows
    Redirect {
        #[command(subcommand)]
        action: RedirectAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Redirect management subcommands.
#[derive(Subcommand)]
enum RedirectAction {
    /// List redirects as the service would load them
    List {
        /// Only rows for this domain (default: all rows)
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Add a redirect
    Add {
        /// Source key: a path (`/old-page`) or URL without query string
        source: String,

        /// Redirect destination
        destination: String,

        /// Domain the redirect applies to
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Remove every row for a source key
    Remove {
        source: String,

        #[arg(short, long)]
        domain: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database = DatabaseConfig::from_env()?;
    database
        .validate()
        .context("Database configuration is incomplete")?;

    match cli.command {
        Commands::Redirect { action } => handle_redirect_action(action, &database).await?,
        Commands::Db { action } => handle_db_action(action, &database).await?,
    }

    Ok(())
}

fn repository(database: &DatabaseConfig, domain: Option<String>) -> PgRedirectRepository {
    PgRedirectRepository::new(&CacheConfig::new(
        database.clone(),
        domain,
        Duration::from_secs(30),
    ))
}

/// Dispatches redirect management commands.
///
/// Domains are normalized here so rows match the service's `REDIRECT_DOMAIN(S)`.
async fn handle_redirect_action(action: RedirectAction, database: &DatabaseConfig) -> Result<()> {
    let normalized = |domain: Option<String>| domain.map(|d| normalize_domain(&d));
    match action {
        RedirectAction::List { domain } => list_redirects(database, normalized(domain)).await,
        RedirectAction::Add {
            source,
            destination,
            domain,
        } => add_redirect(database, source, destination, normalized(domain)).await,
        RedirectAction::Remove {
            source,
            domain,
            yes,
        } => remove_redirect(database, source, normalized(domain), yes).await,
    }
}

/// Loads the table through the same path as a service reload and prints it.
async fn list_redirects(database: &DatabaseConfig, domain: Option<String>) -> Result<()> {
    let repo = repository(database, domain.clone());
    let rows = repo.load_all().await.context("Failed to load redirects")?;
    let row_count = rows.len();
    let snapshot = Snapshot::from_rows(rows.iter().cloned());

    let scope = domain.as_deref().unwrap_or("all domains");
    println!("\n{} ({})", "Redirects".bold().cyan(), scope);
    println!("{}", "─".repeat(60).bright_black());

    if rows.is_empty() {
        println!("{}", "No redirects found".yellow());
        return Ok(());
    }

    for row in &rows {
        let effective = snapshot.get(&row.source) == Some(row.destination.as_str());
        let arrow = if effective {
            "→".green()
        } else {
            "→".bright_black()
        };
        println!("  {} {} {}", row.source, arrow, row.destination);
    }

    println!("{}", "─".repeat(60).bright_black());
    println!(
        "{} rows, {} keys",
        row_count.to_string().bold(),
        snapshot.len().to_string().bold()
    );
    if row_count > snapshot.len() {
        println!(
            "{}",
            "Duplicate sources: the last row wins (dimmed rows are shadowed)".yellow()
        );
    }

    Ok(())
}

async fn add_redirect(
    database: &DatabaseConfig,
    source: String,
    destination: String,
    domain: Option<String>,
) -> Result<()> {
    if source.is_empty() || destination.is_empty() {
        anyhow::bail!("Source and destination must not be empty");
    }
    if destination.starts_with("//") {
        println!(
            "{} destination starts with '//'; it will be served as a local path",
            "Warning:".yellow().bold()
        );
    }

    let repo = repository(database, domain.clone());
    let id = repo
        .insert(&NewRedirect {
            domain: domain.clone(),
            source: source.clone(),
            destination: destination.clone(),
        })
        .await
        .context("Failed to insert redirect")?;

    println!(
        "{} {} → {} ({}, id {})",
        "✓ Added".green().bold(),
        source,
        destination,
        domain.as_deref().unwrap_or("all domains"),
        id
    );
    print_reload_hint();

    Ok(())
}

async fn remove_redirect(
    database: &DatabaseConfig,
    source: String,
    domain: Option<String>,
    yes: bool,
) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove every redirect for '{}' ({})?",
                source,
                domain.as_deref().unwrap_or("no domain")
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    let repo = repository(database, domain.clone());
    let removed = repo
        .delete(&source, domain.as_deref())
        .await
        .context("Failed to remove redirect")?;

    if removed == 0 {
        println!("{} No redirect for '{}'", "✗".red().bold(), source);
    } else {
        println!("{} {} row(s) for '{}'", "✓ Removed".green().bold(), removed, source);
        print_reload_hint();
    }

    Ok(())
}

fn print_reload_hint() {
    println!(
        "{}",
        "Changes take effect after the next reload (POST /redirecter/reload)".bright_black()
    );
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, database: &DatabaseConfig) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".cyan());
            repository(database, None)
                .ping()
                .await
                .with_context(|| format!("Cannot reach {}", database.masked_url()))?;
            println!("{} {}", "✓ Connected to".green().bold(), database.masked_url());
        }
        DbAction::Migrate => {
            let mut conn = PgConnection::connect_with(&database.connect_options())
                .await
                .context("Failed to connect to database")?;
            sqlx::migrate!("./migrations")
                .run(&mut conn)
                .await
                .context("Failed to run migrations")?;
            conn.close().await?;
            println!("{}", "✓ Migrations applied".green().bold());
        }
    }

    Ok(())
}
