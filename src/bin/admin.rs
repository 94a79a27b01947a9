//! CLI administration tool for golinks.
//!
//! Manages links and checks the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Add a parameterized link
//! cargo run --bin admin -- link add gh "https://github.com/{*}" -d "GitHub" -t code
//!
//! # List links matching a term, most viewed first
//! cargo run --bin admin -- link list -q wiki --sort views
//!
//! # List links tagged `code`
//! cargo run --bin admin -- link list --tag code
//!
//! # Remove a link
//! cargo run --bin admin -- link remove gh
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same settings as the server (see `golinks::config`):
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `REDIS_URL` (optional): when set, removals also evict the cached keyword

use golinks::api::dto::link::{CreateLinkRequest, ListLinksParams};
use golinks::application::services::LinkService;
use golinks::config::{self, Config};
use golinks::domain::entities::Link;
use golinks::infrastructure::cache::{self as keyword_cache, CachedLinkRepository};
use golinks::infrastructure::persistence::PgLinkRepository;
use golinks::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// CLI tool for managing golinks.
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
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Add a link
    Add {
        /// Keyword, e.g. `gh`, `kibana/prod` or `docs/{*}`
        keyword: String,

        /// Destination URL; `{*}` marks an argument slot
        destination: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Treat as parameterized even without `{*}`
        #[arg(short, long)]
        parameterized: bool,

        /// Tag to attach; repeat for several
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List links
    List {
        /// Case-insensitive search term
        #[arg(short, long)]
        query: Option<String>,

        /// Only links carrying this tag
        #[arg(long)]
        tag: Option<String>,

        /// Sort field: keyword, views, created_at
        #[arg(long)]
        sort: Option<String>,

        /// Sort order: asc, desc
        #[arg(long)]
        order: Option<String>,
    },

    /// Remove a link by keyword
    Remove {
        keyword: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config.database).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool, &config).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, pool: &PgPool, config: &Config) -> Result<()> {
    // Writes go through the same cache decorator as the server so a removed
    // keyword stops resolving from Redis too.
    let store = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let cache = keyword_cache::connect(&config.cache).await;
    let service = LinkService::new(Arc::new(CachedLinkRepository::new(store, cache)));

    match action {
        LinkAction::Add {
            keyword,
            destination,
            description,
            parameterized,
            tags,
        } => {
            let request = CreateLinkRequest {
                keyword,
                destination,
                description,
                is_parameterized: parameterized,
                tags,
            };
            add_link(&service, request).await?;
        }
        LinkAction::List {
            query,
            tag,
            sort,
            order,
        } => {
            let params = ListLinksParams {
                q: query,
                tag,
                sort,
                order,
            };
            list_links(&service, params).await?;
        }
        LinkAction::Remove { keyword, yes } => {
            remove_link(&service, &keyword, yes).await?;
        }
    }

    Ok(())
}

async fn add_link(service: &LinkService, request: CreateLinkRequest) -> Result<()> {
    println!("{}", "➕ Add Link".bright_blue().bold());
    println!();

    request.validate().context("Invalid link")?;

    let link = service
        .create_link(request.into())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    print_link(&link);
    println!();
    println!("{}", "✅ Link created".green().bold());

    Ok(())
}

/// Lists links in a table.
///
/// ```text
///   ID  Keyword              Views    Destination
///   ──────────────────────────────────────────────────────────
///   1   gh                   42       https://github.com/{*}
/// ```
async fn list_links(service: &LinkService, params: ListLinksParams) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    params.validate().context("Invalid listing parameters")?;
    let query = params
        .into_query()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let links = service
        .list_links(&query)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<8} {}",
        "ID".bright_white().bold(),
        "Keyword".bright_white().bold(),
        "Views".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        let keyword = if link.is_parameterized {
            link.keyword.cyan().bold()
        } else {
            link.keyword.cyan()
        };

        println!(
            "  {:<4} {:<20} {:<8} {}",
            link.id.to_string().bright_black(),
            keyword,
            link.views.to_string().bright_green(),
            link.destination
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn remove_link(service: &LinkService, keyword: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Remove Link".bright_blue().bold());
    println!();

    let link = service
        .get_link_by_keyword(keyword)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Remove this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(link.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to remove link: {}", e))?;

    println!("{}", "✅ Link removed".green().bold());

    Ok(())
}

fn print_link(link: &Link) {
    println!("  Keyword:       {}", link.keyword.cyan());
    println!("  Destination:   {}", link.destination.bright_white());
    if !link.description.is_empty() {
        println!("  Description:   {}", link.description);
    }
    println!("  Parameterized: {}", link.is_parameterized);
    if !link.tags.is_empty() {
        println!("  Tags:          {}", link.tags.join(", ").yellow());
    }
    println!("  Views:         {}", link.views.to_string().bright_green());
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await
                .context("links table missing; start the server once to run migrations")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Links: {}", links.to_string().bright_green().bold());
        }
    }

    Ok(())
}
