//! Refund price tracker CLI
//!
//! `ingest` is meant to run periodically: it resumes from the newest stored
//! announcement, so it takes no required arguments.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use refunds_core::domains::comparison::{load_chart_view, write_report};
use refunds_core::domains::refunds::Refund;
use refunds_core::kernel::{HttpFetcher, Ingestor, PostgresRefundStore};
use refunds_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "refunds")]
#[command(about = "Track reimbursed drug prices from Ministry of Health announcements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest new announcements, then archived attachments
    Ingest {
        /// Directory of archived attachments named `YYYY-MM-DD.xlsx`
        #[arg(long)]
        archive_dir: Option<PathBuf>,
    },

    /// Ingest archived attachments only
    Archive {
        #[arg(long)]
        archive_dir: Option<PathBuf>,
    },

    /// List drugs available for comparison
    Drugs,

    /// Write the price-trend charts of a drug to `<EAN>.json`
    Report {
        ean: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,refunds_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect(&config).await?;

    match cli.command {
        Commands::Ingest { archive_dir } => {
            let archive_dir = archive_dir.unwrap_or_else(|| config.archive_dir.clone());
            ingestor(&config, pool)?.run(&archive_dir).await?;
        }
        Commands::Archive { archive_dir } => {
            let archive_dir = archive_dir.unwrap_or_else(|| config.archive_dir.clone());
            ingestor(&config, pool)?.ingest_archive(&archive_dir).await?;
        }
        Commands::Drugs => {
            for item in Refund::dropdown_items(&pool).await? {
                println!("{} ({})", item.ean, item.description_dropdown);
            }
        }
        Commands::Report { ean, out_dir } => {
            let today = chrono::Local::now().date_naive();
            let view = load_chart_view(&ean, today, &pool).await?;
            let path = write_report(&view, &out_dir).await?;
            tracing::info!(path = %path.display(), "Report written");
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<PgPool> {
    tracing::debug!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

fn ingestor(config: &Config, pool: PgPool) -> Result<Ingestor> {
    let fetcher = Arc::new(HttpFetcher::new()?);
    let store = Arc::new(PostgresRefundStore::new(pool));
    Ok(Ingestor::new(
        fetcher,
        store,
        config.announcements_url.clone(),
    ))
}
