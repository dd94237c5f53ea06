use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.gov.pl";
const ANNOUNCEMENTS_PATH: &str = "/web/zdrowie/obwieszczenia-ministra-zdrowia-lista-lekow-refundowanych";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub announcements_url: Url,
    pub archive_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let base_url = Url::parse(
            &env::var("REFUNDS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )
        .context("REFUNDS_BASE_URL must be a valid URL")?;

        let announcements_url = match env::var("REFUNDS_ANNOUNCEMENTS_URL") {
            Ok(url) => Url::parse(&url).context("REFUNDS_ANNOUNCEMENTS_URL must be a valid URL")?,
            Err(_) => base_url
                .join(ANNOUNCEMENTS_PATH)
                .context("Failed to build announcements URL")?,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            announcements_url,
            archive_dir: env::var("ARCHIVE_DIR")
                .unwrap_or_else(|_| "archived_announcements".to_string())
                .into(),
        })
    }
}
