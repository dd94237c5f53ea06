//! Ingestion run: new announcements from the live feed, then archived
//! attachments stored on disk.
//!
//! Re-running is safe. The live walk resumes after the newest stored
//! announcement date, and the store ignores identities it already holds.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};
use url::Url;

use super::{BasePageFetcher, BaseRefundStore};
use crate::domains::announcements::{
    collect_new_announcements, find_attachment_link, AnnouncementLink,
};
use crate::domains::attachments::{parse_attachment_bytes, parse_attachment_file};
use crate::domains::refunds::{InsertOutcome, Refund};

/// Date format of archived attachment names, e.g. `2019-03-01.xlsx`.
const ARCHIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Counters of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub attachments: usize,
    pub inserted: usize,
    pub duplicates: usize,
    /// Announcements without a spreadsheet, or archive files already stored.
    pub skipped: usize,
}

impl IngestionReport {
    fn absorb(&mut self, other: IngestionReport) {
        self.attachments += other.attachments;
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
    }
}

/// Announcement date encoded in an archived attachment's file name.
pub fn archive_date(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.split('.').next()?;
    NaiveDate::parse_from_str(stem, ARCHIVE_DATE_FORMAT).ok()
}

pub struct Ingestor {
    fetcher: Arc<dyn BasePageFetcher>,
    store: Arc<dyn BaseRefundStore>,
    listing_url: Url,
}

impl Ingestor {
    pub fn new(
        fetcher: Arc<dyn BasePageFetcher>,
        store: Arc<dyn BaseRefundStore>,
        listing_url: Url,
    ) -> Self {
        Self {
            fetcher,
            store,
            listing_url,
        }
    }

    /// Full run: live feed from the high-water mark, then the archive.
    pub async fn run(&self, archive_dir: &Path) -> Result<IngestionReport> {
        let mut report = self.ingest_live().await?;
        report.absorb(self.ingest_archive(archive_dir).await?);

        info!(
            attachments = report.attachments,
            inserted = report.inserted,
            duplicates = report.duplicates,
            skipped = report.skipped,
            "Ingestion finished"
        );
        Ok(report)
    }

    /// Ingest every announcement newer than the stored high-water mark,
    /// oldest first.
    pub async fn ingest_live(&self) -> Result<IngestionReport> {
        let high_water_mark = self.store.latest_announcement_date().await?;
        match high_water_mark {
            Some(date) => info!(%date, "Resuming after last stored announcement"),
            None => info!("Store is empty, walking the whole listing"),
        }

        let announcements = collect_new_announcements(
            self.fetcher.as_ref(),
            self.listing_url.clone(),
            high_water_mark,
        )
        .await?;

        let mut report = IngestionReport::default();
        for announcement in &announcements {
            report.absorb(self.ingest_announcement(announcement).await?);
        }
        Ok(report)
    }

    async fn ingest_announcement(&self, announcement: &AnnouncementLink) -> Result<IngestionReport> {
        let html = self.fetcher.fetch_text(announcement.url.as_str()).await?;
        let attachment_url = find_attachment_link(&html, &announcement.url)
            .with_context(|| format!("Failed to parse announcement {}", announcement.url))?;

        let Some(attachment_url) = attachment_url else {
            warn!(
                date = %announcement.date,
                url = %announcement.url,
                "Announcement has no spreadsheet attachment"
            );
            return Ok(IngestionReport {
                skipped: 1,
                ..Default::default()
            });
        };

        info!(date = %announcement.date, url = %attachment_url, "Downloading attachment");
        let bytes = self.fetcher.fetch_bytes(attachment_url.as_str()).await?;
        let date = announcement.date;
        let records = tokio::task::spawn_blocking(move || parse_attachment_bytes(bytes, date))
            .await?
            .with_context(|| format!("Failed to parse attachment {}", attachment_url))?;

        self.store_records(date, &records).await
    }

    /// Ingest archived attachments whose date is not in the store yet.
    pub async fn ingest_archive(&self, archive_dir: &Path) -> Result<IngestionReport> {
        let mut report = IngestionReport::default();

        if !tokio::fs::try_exists(archive_dir).await.unwrap_or(false) {
            info!(dir = %archive_dir.display(), "No archive directory, skipping");
            return Ok(report);
        }

        for (date, path) in list_archive(archive_dir).await? {
            if self.store.has_announcement(date).await? {
                debug!(%date, file = %path.display(), "Archived announcement already stored");
                report.skipped += 1;
                continue;
            }

            info!(%date, file = %path.display(), "Ingesting archived attachment");
            let source = path.clone();
            let records = tokio::task::spawn_blocking(move || parse_attachment_file(&source, date))
                .await?
                .with_context(|| format!("Failed to parse {}", path.display()))?;

            report.absorb(self.store_records(date, &records).await?);
        }

        Ok(report)
    }

    async fn store_records(&self, date: NaiveDate, records: &[Refund]) -> Result<IngestionReport> {
        let outcomes = self.store.insert_refunds(records).await?;
        let inserted = outcomes
            .iter()
            .filter(|outcome| **outcome == InsertOutcome::Inserted)
            .count();
        let duplicates = outcomes.len() - inserted;

        if duplicates > 0 {
            debug!(%date, duplicates, "Records already stored");
        }
        info!(%date, inserted, "Stored refunds");

        Ok(IngestionReport {
            attachments: 1,
            inserted,
            duplicates,
            skipped: 0,
        })
    }
}

/// Archive entries with a readable date, ordered by date.
async fn list_archive(archive_dir: &Path) -> Result<Vec<(NaiveDate, PathBuf)>> {
    let mut entries = tokio::fs::read_dir(archive_dir)
        .await
        .with_context(|| format!("Failed to read {}", archive_dir.display()))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name().to_string_lossy().to_string();
        match archive_date(&file_name) {
            Some(date) => files.push((date, entry.path())),
            None => warn!(file = %file_name, "Archived file name does not start with a date"),
        }
    }

    files.sort();
    Ok(files)
}
