use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};
use url::Url;

use super::{parse_listing_page, AnnouncementLink, ListingPage};
use crate::kernel::BasePageFetcher;

/// What the walk does after a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    NextPage(Url),
    /// Reached an already ingested announcement, or the last page.
    Done,
}

/// Split a page into announcements newer than the high-water mark and
/// the next step. The first announcement at or before the mark ends the
/// walk, even when further pages exist.
pub fn plan_page(
    page: ListingPage,
    high_water_mark: Option<NaiveDate>,
) -> (Vec<AnnouncementLink>, PageOutcome) {
    let mut accepted = Vec::new();

    for announcement in page.announcements {
        if high_water_mark.is_some_and(|mark| announcement.date <= mark) {
            return (accepted, PageOutcome::Done);
        }
        accepted.push(announcement);
    }

    let outcome = match page.next_page {
        Some(url) => PageOutcome::NextPage(url),
        None => PageOutcome::Done,
    };
    (accepted, outcome)
}

/// Walk the listing from `start` and return every announcement newer
/// than `high_water_mark`, oldest first.
///
/// Any fetch or parse failure aborts the walk.
pub async fn collect_new_announcements(
    fetcher: &dyn BasePageFetcher,
    start: Url,
    high_water_mark: Option<NaiveDate>,
) -> Result<Vec<AnnouncementLink>> {
    let mut found = Vec::new();
    let mut visited = HashSet::new();
    let mut outcome = PageOutcome::NextPage(start);

    while let PageOutcome::NextPage(page_url) = outcome {
        if !visited.insert(page_url.clone()) {
            debug!(url = %page_url, "Listing page already visited");
            break;
        }

        debug!(url = %page_url, "Fetching announcement listing");
        let html = fetcher.fetch_text(page_url.as_str()).await?;
        let page = parse_listing_page(&html, &page_url)
            .with_context(|| format!("Failed to parse listing page {}", page_url))?;

        let (accepted, next) = plan_page(page, high_water_mark);
        for announcement in &accepted {
            debug!(date = %announcement.date, url = %announcement.url, "Found announcement");
        }
        found.extend(accepted);
        outcome = next;
    }

    info!(count = found.len(), "Collected new announcements");

    found.sort_by_key(|announcement| announcement.date);
    Ok(found)
}
