//! Ministry announcements: the paginated listing and the walk over it.

pub mod crawl;
pub mod listing;

use chrono::NaiveDate;
use thiserror::Error;
use url::Url;

pub use crawl::{collect_new_announcements, plan_page, PageOutcome};
pub use listing::{find_attachment_link, parse_listing_page};

#[derive(Error, Debug)]
pub enum AnnouncementError {
    #[error("Invalid announcement date: {0}")]
    InvalidDate(String),

    #[error("Invalid link: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Announcement listing not found on page")]
    MissingListing,

    #[error("Invalid selector {0}")]
    Selector(String),
}

/// Announcement entry found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementLink {
    pub date: NaiveDate,
    pub url: Url,
}

/// One parsed page of the listing, newest announcements first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub announcements: Vec<AnnouncementLink>,
    pub next_page: Option<Url>,
}
