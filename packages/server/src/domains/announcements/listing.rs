//! Announcement listing pages and announcement detail pages.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{AnnouncementError, AnnouncementLink, ListingPage};

/// Listing entries are announcements only when their title says so.
const ANNOUNCEMENT_TITLE_MARKER: &str = "Obwieszczenie";
const LISTING_DATE_FORMAT: &str = "%d.%m.%Y";

/// Label of the price-list attachment on an announcement page.
const ATTACHMENT_LABEL: &str = "załącznik do obwieszczenia";
const SPREADSHEET_FORMATS: [&str; 2] = ["xlsx", "xls"];

fn selector(css: &'static str) -> Result<Selector, AnnouncementError> {
    Selector::parse(css).map_err(|e| AnnouncementError::Selector(format!("{}: {:?}", css, e)))
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Parse one page of the announcement listing.
///
/// Fails when the listing container is missing or an announcement carries
/// a date that cannot be read, so a layout change aborts the run instead
/// of silently skipping entries.
pub fn parse_listing_page(html: &str, page_url: &Url) -> Result<ListingPage, AnnouncementError> {
    let document = Html::parse_document(html);
    let container_selector = selector("div.art-prev.art-prev--near-menu")?;
    let link_selector = selector("a")?;
    let title_selector = selector(".title")?;
    let span_selector = selector("span")?;
    let next_selector = selector("#js-pagination-page-next")?;

    let container = document
        .select(&container_selector)
        .next()
        .ok_or(AnnouncementError::MissingListing)?;

    let mut announcements = Vec::new();
    for anchor in container.select(&link_selector) {
        let is_announcement = anchor
            .select(&title_selector)
            .next()
            .map(|title| element_text(&title).contains(ANNOUNCEMENT_TITLE_MARKER))
            .unwrap_or(false);
        if !is_announcement {
            continue;
        }

        let Some(span) = anchor.select(&span_selector).next() else {
            continue;
        };
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let raw_date = element_text(&span);
        let date = NaiveDate::parse_from_str(raw_date.trim(), LISTING_DATE_FORMAT)
            .map_err(|_| AnnouncementError::InvalidDate(raw_date.trim().to_string()))?;
        let url = page_url.join(href)?;

        announcements.push(AnnouncementLink { date, url });
    }

    let next_page = document
        .select(&next_selector)
        .next()
        .and_then(|next| next.value().attr("href"))
        .map(|href| page_url.join(href))
        .transpose()?;

    Ok(ListingPage {
        announcements,
        next_page,
    })
}

/// Find the spreadsheet price list among an announcement's downloads.
pub fn find_attachment_link(html: &str, page_url: &Url) -> Result<Option<Url>, AnnouncementError> {
    let document = Html::parse_document(html);
    let download_selector = selector("a.file-download")?;

    for link in document.select(&download_selector) {
        let texts: Vec<String> = link.text().map(|t| t.trim().to_lowercase()).collect();
        let is_price_list = texts.iter().any(|t| t == ATTACHMENT_LABEL);
        let is_spreadsheet = texts
            .iter()
            .any(|t| SPREADSHEET_FORMATS.iter().any(|format| t.contains(format)));

        if is_price_list && is_spreadsheet {
            if let Some(href) = link.value().attr("href") {
                return Ok(Some(page_url.join(href)?));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_URL: &str =
        "https://www.gov.pl/web/zdrowie/obwieszczenia-ministra-zdrowia-lista-lekow-refundowanych";

    fn listing_url() -> Url {
        Url::parse(LISTING_URL).unwrap()
    }

    #[test]
    fn test_parses_announcements_and_next_page() {
        let html = r#"
            <div class="art-prev art-prev--near-menu">
              <ul>
                <li><a href="/web/zdrowie/obwieszczenie-z-2024-03">
                  <div class="title">Obwieszczenie Ministra Zdrowia z 20 lutego 2024</div>
                  <span class="date"> 20.02.2024 </span>
                </a></li>
                <li><a href="/web/zdrowie/komunikat">
                  <div class="title">Komunikat w sprawie wyrobów</div>
                  <span class="date">15.02.2024</span>
                </a></li>
                <li><a href="/web/zdrowie/obwieszczenie-z-2024-01">
                  <div class="title">Obwieszczenie Ministra Zdrowia z 1 stycznia 2024</div>
                  <span class="date">01.01.2024</span>
                </a></li>
              </ul>
            </div>
            <a id="js-pagination-page-next" href="?page=2">Następna</a>
        "#;

        let page = parse_listing_page(html, &listing_url()).unwrap();

        assert_eq!(page.announcements.len(), 2);
        assert_eq!(page.announcements[0].date, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        assert_eq!(
            page.announcements[0].url.as_str(),
            "https://www.gov.pl/web/zdrowie/obwieszczenie-z-2024-03"
        );
        assert_eq!(
            page.next_page.unwrap().as_str(),
            format!("{}?page=2", LISTING_URL)
        );
    }

    #[test]
    fn test_last_page_has_no_next_link() {
        let html = r#"<div class="art-prev art-prev--near-menu"></div>"#;
        let page = parse_listing_page(html, &listing_url()).unwrap();
        assert!(page.announcements.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_entry_without_date_is_skipped() {
        let html = r#"
            <div class="art-prev art-prev--near-menu">
              <a href="/x"><div class="title">Obwieszczenie bez daty</div></a>
            </div>
        "#;
        let page = parse_listing_page(html, &listing_url()).unwrap();
        assert!(page.announcements.is_empty());
    }

    #[test]
    fn test_unreadable_date_fails() {
        let html = r#"
            <div class="art-prev art-prev--near-menu">
              <a href="/x"><div class="title">Obwieszczenie</div><span>2024-02-20</span></a>
            </div>
        "#;
        let result = parse_listing_page(html, &listing_url());
        assert!(matches!(result, Err(AnnouncementError::InvalidDate(_))));
    }

    #[test]
    fn test_missing_listing_container_fails() {
        let html = r#"
            <html><body><div class="new-layout">
              <a href="/a"><div class="title">Obwieszczenie</div><span>01.03.2030</span></a>
            </div></body></html>
        "#;
        let result = parse_listing_page(html, &listing_url());
        assert!(matches!(result, Err(AnnouncementError::MissingListing)));
    }

    #[test]
    fn test_finds_spreadsheet_attachment() {
        let html = r#"
            <a class="file-download" href="/attachment/aaa">
              <span>Obwieszczenie</span><span>pdf 1.2MB</span>
            </a>
            <a class="file-download" href="/attachment/bbb">
              <span>Załącznik do obwieszczenia</span><span>pdf 3.4MB</span>
            </a>
            <a class="file-download" href="/attachment/ccc">
              <span> Załącznik do obwieszczenia </span><span>xlsx 2.1MB</span>
            </a>
        "#;
        let page_url = Url::parse("https://www.gov.pl/web/zdrowie/obwieszczenie-z-2024-03").unwrap();

        let link = find_attachment_link(html, &page_url).unwrap();

        assert_eq!(link.unwrap().as_str(), "https://www.gov.pl/attachment/ccc");
    }

    #[test]
    fn test_announcement_without_spreadsheet() {
        let html = r#"<a class="file-download" href="/a"><span>Załącznik do obwieszczenia</span><span>pdf</span></a>"#;
        let page_url = Url::parse("https://www.gov.pl/web/zdrowie/x").unwrap();
        assert_eq!(find_attachment_link(html, &page_url).unwrap(), None);
    }
}
