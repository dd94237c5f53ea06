//! Test fixtures: refund records, gov.pl-shaped HTML pages and a price-list workbook.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use refunds_core::domains::refunds::Refund;
use rust_decimal::Decimal;

pub const LISTING_URL: &str =
    "https://www.gov.pl/web/zdrowie/obwieszczenia-ministra-zdrowia-lista-lekow-refundowanych";

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Metformin 500 mg tablets, 30 per package.
pub fn refund(ean: &str, announcement_date: NaiveDate, refund_level: &str, price: &str) -> Refund {
    Refund {
        ean: ean.to_string(),
        announcement_date,
        refund_level: refund_level.to_string(),
        active_ingredient: "Metforminum".to_string(),
        form: "tabletki".to_string(),
        dose: "500 mg".to_string(),
        unit_price: Decimal::from_str(price).unwrap(),
        description_label: format!("Metformax {} tabletki powlekane 30 szt.", ean),
        description_dropdown: format!("Metformax {} tabletki 30 szt. Metforminum 500 mg", ean),
        description_list_item: format!("Metformax {}", ean),
    }
}

/// Listing page with the given `(date, href)` entries, newest first as on
/// the live site, and an optional next-page link.
pub fn listing_page(entries: &[(&str, &str)], next_page: Option<&str>) -> String {
    let items: String = entries
        .iter()
        .map(|(date, href)| {
            format!(
                r#"<li><a href="{}"><div class="title">Obwieszczenie Ministra Zdrowia</div><span>{}</span></a></li>"#,
                href, date
            )
        })
        .collect();

    let pagination = next_page
        .map(|href| format!(r#"<a id="js-pagination-page-next" href="{}">Następna</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><body><div class="art-prev art-prev--near-menu"><ul>{}</ul></div>{}</body></html>"#,
        items, pagination
    )
}

/// Announcement page linking a spreadsheet attachment at `href`.
pub fn announcement_page(href: &str) -> String {
    format!(
        r#"<html><body><a class="file-download" href="{}"><span>Załącznik do obwieszczenia</span><span>xlsx 2.1MB</span></a></body></html>"#,
        href
    )
}

/// Announcement page with only a PDF attachment.
pub fn announcement_page_without_spreadsheet() -> String {
    r#"<html><body><a class="file-download" href="/attachment/pdf"><span>Załącznik do obwieszczenia</span><span>pdf 1.2MB</span></a></body></html>"#
        .to_string()
}

/// Price-list workbook shaped like a real attachment: two title rows, the
/// header on row 3, then five data rows. One row is an exact duplicate,
/// one is a syrup and one is a combination product, so two records remain:
///
/// - Metformax 500 mg (`0,5 g`), 30 tablets, copay `9,60`, tier `30%`
/// - Ibum 200 mg hard capsules, 60 capsules, numeric copay 4.5, tier `ryczałt`
pub fn attachment_fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/announcement.xlsx")
}

pub fn attachment_fixture() -> Vec<u8> {
    std::fs::read(attachment_fixture_path()).unwrap()
}

pub fn absolute(path: &str) -> String {
    format!("https://www.gov.pl{}", path)
}
