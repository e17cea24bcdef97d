//! RSS 2.0 feed assembly and output.
//!
//! [`build_document`] turns the run's records into a [`FeedDocument`]:
//! first occurrence of each link wins, newest first, optional cap.
//! [`write_feed`] serializes it with `quick-xml` and atomically replaces the
//! file on disk. An empty record set still produces a complete channel.

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::models::{ArticleRecord, FeedDocument};
use crate::utils::write_atomic;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::path::Path;
use tracing::{debug, info, instrument, trace};

const GENERATOR: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Build this run's feed from records in fetch order.
///
/// Keeps the first record for each link, sorts newest first (stable, so
/// equal timestamps keep fetch order), then applies `config.max_items`.
///
/// # Arguments
///
/// * `config` - Supplies the item cap and channel metadata
/// * `records` - Every record extracted this run, in fetch order
/// * `generated_at` - Timestamp used for `lastBuildDate`
///
/// # Returns
///
/// A [`FeedDocument`], possibly with no items.
pub fn build_document(
    config: &FeedConfig,
    records: Vec<ArticleRecord>,
    generated_at: DateTime<Utc>,
) -> FeedDocument {
    let discovered = records.len();
    let mut items: Vec<ArticleRecord> = records
        .into_iter()
        .unique_by(|record| record.link.clone())
        .collect();
    let unique = items.len();

    // Stable: equal timestamps keep fetch order.
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    if let Some(max) = config.max_items {
        items.truncate(max);
    }

    for item in &items {
        trace!(page = item.page, link = %item.link, published = %item.published_at, "Feed item");
    }
    debug!(
        discovered,
        duplicates = discovered - unique,
        kept = items.len(),
        "Assembled feed items"
    );

    FeedDocument {
        title: config.feed_title.clone(),
        description: config.feed_description.clone(),
        site_link: config.base_url.clone(),
        language: config.feed_language.clone(),
        generator: GENERATOR.to_string(),
        items,
        generated_at,
    }
}

/// Serialize a feed document as RSS 2.0.
pub fn to_xml(document: &FeedDocument) -> Result<Vec<u8>, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("rss").with_attributes([("version", "2.0")]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &document.title)?;
    text_element(&mut writer, "link", document.site_link.as_str())?;
    text_element(&mut writer, "description", &document.description)?;
    text_element(&mut writer, "language", &document.language)?;
    text_element(&mut writer, "generator", &document.generator)?;
    text_element(
        &mut writer,
        "lastBuildDate",
        &document.generated_at.to_rfc2822(),
    )?;

    for item in &document.items {
        write_item(&mut writer, item)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(xml)
}

/// Serialize `document` and atomically replace the file at `path`.
///
/// # Errors
///
/// Returns [`FeedError`] if serialization or the write fails. The previous
/// file at `path` is untouched in that case.
#[instrument(level = "info", skip_all, fields(path = %path.display(), items = document.items.len()))]
pub async fn write_feed(document: &FeedDocument, path: &Path) -> Result<(), FeedError> {
    let xml = to_xml(document)?;
    write_atomic(path, &xml).await?;
    info!(bytes = xml.len(), "Wrote RSS feed");
    Ok(())
}

fn write_item(writer: &mut Writer<Vec<u8>>, item: &ArticleRecord) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;
    text_element(writer, "title", &item.title)?;
    text_element(writer, "link", item.link.as_str())?;
    text_element(writer, "description", item.description())?;

    writer.write_event(Event::Start(
        BytesStart::new("guid").with_attributes([("isPermaLink", "true")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(item.link.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    text_element(writer, "pubDate", &item.published_at.to_rfc2822())?;
    writer.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), FeedError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use url::Url;

    fn config(max_items: Option<usize>) -> FeedConfig {
        FeedConfig {
            base_url: Url::parse("https://taap.mercer.com/en-us/resources/hr-view-content/")
                .unwrap(),
            max_pages: 3,
            max_items,
            output_path: PathBuf::from("mercer_feed.xml"),
            request_timeout: Duration::from_secs(30),
            page_delay: Duration::ZERO,
            feed_title: "Mercer TAAP Blog".to_string(),
            feed_description: "Latest HR articles".to_string(),
            feed_language: "en-us".to_string(),
        }
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn record(id: u32, title: &str, day: u32, page: usize) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            link: Url::parse(&format!("https://taap.mercer.com/apps/ppa/article/{id}")).unwrap(),
            published_at: Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap(),
            summary: format!("summary of {title}"),
            page,
        }
    }

    fn titles(document: &FeedDocument) -> Vec<&str> {
        document.items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_duplicate_link_keeps_first_seen() {
        let records = vec![
            record(1, "page one copy", 5, 1),
            record(2, "other", 4, 1),
            record(1, "page two copy", 9, 2),
        ];
        let document = build_document(&config(None), records, generated_at());

        assert_eq!(document.items.len(), 2);
        let kept = document.items.iter().find(|i| i.link.as_str().ends_with("/1")).unwrap();
        assert_eq!(kept.title, "page one copy");
        assert_eq!(kept.page, 1);
    }

    #[test]
    fn test_items_newest_first_with_stable_ties() {
        let records = vec![
            record(1, "old", 1, 1),
            record(2, "tie-a", 7, 1),
            record(3, "newest", 9, 1),
            record(4, "tie-b", 7, 2),
        ];
        let document = build_document(&config(None), records, generated_at());

        assert_eq!(titles(&document), vec!["newest", "tie-a", "tie-b", "old"]);
        assert!(
            document
                .items
                .windows(2)
                .all(|w| w[0].published_at >= w[1].published_at)
        );
    }

    #[test]
    fn test_max_items_caps_after_sorting() {
        let records = vec![record(1, "old", 1, 1), record(2, "new", 9, 1), record(3, "mid", 5, 1)];
        let document = build_document(&config(Some(2)), records, generated_at());
        assert_eq!(titles(&document), vec!["new", "mid"]);
    }

    #[test]
    fn test_channel_metadata() {
        let document = build_document(&config(None), vec![], generated_at());
        assert_eq!(document.title, "Mercer TAAP Blog");
        assert_eq!(
            document.site_link.as_str(),
            "https://taap.mercer.com/en-us/resources/hr-view-content/"
        );
        assert!(document.generator.starts_with("hr_view_feed "));
        assert_eq!(document.generated_at, generated_at());
    }

    #[test]
    fn test_empty_feed_is_valid_rss() {
        let document = build_document(&config(None), vec![], generated_at());
        let xml = to_xml(&document).unwrap();

        let channel = ::rss::Channel::read_from(&xml[..]).unwrap();
        assert_eq!(channel.title(), "Mercer TAAP Blog");
        assert_eq!(channel.description(), "Latest HR articles");
        assert_eq!(channel.language(), Some("en-us"));
        assert_eq!(
            channel.last_build_date(),
            Some("Sun, 1 Jun 2025 12:00:00 +0000")
        );
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_items_round_trip_through_rss_reader() {
        let mut untitled_summary = record(2, "Fish & <Chips>", 3, 1);
        untitled_summary.summary.clear();
        let records = vec![record(1, "Paid leave", 4, 1), untitled_summary];
        let document = build_document(&config(None), records, generated_at());
        let xml = to_xml(&document).unwrap();

        let channel = ::rss::Channel::read_from(&xml[..]).unwrap();
        let items = channel.items();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title(), Some("Paid leave"));
        assert_eq!(
            items[0].link(),
            Some("https://taap.mercer.com/apps/ppa/article/1")
        );
        assert_eq!(items[0].description(), Some("summary of Paid leave"));
        assert_eq!(items[0].pub_date(), Some("Tue, 4 Mar 2025 00:00:00 +0000"));
        let guid = items[0].guid().unwrap();
        assert!(guid.is_permalink());
        assert_eq!(guid.value(), "https://taap.mercer.com/apps/ppa/article/1");

        // Escaped on the way out, and the title stands in for the missing summary.
        assert_eq!(items[1].title(), Some("Fish & <Chips>"));
        assert_eq!(items[1].description(), Some("Fish & <Chips>"));
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let records = vec![record(1, "a", 2, 1), record(2, "b", 2, 1), record(3, "c", 8, 2)];
        let first = to_xml(&build_document(&config(None), records.clone(), generated_at())).unwrap();
        let second = to_xml(&build_document(&config(None), records, generated_at())).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_write_feed_replaces_previous_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mercer_feed.xml");
        std::fs::write(&path, "stale contents").unwrap();

        let document = build_document(&config(None), vec![record(1, "fresh", 1, 1)], generated_at());
        write_feed(&document, &path).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        let channel = ::rss::Channel::read_from(&written[..]).unwrap();
        assert_eq!(channel.items().len(), 1);
        assert_eq!(channel.items()[0].title(), Some("fresh"));
    }
}
