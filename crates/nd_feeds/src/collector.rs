use chrono::{DateTime, Duration, Utc};
use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use nd_core::{Article, Error, Result};
use reqwest::Client;
use tracing::{info, warn};

/// Trailing recency window: only entries strictly newer than now minus this
/// many days make it into a digest run.
pub const RECENT_WINDOW_DAYS: i64 = 3;

const USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// Fetches syndication feeds and normalizes their recent entries.
#[derive(Debug, Clone)]
pub struct FeedCollector {
    client: Client,
}

impl FeedCollector {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Collect recent articles across all sources, in source-list order.
    ///
    /// A source that fails to fetch or parse is logged and skipped; the
    /// remaining sources still contribute their articles.
    pub async fn collect(&self, sources: &[String]) -> Vec<Article> {
        let cutoff = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let mut fetched = Vec::with_capacity(sources.len());
        for url in sources {
            fetched.push((url.clone(), self.fetch_feed(url).await));
        }
        let articles = merge_feeds(fetched, cutoff);
        info!(sources = sources.len(), articles = articles.len(), "collection finished");
        articles
    }

    async fn fetch_feed(&self, url: &str) -> Result<Feed> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Feed(format!(
                "{} answered HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response.bytes().await?;
        parser::parse(bytes.as_ref()).map_err(|e| Error::Feed(format!("{}: {}", url, e)))
    }
}

/// Concatenate per-source results in source order, dropping failed sources.
fn merge_feeds(
    fetched: impl IntoIterator<Item = (String, Result<Feed>)>,
    cutoff: DateTime<Utc>,
) -> Vec<Article> {
    let mut articles = Vec::new();
    for (url, result) in fetched {
        match result {
            Ok(feed) => articles.extend(recent_articles(&feed, cutoff)),
            Err(e) => warn!(source = %url, error = %e, "skipping feed source"),
        }
    }
    articles
}

/// Entries newer than `cutoff`, normalized, in parser order. No dedup: the
/// same story in two feeds yields two articles.
pub fn recent_articles(feed: &Feed, cutoff: DateTime<Utc>) -> Vec<Article> {
    feed.entries
        .iter()
        .filter_map(|entry| entry_to_article(entry, cutoff))
        .collect()
}

fn entry_to_article(entry: &Entry, cutoff: DateTime<Utc>) -> Option<Article> {
    // Entries without any timestamp are dropped; the boundary is a strict
    // greater-than, so an entry exactly at the cutoff is excluded.
    let published = entry.published.or(entry.updated)?;
    if published <= cutoff {
        return None;
    }

    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_else(|| "No Title".to_string());
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();
    // RSS <description> lands in summary, <content:encoded> in content.
    let summary = entry
        .summary
        .as_ref()
        .map(|t| t.content.clone())
        .filter(|s| !s.is_empty())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();

    Some(Article {
        title,
        link,
        summary,
        published: published.date_naive(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cutoff() -> DateTime<Utc> {
        // Fixed instant standing in for "now minus 3 days".
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    fn parse(xml: &str) -> Feed {
        parser::parse(xml.as_bytes()).unwrap()
    }

    const RSS_FIXTURE: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title><link>https://example.com</link><description>d</description>
  <item>
    <title>X</title>
    <link>https://example.com/x</link>
    <description>fresh enough</description>
    <pubDate>Sat, 29 Aug 2026 09:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Too old</title>
    <link>https://example.com/old</link>
    <description>stale</description>
    <pubDate>Tue, 25 Aug 2026 09:00:00 GMT</pubDate>
  </item>
  <item>
    <title>On the boundary</title>
    <link>https://example.com/boundary</link>
    <description>exactly at cutoff</description>
    <pubDate>Thu, 27 Aug 2026 12:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Undated</title>
    <link>https://example.com/undated</link>
    <description>no timestamp</description>
  </item>
</channel></rss>"#;

    #[test]
    fn recency_filter_is_strictly_greater_than() {
        let articles = recent_articles(&parse(RSS_FIXTURE), cutoff());
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        // Stale, boundary-exact and undated entries are all dropped.
        assert_eq!(titles, vec!["X"]);
        assert_eq!(articles[0].link, "https://example.com/x");
        assert_eq!(articles[0].published_key(), "2026-08-29");
    }

    #[test]
    fn missing_fields_get_normalized_defaults() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Example</title><link>https://example.com</link><description>d</description>
  <item>
    <pubDate>Sat, 29 Aug 2026 09:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;
        let articles = recent_articles(&parse(xml), cutoff());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "No Title");
        assert_eq!(articles[0].link, "");
        assert_eq!(articles[0].summary, "");
    }

    #[test]
    fn atom_updated_timestamp_counts_as_publication() {
        let xml = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <id>urn:example</id>
  <updated>2026-08-29T09:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:example:1</id>
    <link href="https://example.com/atom"/>
    <updated>2026-08-29T09:00:00Z</updated>
    <summary>atom summary</summary>
  </entry>
</feed>"#;
        let articles = recent_articles(&parse(xml), cutoff());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Atom entry");
        assert_eq!(articles[0].summary, "atom summary");
    }

    #[test]
    fn failed_source_is_skipped_but_others_survive() {
        let fetched = vec![
            (
                "https://bad.example.com/feed".to_string(),
                Err(Error::Feed("connection refused".to_string())),
            ),
            ("https://example.com/feed.xml".to_string(), Ok(parse(RSS_FIXTURE))),
        ];
        let articles = merge_feeds(fetched, cutoff());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "X");
    }

    #[test]
    fn source_order_is_preserved_without_resorting() {
        let second = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Second</title><link>https://second.example.com</link><description>d</description>
  <item>
    <title>Newer but listed later</title>
    <link>https://second.example.com/1</link>
    <description>s</description>
    <pubDate>Sun, 30 Aug 2026 09:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;
        let fetched = vec![
            ("first".to_string(), Ok(parse(RSS_FIXTURE))),
            ("second".to_string(), Ok(parse(second))),
        ];
        let titles: Vec<_> = merge_feeds(fetched, cutoff())
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["X", "Newer but listed later"]);
    }

    #[test]
    fn duplicate_entries_across_sources_are_kept() {
        let fetched = vec![
            ("a".to_string(), Ok(parse(RSS_FIXTURE))),
            ("b".to_string(), Ok(parse(RSS_FIXTURE))),
        ];
        assert_eq!(merge_feeds(fetched, cutoff()).len(), 2);
    }
}
