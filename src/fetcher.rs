use async_trait::async_trait;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::store::Meta;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can produce page metadata for a URL.
#[async_trait]
pub trait MetaSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Meta, FetchError>;
}

/// Fetches a page over HTTP and scrapes its title and Open Graph tags.
///
/// The HTTP client is built on the first fetch, so commands that never
/// touch the network never pay for it or fail on it.
pub struct Fetcher {
    user_agent: String,
    timeout: Option<Duration>,
    client: OnceLock<reqwest::Client>,
}

impl Fetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.fetch_timeout,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&reqwest::Client, FetchError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.as_str());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;
        Ok(self.client.get_or_init(|| client))
    }
}

#[async_trait]
impl MetaSource for Fetcher {
    async fn fetch(&self, url: &str) -> Result<Meta, FetchError> {
        debug!(url, "Fetching page metadata");
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client()?
            .get(url)
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "Page returned a non-success status");
        }
        let body = response.text().await.map_err(request_error)?;

        let mut meta = parse_meta(&body);
        if meta.url.is_none() {
            meta.url = Some(url.to_string());
        }
        Ok(meta)
    }
}

/// Extract the `<title>` text and the supported `og:*` properties.
///
/// The title is the text of the first `<title>` element with surrounding
/// whitespace trimmed; it is always present, empty when the page has none.
/// For each Open Graph property the first tag carrying a `content`
/// attribute wins.
pub fn parse_meta(html: &str) -> Meta {
    let document = Html::parse_document(html);
    let mut meta = Meta::default();

    for element in document.tree.root().descendants().filter_map(ElementRef::wrap) {
        let value = element.value();
        match value.name() {
            "title" if meta.title.is_none() => {
                meta.title = Some(element.text().collect::<String>().trim().to_string());
            }
            "meta" => {
                let (Some(property), Some(content)) = (value.attr("property"), value.attr("content"))
                else {
                    continue;
                };
                let slot = match property {
                    "og:type" => &mut meta.kind,
                    "og:url" => &mut meta.url,
                    "og:image" => &mut meta.image,
                    "og:description" => &mut meta.description,
                    _ => continue,
                };
                if slot.is_none() {
                    *slot = Some(content.to_string());
                }
            }
            _ => {}
        }
    }

    meta.title.get_or_insert_with(String::new);
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>  Example Domain </title>
    <meta property="og:type" content="website">
    <meta property="og:url" content="https://example.com/">
    <meta property="og:image" content="https://example.com/logo.png">
    <meta property="og:description" content="Illustrative examples">
    <meta name="description" content="not an og tag">
  </head>
  <body><p>hello</p></body>
</html>"#;

    #[test]
    fn test_parse_meta_full_page() {
        let meta = parse_meta(PAGE);

        assert_eq!(meta.title.as_deref(), Some("Example Domain"));
        assert_eq!(meta.kind.as_deref(), Some("website"));
        assert_eq!(meta.url.as_deref(), Some("https://example.com/"));
        assert_eq!(meta.image.as_deref(), Some("https://example.com/logo.png"));
        assert_eq!(meta.description.as_deref(), Some("Illustrative examples"));
    }

    #[test]
    fn test_parse_meta_missing_title_is_empty() {
        let meta = parse_meta("<html><head></head><body></body></html>");

        assert_eq!(meta.title.as_deref(), Some(""));
        assert!(meta.url.is_none());
        assert!(meta.kind.is_none());
    }

    #[test]
    fn test_parse_meta_first_property_wins() {
        let meta = parse_meta(
            r#"<head>
                <meta property="og:image" content="first.png">
                <meta property="og:image" content="second.png">
            </head>"#,
        );

        assert_eq!(meta.image.as_deref(), Some("first.png"));
    }

    #[test]
    fn test_parse_meta_ignores_tags_without_content() {
        let meta = parse_meta(
            r#"<head>
                <meta property="og:type">
                <meta property="og:type" content="article">
            </head>"#,
        );

        assert_eq!(meta.kind.as_deref(), Some("article"));
    }

    #[test]
    fn test_parse_meta_tolerates_garbage() {
        let meta = parse_meta("<<<not really html");
        assert_eq!(meta.title.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_meta_trims_title_keeps_inner_spacing() {
        let meta = parse_meta("<head><title>  A  B </title><title>second</title></head>");
        assert_eq!(meta.title.as_deref(), Some("A  B"));
    }

    #[test]
    fn test_fetcher_builds_client_once() {
        let fetcher = Fetcher::new(&Config::default().fetch_timeout_secs(Some(3)));
        let first = fetcher.client().unwrap() as *const reqwest::Client;
        let second = fetcher.client().unwrap() as *const reqwest::Client;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_bad_client_config_fails_only_on_fetch() {
        let config = Config {
            user_agent: "bad\nagent".to_string(),
            ..Config::default()
        };

        let fetcher = Fetcher::new(&config);
        let result = fetcher.fetch("http://127.0.0.1:1/").await;

        assert!(matches!(result, Err(FetchError::Client(_))));
    }
}
