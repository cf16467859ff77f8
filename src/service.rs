//! Bookmark use cases on top of the store and the metadata fetcher.

use regex::RegexBuilder;
use thiserror::Error;
use tracing::debug;

use crate::fetcher::{FetchError, Fetcher, MetaSource};
use crate::store::{BookmarkStore, Index, IndexItem, Meta, Record, StoreError};
use crate::validate::{ValidationError, require_term};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    /// Skip the network and store only the URL.
    pub offline: bool,
}

pub struct BookmarkService<F = Fetcher> {
    store: BookmarkStore,
    fetcher: F,
}

impl<F: MetaSource> BookmarkService<F> {
    pub fn new(store: BookmarkStore, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    /// Bookmark `url`. Online adds fetch metadata first; a failed fetch
    /// creates nothing.
    pub async fn add_bookmark(
        &mut self,
        url: &str,
        options: AddOptions,
    ) -> Result<Record, ServiceError> {
        let meta = if options.offline {
            debug!(url, "Storing bookmark offline");
            Meta::offline(url)
        } else {
            self.fetcher.fetch(url).await?
        };
        Ok(self.store.create(meta)?)
    }

    /// Index entries whose title matches `term`, case-insensitively.
    ///
    /// `term` is tried as a regular expression first and falls back to a
    /// plain substring when it does not compile. Untitled bookmarks never
    /// match.
    pub fn search(&mut self, term: &str) -> Result<Vec<IndexItem>, ServiceError> {
        let term = require_term(term)?;
        let pattern = RegexBuilder::new(term).case_insensitive(true).build().ok();
        let needle = term.to_lowercase();

        let index = self.store.list()?;
        let matches = index
            .items
            .iter()
            .filter(|item| !item.title.is_empty())
            .filter(|item| match &pattern {
                Some(re) => re.is_match(&item.title),
                None => item.title.to_lowercase().contains(&needle),
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    pub fn get_index(&mut self) -> Result<&Index, ServiceError> {
        Ok(self.store.list()?)
    }

    pub fn read_bookmark(&self, id: u64) -> Result<Option<Record>, ServiceError> {
        Ok(self.store.read(id)?)
    }

    pub fn delete_bookmark(&mut self, id: u64) -> Result<bool, ServiceError> {
        Ok(self.store.delete(id)?)
    }

    pub fn clear_bookmarks(&mut self) -> Result<(), ServiceError> {
        Ok(self.store.clear()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::{TempDir, tempdir};

    struct FakeSource {
        calls: AtomicUsize,
        title: &'static str,
    }

    impl FakeSource {
        fn titled(title: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                title,
            }
        }
    }

    #[async_trait]
    impl MetaSource for FakeSource {
        async fn fetch(&self, url: &str) -> Result<Meta, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Meta {
                title: Some(self.title.to_string()),
                url: Some(url.to_string()),
                ..Meta::default()
            })
        }
    }

    fn service(title: &'static str) -> (TempDir, BookmarkService<FakeSource>) {
        let temp_dir = tempdir().expect("Should create temp dir");
        let store = BookmarkStore::open(temp_dir.path().join("data"));
        (temp_dir, BookmarkService::new(store, FakeSource::titled(title)))
    }

    #[tokio::test]
    async fn test_add_online_uses_fetched_meta() {
        let (_temp_dir, mut service) = service("Hacker News");

        let record = service
            .add_bookmark("https://news.ycombinator.com", AddOptions::default())
            .await
            .unwrap();

        assert_eq!(record.id, 0);
        assert_eq!(record.meta.title.as_deref(), Some("Hacker News"));
        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_offline_skips_fetch() {
        let (_temp_dir, mut service) = service("unused");

        let record = service
            .add_bookmark("http://example.com", AddOptions { offline: true })
            .await
            .unwrap();

        assert_eq!(record.meta, Meta::offline("http://example.com"));
        assert_eq!(service.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_increments_count_by_one() {
        let (_temp_dir, mut service) = service("Example Domain");
        service
            .add_bookmark("http://a.example", AddOptions { offline: true })
            .await
            .unwrap();
        let before = service.get_index().unwrap().count;

        let record = service
            .add_bookmark("http://b.example", AddOptions::default())
            .await
            .unwrap();

        assert_eq!(record.id, before);
        assert_eq!(service.get_index().unwrap().count, before + 1);
    }

    #[tokio::test]
    async fn test_offline_scenario_add_list_delete() {
        let (_temp_dir, mut service) = service("unused");

        let record = service
            .add_bookmark("http://example.com", AddOptions { offline: true })
            .await
            .unwrap();
        assert_eq!(record.id, 0);

        let index = service.get_index().unwrap().clone();
        assert_eq!(
            index.items,
            vec![IndexItem {
                id: 0,
                filename: "0.json".to_string(),
                title: String::new(),
                url: "http://example.com".to_string(),
            }]
        );

        assert!(service.delete_bookmark(0).unwrap());
        assert!(service.get_index().unwrap().is_empty());
        assert!(service.read_bookmark(0).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let temp_dir = tempdir().unwrap();
        let mut store = BookmarkStore::open(temp_dir.path().join("data"));
        for title in ["Hacker News", "Example Domain"] {
            store
                .create(Meta {
                    title: Some(title.to_string()),
                    ..Meta::default()
                })
                .unwrap();
        }
        store.create(Meta::offline("http://untitled.example")).unwrap();
        let mut service = BookmarkService::new(store, FakeSource::titled("unused"));

        let hacker = service.search("hacker").unwrap();
        assert_eq!(hacker.len(), 1);
        assert_eq!(hacker[0].title, "Hacker News");

        let domain = service.search("DOMAIN").unwrap();
        assert_eq!(domain.len(), 1);
        assert_eq!(domain[0].title, "Example Domain");

        assert_eq!(service.search("e").unwrap().len(), 2);
        assert!(service.search("nothing-like-this").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_regex_and_literal_fallback() {
        let (_temp_dir, mut service) = service("C++ (draft) notes");
        service
            .add_bookmark("http://cpp.example", AddOptions::default())
            .await
            .unwrap();

        assert_eq!(service.search("^c\\+\\+").unwrap().len(), 1);
        // unbalanced paren is not a valid regex, so it is matched literally
        assert_eq!(service.search("(draft").unwrap().len(), 1);
    }

    #[test]
    fn test_search_empty_term_fails() {
        let (_temp_dir, mut service) = service("unused");

        let result = service.search("");

        assert!(matches!(
            result,
            Err(ServiceError::Validation(ValidationError::MissingParameter(
                "term"
            )))
        ));
    }

    #[tokio::test]
    async fn test_clear_bookmarks() {
        let (_temp_dir, mut service) = service("Example Domain");
        service
            .add_bookmark("http://a.example", AddOptions::default())
            .await
            .unwrap();

        service.clear_bookmarks().unwrap();

        assert_eq!(service.get_index().unwrap(), &Index::default());
    }
}
