//! Dataset sources
//!
//! The acquisition loop only depends on [`DatasetSource`]: an ordered, finite
//! stream of [`Record`]s. The hub implementation talks to a remote service;
//! [`InMemorySource`] serves synthetic records.

pub mod hub;

use crate::error::{AcquireError, Result};
use crate::record::Record;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

pub use hub::HubDatasetSource;

/// Ordered stream of records; the first error ends the run
pub type RecordStream<'a> = BoxStream<'a, Result<Record>>;

/// Anything that can hand out the records of one dataset split, in order
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Short description used in logs (e.g. `org/dataset:split`)
    fn describe(&self) -> String;

    /// Open the record stream
    ///
    /// # Errors
    /// - The dataset or split cannot be resolved
    async fn open<'a>(&'a self) -> Result<RecordStream<'a>>;
}

/// Records held in memory, replayed on every `open`
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<Record>,
    failure: Option<(usize, String)>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// Yield a malformed-record error in place of the record at `index`
    /// and stop there
    #[must_use]
    pub fn with_failure_at<S: Into<String>>(mut self, index: usize, reason: S) -> Self {
        self.failure = Some((index, reason.into()));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DatasetSource for InMemorySource {
    fn describe(&self) -> String {
        format!("in-memory ({} records)", self.records.len())
    }

    async fn open<'a>(&'a self) -> Result<RecordStream<'a>> {
        let items: Vec<Result<Record>> = match &self.failure {
            Some((index, reason)) => self
                .records
                .iter()
                .take(*index)
                .cloned()
                .map(Ok)
                .chain(std::iter::once(Err(AcquireError::malformed_record(
                    *index as u64,
                    reason.clone(),
                ))))
                .collect(),
            None => self.records.iter().cloned().map(Ok).collect(),
        };

        Ok(stream::iter(items).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use image::DynamicImage;

    fn record(img_id: &str) -> Record {
        Record {
            image: DynamicImage::new_rgb8(2, 2),
            source: "S".to_string(),
            question: "Q".to_string(),
            answer: "A".to_string(),
            img_id: img_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_source_order() {
        let source = InMemorySource::new(vec![record("a1"), record("a2"), record("a3")]);
        let records: Vec<Record> = source.open().await.unwrap().try_collect().await.unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.img_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[tokio::test]
    async fn test_in_memory_source_is_restartable() {
        let source = InMemorySource::new(vec![record("a1"), record("a2")]);

        let first: Vec<Record> = source.open().await.unwrap().try_collect().await.unwrap();
        let second: Vec<Record> = source.open().await.unwrap().try_collect().await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_source_failure() {
        let source = InMemorySource::new(vec![record("a1"), record("a2"), record("a3")])
            .with_failure_at(1, "image cell is empty");

        let items: Vec<Result<Record>> = source.open().await.unwrap().collect().await;
        assert_eq!(items.len(), 2);
        assert!(items.first().is_some_and(Result::is_ok));
        assert!(matches!(
            items.get(1),
            Some(Err(AcquireError::MalformedRecord { row: 1, .. }))
        ));
    }

    #[test]
    fn test_describe() {
        let source = InMemorySource::new(vec![record("a1")]);
        assert_eq!(source.describe(), "in-memory (1 records)");
        assert_eq!(source.len(), 1);
        assert!(!source.is_empty());
    }
}
