//! Dataset source backed by the Hugging Face datasets-server
//!
//! Rows are listed page by page through `/rows`; each row's image cell only
//! carries a URL, so the image bytes are downloaded and decoded one record at
//! a time, in row order.

use super::{DatasetSource, RecordStream};
use crate::config::{AcquisitionConfig, HubConfig};
use crate::error::{AcquireError, Result};
use crate::record::Record;
use crate::tracing_config::spans;
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Response of `GET /splits?dataset=...`
#[derive(Debug, Deserialize)]
struct SplitsResponse {
    splits: Vec<SplitEntry>,
}

#[derive(Debug, Deserialize)]
struct SplitEntry {
    config: String,
    split: String,
}

/// Response of `GET /rows?...`
#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<HubRow>,
    #[serde(default)]
    num_rows_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct HubRow {
    row_idx: u64,
    row: serde_json::Value,
    /// Columns the server shortened to fit its response size limit
    #[serde(default)]
    truncated_cells: Vec<String>,
}

/// Columns a record is built from
const RECORD_COLUMNS: [&str; 5] = ["image", "source", "question", "answer", "img_id"];

/// Fields a row must carry to become a [`Record`]
///
/// Text cells may be null and become empty strings; `img_id` names the
/// image file and must be present.
#[derive(Debug, Deserialize)]
struct RowFields {
    image: Option<ImageCell>,
    #[serde(deserialize_with = "null_as_empty")]
    source: String,
    #[serde(deserialize_with = "null_as_empty")]
    question: String,
    #[serde(deserialize_with = "null_as_empty")]
    answer: String,
    img_id: String,
}

/// Present-but-null text becomes `""`; an absent column is still an error
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct ImageCell {
    src: String,
}

/// Paging state for `/rows`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageCursor {
    offset: u64,
    page_size: u32,
    exhausted: bool,
}

impl PageCursor {
    fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size,
            exhausted: false,
        }
    }

    /// Move past a page of `received` rows
    fn advance(self, received: usize, total: Option<u64>) -> Self {
        let offset = self.offset + received as u64;
        let short_page = received < self.page_size as usize;
        let past_total = total.is_some_and(|total| offset >= total);

        Self {
            offset,
            page_size: self.page_size,
            exhausted: short_page || past_total,
        }
    }
}

/// Remote dataset source for one dataset split
#[derive(Debug)]
pub struct HubDatasetSource {
    client: Client,
    endpoint: Url,
    page_size: u32,
    dataset_id: String,
    split: String,
    config_name: Option<String>,
}

impl HubDatasetSource {
    /// Create a source for `dataset_id` / `split`
    ///
    /// # Errors
    /// - Invalid hub configuration
    /// - Failed to create HTTP client
    pub fn new(
        hub: &HubConfig,
        dataset_id: impl Into<String>,
        split: impl Into<String>,
        config_name: Option<String>,
    ) -> Result<Self> {
        hub.validate()?;

        // Keep a trailing slash so that `join` appends instead of replacing
        let endpoint_str = format!("{}/", hub.endpoint.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint_str).map_err(|e| {
            AcquireError::invalid_config(format!("Invalid hub endpoint '{}': {e}", hub.endpoint))
        })?;

        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &hub.token {
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| AcquireError::invalid_config("Hub token contains invalid characters"))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(hub.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| AcquireError::network_error("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            endpoint,
            page_size: hub.page_size,
            dataset_id: dataset_id.into(),
            split: split.into(),
            config_name,
        })
    }

    /// Create a source for the dataset named in an acquisition config
    ///
    /// # Errors
    /// - Invalid hub configuration
    /// - Failed to create HTTP client
    pub fn from_config(hub: &HubConfig, config: &AcquisitionConfig) -> Result<Self> {
        Self::new(
            hub,
            config.dataset_id.clone(),
            config.split.clone(),
            config.config_name.clone(),
        )
    }

    fn api_url(&self, route: &str) -> Result<Url> {
        self.endpoint
            .join(route)
            .map_err(|e| AcquireError::invalid_config(format!("Invalid API route '{route}': {e}")))
    }

    /// GET a JSON document, mapping 404 to a missing dataset
    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!(url = %url, ?query, "Requesting");

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| AcquireError::network_error(format!("Failed to request {url}"), e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AcquireError::dataset_not_found(format!(
                "{} (split '{}')",
                self.dataset_id, self.split
            )));
        }
        if !status.is_success() {
            return Err(AcquireError::http_status(status, url.as_str()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AcquireError::network_error(format!("Failed to parse response from {url}"), e))
    }

    /// Find the configuration that owns the requested split
    async fn resolve_config(&self) -> Result<String> {
        let url = self.api_url("splits")?;
        let response: SplitsResponse = self
            .get_json(url, &[("dataset", self.dataset_id.clone())])
            .await?;

        if let Some(entry) = response.splits.iter().find(|s| s.split == self.split) {
            tracing::debug!(config = %entry.config, split = %entry.split, "Resolved dataset configuration");
            return Ok(entry.config.clone());
        }

        let available: Vec<&str> = response.splits.iter().map(|s| s.split.as_str()).collect();
        Err(AcquireError::dataset_not_found(format!(
            "split '{}' not found in {} (available: {})",
            self.split,
            self.dataset_id,
            if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            }
        )))
    }

    async fn fetch_page(&self, config_name: &str, cursor: PageCursor) -> Result<RowsPage> {
        let url = self.api_url("rows")?;
        let query = [
            ("dataset", self.dataset_id.clone()),
            ("config", config_name.to_string()),
            ("split", self.split.clone()),
            ("offset", cursor.offset.to_string()),
            ("length", cursor.page_size.to_string()),
        ];

        self.get_json(url, &query)
            .instrument(spans::page_fetch(cursor.offset, cursor.page_size))
            .await
    }

    /// Turn a listed row into a record by downloading and decoding its image
    async fn materialize(&self, row: HubRow) -> Result<Record> {
        let row_idx = row.row_idx;
        if let Some(column) = row
            .truncated_cells
            .iter()
            .find(|column| RECORD_COLUMNS.contains(&column.as_str()))
        {
            return Err(AcquireError::malformed_record(
                row_idx,
                format!("cell '{column}' truncated by the server"),
            ));
        }

        let fields: RowFields = serde_json::from_value(row.row)
            .map_err(|e| AcquireError::malformed_record(row_idx, e.to_string()))?;

        let cell = fields
            .image
            .ok_or_else(|| AcquireError::malformed_record(row_idx, "image cell is empty"))?;

        let image_url = self.endpoint.join(&cell.src).map_err(|e| {
            AcquireError::malformed_record(row_idx, format!("invalid image URL '{}': {e}", cell.src))
        })?;

        let bytes = self
            .download_bytes(image_url)
            .instrument(spans::record(&fields.img_id))
            .await?;

        let image = image::load_from_memory(&bytes).map_err(|e| {
            AcquireError::malformed_record(row_idx, format!("undecodable image: {e}"))
        })?;

        Ok(Record {
            image,
            source: fields.source,
            question: fields.question,
            answer: fields.answer,
            img_id: fields.img_id,
        })
    }

    async fn download_bytes(&self, url: Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AcquireError::network_error(format!("Failed to download {url}"), e))?;

        if !response.status().is_success() {
            return Err(AcquireError::http_status(response.status(), url.as_str()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AcquireError::network_error("Failed to read download stream", e))?;

        tracing::trace!(url = %url, bytes = bytes.len(), "Downloaded image");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DatasetSource for HubDatasetSource {
    fn describe(&self) -> String {
        format!("{}:{}", self.dataset_id, self.split)
    }

    async fn open<'a>(&'a self) -> Result<RecordStream<'a>> {
        let config_name = match &self.config_name {
            Some(name) => name.clone(),
            None => self.resolve_config().await?,
        };

        let pages = stream::try_unfold(PageCursor::new(self.page_size), move |cursor| {
            let config_name = config_name.clone();
            async move {
                if cursor.exhausted {
                    return Ok::<_, AcquireError>(None);
                }
                let page = self.fetch_page(&config_name, cursor).await?;
                let next = cursor.advance(page.rows.len(), page.num_rows_total);
                Ok(Some((page.rows, next)))
            }
        });

        let records = pages
            .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<HubRow, AcquireError>)))
            .try_flatten()
            .and_then(move |row| self.materialize(row))
            .boxed();

        Ok(records)
    }
}
