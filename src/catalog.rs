//! Catalog metadata fetching
//!
//! One GET against the catalog API, parsed as a JSON array of items and
//! filtered down to downloadable images. Any failure here is fatal for the
//! run: nothing has been downloaded yet, so there is nothing to salvage.

use crate::config::PipelineConfig;
use crate::error::{Result, StarScanError};
use reqwest::Client;
use serde::Deserialize;

/// A single record from the catalog API response
///
/// Only the fields the pipeline needs are deserialized; the APOD API also
/// returns titles, dates, and explanations which are ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    /// Media type discriminator ("image", "video", ...)
    #[serde(default)]
    pub media_type: String,

    /// Standard-resolution asset URL
    #[serde(default)]
    pub url: Option<String>,

    /// High-resolution asset URL, when the catalog provides one
    #[serde(default)]
    pub hdurl: Option<String>,
}

impl CatalogItem {
    /// Whether this item is a still image
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.media_type == "image"
    }

    /// URL to download, preferring the high-resolution variant
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.hdurl.as_deref().or(self.url.as_deref())
    }
}

/// A unit of work for the download stage: source URL plus target filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Where to fetch the image from
    pub url: String,
    /// Filename within the save directory, unique per run
    pub filename: String,
}

/// Build one download task per image item, in catalog order
///
/// Filenames are `space_<index>.jpg` with the zero-based position in the
/// filtered sequence, which keeps them unique within a run and maps results
/// back to their originating items.
#[must_use]
pub fn build_download_tasks(items: &[CatalogItem]) -> Vec<DownloadTask> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            item.download_url().map(|url| DownloadTask {
                url: url.to_string(),
                filename: format!("space_{i}.jpg"),
            })
        })
        .collect()
}

/// Client for the remote catalog API
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
    count: u32,
}

impl CatalogClient {
    /// Create a catalog client from pipeline configuration, reusing a shared
    /// HTTP client
    #[must_use]
    pub fn new(client: Client, config: &PipelineConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            count: config.count,
        }
    }

    /// Fetch a batch of random catalog items and keep only usable images
    ///
    /// Returns the filtered items in response order. Network errors, non-2xx
    /// statuses, and malformed JSON all propagate as errors.
    pub async fn fetch_image_items(&self) -> Result<Vec<CatalogItem>> {
        log::info!(
            "Requesting {} catalog items from {}",
            self.count,
            self.base_url
        );

        let count = self.count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("api_key", self.api_key.as_str()), ("count", count.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StarScanError::catalog_status(status));
        }

        let body = response.text().await?;
        let items = parse_catalog_response(&body)?;

        let images = filter_image_items(items);
        log::info!("Catalog returned {} usable image item(s)", images.len());
        Ok(images)
    }
}

/// Parse a catalog response body as a JSON array of items
pub fn parse_catalog_response(body: &str) -> Result<Vec<CatalogItem>> {
    serde_json::from_str(body)
        .map_err(|e| StarScanError::catalog(format!("malformed catalog response: {e}")))
}

/// Keep only items that are images and carry a downloadable URL
#[must_use]
pub fn filter_image_items(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter(|item| {
            if !item.is_image() {
                log::debug!("Skipping non-image item (media_type={})", item.media_type);
                return false;
            }
            if item.download_url().is_none() {
                log::warn!("Skipping image item with no URL");
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_item(url: &str, hdurl: Option<&str>) -> CatalogItem {
        CatalogItem {
            media_type: "image".to_string(),
            url: Some(url.to_string()),
            hdurl: hdurl.map(String::from),
        }
    }

    #[test]
    fn test_parse_mixed_media_types() {
        let body = r#"[
            {"media_type": "image", "url": "http://a/1.jpg", "hdurl": "http://a/1_hd.jpg", "title": "One"},
            {"media_type": "video", "url": "http://a/clip"},
            {"media_type": "image", "url": "http://a/2.jpg"}
        ]"#;

        let items = parse_catalog_response(body).unwrap();
        assert_eq!(items.len(), 3);

        let images = filter_image_items(items);
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(CatalogItem::is_image));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_catalog_response(r#"{"error": "rate limited"}"#).is_err());
        assert!(parse_catalog_response("not json at all").is_err());
    }

    #[test]
    fn test_download_url_prefers_hd() {
        let item = image_item("http://a/low.jpg", Some("http://a/hd.jpg"));
        assert_eq!(item.download_url(), Some("http://a/hd.jpg"));

        let item = image_item("http://a/low.jpg", None);
        assert_eq!(item.download_url(), Some("http://a/low.jpg"));
    }

    #[test]
    fn test_filter_drops_url_less_images() {
        let items = vec![
            image_item("http://a/1.jpg", None),
            CatalogItem {
                media_type: "image".to_string(),
                url: None,
                hdurl: None,
            },
        ];
        assert_eq!(filter_image_items(items).len(), 1);
    }

    #[test]
    fn test_build_download_tasks_naming_and_order() {
        let items = vec![
            image_item("http://a/1.jpg", Some("http://a/1_hd.jpg")),
            image_item("http://a/2.jpg", None),
            image_item("http://a/3.jpg", None),
        ];

        let tasks = build_download_tasks(&items);
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].filename, "space_0.jpg");
        assert_eq!(tasks[0].url, "http://a/1_hd.jpg");
        assert_eq!(tasks[1].filename, "space_1.jpg");
        assert_eq!(tasks[2].filename, "space_2.jpg");

        // Filenames are unique within a run
        let mut names: Vec<_> = tasks.iter().map(|t| t.filename.clone()).collect();
        names.dedup();
        assert_eq!(names.len(), tasks.len());
    }

    #[test]
    fn test_build_download_tasks_empty() {
        assert!(build_download_tasks(&[]).is_empty());
    }
}
