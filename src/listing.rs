//! Listing client for the object-storage "list objects" endpoint.
//!
//! One call lists one page of a folder:
//!
//! ```text
//! POST {url}/storage/v1/object/list/{bucket}
//! apikey: {anon_key}
//! Authorization: Bearer {anon_key}
//!
//! { "prefix": "camaro/gallery", "limit": 60, "offset": 0,
//!   "sortBy": { "column": "name", "order": "asc" } }
//! ```
//!
//! The response is a JSON array of entries exposing at least `name`. The
//! service gives no total count; callers infer the end of a listing from a
//! short page.
//!
//! A single attempt is made per call: no retry, no timeout.

use crate::config::StorageConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File extensions treated as displayable images.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("List failed ({status}). {body}")]
    Status { status: u16, body: String },
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Malformed listing response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Request body of the listing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub prefix: String,
    pub limit: u32,
    pub offset: u32,
    pub sort_by: SortBy,
}

impl ListRequest {
    /// A page request sorted by name ascending.
    pub fn new(prefix: impl Into<String>, limit: u32, offset: u32) -> Self {
        Self {
            prefix: prefix.into(),
            limit,
            offset,
            sort_by: SortBy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortBy {
    pub column: String,
    pub order: String,
}

impl Default for SortBy {
    fn default() -> Self {
        Self {
            column: "name".to_string(),
            order: "asc".to_string(),
        }
    }
}

/// One entry of a listing response. Entries without a name deserialize with
/// an empty one and never pass the image filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ObjectEntry {
    #[serde(default)]
    pub name: String,
}

impl ObjectEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_image(&self) -> bool {
        is_image(&self.name)
    }
}

/// Whether `name` ends in a recognized image extension, case-insensitively.
pub fn is_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Source of folder listings.
///
/// Implemented by [`StorageClient`] for the real service; tests supply
/// in-memory listings.
#[allow(async_fn_in_trait)]
pub trait ListObjects {
    async fn list(&self, request: &ListRequest) -> Result<Vec<ObjectEntry>, ListingError>;
}

/// Listing client backed by `reqwest`.
pub struct StorageClient {
    http: reqwest::Client,
    storage: StorageConfig,
}

impl StorageClient {
    pub fn new(storage: StorageConfig) -> Result<Self, ListingError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("folio-gal/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, storage })
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }
}

impl StorageClient {
    /// The listing call for `request`, ready to send.
    fn build_request(&self, request: &ListRequest) -> reqwest::Result<reqwest::Request> {
        let key = &self.storage.anon_key;
        self.http
            .post(self.storage.list_endpoint())
            .header("apikey", key)
            .bearer_auth(key)
            .json(request)
            .build()
    }
}

impl ListObjects for StorageClient {
    async fn list(&self, request: &ListRequest) -> Result<Vec<ObjectEntry>, ListingError> {
        let response = self.http.execute(self.build_request(request)?).await?;

        let status = response.status();
        if !status.is_success() {
            // Body is diagnostic only; a failed read leaves it empty.
            let body = response.text().await.unwrap_or_default();
            return Err(ListingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode_entries(&response.bytes().await?)
    }
}

/// Parse a listing response body. Anything but a JSON array of objects is a
/// [`ListingError::Decode`].
fn decode_entries(body: &[u8]) -> Result<Vec<ObjectEntry>, ListingError> {
    Ok(serde_json::from_slice(body)?)
}
