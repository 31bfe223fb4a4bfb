//! Site configuration module.
//!
//! Two layers feed the components:
//!
//! 1. **Storage config** (`folio.toml`, `[storage]` table): the endpoint,
//!    bucket and anonymous key of the object-storage service. This plays the
//!    role of the configuration object a site injects before its scripts run.
//! 2. **Container attributes**: the gallery grid element's `data-project`,
//!    `data-folder` and `data-page-size` attributes.
//!
//! [`GalleryConfig::resolve`] combines both once at startup. The result is
//! immutable for the page's lifetime.
//!
//! ## Config File
//!
//! ```toml
//! [storage]
//! url = "https://xyz.supabase.co"   # Base endpoint, no trailing slash
//! bucket = "photos"                  # Public bucket holding the galleries
//! anon_key = "eyJhbGciOi..."         # Sent as `apikey` and bearer token
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE: &str = "folio.toml";

/// Gallery folder used when the container has no `data-folder`.
pub const DEFAULT_FOLDER: &str = "gallery";

/// Page size used when the container has no usable `data-page-size`.
pub const DEFAULT_PAGE_SIZE: u32 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Missing configuration: {0}")]
    Missing(&'static str),
}

/// Site configuration loaded from `folio.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Object-storage connection settings. Absent means the gallery is off.
    pub storage: Option<StorageConfig>,
}

impl SiteConfig {
    /// Reject a `[storage]` table that is present but incomplete.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.storage {
            Some(storage) if !storage.is_complete() => Err(ConfigError::Validation(
                "storage.url, storage.bucket and storage.anon_key must all be non-empty".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Object-storage connection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Base endpoint, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Bucket holding the gallery folders.
    pub bucket: String,
    /// API key sent both as `apikey` header and bearer token.
    pub anon_key: String,
}

impl StorageConfig {
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.bucket.is_empty() && !self.anon_key.is_empty()
    }

    /// `POST` target of the "list objects" call.
    pub fn list_endpoint(&self) -> String {
        format!("{}/storage/v1/object/list/{}", self.url, self.bucket)
    }

    /// Public URL of an object, e.g. `1969-camaro/gallery/FILE.jpeg`.
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.url, self.bucket, object_name
        )
    }
}

/// Everything the gallery loader needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    pub storage: StorageConfig,
    pub project: String,
    pub folder: String,
    pub page_size: u32,
}

impl GalleryConfig {
    /// Resolve from the storage config and the grid container's attributes.
    ///
    /// Fails with [`ConfigError::Missing`] when the container, its
    /// `data-project`, or a complete storage config is absent.
    pub fn resolve(
        storage: Option<&StorageConfig>,
        doc: &Document,
        grid: Option<NodeId>,
    ) -> Result<Self, ConfigError> {
        let grid = grid.ok_or(ConfigError::Missing("gallery grid element"))?;
        let project = doc
            .data(grid, "project")
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::Missing("data-project"))?;
        let storage = storage
            .filter(|s| s.is_complete())
            .ok_or(ConfigError::Missing("storage config"))?;
        let folder = doc
            .data(grid, "folder")
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FOLDER);

        Ok(Self {
            storage: storage.clone(),
            project: project.to_string(),
            folder: folder.to_string(),
            page_size: parse_page_size(doc.data(grid, "page-size")),
        })
    }

    /// Listing prefix, `project/folder`.
    pub fn prefix(&self) -> String {
        format!("{}/{}", self.project, self.folder)
    }
}

/// Parse `data-page-size`, falling back to [`DEFAULT_PAGE_SIZE`] when absent,
/// non-numeric or zero.
fn parse_page_size(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_PAGE_SIZE;
    };
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            tracing::warn!(value = raw, "invalid data-page-size, using {DEFAULT_PAGE_SIZE}");
            DEFAULT_PAGE_SIZE
        }
    }
}

/// Load `folio.toml` from `dir`.
///
/// A missing file yields the default config (no storage). Unknown keys and
/// an incomplete `[storage]` table are errors.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `folio.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-gal configuration
# =======================
# Without a [storage] table the gallery reports itself as not configured.
# Unknown keys will cause an error.

[storage]
# Base endpoint of the storage service (no trailing slash).
url = "https://your-project.supabase.co"

# Public bucket holding the galleries. Objects are addressed as
# <project>/<folder>/<file>, e.g. 1969-camaro/gallery/IMG_0001.jpeg
bucket = "photos"

# Anonymous API key. Sent as the `apikey` header and as a bearer token.
anon_key = "public-anon-key"
"##
}
