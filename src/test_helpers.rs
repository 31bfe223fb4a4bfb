//! Shared test utilities for the folio-gal test suite.
//!
//! Provides a storage config pointing nowhere and an in-memory listing
//! source that serves pages from a fixed, name-sorted folder.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let listing = FakeListing::new(numbered_images(25));
//! listing.fail_next();
//! // ... drive a Gallery against &listing
//! assert_eq!(listing.requests().len(), 1);
//! ```

use std::sync::Mutex;

use crate::config::StorageConfig;
use crate::listing::{ListObjects, ListRequest, ListingError, ObjectEntry};

// =========================================================================
// Fixtures
// =========================================================================

pub fn storage() -> StorageConfig {
    StorageConfig {
        url: "https://x.example".to_string(),
        bucket: "photos".to_string(),
        anon_key: "key".to_string(),
    }
}

/// `img-000.jpg`, `img-001.jpg`, ... in listing order.
pub fn numbered_images(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("img-{i:03}.jpg")).collect()
}

// =========================================================================
// Fake listing source
// =========================================================================

/// A folder served page by page, recording every request it receives.
pub struct FakeListing {
    names: Vec<String>,
    requests: Mutex<Vec<ListRequest>>,
    fail_next: Mutex<bool>,
}

impl FakeListing {
    /// Serve `names` sorted ascending, like the real service.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        Self {
            names,
            requests: Mutex::new(Vec::new()),
            fail_next: Mutex::new(false),
        }
    }

    /// Make the next call fail with a 500.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ListObjects for FakeListing {
    async fn list(&self, request: &ListRequest) -> Result<Vec<ObjectEntry>, ListingError> {
        self.requests.lock().unwrap().push(request.clone());
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(ListingError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(self
            .names
            .iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .map(|name| ObjectEntry::named(name.as_str()))
            .collect())
    }
}
