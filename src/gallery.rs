//! Paginated gallery loader.
//!
//! Pages through a storage folder listing, keeps the image entries, and
//! renders one tile per image into the grid. Every tile's URL is also
//! appended to the lightbox's [`ImageUrlList`](crate::lightbox::ImageUrlList),
//! and the tile remembers its index there.
//!
//! ## Page Lifecycle
//!
//! ```text
//! begin_page   loading = true, controls "Loading…", status "Loading…"
//!     │        → ListRequest { prefix, limit: page_size, offset }
//!     ▼
//! (listing call in flight; further begin_page calls return None)
//!     │
//! finish_page  Ok  → tiles appended, offset += page_size, maybe done
//!              Err → error status, offset/done untouched
//!              both → loading = false, controls refreshed
//! ```
//!
//! [`Gallery::load_next_page`] runs the whole cycle against a
//! [`ListObjects`] source. The split exists so an event loop can keep
//! dispatching while the call is pending.
//!
//! ## End of Listing
//!
//! The service reports no total. A page with no images, or with fewer raw
//! entries than requested, ends the listing. `offset` tracks raw listing
//! position, so non-image entries still advance it.

use crate::config::{GalleryConfig, StorageConfig};
use crate::dom::{Document, Key, NodeId, Propagation};
use crate::lightbox::GalleryLightbox;
use crate::listing::{ListObjects, ListRequest, ListingError, ObjectEntry};

pub const GRID_ID: &str = "galleryGrid";
pub const STATUS_ID: &str = "galleryStatus";
pub const TOP_BUTTON_ID: &str = "loadMoreBtn";
pub const BOTTOM_BUTTON_ID: &str = "loadMoreBtnBottom";

pub const TILE_CLASS: &str = "gallery-item";
/// Added to a tile once its image loaded or failed.
pub const LOADED_CLASS: &str = "is-loaded";

pub const STATUS_NOT_CONFIGURED: &str =
    "Gallery not configured (missing data-project or storage config).";
pub const STATUS_LOADING: &str = "Loading…";
pub const STATUS_EMPTY: &str = "No photos found";
pub const STATUS_ERROR: &str = "Error loading photos (check console)";

const LABEL_LOAD_MORE: &str = "Load more";
const LABEL_LOADING: &str = "Loading…";
const LABEL_DONE: &str = "No more photos";

/// Pagination bookkeeping. Only the page-load cycle mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Raw listing position of the next page.
    pub offset: u32,
    /// Tiles rendered so far.
    pub loaded: u32,
    /// Listing exhausted. Never reset.
    pub done: bool,
    /// A listing call is in flight.
    pub loading: bool,
}

/// A rendered gallery tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub node: NodeId,
    pub image: NodeId,
    pub url: String,
    /// Position of `url` in the lightbox list.
    pub index: usize,
}

/// What a click on one node of the bubbling path asks of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Continue,
    Stop,
    /// A load-more control was activated.
    LoadMore,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    grid: Option<NodeId>,
    status: Option<NodeId>,
    load_buttons: Vec<NodeId>,
    /// `None` when configuration is incomplete; the gallery is then inert.
    config: Option<GalleryConfig>,
    state: PaginationState,
    tiles: Vec<Tile>,
    lightbox: GalleryLightbox,
}

impl Gallery {
    /// Find the gallery elements in `doc` and resolve configuration.
    ///
    /// An unresolvable configuration disables the gallery and says so in the
    /// status line.
    pub fn attach(doc: &mut Document, storage: Option<&StorageConfig>) -> Self {
        let grid = doc.get_element_by_id(GRID_ID);
        if grid.is_some() && !storage.is_some_and(StorageConfig::is_complete) {
            tracing::warn!("storage config missing or incomplete; check folio.toml");
        }
        let load_buttons = [TOP_BUTTON_ID, BOTTOM_BUTTON_ID]
            .iter()
            .filter_map(|id| doc.get_element_by_id(id))
            .collect();
        let config = match GalleryConfig::resolve(storage, doc, grid) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::debug!(error = %err, "gallery disabled");
                None
            }
        };

        let gallery = Self {
            grid,
            status: doc.get_element_by_id(STATUS_ID),
            load_buttons,
            config,
            state: PaginationState::default(),
            tiles: Vec::new(),
            lightbox: GalleryLightbox::attach(doc),
        };
        if gallery.config.is_none() {
            gallery.set_status(doc, STATUS_NOT_CONFIGURED);
            gallery.refresh_controls(doc);
        }
        gallery
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&GalleryConfig> {
        self.config.as_ref()
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn lightbox(&self) -> &GalleryLightbox {
        &self.lightbox
    }

    pub fn lightbox_mut(&mut self) -> &mut GalleryLightbox {
        &mut self.lightbox
    }

    /// Load one page from `client`. Returns whether a request was issued.
    pub async fn load_next_page<C: ListObjects>(&mut self, doc: &mut Document, client: &C) -> bool {
        let Some(request) = self.begin_page(doc) else {
            return false;
        };
        let result = client.list(&request).await;
        self.finish_page(doc, &request, result);
        true
    }

    /// Start a page load. `None` when disabled, busy, or done.
    pub fn begin_page(&mut self, doc: &mut Document) -> Option<ListRequest> {
        let config = self.config.as_ref()?;
        if self.state.loading || self.state.done {
            return None;
        }
        let request = ListRequest::new(config.prefix(), config.page_size, self.state.offset);

        self.state.loading = true;
        self.refresh_controls(doc);
        self.set_status(doc, STATUS_LOADING);
        tracing::debug!(
            prefix = %request.prefix,
            offset = request.offset,
            limit = request.limit,
            "requesting gallery page"
        );
        Some(request)
    }

    /// Apply the outcome of the request returned by [`Gallery::begin_page`].
    pub fn finish_page(
        &mut self,
        doc: &mut Document,
        request: &ListRequest,
        result: Result<Vec<ObjectEntry>, ListingError>,
    ) {
        match result {
            Ok(entries) => self.apply_page(doc, request, &entries),
            Err(err) => {
                tracing::error!(error = %err, offset = request.offset, "failed to load gallery page");
                self.set_status(doc, STATUS_ERROR);
            }
        }
        self.state.loading = false;
        self.refresh_controls(doc);
    }

    fn apply_page(&mut self, doc: &mut Document, request: &ListRequest, entries: &[ObjectEntry]) {
        let Some(config) = &self.config else {
            return;
        };
        let page_size = config.page_size;
        let urls: Vec<String> = entries
            .iter()
            .filter(|entry| entry.is_image())
            .map(|entry| {
                config
                    .storage
                    .public_url(&format!("{}/{}", request.prefix, entry.name))
            })
            .collect();

        for url in &urls {
            let index = self.lightbox.push_url(url.as_str());
            let tile = create_tile(doc, url, index);
            if let Some(grid) = self.grid {
                doc.append_child(grid, tile.node);
            }
            self.tiles.push(tile);
            self.state.loaded += 1;
        }

        self.state.offset += page_size;
        if urls.is_empty() || entries.len() < page_size as usize {
            self.state.done = true;
        }
        tracing::debug!(
            entries = entries.len(),
            images = urls.len(),
            done = self.state.done,
            "gallery page loaded"
        );

        if self.state.loaded == 0 {
            self.set_status(doc, STATUS_EMPTY);
        } else {
            self.set_status(doc, &format!("Loaded {} photos", self.state.loaded));
        }
    }

    /// Mark the tile owning `image` as settled, whether it loaded or failed.
    pub fn image_settled(&self, doc: &mut Document, image: NodeId) {
        if let Some(tile) = self.tiles.iter().find(|t| t.image == image) {
            doc.add_class(tile.node, LOADED_CLASS);
        }
    }

    /// Element-level click handling for one node of the bubbling path.
    pub fn handle_click(&mut self, doc: &mut Document, node: NodeId) -> ClickAction {
        if self.load_buttons.contains(&node) {
            return ClickAction::LoadMore;
        }
        if let Some(tile) = self.tiles.iter().find(|t| t.node == node).cloned() {
            self.lightbox.open_at(doc, &tile.url, Some(tile.index));
            return ClickAction::Continue;
        }
        match self.lightbox.handle_click(doc, node) {
            Propagation::Continue => ClickAction::Continue,
            Propagation::Stop => ClickAction::Stop,
        }
    }

    /// Keyboard handling: Enter/Space on a tile opens it, then the lightbox
    /// sees the key. Returns whether the default action was prevented.
    pub fn handle_key(&mut self, doc: &mut Document, target: Option<NodeId>, key: Key) -> bool {
        let mut prevented = false;
        if matches!(key, Key::Enter | Key::Space) {
            let tile = target.and_then(|target| {
                self.tiles
                    .iter()
                    .find(|t| doc.contains(t.node, target))
                    .cloned()
            });
            if let Some(tile) = tile {
                self.lightbox.open_at(doc, &tile.url, Some(tile.index));
                prevented = true;
            }
        }
        self.lightbox.handle_key(doc, key);
        prevented
    }

    fn set_status(&self, doc: &mut Document, message: &str) {
        if let Some(status) = self.status {
            doc.set_text(status, message);
        }
    }

    fn refresh_controls(&self, doc: &mut Document) {
        for &button in &self.load_buttons {
            if self.state.done {
                doc.set_text(button, LABEL_DONE);
                doc.set_disabled(button, true);
                doc.set_style(button, "opacity", "0.75");
                continue;
            }
            doc.set_disabled(button, self.state.loading);
            doc.set_text(
                button,
                if self.state.loading {
                    LABEL_LOADING
                } else {
                    LABEL_LOAD_MORE
                },
            );
            doc.set_style(button, "opacity", "1");
        }
    }
}

/// Build a detached tile for `url` at lightbox position `index`.
fn create_tile(doc: &mut Document, url: &str, index: usize) -> Tile {
    let node = doc.create_element("div");
    doc.add_class(node, TILE_CLASS);
    doc.set_attribute(node, "role", "button");
    doc.set_attribute(node, "tabindex", "0");
    doc.set_data(node, "index", index.to_string());
    doc.set_data(node, "full", url);

    let image = doc.create_element("img");
    doc.set_attribute(image, "loading", "lazy");
    doc.set_attribute(image, "decoding", "async");
    doc.set_attribute(image, "alt", format!("Photo {}", index + 1));
    doc.set_attribute(image, "src", url);
    doc.append_child(node, image);

    Tile {
        node,
        image,
        url: url.to_string(),
        index,
    }
}
