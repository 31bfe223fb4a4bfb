//! Page event loop.
//!
//! A [`Page`] owns one [`Document`] and every component attached to it, and
//! dispatches events the way a browser does for the page's scripts:
//!
//! - **click**: element-level handlers run along the bubbling path (target
//!   first); a handler may stop propagation. Document-level handlers (the
//!   hero lightbox's delegation) run last, unless propagation stopped. A
//!   load-more activation is carried out after dispatch finishes.
//! - **keydown**: tile handlers on the target path, then the window-level
//!   lightbox handlers.
//! - **image settled**: an `<img>` finished loading or failed.
//! - **content loaded**: the document finished parsing; deferred renders run.
//!
//! Everything runs on one thread. The only suspension point is the listing
//! call inside a page load; the gallery's `loading` flag rejects overlapping
//! loads.

use crate::config::StorageConfig;
use crate::dom::{Document, Key, NodeId, ReadyState};
use crate::gallery::{ClickAction, Gallery};
use crate::hero::HeroLightbox;
use crate::listing::ListObjects;
use crate::projects::{ProjectGrid, ProjectRecord};

/// Inputs a site provides besides its markup.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub storage: Option<StorageConfig>,
    pub projects: Option<Vec<ProjectRecord>>,
}

pub struct Page<C> {
    doc: Document,
    client: Option<C>,
    gallery: Gallery,
    hero: HeroLightbox,
    projects: ProjectGrid,
}

impl<C: ListObjects> Page<C> {
    /// Attach every component to `doc`.
    ///
    /// The hero modal is installed unconditionally. The project grid renders
    /// now or waits for [`Page::content_loaded`].
    pub fn new(mut doc: Document, client: Option<C>, context: PageContext) -> Self {
        let gallery = Gallery::attach(&mut doc, context.storage.as_ref());
        let hero = HeroLightbox::install(&mut doc);
        let mut projects = ProjectGrid::new(context.projects);
        projects.mount(&mut doc);
        Self {
            doc,
            client,
            gallery,
            hero,
            projects,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn hero(&self) -> &HeroLightbox {
        &self.hero
    }

    /// Initial gallery load, when the gallery is configured.
    pub async fn boot(&mut self) {
        if self.gallery.is_enabled() {
            self.load_next_page().await;
        }
    }

    /// Load the next gallery page. Returns whether a request was issued.
    pub async fn load_next_page(&mut self) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        self.gallery.load_next_page(&mut self.doc, client).await
    }

    /// Load pages until the listing ends, a page fails, or `limit` requests
    /// were issued. Returns the number of requests issued.
    pub async fn load_pages(&mut self, limit: Option<u32>) -> u32 {
        let mut issued = 0;
        while limit.is_none_or(|limit| issued < limit) {
            let before = self.gallery.state().offset;
            if !self.load_next_page().await {
                break;
            }
            issued += 1;
            // A failed page leaves the offset in place
            if self.gallery.state().offset == before {
                break;
            }
        }
        issued
    }

    /// Dispatch a click on `target`.
    pub async fn click(&mut self, target: NodeId) {
        let mut load_more = false;
        let mut stopped = false;
        for node in self.doc.ancestry(target) {
            match self.gallery.handle_click(&mut self.doc, node) {
                ClickAction::Continue => {}
                ClickAction::LoadMore => load_more = true,
                ClickAction::Stop => {
                    stopped = true;
                    break;
                }
            }
        }
        if !stopped {
            self.hero.handle_click(&mut self.doc, target);
        }
        if load_more {
            self.load_next_page().await;
        }
    }

    /// Dispatch a key press. `target` is the focused element, if any.
    /// Returns whether a handler prevented the default action.
    pub fn key_down(&mut self, target: Option<NodeId>, key: Key) -> bool {
        let prevented = self.gallery.handle_key(&mut self.doc, target, key);
        self.hero.handle_key(&mut self.doc, key);
        prevented
    }

    /// An image finished loading or failed to load.
    pub fn image_settled(&mut self, image: NodeId) {
        self.gallery.image_settled(&mut self.doc, image);
    }

    /// The document finished parsing.
    pub fn content_loaded(&mut self) {
        if self.doc.ready_state() == ReadyState::Loading {
            self.doc.set_ready_state(ReadyState::Interactive);
        }
        self.projects.content_loaded(&mut self.doc);
    }
}
