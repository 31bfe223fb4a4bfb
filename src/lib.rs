//! # folio-gal
//!
//! Page behaviors for a static portfolio site: a paginated photo gallery fed
//! by an object-storage listing, a lightbox over the loaded photos, a
//! standalone "hero" lightbox, and a project card grid.
//!
//! # Architecture
//!
//! The components act on an in-memory [`dom::Document`] instead of a browser
//! page. Each one looks up the elements it needs when attached, keeps its own
//! state, and reacts to events dispatched by a [`page::Page`]:
//!
//! ```text
//!                ┌──────────────── Page (event loop) ────────────────┐
//!  click/key ──▶ │ Gallery ──▶ GalleryLightbox      HeroLightbox     │
//!                │    │                              ProjectGrid     │
//!                │    ▼                                              │
//!                │ ListObjects (StorageClient | fake)                │
//!                └───────────────────────┬───────────────────────────┘
//!                                        ▼
//!                                     Document ──▶ HTML
//! ```
//!
//! No component reaches into another's state. The gallery owns the lightbox
//! it feeds, and the hero lightbox and project grid stand alone.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | In-memory document, ancestry queries, HTML serialization |
//! | [`config`] | `folio.toml` storage config and gallery config resolution |
//! | [`listing`] | Storage "list objects" client and the image-name filter |
//! | [`gallery`] | Incremental gallery loading, tiles, load-more controls |
//! | [`lightbox`] | Gallery-bound lightbox over the loaded URLs |
//! | [`hero`] | Standalone lightbox driven by `data-*` attributes |
//! | [`projects`] | Project card grid renderer |
//! | [`page`] | Event dispatch wiring the components to one document |
//! | [`scaffold`] | Builders for the markup the components expect |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Heuristic End of Listing
//!
//! The listing API returns no total. A page with no images, or with fewer
//! entries than requested, ends pagination. This can stop early on a folder
//! whose remaining entries are all non-images; that is accepted rather than
//! guessed around.
//!
//! ## No Retries
//!
//! A failed page leaves the cursor where it was and reports the failure in
//! the status line. The next load-more activation retries the same offset.

pub mod config;
pub mod dom;
pub mod gallery;
pub mod hero;
pub mod lightbox;
pub mod listing;
pub mod output;
pub mod page;
pub mod projects;
pub mod scaffold;

#[cfg(test)]
pub(crate) mod test_helpers;
