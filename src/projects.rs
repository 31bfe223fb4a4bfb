//! Project card grid.
//!
//! Renders one link card per [`ProjectRecord`] into the `#projectsGrid`
//! container. The records come from outside (a JSON array a site loads
//! before this runs) and are never modified; rendering works on a sorted view.
//!
//! The same records drive both the site's top-level index and the index
//! inside `/projects/`, so card links are resolved against the current page:
//! inside the section `page` is used as-is, elsewhere it gets a `projects/`
//! prefix.
//!
//! Markup is produced with Maud, so record text is escaped on the way out.

use crate::dom::{Document, ReadyState};
use feruca::Collator;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

pub const CONTAINER_ID: &str = "projectsGrid";

const DEFAULT_META: &str = "Photos + build overview";
const SECTION_MARKER: &str = "/projects/";
const SECTION_PREFIX: &str = "projects/";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub blurb: Option<String>,
    #[serde(default)]
    pub meta: Option<String>,
    /// Path of the project page, relative to the projects section.
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Parse the externally supplied records.
///
/// Anything but a JSON array yields `None`, the "no records loaded" case.
pub fn load_records(json: &str) -> Result<Option<Vec<ProjectRecord>>, serde_json::Error> {
    match serde_json::from_str::<serde_json::Value>(json)? {
        value @ serde_json::Value::Array(_) => Ok(Some(serde_json::from_value(value)?)),
        _ => Ok(None),
    }
}

/// Featured records first, then by title in Unicode collation order.
pub fn sorted(records: &[ProjectRecord]) -> Vec<&ProjectRecord> {
    let mut collator = Collator::default();
    let mut view: Vec<&ProjectRecord> = records.iter().collect();
    view.sort_by(|a, b| {
        b.featured
            .cmp(&a.featured)
            .then_with(|| collator.collate(a.title.as_str(), b.title.as_str()))
    });
    view
}

/// Whether `path` lies inside the projects section.
pub fn is_projects_page(path: &str) -> bool {
    path.contains(SECTION_MARKER)
}

/// Link target of a card, relative to the page rendering it.
pub fn project_href(record: &ProjectRecord, in_section: bool) -> String {
    let page = record
        .page
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or("#");
    if in_section {
        page.to_string()
    } else {
        format!("{SECTION_PREFIX}{page}")
    }
}

/// Cards for `records`, sorted.
pub fn render_cards(records: &[ProjectRecord], in_section: bool) -> Markup {
    html! {
        @for record in sorted(records) {
            a.card href=(project_href(record, in_section)) {
                h3 { (record.title) }
                p { (record.blurb.as_deref().unwrap_or_default()) }
                div.meta {
                    (record.meta.as_deref().filter(|m| !m.is_empty()).unwrap_or(DEFAULT_META))
                }
            }
        }
    }
}

/// Shown instead of cards when no records were supplied.
pub fn render_placeholder() -> Markup {
    html! {
        p style="color:var(--muted);" { "No projects found. (project records loaded?)" }
    }
}

/// Renders the grid once, deferring until the document is parsed.
#[derive(Debug, Clone, Default)]
pub struct ProjectGrid {
    records: Option<Vec<ProjectRecord>>,
    pending: bool,
}

impl ProjectGrid {
    pub fn new(records: Option<Vec<ProjectRecord>>) -> Self {
        Self {
            records,
            pending: false,
        }
    }

    /// Render now if the document is parsed, otherwise on
    /// [`ProjectGrid::content_loaded`]. Returns whether it rendered.
    pub fn mount(&mut self, doc: &mut Document) -> bool {
        if doc.ready_state() == ReadyState::Loading {
            self.pending = true;
            return false;
        }
        self.render(doc);
        true
    }

    /// Run a deferred render, at most once.
    pub fn content_loaded(&mut self, doc: &mut Document) {
        if std::mem::take(&mut self.pending) {
            self.render(doc);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Replace the container's content. No container, no-op.
    pub fn render(&self, doc: &mut Document) {
        let Some(container) = doc.get_element_by_id(CONTAINER_ID) else {
            return;
        };
        let markup = match self.records.as_deref() {
            Some(records) if !records.is_empty() => {
                render_cards(records, is_projects_page(doc.path()))
            }
            _ => render_placeholder(),
        };
        tracing::debug!(
            records = self.records.as_ref().map_or(0, Vec::len),
            "rendering project grid"
        );
        doc.set_inner_html(container, markup.into_string());
    }
}
