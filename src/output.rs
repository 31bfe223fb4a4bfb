//! CLI output formatting.
//!
//! Same two-level shape for every entity: a header line with a 3-digit
//! positional index and a title, then indented context lines.
//!
//! ## Gallery
//!
//! ```text
//! Gallery camaro/gallery
//!     Status: Loaded 2 photos
//!     Offset: 60 (done)
//! 001 IMG_0001.jpeg
//!     URL: https://x.supabase.co/storage/v1/object/public/photos/camaro/gallery/IMG_0001.jpeg
//! 002 IMG_0002.jpeg
//!     URL: ...
//! ```
//!
//! ## Projects
//!
//! ```text
//! Projects (2)
//! 001 Camaro (featured)
//!     Link: projects/camaro.html
//! 002 Bronco
//!     Link: projects/#
//! ```
//!
//! `format_*` functions are pure and return lines; `print_*` wrappers write
//! them to stdout.

use crate::dom::Document;
use crate::gallery::{Gallery, STATUS_ID};
use crate::projects::{self, ProjectRecord};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Last path segment of a URL, used as a tile's display name.
fn file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Format the gallery's state and every rendered tile.
pub fn format_gallery_output(gallery: &Gallery, doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    let title = gallery
        .config()
        .map(|c| c.prefix())
        .unwrap_or_else(|| "(not configured)".to_string());
    lines.push(format!("Gallery {}", title));

    if let Some(status) = doc.get_element_by_id(STATUS_ID).and_then(|s| doc.text(s)) {
        lines.push(format!("    Status: {}", status));
    }
    let state = gallery.state();
    let progress = if state.done { " (done)" } else { "" };
    lines.push(format!("    Offset: {}{}", state.offset, progress));

    for tile in gallery.tiles() {
        lines.push(format!(
            "{} {}",
            format_index(tile.index + 1),
            file_name(&tile.url)
        ));
        lines.push(format!("    URL: {}", tile.url));
    }
    lines
}

pub fn print_gallery_output(gallery: &Gallery, doc: &Document) {
    for line in format_gallery_output(gallery, doc) {
        println!("{}", line);
    }
}

/// Format project cards in render order.
pub fn format_projects_output(records: &[ProjectRecord], in_section: bool) -> Vec<String> {
    let mut lines = vec![format!("Projects ({})", records.len())];
    for (i, record) in projects::sorted(records).into_iter().enumerate() {
        let featured = if record.featured { " (featured)" } else { "" };
        lines.push(format!("{} {}{}", format_index(i + 1), record.title, featured));
        lines.push(format!(
            "    Link: {}",
            projects::project_href(record, in_section)
        ));
    }
    lines
}

pub fn print_projects_output(records: &[ProjectRecord], in_section: bool) {
    for line in format_projects_output(records, in_section) {
        println!("{}", line);
    }
}
