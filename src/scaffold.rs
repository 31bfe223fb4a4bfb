//! Static page markup the components attach to.
//!
//! A site ships these structures in its HTML; the builders here produce the
//! same elements in a [`Document`] for the CLI and for tests.

use crate::dom::{Document, NodeId};
use crate::gallery::{BOTTOM_BUTTON_ID, GRID_ID, STATUS_ID, TOP_BUTTON_ID};
use crate::hero::{HERO_ATTRIBUTE, HERO_VALUE};
use crate::lightbox::{BACKDROP_ID, CAPTION_ID, CLOSE_ID, IMAGE_ID, MODAL_ID, NEXT_ID, PREV_ID};
use crate::projects::CONTAINER_ID;

/// Which load-more controls a gallery page carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadControls {
    None,
    Top,
    Bottom,
    Both,
}

/// Gallery section: status line, load-more controls around the grid, and the
/// lightbox modal. `data` entries become `data-*` attributes on the grid.
///
/// Returns the grid element.
pub fn gallery_page(doc: &mut Document, data: &[(&str, &str)], controls: LoadControls) -> NodeId {
    let section = doc.create_element("section");
    doc.add_class(section, "gallery");
    let body = doc.body();
    doc.append_child(body, section);

    let status = element_with_id(doc, "p", STATUS_ID);
    doc.add_class(status, "gallery-status");
    doc.append_child(section, status);

    if matches!(controls, LoadControls::Top | LoadControls::Both) {
        let top = load_button(doc, TOP_BUTTON_ID);
        doc.append_child(section, top);
    }

    let grid = element_with_id(doc, "div", GRID_ID);
    doc.add_class(grid, "gallery-grid");
    for (key, value) in data {
        doc.set_data(grid, key, *value);
    }
    doc.append_child(section, grid);

    if matches!(controls, LoadControls::Bottom | LoadControls::Both) {
        let bottom = load_button(doc, BOTTOM_BUTTON_ID);
        doc.append_child(section, bottom);
    }

    gallery_lightbox(doc);
    grid
}

fn load_button(doc: &mut Document, id: &str) -> NodeId {
    let button = element_with_id(doc, "button", id);
    doc.set_attribute(button, "type", "button");
    doc.set_text(button, "Load more");
    button
}

/// The gallery lightbox modal, appended to `body`. Returns the modal root.
pub fn gallery_lightbox(doc: &mut Document) -> NodeId {
    let modal = element_with_id(doc, "div", MODAL_ID);
    doc.add_class(modal, "lightbox");
    doc.set_attribute(modal, "aria-hidden", "true");
    let body = doc.body();
    doc.append_child(body, modal);

    let backdrop = element_with_id(doc, "div", BACKDROP_ID);
    doc.add_class(backdrop, "lightbox__backdrop");
    doc.append_child(modal, backdrop);

    let content = doc.create_element("div");
    doc.add_class(content, "lightbox__content");
    doc.set_attribute(content, "role", "dialog");
    doc.set_attribute(content, "aria-modal", "true");
    doc.append_child(modal, content);

    for (tag, id, label) in [
        ("button", CLOSE_ID, "✕"),
        ("button", PREV_ID, "‹"),
        ("img", IMAGE_ID, ""),
        ("button", NEXT_ID, "›"),
        ("div", CAPTION_ID, ""),
    ] {
        let node = element_with_id(doc, tag, id);
        if !label.is_empty() {
            doc.set_text(node, label);
        }
        doc.append_child(content, node);
    }
    modal
}

/// A hero trigger with its thumbnail, appended to `parent`. Returns the
/// trigger element.
pub fn hero_trigger(
    doc: &mut Document,
    parent: NodeId,
    src: &str,
    caption: Option<&str>,
) -> NodeId {
    let trigger = doc.create_element("figure");
    doc.add_class(trigger, "hero");
    doc.set_attribute(trigger, HERO_ATTRIBUTE, HERO_VALUE);
    doc.set_data(trigger, "src", src);
    if let Some(caption) = caption {
        doc.set_data(trigger, "caption", caption);
    }
    let thumb = doc.create_element("img");
    doc.set_attribute(thumb, "src", src);
    doc.append_child(trigger, thumb);
    doc.append_child(parent, trigger);
    trigger
}

/// The project grid container, appended to `body`.
pub fn projects_grid(doc: &mut Document) -> NodeId {
    let grid = element_with_id(doc, "div", CONTAINER_ID);
    doc.add_class(grid, "cards");
    let body = doc.body();
    doc.append_child(body, grid);
    grid
}

fn element_with_id(doc: &mut Document, tag: &str, id: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.set_attribute(node, "id", id);
    node
}
