//! Standalone hero lightbox.
//!
//! Independent of the gallery: it builds its own modal, appends it to `body`
//! once per document, and reads everything it shows from the trigger
//! elements themselves:
//!
//! ```html
//! <figure data-lightbox="hero" data-src="/img/full.jpg" data-caption="Engine bay">
//!   <img src="/img/thumb.jpg">
//! </figure>
//! ```
//!
//! The trigger list is never cached across openings. Each [`HeroLightbox::open`]
//! re-queries the live document, and clicks are matched by walking the
//! target's ancestry at dispatch time, so triggers inserted or removed after
//! startup behave like the originals without any re-binding.

use crate::dom::{Document, Key, NodeId};
use crate::lightbox::{NO_SCROLL_CLASS, OPEN_CLASS};

/// Attribute and value flagging a hero trigger.
pub const HERO_ATTRIBUTE: &str = "data-lightbox";
pub const HERO_VALUE: &str = "hero";

/// Marks the modal this module owns.
const MODAL_MARKER: &str = "data-hero-lightbox";
/// Elements whose click closes the modal.
const CLOSE_ATTRIBUTE: &str = "data-close";

const IMAGE_CLASS: &str = "lightbox__img";
const CAPTION_CLASS: &str = "lightbox__caption";
const PREV_CLASS: &str = "lightbox__prev";
const NEXT_CLASS: &str = "lightbox__next";

#[derive(Debug, Clone)]
pub struct HeroLightbox {
    modal: NodeId,
    image: NodeId,
    caption: NodeId,
    prev: NodeId,
    next: NodeId,
    /// Triggers captured by the last open.
    items: Vec<NodeId>,
    index: usize,
}

impl HeroLightbox {
    /// Attach to the document's hero modal, creating it on first use.
    pub fn install(doc: &mut Document) -> Self {
        if let Some(existing) = Self::find_existing(doc) {
            return existing;
        }

        let modal = doc.create_element("div");
        doc.add_class(modal, "lightbox");
        doc.set_attribute(modal, MODAL_MARKER, "");

        let backdrop = doc.create_element("div");
        doc.add_class(backdrop, "lightbox__backdrop");
        doc.set_attribute(backdrop, CLOSE_ATTRIBUTE, "1");
        doc.append_child(modal, backdrop);

        let content = doc.create_element("div");
        doc.add_class(content, "lightbox__content");
        doc.set_attribute(content, "role", "dialog");
        doc.set_attribute(content, "aria-modal", "true");
        doc.set_attribute(content, "aria-label", "Image viewer");
        doc.append_child(modal, content);

        let close = button(doc, &["lightbox__close"], "Close", "✕");
        doc.set_attribute(close, CLOSE_ATTRIBUTE, "1");
        doc.append_child(content, close);

        let prev = button(doc, &["lightbox__nav", PREV_CLASS], "Previous", "‹");
        doc.append_child(content, prev);

        let image = doc.create_element("img");
        doc.add_class(image, IMAGE_CLASS);
        doc.set_attribute(image, "alt", "");
        doc.append_child(content, image);

        let next = button(doc, &["lightbox__nav", NEXT_CLASS], "Next", "›");
        doc.append_child(content, next);

        let caption = doc.create_element("div");
        doc.add_class(caption, CAPTION_CLASS);
        doc.append_child(content, caption);

        let body = doc.body();
        doc.append_child(body, modal);

        Self {
            modal,
            image,
            caption,
            prev,
            next,
            items: Vec::new(),
            index: 0,
        }
    }

    fn find_existing(doc: &Document) -> Option<Self> {
        let modal = doc.elements_with_attribute(MODAL_MARKER, "").into_iter().next()?;
        let part = |class: &str| {
            doc.query_all(|d, n| d.has_class(n, class) && d.contains(modal, n))
                .into_iter()
                .next()
        };
        Some(Self {
            modal,
            image: part(IMAGE_CLASS)?,
            caption: part(CAPTION_CLASS)?,
            prev: part(PREV_CLASS)?,
            next: part(NEXT_CLASS)?,
            items: Vec::new(),
            index: 0,
        })
    }

    pub fn modal(&self) -> NodeId {
        self.modal
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.modal, OPEN_CLASS)
    }

    /// Open at `start` among the triggers currently in the document.
    pub fn open(&mut self, doc: &mut Document, start: usize) {
        self.items = triggers(doc);
        if start >= self.items.len() {
            return;
        }
        self.index = start;
        self.render(doc);
        doc.add_class(self.modal, OPEN_CLASS);
        let body = doc.body();
        doc.add_class(body, NO_SCROLL_CLASS);
    }

    pub fn close(&mut self, doc: &mut Document) {
        doc.remove_class(self.modal, OPEN_CLASS);
        let body = doc.body();
        doc.remove_class(body, NO_SCROLL_CLASS);
        doc.set_attribute(self.image, "src", "");
    }

    pub fn next(&mut self, doc: &mut Document) {
        if self.items.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.items.len();
        self.render(doc);
    }

    pub fn prev(&mut self, doc: &mut Document) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len();
        self.index = (self.index + len - 1) % len;
        self.render(doc);
    }

    /// Show the current trigger's `data-src` and `data-caption`, read fresh.
    fn render(&self, doc: &mut Document) {
        let Some(&item) = self.items.get(self.index) else {
            return;
        };
        let src = doc.data(item, "src").unwrap_or_default().to_string();
        let caption = doc.data(item, "caption").unwrap_or_default().to_string();
        doc.set_attribute(self.image, "src", src);
        doc.set_text(self.caption, caption);
    }

    /// Click handling for the whole document: the nav buttons' own handlers
    /// first, then the delegated trigger/close matching.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) {
        if doc.contains(self.prev, target) {
            self.prev(doc);
        } else if doc.contains(self.next, target) {
            self.next(doc);
        }

        if let Some(trigger) = doc.closest(target, is_trigger) {
            if let Some(position) = triggers(doc).iter().position(|t| *t == trigger) {
                self.open(doc, position);
            }
            return;
        }
        if doc
            .closest(target, |d, n| d.attribute(n, CLOSE_ATTRIBUTE) == Some("1"))
            .is_some()
        {
            self.close(doc);
        }
    }

    /// Keyboard handling, scoped to this modal being open.
    pub fn handle_key(&mut self, doc: &mut Document, key: Key) {
        if !self.is_open(doc) {
            return;
        }
        match key {
            Key::Escape => self.close(doc),
            Key::ArrowRight => self.next(doc),
            Key::ArrowLeft => self.prev(doc),
            _ => {}
        }
    }
}

fn is_trigger(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, HERO_ATTRIBUTE) == Some(HERO_VALUE)
}

/// All connected hero triggers in document order.
pub fn triggers(doc: &Document) -> Vec<NodeId> {
    doc.elements_with_attribute(HERO_ATTRIBUTE, HERO_VALUE)
}

fn button(doc: &mut Document, classes: &[&str], label: &str, text: &str) -> NodeId {
    let node = doc.create_element("button");
    for class in classes {
        doc.add_class(node, class);
    }
    doc.set_attribute(node, "aria-label", label);
    doc.set_text(node, text);
    node
}
