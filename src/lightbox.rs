//! Gallery-bound lightbox.
//!
//! A modal that shows one URL at a time from the gallery's [`ImageUrlList`]
//! and cycles through it with wraparound. The modal markup belongs to the
//! page; this module only finds it by id:
//!
//! | id | role |
//! |----|------|
//! | `lightbox` | modal root, carries `is-open` |
//! | `lbImg` | displayed image |
//! | `lbCaption` | `Photo N of M` |
//! | `lbBackdrop`, `lbClose` | close on click |
//! | `lbPrev`, `lbNext` | navigate on click, stop propagation |
//!
//! Every element is optional. Without the modal or image element the viewer
//! still tracks its index but displays nothing.

use crate::dom::{Document, Key, NodeId, Propagation};

pub const MODAL_ID: &str = "lightbox";
pub const IMAGE_ID: &str = "lbImg";
pub const CAPTION_ID: &str = "lbCaption";
pub const BACKDROP_ID: &str = "lbBackdrop";
pub const CLOSE_ID: &str = "lbClose";
pub const PREV_ID: &str = "lbPrev";
pub const NEXT_ID: &str = "lbNext";

/// Class marking the modal as shown.
pub const OPEN_CLASS: &str = "is-open";
/// Class on `body` that suppresses page scroll while a modal is open.
pub const NO_SCROLL_CLASS: &str = "no-scroll";

/// Ordered, append-only list of display URLs.
///
/// Gallery tiles record their index in this list when created, so positions
/// never shift.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUrlList {
    urls: Vec<String>,
}

impl ImageUrlList {
    /// Append `url`, returning its index.
    pub fn push(&mut self, url: impl Into<String>) -> usize {
        self.urls.push(url.into());
        self.urls.len() - 1
    }

    /// Append `url` unless already present.
    pub fn ensure(&mut self, url: &str) {
        if !self.contains(url) {
            self.urls.push(url.to_string());
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn position(&self, url: &str) -> Option<usize> {
        self.urls.iter().position(|u| u == url)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

/// Whether the viewer is showing something, and what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    Open(usize),
}

#[derive(Debug, Clone, Copy, Default)]
struct LightboxElements {
    modal: Option<NodeId>,
    image: Option<NodeId>,
    caption: Option<NodeId>,
    backdrop: Option<NodeId>,
    close: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct GalleryLightbox {
    elements: LightboxElements,
    urls: ImageUrlList,
    current: usize,
    state: ViewerState,
}

impl GalleryLightbox {
    /// Find the modal elements in `doc`.
    pub fn attach(doc: &Document) -> Self {
        Self {
            elements: LightboxElements {
                modal: doc.get_element_by_id(MODAL_ID),
                image: doc.get_element_by_id(IMAGE_ID),
                caption: doc.get_element_by_id(CAPTION_ID),
                backdrop: doc.get_element_by_id(BACKDROP_ID),
                close: doc.get_element_by_id(CLOSE_ID),
                prev: doc.get_element_by_id(PREV_ID),
                next: doc.get_element_by_id(NEXT_ID),
            },
            urls: ImageUrlList::default(),
            current: 0,
            state: ViewerState::Closed,
        }
    }

    pub fn urls(&self) -> &ImageUrlList {
        &self.urls
    }

    /// Register a newly rendered URL, returning the index its tile carries.
    pub fn push_url(&mut self, url: impl Into<String>) -> usize {
        self.urls.push(url)
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open(_))
    }

    /// Show `url`, at `index` if given, else at its position in the list.
    ///
    /// Unknown URLs are appended first, so the viewer never displays something
    /// prev/next cannot return to.
    pub fn open_at(&mut self, doc: &mut Document, url: &str, index: Option<usize>) {
        self.urls.ensure(url);
        self.current = index.or_else(|| self.urls.position(url)).unwrap_or(0);

        let (Some(modal), Some(image)) = (self.elements.modal, self.elements.image) else {
            return;
        };
        let Some(shown) = self.urls.get(self.current) else {
            return;
        };

        let number = self.current + 1;
        doc.set_attribute(image, "src", shown);
        doc.set_attribute(image, "alt", format!("Photo {number}"));
        if let Some(caption) = self.elements.caption {
            doc.set_text(caption, format!("Photo {number} of {}", self.urls.len()));
        }

        doc.add_class(modal, OPEN_CLASS);
        let body = doc.body();
        doc.add_class(body, NO_SCROLL_CLASS);
        doc.set_attribute(modal, "aria-hidden", "false");
        self.state = ViewerState::Open(self.current);
    }

    /// Hide the modal and clear the image source so a pending fetch is dropped.
    pub fn close(&mut self, doc: &mut Document) {
        let (Some(modal), Some(image)) = (self.elements.modal, self.elements.image) else {
            return;
        };
        doc.remove_class(modal, OPEN_CLASS);
        let body = doc.body();
        doc.remove_class(body, NO_SCROLL_CLASS);
        doc.set_attribute(modal, "aria-hidden", "true");
        doc.set_attribute(image, "src", "");
        self.state = ViewerState::Closed;
    }

    pub fn prev(&mut self, doc: &mut Document) {
        let len = self.urls.len();
        if len == 0 {
            return;
        }
        self.show_index(doc, (self.current + len - 1) % len);
    }

    pub fn next(&mut self, doc: &mut Document) {
        let len = self.urls.len();
        if len == 0 {
            return;
        }
        self.show_index(doc, (self.current + 1) % len);
    }

    fn show_index(&mut self, doc: &mut Document, index: usize) {
        self.current = index;
        if let Some(url) = self.urls.get(index).map(str::to_string) {
            self.open_at(doc, &url, Some(index));
        }
    }

    /// Element-level click handling for the modal controls. Called once per
    /// node on the event's bubbling path.
    pub fn handle_click(&mut self, doc: &mut Document, node: NodeId) -> Propagation {
        let el = self.elements;
        if Some(node) == el.backdrop || Some(node) == el.close {
            self.close(doc);
        } else if Some(node) == el.prev {
            self.prev(doc);
            return Propagation::Stop;
        } else if Some(node) == el.next {
            self.next(doc);
            return Propagation::Stop;
        }
        Propagation::Continue
    }

    /// Window-level keyboard handling, active only while open.
    pub fn handle_key(&mut self, doc: &mut Document, key: Key) {
        if !self.is_open() {
            return;
        }
        match key {
            Key::Escape => self.close(doc),
            Key::ArrowLeft => self.prev(doc),
            Key::ArrowRight => self.next(doc),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold;

    fn lightbox_with(urls: &[&str]) -> (Document, GalleryLightbox) {
        let mut doc = Document::new("/");
        scaffold::gallery_lightbox(&mut doc);
        let mut lightbox = GalleryLightbox::attach(&doc);
        for url in urls {
            lightbox.push_url(*url);
        }
        (doc, lightbox)
    }

    fn shown_src(doc: &Document) -> Option<String> {
        let image = doc.get_element_by_id(IMAGE_ID)?;
        doc.attribute(image, "src").map(str::to_string)
    }

    fn caption(doc: &Document) -> Option<String> {
        let caption = doc.get_element_by_id(CAPTION_ID)?;
        doc.text(caption).map(str::to_string)
    }

    #[test]
    fn open_at_displays_url_and_caption() {
        let (mut doc, mut lb) = lightbox_with(&["a", "b", "c"]);
        lb.open_at(&mut doc, "b", Some(1));

        assert_eq!(lb.state(), ViewerState::Open(1));
        assert_eq!(shown_src(&doc).as_deref(), Some("b"));
        assert_eq!(caption(&doc).as_deref(), Some("Photo 2 of 3"));

        let modal = doc.get_element_by_id(MODAL_ID).unwrap();
        assert!(doc.has_class(modal, OPEN_CLASS));
        assert_eq!(doc.attribute(modal, "aria-hidden"), Some("false"));
        assert!(doc.has_class(doc.body(), NO_SCROLL_CLASS));
    }

    #[test]
    fn open_at_without_index_uses_list_position() {
        let (mut doc, mut lb) = lightbox_with(&["a", "b", "c"]);
        lb.open_at(&mut doc, "c", None);
        assert_eq!(lb.current_index(), 2);
    }

    #[test]
    fn open_at_appends_unknown_url() {
        let (mut doc, mut lb) = lightbox_with(&["a"]);
        lb.open_at(&mut doc, "stray", None);

        assert_eq!(lb.urls().len(), 2);
        assert_eq!(lb.current_index(), 1);
        assert_eq!(caption(&doc).as_deref(), Some("Photo 2 of 2"));
    }

    #[test]
    fn open_at_known_url_does_not_duplicate() {
        let (mut doc, mut lb) = lightbox_with(&["a", "b"]);
        lb.open_at(&mut doc, "a", Some(0));
        assert_eq!(lb.urls().len(), 2);
    }

    #[test]
    fn close_restores_scroll_and_clears_source() {
        let (mut doc, mut lb) = lightbox_with(&["a"]);
        lb.open_at(&mut doc, "a", Some(0));
        lb.close(&mut doc);

        assert_eq!(lb.state(), ViewerState::Closed);
        assert_eq!(shown_src(&doc).as_deref(), Some(""));
        let modal = doc.get_element_by_id(MODAL_ID).unwrap();
        assert!(!doc.has_class(modal, OPEN_CLASS));
        assert_eq!(doc.attribute(modal, "aria-hidden"), Some("true"));
        assert!(!doc.has_class(doc.body(), NO_SCROLL_CLASS));
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let (mut doc, mut lb) = lightbox_with(&["a", "b", "c"]);
        lb.open_at(&mut doc, "a", Some(0));

        lb.prev(&mut doc);
        assert_eq!(lb.current_index(), 2);
        assert_eq!(shown_src(&doc).as_deref(), Some("c"));

        lb.next(&mut doc);
        assert_eq!(lb.current_index(), 0);
    }

    #[test]
    fn next_len_times_returns_to_start() {
        let urls = ["a", "b", "c", "d", "e"];
        let (mut doc, mut lb) = lightbox_with(&urls);
        lb.open_at(&mut doc, "c", Some(2));

        for _ in 0..urls.len() {
            lb.next(&mut doc);
            assert!(lb.current_index() < urls.len());
        }
        assert_eq!(lb.current_index(), 2);
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let (mut doc, mut lb) = lightbox_with(&[]);
        lb.next(&mut doc);
        lb.prev(&mut doc);
        assert_eq!(lb.state(), ViewerState::Closed);
        assert_eq!(lb.current_index(), 0);
    }

    #[test]
    fn keys_only_act_while_open() {
        let (mut doc, mut lb) = lightbox_with(&["a", "b"]);
        lb.handle_key(&mut doc, Key::ArrowRight);
        assert_eq!(lb.state(), ViewerState::Closed);

        lb.open_at(&mut doc, "a", Some(0));
        lb.handle_key(&mut doc, Key::ArrowRight);
        assert_eq!(lb.state(), ViewerState::Open(1));
        lb.handle_key(&mut doc, Key::ArrowLeft);
        assert_eq!(lb.state(), ViewerState::Open(0));
        lb.handle_key(&mut doc, Key::Escape);
        assert_eq!(lb.state(), ViewerState::Closed);
    }

    #[test]
    fn nav_clicks_stop_propagation() {
        let (mut doc, mut lb) = lightbox_with(&["a", "b"]);
        lb.open_at(&mut doc, "a", Some(0));

        let next = doc.get_element_by_id(NEXT_ID).unwrap();
        assert_eq!(lb.handle_click(&mut doc, next), Propagation::Stop);
        assert_eq!(lb.current_index(), 1);

        let backdrop = doc.get_element_by_id(BACKDROP_ID).unwrap();
        assert_eq!(lb.handle_click(&mut doc, backdrop), Propagation::Continue);
        assert!(!lb.is_open());
    }

    #[test]
    fn missing_modal_tracks_index_without_display() {
        let mut doc = Document::new("/");
        let mut lb = GalleryLightbox::attach(&doc);
        lb.push_url("a");
        lb.push_url("b");

        lb.open_at(&mut doc, "b", Some(1));
        assert_eq!(lb.current_index(), 1);
        assert_eq!(lb.state(), ViewerState::Closed);
        lb.close(&mut doc);
        lb.next(&mut doc);
        assert_eq!(lb.current_index(), 0);
    }
}
