//! In-memory document model.
//!
//! The page behaviors in this crate act on a [`Document`]: an arena of element
//! nodes carrying attributes, classes, inline styles, text and raw inner HTML.
//! Components look elements up by `id` or attribute the same way page scripts
//! do, keep [`NodeId`] handles to what they found, and mutate the tree in
//! response to events dispatched by [`crate::page::Page`].
//!
//! ## Connectedness
//!
//! Nodes are never freed. Removing a node detaches it from its parent; lookups
//! such as [`Document::get_element_by_id`] and [`Document::query_all`] only see
//! nodes still reachable from the root, while handles to detached nodes keep
//! working for attribute reads.
//!
//! ## Serialization
//!
//! [`Document::outer_html`] and [`Document::render`] produce HTML text. Text and
//! attribute values are escaped through Maud, raw inner HTML (set by renderers
//! that already produced escaped markup) is emitted verbatim.

use maud::html;
use std::collections::BTreeMap;

/// Handle to an element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Parsing progress of a document, mirroring `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Structural content is still being parsed.
    Loading,
    /// Parsing finished; subresources may still be loading.
    Interactive,
    /// Everything finished loading.
    Complete,
}

/// Keyboard keys the components react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Enter,
    Space,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value to a [`Key`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Enter" => Key::Enter,
            " " => Key::Space,
            _ => Key::Other,
        }
    }
}

/// Whether an event keeps bubbling after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    inner_html: Option<String>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
            text: None,
            inner_html: None,
        }
    }
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// An HTML document held in memory.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    ready_state: ReadyState,
    path: String,
}

impl Document {
    /// A fully parsed document served at `path` (the URL pathname).
    pub fn new(path: &str) -> Self {
        let mut doc = Self {
            nodes: vec![Node::new("html")],
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            ready_state: ReadyState::Complete,
            path: path.to_string(),
        };
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// A document whose structural content is still being parsed.
    pub fn parsing(path: &str) -> Self {
        let mut doc = Self::new(path);
        doc.ready_state = ReadyState::Loading;
        doc
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // =========================================================================
    // Tree structure
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    /// Append `child` as the last child of `parent`, moving it if it already
    /// has a parent.
    ///
    /// Appending a node into itself or its own subtree is refused and leaves
    /// the tree unchanged, so the tree stays acyclic.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.contains(child, parent) {
            tracing::warn!(?parent, ?child, "refusing to append a node into its own subtree");
            return;
        }
        self.remove(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detach `node` from its parent. Detached nodes keep their subtree.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.ancestry(node).last() == Some(&self.root)
    }

    /// `node` followed by each of its ancestors, innermost first.
    pub fn ancestry(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestry(node).contains(&ancestor)
    }

    /// The innermost element in `node`'s ancestry (itself included) matching
    /// `predicate`, like `Element.closest`.
    pub fn closest(
        &self,
        node: NodeId,
        predicate: impl Fn(&Document, NodeId) -> bool,
    ) -> Option<NodeId> {
        self.ancestry(node)
            .into_iter()
            .find(|candidate| predicate(self, *candidate))
    }

    /// All connected elements matching `predicate`, in document order.
    pub fn query_all(&self, predicate: impl Fn(&Document, NodeId) -> bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if predicate(self, node) {
                found.push(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
        found
    }

    /// Connected elements whose `name` attribute equals `value`.
    pub fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<NodeId> {
        self.query_all(|doc, node| doc.attribute(node, name) == Some(value))
    }

    /// First connected element with the given `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements_with_attribute("id", id).into_iter().next()
    }

    // =========================================================================
    // Attributes, classes, styles
    // =========================================================================

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.into());
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attributes.remove(name);
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.nodes[node.0].attributes.contains_key(name)
    }

    /// Read a `data-*` attribute by its hyphenated key (`page-size` reads
    /// `data-page-size`).
    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.attribute(node, &format!("data-{key}"))
    }

    pub fn set_data(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        self.set_attribute(node, &format!("data-{key}"), value);
    }

    /// Toggle the boolean `disabled` attribute.
    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if disabled {
            self.set_attribute(node, "disabled", "");
        } else {
            self.remove_attribute(node, "disabled");
        }
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attribute(node, "disabled")
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        self.nodes[node.0]
            .styles
            .insert(property.to_string(), value.into());
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].styles.get(property).map(String::as_str)
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace the element's content with plain text, like `textContent = ...`.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.clear_content(node);
        self.nodes[node.0].text = Some(text.into());
    }

    /// The element's own text, if it was set with [`Document::set_text`].
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    /// Replace the element's content with pre-rendered markup, like
    /// `innerHTML = ...`. The markup is trusted and emitted verbatim.
    pub fn set_inner_html(&mut self, node: NodeId, markup: impl Into<String>) {
        self.clear_content(node);
        self.nodes[node.0].inner_html = Some(markup.into());
    }

    pub fn inner_html(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].inner_html.as_deref()
    }

    fn clear_content(&mut self, node: NodeId) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        self.nodes[node.0].text = None;
        self.nodes[node.0].inner_html = None;
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize `node` and its subtree.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serialize the whole document, doctype included.
    pub fn render(&self) -> String {
        format!("<!DOCTYPE html>{}", self.outer_html(self.root))
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let n = &self.nodes[node.0];
        out.push('<');
        out.push_str(&n.tag);
        if !n.classes.is_empty() {
            out.push_str(&format!(r#" class="{}""#, escape(&n.classes.join(" "))));
        }
        for (name, value) in &n.attributes {
            if value.is_empty() {
                out.push_str(&format!(" {name}"));
            } else {
                out.push_str(&format!(r#" {name}="{}""#, escape(value)));
            }
        }
        if !n.styles.is_empty() {
            let style: Vec<String> = n
                .styles
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect();
            out.push_str(&format!(r#" style="{}""#, escape(&style.join("; "))));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&n.tag.as_str()) {
            return;
        }
        if let Some(text) = &n.text {
            out.push_str(&escape(text));
        }
        if let Some(markup) = &n.inner_html {
            out.push_str(markup);
        }
        for child in &n.children {
            self.write_node(*child, out);
        }
        out.push_str(&format!("</{}>", n.tag));
    }
}

/// HTML-escape text through Maud's renderer.
pub fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_list() -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new("/");
        let list = doc.create_element("ul");
        doc.set_attribute(list, "id", "list");
        doc.append_child(doc.body(), list);
        let items: Vec<NodeId> = (0..3)
            .map(|i| {
                let li = doc.create_element("li");
                doc.set_data(li, "n", i.to_string());
                doc.append_child(list, li);
                li
            })
            .collect();
        (doc, list, items)
    }

    #[test]
    fn append_into_own_subtree_is_refused() {
        let (mut doc, list, items) = doc_with_list();
        let body = doc.body();

        doc.append_child(items[0], list);
        doc.append_child(list, list);
        assert_eq!(doc.parent(list), Some(body));
        assert_eq!(doc.children(list), items.as_slice());
        assert_eq!(doc.ancestry(items[0]), vec![items[0], list, body, doc.root()]);
    }

    #[test]
    fn new_document_has_head_and_body() {
        let doc = Document::new("/index.html");
        assert_eq!(doc.tag(doc.root()), "html");
        assert_eq!(doc.children(doc.root()), &[doc.head(), doc.body()]);
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert_eq!(doc.path(), "/index.html");
    }

    #[test]
    fn parsing_document_starts_loading() {
        let doc = Document::parsing("/");
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn query_all_returns_document_order() {
        let (mut doc, list, items) = doc_with_list();
        // Nested element inside the first item comes before the second item
        let nested = doc.create_element("span");
        doc.set_data(nested, "n", "nested");
        doc.append_child(items[0], nested);

        let found = doc.query_all(|d, n| d.data(n, "n").is_some());
        assert_eq!(found, vec![items[0], nested, items[1], items[2]]);
        assert_eq!(doc.get_element_by_id("list"), Some(list));
    }

    #[test]
    fn removed_nodes_are_invisible_to_lookups() {
        let (mut doc, list, items) = doc_with_list();
        doc.remove(items[1]);

        assert!(!doc.is_connected(items[1]));
        assert_eq!(doc.data(items[1], "n"), Some("1"));
        let found = doc.query_all(|d, n| d.data(n, "n").is_some());
        assert_eq!(found, vec![items[0], items[2]]);

        doc.remove(list);
        assert_eq!(doc.get_element_by_id("list"), None);
    }

    #[test]
    fn append_child_moves_existing_child() {
        let (mut doc, list, items) = doc_with_list();
        doc.append_child(list, items[0]);
        assert_eq!(doc.children(list), &[items[1], items[2], items[0]]);
    }

    #[test]
    fn closest_includes_self_and_ancestors() {
        let (doc, list, items) = doc_with_list();
        assert_eq!(
            doc.closest(items[2], |d, n| d.tag(n) == "li"),
            Some(items[2])
        );
        assert_eq!(doc.closest(items[2], |d, n| d.tag(n) == "ul"), Some(list));
        assert_eq!(doc.closest(items[2], |d, n| d.tag(n) == "table"), None);
        assert!(doc.contains(list, items[1]));
        assert!(!doc.contains(items[0], items[1]));
    }

    #[test]
    fn classes_are_deduplicated() {
        let (mut doc, list, _) = doc_with_list();
        doc.add_class(list, "open");
        doc.add_class(list, "open");
        assert!(doc.has_class(list, "open"));
        assert!(doc.outer_html(list).starts_with(r#"<ul class="open" id="list">"#));
        doc.remove_class(list, "open");
        assert!(!doc.has_class(list, "open"));
    }

    #[test]
    fn set_inner_html_detaches_children() {
        let (mut doc, list, items) = doc_with_list();
        doc.set_inner_html(list, "<li>raw</li>");
        assert!(doc.children(list).is_empty());
        assert!(!doc.is_connected(items[0]));
        assert_eq!(doc.outer_html(list), r#"<ul id="list"><li>raw</li></ul>"#);
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut doc = Document::new("/");
        let p = doc.create_element("p");
        doc.set_attribute(p, "title", r#"say "hi""#);
        doc.set_text(p, "<img src=x>");
        let html = doc.outer_html(p);
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains("&quot;hi&quot;"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn void_elements_and_boolean_attributes() {
        let mut doc = Document::new("/");
        let img = doc.create_element("img");
        doc.set_attribute(img, "src", "a.jpg");
        let button = doc.create_element("button");
        doc.set_disabled(button, true);
        doc.set_style(button, "opacity", "0.75");

        assert_eq!(doc.outer_html(img), r#"<img src="a.jpg">"#);
        assert_eq!(
            doc.outer_html(button),
            r#"<button disabled style="opacity: 0.75"></button>"#
        );
        assert!(doc.is_disabled(button));
        doc.set_disabled(button, false);
        assert!(!doc.is_disabled(button));
    }

    #[test]
    fn render_includes_doctype() {
        let doc = Document::new("/");
        assert_eq!(
            doc.render(),
            "<!DOCTYPE html><html><head></head><body></body></html>"
        );
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("Tab"), Key::Other);
    }
}
