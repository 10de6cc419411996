//! In-memory HTML document tree.
//!
//! The page is parsed once into an arena of nodes addressed by [`NodeId`].
//! Binders mutate the tree through the methods on [`Document`] and the
//! result is serialized back to HTML with [`Document::to_html`].
//!
//! # Architecture
//!
//! - `parse`: tolerant HTML tokenizer and tree builder
//! - `selector`: CSS selector subset used to locate anchors
//! - `serialize`: HTML output with text and attribute escaping

mod parse;
mod selector;
mod serialize;

pub use selector::{SelectorError, SelectorList};

use tracing::warn;

/// Handle to a node stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// An element's tag name and attributes, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Elements that never have children or an end tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is emitted without entity handling.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// An HTML document held as an arena of nodes.
///
/// Nodes removed from the tree stay in the arena (detached) until the
/// document is dropped; a page is hydrated once and thrown away, so the
/// arena never needs compaction.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse a complete HTML page.
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        parse::parse_into(&mut doc, root, html);
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The first element child of the root (normally `<html>`).
    pub fn document_element(&self) -> Option<NodeId> {
        self.element_children(self.root()).next()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
    }

    /// All nodes below `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    // ==================== Construction ====================

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Create a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push_node(NodeKind::Element(Element {
            name: name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node. The text is stored verbatim and escaped
    /// on serialization.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    pub(crate) fn create_comment(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Comment(text.to_string()))
    }

    pub(crate) fn create_doctype(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Doctype(text.to_string()))
    }

    pub(crate) fn create_element_with_attrs(
        &mut self,
        name: &str,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        self.push_node(NodeKind::Element(Element {
            name: name.to_ascii_lowercase(),
            attrs,
        }))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove `id` from its parent. The node and its subtree stay usable.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    // ==================== Attributes ====================

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute, replacing an existing value in place. No-op on
    /// non-element nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        match el.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Set one declaration inside the `style` attribute, keeping the others.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attr(id, "style")
            .unwrap_or("")
            .split(';')
            .filter_map(|decl| {
                let (k, v) = decl.split_once(':')?;
                Some((k.trim().to_string(), v.trim().to_string()))
            })
            .filter(|(k, _)| !k.is_empty())
            .collect();

        match declarations.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(property)) {
            Some((_, v)) => *v = value.to_string(),
            None => declarations.push((property.to_string(), value.to_string())),
        }

        let style = declarations
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr(id, "style", &style);
    }

    // ==================== Content ====================

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => text.clone(),
            _ => self
                .descendants(id)
                .into_iter()
                .filter_map(|d| match &self.nodes[d.0].kind {
                    NodeKind::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Replace every child of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(existing) = &mut self.nodes[id.0].kind {
            *existing = text.to_string();
            return;
        }
        self.clear_children(id);
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    /// Replace every child of `id` with the nodes parsed from `html`.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        self.clear_children(id);
        parse::parse_into(self, id, html);
    }

    // ==================== Queries ====================

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    /// First element below `scope` matching `selectors`.
    pub fn query_selector(&self, scope: NodeId, selectors: &str) -> Option<NodeId> {
        let list = self.parse_selectors(selectors)?;
        self.descendants(scope)
            .into_iter()
            .find(|node| list.matches(self, *node))
    }

    /// Every element below `scope` matching `selectors`, in document order.
    ///
    /// An unparseable selector is logged and matches nothing.
    pub fn query_selector_all(&self, scope: NodeId, selectors: &str) -> Vec<NodeId> {
        let Some(list) = self.parse_selectors(selectors) else {
            return Vec::new();
        };
        self.descendants(scope)
            .into_iter()
            .filter(|node| list.matches(self, *node))
            .collect()
    }

    /// Shorthand for `query_selector(root, ..)`.
    pub fn select(&self, selectors: &str) -> Option<NodeId> {
        self.query_selector(self.root(), selectors)
    }

    /// Shorthand for `query_selector_all(root, ..)`.
    pub fn select_all(&self, selectors: &str) -> Vec<NodeId> {
        self.query_selector_all(self.root(), selectors)
    }

    fn parse_selectors(&self, selectors: &str) -> Option<SelectorList> {
        match SelectorList::parse(selectors) {
            Ok(list) => Some(list),
            Err(e) => {
                warn!("Ignoring invalid selector '{}': {}", selectors, e);
                None
            }
        }
    }

    // ==================== Output ====================

    pub fn to_html(&self) -> String {
        serialize::inner_html(self, self.root())
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        serialize::inner_html(self, id)
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::outer_html(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="pt">
<head><title>Portfolio</title></head>
<body>
  <ul id="credentialsList"><li class="credential-item">Static</li></ul>
  <p class="contact__subtitle">Fale comigo</p>
  <div class="education__progress-bar" style="background: red; width: 10%"></div>
</body>
</html>"#;

    #[test]
    fn test_document_element_is_html() {
        let doc = Document::parse(PAGE);
        let html = doc.document_element().expect("html element");
        assert_eq!(doc.tag_name(html), Some("html"));
        assert_eq!(doc.attr(html, "lang"), Some("pt"));
    }

    #[test]
    fn test_get_element_by_id() {
        let doc = Document::parse(PAGE);
        let list = doc.get_element_by_id("credentialsList").expect("list");
        assert_eq!(doc.tag_name(list), Some("ul"));
        assert!(doc.get_element_by_id("missing").is_none());
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = Document::parse(PAGE);
        let list = doc.get_element_by_id("credentialsList").unwrap();
        doc.set_text_content(list, "plain");
        assert_eq!(doc.inner_html(list), "plain");
        assert_eq!(doc.text_content(list), "plain");
    }

    #[test]
    fn test_set_text_content_empty_clears() {
        let mut doc = Document::parse(PAGE);
        let list = doc.get_element_by_id("credentialsList").unwrap();
        doc.set_text_content(list, "");
        assert!(doc.children(list).is_empty());
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut doc = Document::parse(PAGE);
        let html = doc.document_element().unwrap();
        doc.set_attr(html, "lang", "en");
        assert_eq!(doc.attr(html, "lang"), Some("en"));
        assert_eq!(doc.element(html).unwrap().attrs.len(), 1);
    }

    #[test]
    fn test_has_class() {
        let doc = Document::parse(PAGE);
        let p = doc.select("p").unwrap();
        assert!(doc.has_class(p, "contact__subtitle"));
        assert!(!doc.has_class(p, "contact"));
    }

    #[test]
    fn test_set_style_property_keeps_other_declarations() {
        let mut doc = Document::parse(PAGE);
        let bar = doc.select(".education__progress-bar").unwrap();
        doc.set_style_property(bar, "width", "50%");
        assert_eq!(doc.attr(bar, "style"), Some("background: red; width: 50%"));
    }

    #[test]
    fn test_set_style_property_on_unstyled_element() {
        let mut doc = Document::parse("<div></div>");
        let div = doc.select("div").unwrap();
        doc.set_style_property(div, "width", "33%");
        assert_eq!(doc.attr(div, "style"), Some("width: 33%"));
    }

    #[test]
    fn test_append_child_moves_node() {
        let mut doc = Document::parse("<div id=\"a\"><span>x</span></div><div id=\"b\"></div>");
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        let span = doc.select("span").unwrap();
        doc.append_child(b, span);
        assert_eq!(doc.inner_html(a), "");
        assert_eq!(doc.inner_html(b), "<span>x</span>");
        assert_eq!(doc.parent(span), Some(b));
    }

    #[test]
    fn test_set_inner_html_parses_markup() {
        let mut doc = Document::parse("<p id=\"t\">old</p>");
        let p = doc.get_element_by_id("t").unwrap();
        doc.set_inner_html(p, "Hello <strong>world</strong>");
        assert_eq!(doc.text_content(p), "Hello world");
        assert!(doc.query_selector(p, "strong").is_some());
    }

    #[test]
    fn test_invalid_selector_matches_nothing() {
        let doc = Document::parse(PAGE);
        assert!(doc.select_all("p[").is_empty());
        assert!(doc.select("::").is_none());
    }

    #[test]
    fn test_detached_nodes_not_queryable() {
        let mut doc = Document::parse(PAGE);
        let list = doc.get_element_by_id("credentialsList").unwrap();
        doc.clear_children(list);
        assert!(doc.select(".credential-item").is_none());
    }
}
