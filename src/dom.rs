//! Host page model and DOM helpers
//!
//! `Page` stands in for a browser tab: a live, mutable HTML document plus the
//! session history behind it. The rest of this module is small tree
//! utilities over `kuchikikiki` nodes (deep cloning, class tokens, inline
//! style declarations) that the pipeline shares.

use kuchikikiki::traits::*;
use kuchikikiki::{parse_html, NodeData, NodeRef};
use tracing::debug;

/// A loaded page: the live document and the history entries behind it
pub struct Page {
    document: NodeRef,
    /// Markup of each history entry; the last one is the current entry
    entries: Vec<String>,
    generation: u64,
}

impl Page {
    /// Load a page with no prior history
    pub fn parse(markup: &str) -> Self {
        Self::with_history(vec![markup.to_string()])
    }

    /// Load the last of several history entries
    pub fn with_history(mut entries: Vec<String>) -> Self {
        if entries.is_empty() {
            entries.push(String::new());
        }
        let current = entries.last().map(String::as_str).unwrap_or_default();
        let document = parse_html().one(current);
        Self {
            document,
            entries,
            generation: 0,
        }
    }

    /// Adopt an already-built document tree
    ///
    /// Unlike `parse`, the tree is taken as-is and may lack `<html>` or
    /// `<body>` entirely.
    pub fn from_document(document: NodeRef) -> Self {
        let entries = vec![document.to_string()];
        Self {
            document,
            entries,
            generation: 0,
        }
    }

    /// The live document node
    pub fn document(&self) -> &NodeRef {
        &self.document
    }

    /// The document element (`<html>`), if any
    pub fn root_element(&self) -> Option<NodeRef> {
        self.document
            .children()
            .elements()
            .next()
            .map(|el| el.as_node().clone())
    }

    /// The `<body>` element, if any
    pub fn body(&self) -> Option<NodeRef> {
        self.document
            .select_first("body")
            .ok()
            .map(|body| body.as_node().clone())
    }

    /// Trimmed text of the `<title>` element, empty when there is none
    pub fn title(&self) -> String {
        self.document
            .select_first("title")
            .map(|title| title.as_node().text_contents().trim().to_string())
            .unwrap_or_default()
    }

    /// Swap the whole document for new markup
    ///
    /// This rewrites the current entry's live document in place; history is
    /// untouched, so a reload brings the original entry back.
    pub fn replace_document(&mut self, markup: &str) {
        debug!("Replacing document ({} bytes)", markup.len());
        self.document = parse_html().one(markup);
        self.generation += 1;
    }

    /// Number of entries in session history, the current one included
    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Navigate to the previous history entry
    ///
    /// Returns false, leaving the page untouched, when there is none.
    pub fn go_back(&mut self) -> bool {
        if self.entries.len() < 2 {
            return false;
        }
        self.entries.pop();
        debug!("Navigating back, {} entries remain", self.entries.len());
        self.load_current();
        true
    }

    /// Reload the current history entry from its original markup
    pub fn reload(&mut self) {
        debug!("Reloading current entry");
        self.load_current();
    }

    /// Counter bumped by every document load; a surface built at one
    /// generation is gone once this moves on
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Serialize the live document
    pub fn to_html(&self) -> String {
        self.document.to_string()
    }

    fn load_current(&mut self) {
        let current = self.entries.last().map(String::as_str).unwrap_or_default();
        self.document = parse_html().one(current);
        self.generation += 1;
    }
}

/// `cloneNode(true)`: a copy of `node` and its subtree sharing nothing with it
pub fn deep_clone(node: &NodeRef) -> NodeRef {
    let copy = NodeRef::new(node.data().clone());
    for child in node.children() {
        copy.append(deep_clone(&child));
    }
    copy
}

/// Parse a markup fragment in body context and return its top-level nodes,
/// detached and ready to be appended elsewhere
pub fn nodes_from_markup(markup: &str) -> Vec<NodeRef> {
    let document = parse_html().one(format!("<body>{}</body>", markup));
    let Ok(body) = document.select_first("body") else {
        return Vec::new();
    };
    let nodes: Vec<NodeRef> = body.as_node().children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// Build a single element from markup such as `<div class="x"></div>`
///
/// Markup that yields no node gives an empty document fragment.
pub fn element_from_markup(markup: &str) -> NodeRef {
    nodes_from_markup(markup)
        .into_iter()
        .find(|node| node.as_element().is_some())
        .unwrap_or_else(|| NodeRef::new(NodeData::DocumentFragment))
}

/// Serialized markup of the children of `node`
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Whether `node` is an element with one of the given local names
pub fn is_element_named(node: &NodeRef, names: &[&str]) -> bool {
    node.as_element()
        .map_or(false, |el| names.contains(&&*el.name.local))
}

/// Whether `node` has any element children
pub fn has_element_children(node: &NodeRef) -> bool {
    node.children().any(|child| child.as_element().is_some())
}

/// Value of an attribute on an element node
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    let el = node.as_element()?;
    let attrs = el.attributes.borrow();
    attrs.get(name).map(str::to_string)
}

/// Set an attribute on an element node
pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    if let Some(el) = node.as_element() {
        el.attributes.borrow_mut().insert(name, value.to_string());
    }
}

/// Whitespace-separated tokens of the `class` attribute
pub fn class_tokens(node: &NodeRef) -> Vec<String> {
    attr(node, "class")
        .map(|classes| classes.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Whether the element carries the class token
pub fn has_class(node: &NodeRef, class: &str) -> bool {
    class_tokens(node).iter().any(|token| token == class)
}

/// Add a class token, keeping existing ones in order
pub fn add_class(node: &NodeRef, class: &str) {
    let mut tokens = class_tokens(node);
    if !tokens.iter().any(|token| token == class) {
        tokens.push(class.to_string());
        set_attr(node, "class", &tokens.join(" "));
    }
}

/// Remove a class token if present
pub fn remove_class(node: &NodeRef, class: &str) {
    let tokens = class_tokens(node);
    if tokens.iter().any(|token| token == class) {
        let kept: Vec<String> = tokens.into_iter().filter(|token| token != class).collect();
        set_attr(node, "class", &kept.join(" "));
    }
}

/// Flip a class token; returns whether it is present afterwards
pub fn toggle_class(node: &NodeRef, class: &str) -> bool {
    if has_class(node, class) {
        remove_class(node, class);
        false
    } else {
        add_class(node, class);
        true
    }
}

fn style_declarations(node: &NodeRef) -> Vec<(String, String)> {
    attr(node, "style")
        .map(|style| {
            style
                .split(';')
                .filter_map(|decl| {
                    let (name, value) = decl.split_once(':')?;
                    let name = name.trim();
                    if name.is_empty() {
                        return None;
                    }
                    Some((name.to_string(), value.trim().to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

fn write_style_declarations(node: &NodeRef, decls: &[(String, String)]) {
    let Some(el) = node.as_element() else {
        return;
    };
    let mut attrs = el.attributes.borrow_mut();
    if decls.is_empty() {
        attrs.remove("style");
    } else {
        let style = decls
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        attrs.insert("style", style);
    }
}

/// Value of one inline style declaration
pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    style_declarations(node)
        .into_iter()
        .find(|(name, _)| name == property)
        .map(|(_, value)| value)
}

/// Set one inline style declaration, replacing an earlier value
pub fn set_style_property(node: &NodeRef, property: &str, value: &str) {
    let mut decls = style_declarations(node);
    match decls.iter_mut().find(|(name, _)| name == property) {
        Some(decl) => decl.1 = value.to_string(),
        None => decls.push((property.to_string(), value.to_string())),
    }
    write_style_declarations(node, &decls);
}

/// Drop one inline style declaration; the attribute goes when it empties
pub fn remove_style_property(node: &NodeRef, property: &str) {
    let mut decls = style_declarations(node);
    let before = decls.len();
    decls.retain(|(name, _)| name != property);
    if decls.len() != before {
        write_style_declarations(node, &decls);
    }
}
