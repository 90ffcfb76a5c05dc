//! Owned DOM-like element tree with namespace-aware parsing and
//! deterministic serialization.
//!
//! Prefixes are resolved away on parse; an element carries only its namespace
//! URI and local name. Serialization re-assigns prefixes deterministically
//! (`samlp`, `saml`, `ds`, `xenc` for the well-known namespaces, generated
//! `nsN` otherwise), declaring each namespace at the outermost element that
//! uses it. Identical trees therefore always produce identical bytes, which
//! the signature layer depends on.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::error::{SamlError, SamlResult};
use crate::ns;

/// A single node in the infoset tree: namespace, local name, attributes and
/// children, all in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    children: Vec<NodeContent>,
}

/// Element content in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    Element(Node),
    Text(String),
}

impl Node {
    /// Create an element in the given namespace.
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Node {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an element with no namespace.
    pub fn unqualified(local_name: impl Into<String>) -> Self {
        Node {
            namespace: None,
            local_name: local_name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Whether this element has the given namespace URI and local name.
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn append_element(&mut self, child: Node) {
        self.children.push(NodeContent::Element(child));
    }

    pub fn append_text(&mut self, text: impl Into<String>) {
        self.children.push(NodeContent::Text(text.into()));
    }

    /// Insert a child element at the given position among all children.
    pub fn insert_element(&mut self, index: usize, child: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, NodeContent::Element(child));
    }

    pub fn children(&self) -> &[NodeContent] {
        &self.children
    }

    /// Immediate child elements in document order; text is skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter_map(|c| match c {
            NodeContent::Element(e) => Some(e),
            NodeContent::Text(_) => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let NodeContent::Text(t) = child {
                out.push_str(t);
            }
        }
        out
    }

    /// First child element matching the qualified name.
    pub fn find_child(&self, namespace: &str, local_name: &str) -> Option<&Node> {
        self.child_elements().find(|c| c.is(namespace, local_name))
    }

    /// Mutable variant of [`Node::find_child`].
    pub fn find_child_mut(&mut self, namespace: &str, local_name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find_map(|c| match c {
            NodeContent::Element(e) if e.is(namespace, local_name) => Some(e),
            _ => None,
        })
    }

    /// Position of the first matching child element within all children.
    pub fn position_of_child(&self, namespace: &str, local_name: &str) -> Option<usize> {
        self.children.iter().position(|c| match c {
            NodeContent::Element(e) => e.is(namespace, local_name),
            NodeContent::Text(_) => false,
        })
    }

    /// Remove and return the first matching child element.
    pub fn remove_child(&mut self, namespace: &str, local_name: &str) -> Option<Node> {
        let index = self.position_of_child(namespace, local_name)?;
        match self.children.remove(index) {
            NodeContent::Element(e) => Some(e),
            NodeContent::Text(_) => None,
        }
    }

    /// Parse a document and return its root element.
    ///
    /// Prefixes are resolved to namespace URIs, whitespace-only text nodes
    /// (indentation between elements) are dropped, all other text is kept
    /// verbatim, comments and processing instructions are ignored.
    pub fn parse(input: &str) -> SamlResult<Self> {
        let mut reader = NsReader::from_str(input);

        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;

        loop {
            match reader.read_resolved_event()? {
                (resolved, Event::Start(e)) => {
                    let node = element_from_event(resolved, &e)?;
                    stack.push(node);
                }
                (resolved, Event::Empty(e)) => {
                    let node = element_from_event(resolved, &e)?;
                    attach(node, &mut stack, &mut root);
                }
                (_, Event::End(_)) => {
                    if let Some(node) = stack.pop() {
                        attach(node, &mut stack, &mut root);
                    }
                }
                (_, Event::Text(t)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = t.unescape().map_err(quick_xml::Error::from)?;
                        if !text.trim().is_empty() {
                            parent.append_text(text.into_owned());
                        }
                    }
                }
                (_, Event::CData(t)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.append_text(String::from_utf8_lossy(&t.into_inner()).into_owned());
                    }
                }
                (_, Event::Eof) => break,
                _ => {}
            }
        }

        root.ok_or_else(|| SamlError::malformed("document contains no root element"))
    }

    /// Parse a byte buffer (must be UTF-8) and return the root element.
    pub fn parse_bytes(input: &[u8]) -> SamlResult<Self> {
        let text = std::str::from_utf8(input)
            .map_err(|e| SamlError::malformed(format!("document is not UTF-8: {e}")))?;
        Self::parse(text)
    }

    /// Serialize this subtree. Deterministic: identical trees produce
    /// identical bytes.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        let mut scope: Vec<(String, String)> = Vec::new();
        let mut generated = 0usize;
        self.write_into(&mut out, &mut scope, &mut generated);
        out
    }

    /// Serialize as a standalone document with an XML declaration.
    pub fn to_document(&self) -> String {
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", self.to_xml())
    }

    fn write_into(
        &self,
        out: &mut String,
        scope: &mut Vec<(String, String)>,
        generated: &mut usize,
    ) {
        let mut declared = false;
        let tag = match &self.namespace {
            Some(uri) => {
                let prefix = match scope.iter().rev().find(|(_, n)| n == uri) {
                    Some((prefix, _)) => prefix.clone(),
                    None => {
                        let prefix = well_known_prefix(uri).map(str::to_owned).unwrap_or_else(|| {
                            *generated += 1;
                            format!("ns{generated}")
                        });
                        scope.push((prefix.clone(), uri.clone()));
                        declared = true;
                        prefix
                    }
                };
                format!("{prefix}:{}", self.local_name)
            }
            None => self.local_name.clone(),
        };

        out.push('<');
        out.push_str(&tag);
        if declared {
            if let (Some(uri), Some((prefix, _))) = (&self.namespace, scope.last()) {
                out.push_str(" xmlns:");
                out.push_str(prefix);
                out.push_str("=\"");
                out.push_str(&xml_escape(uri));
                out.push('"');
            }
        }
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&xml_escape(value));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            for child in &self.children {
                match child {
                    NodeContent::Element(e) => e.write_into(out, scope, generated),
                    NodeContent::Text(t) => out.push_str(&xml_escape(t)),
                }
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }

        if declared {
            scope.pop();
        }
    }
}

fn attach(node: Node, stack: &mut Vec<Node>, root: &mut Option<Node>) {
    match stack.last_mut() {
        Some(parent) => parent.append_element(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn element_from_event(
    resolved: ResolveResult,
    event: &quick_xml::events::BytesStart,
) -> SamlResult<Node> {
    let local_name = String::from_utf8_lossy(event.local_name().as_ref()).into_owned();
    let mut node = match resolved {
        ResolveResult::Bound(uri) => {
            Node::new(String::from_utf8_lossy(uri.0).into_owned(), local_name)
        }
        _ => Node::unqualified(local_name),
    };

    for attr in event.attributes().flatten() {
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        // SAML attributes are unqualified; keyed by local name.
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        node.set_attribute(name, value);
    }

    Ok(node)
}

fn well_known_prefix(namespace: &str) -> Option<&'static str> {
    match namespace {
        ns::SAMLP => Some("samlp"),
        ns::SAML => Some("saml"),
        ns::DSIG => Some("ds"),
        ns::XENC => Some("xenc"),
        _ => None,
    }
}

fn xml_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}
