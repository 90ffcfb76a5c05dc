//! Element base contract and the child extraction / cardinality engine.
//!
//! Every protocol element fixes its namespace URI and local name at the type
//! level. Decoding a node under the wrong qualified name is always a
//! `SchemaViolation` — an element in the wrong namespace is a different,
//! unrecognized construct, never coerced.

use crate::error::{SamlError, SamlResult};
use crate::xml::Node;

/// A qualified XML name: namespace URI plus local name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QName {
    pub namespace: &'static str,
    pub local_name: &'static str,
}

impl QName {
    pub const fn new(namespace: &'static str, local_name: &'static str) -> Self {
        QName {
            namespace,
            local_name,
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        node.is(self.namespace, self.local_name)
    }
}

/// Contract implemented by every SAML element type.
pub trait SamlElement: Sized {
    const NAMESPACE: &'static str;
    const LOCAL_NAME: &'static str;

    /// Decode this element from an infoset node. Tag identity is validated
    /// first; attributes and children follow the type's own rules.
    fn from_node(node: &Node) -> SamlResult<Self>;

    /// Build a standalone infoset node for this element.
    fn build(&self) -> SamlResult<Node>;

    fn qname() -> QName {
        QName::new(Self::NAMESPACE, Self::LOCAL_NAME)
    }

    /// Validate tag identity, the first step of every decode.
    fn expect_qname(node: &Node) -> SamlResult<()> {
        if Self::qname().matches(node) {
            Ok(())
        } else {
            Err(SamlError::schema(format!(
                "expected {{{}}}{}, found {{{}}}{}",
                Self::NAMESPACE,
                Self::LOCAL_NAME,
                node.namespace().unwrap_or(""),
                node.local_name(),
            )))
        }
    }

    /// Build this element and append it under `parent`.
    ///
    /// Top-level protocol messages override this to fail with
    /// `InvalidState`: a message always builds a fresh root.
    fn append_to(&self, parent: &mut Node) -> SamlResult<()> {
        parent.append_element(self.build()?);
        Ok(())
    }
}

/// All immediate children of `parent` matching `T`, decoded in document
/// order. Foreign children are ignored (schema extension points).
pub fn children_of<T: SamlElement>(parent: &Node) -> SamlResult<Vec<T>> {
    parent
        .child_elements()
        .filter(|c| T::qname().matches(c))
        .map(T::from_node)
        .collect()
}

/// Exactly one matching child; zero or several is a `SchemaViolation`.
pub fn exactly_one<T: SamlElement>(parent: &Node) -> SamlResult<T> {
    let mut found = children_of::<T>(parent)?;
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(SamlError::schema(format!(
            "missing mandatory <{}> in <{}>",
            T::LOCAL_NAME,
            parent.local_name(),
        ))),
        n => Err(SamlError::schema(format!(
            "exactly one <{}> is allowed in <{}>, found {n}",
            T::LOCAL_NAME,
            parent.local_name(),
        ))),
    }
}

/// At most one matching child; several is a `SchemaViolation`.
pub fn at_most_one<T: SamlElement>(parent: &Node) -> SamlResult<Option<T>> {
    let mut found = children_of::<T>(parent)?;
    match found.len() {
        0 => Ok(None),
        1 => Ok(Some(found.remove(0))),
        n => Err(SamlError::schema(format!(
            "at most one <{}> is allowed in <{}>, found {n}",
            T::LOCAL_NAME,
            parent.local_name(),
        ))),
    }
}

/// At least one matching child; none is a `SchemaViolation`.
pub fn at_least_one<T: SamlElement>(parent: &Node) -> SamlResult<Vec<T>> {
    let found = children_of::<T>(parent)?;
    if found.is_empty() {
        return Err(SamlError::schema(format!(
            "at least one <{}> must be present in <{}>",
            T::LOCAL_NAME,
            parent.local_name(),
        )));
    }
    Ok(found)
}

/// Read a mandatory attribute; absence is a `SchemaViolation`.
pub fn require_attr(node: &Node, name: &str) -> SamlResult<String> {
    node.attribute(name).map(str::to_owned).ok_or_else(|| {
        SamlError::schema(format!(
            "missing mandatory {name} attribute on <{}>",
            node.local_name(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns;

    #[derive(Debug, PartialEq)]
    struct Marker {
        value: String,
    }

    impl SamlElement for Marker {
        const NAMESPACE: &'static str = ns::SAMLP;
        const LOCAL_NAME: &'static str = "Marker";

        fn from_node(node: &Node) -> SamlResult<Self> {
            Self::expect_qname(node)?;
            Ok(Marker { value: node.text() })
        }

        fn build(&self) -> SamlResult<Node> {
            let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
            node.append_text(&self.value);
            Ok(node)
        }
    }

    fn parent_with(markers: &[&str]) -> Node {
        let mut parent = Node::new(ns::SAMLP, "Parent");
        for value in markers {
            let mut child = Node::new(ns::SAMLP, "Marker");
            child.append_text(*value);
            parent.append_element(child);
        }
        // A foreign sibling the engine must ignore.
        parent.append_element(Node::new(ns::SAML, "Marker"));
        parent
    }

    #[test]
    fn extraction_preserves_document_order() {
        let parent = parent_with(&["a", "b", "c"]);
        let found = children_of::<Marker>(&parent).unwrap();
        let values: Vec<_> = found.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, ["a", "b", "c"]);
    }

    #[test]
    fn wrong_namespace_is_not_a_match() {
        let parent = parent_with(&[]);
        assert!(children_of::<Marker>(&parent).unwrap().is_empty());
    }

    #[test]
    fn exactly_one_rejects_zero_and_several() {
        assert!(matches!(
            exactly_one::<Marker>(&parent_with(&[])),
            Err(SamlError::SchemaViolation(_))
        ));
        assert!(matches!(
            exactly_one::<Marker>(&parent_with(&["a", "b"])),
            Err(SamlError::SchemaViolation(_))
        ));
        assert_eq!(
            exactly_one::<Marker>(&parent_with(&["a"])).unwrap().value,
            "a"
        );
    }

    #[test]
    fn at_most_one_allows_absence() {
        assert!(at_most_one::<Marker>(&parent_with(&[])).unwrap().is_none());
        assert!(matches!(
            at_most_one::<Marker>(&parent_with(&["a", "b"])),
            Err(SamlError::SchemaViolation(_))
        ));
    }

    #[test]
    fn at_least_one_rejects_absence() {
        assert!(matches!(
            at_least_one::<Marker>(&parent_with(&[])),
            Err(SamlError::SchemaViolation(_))
        ));
        assert_eq!(at_least_one::<Marker>(&parent_with(&["a"])).unwrap().len(), 1);
    }

    #[test]
    fn require_attr_reports_schema_violation() {
        let parent = parent_with(&[]);
        assert!(matches!(
            require_attr(&parent, "ID"),
            Err(SamlError::SchemaViolation(_))
        ));
    }
}
