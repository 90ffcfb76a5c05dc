//! `samlp:SessionIndex` — a session handle carried by logout requests.

use crate::element::SamlElement;
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// A non-empty session index string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIndex(String);

impl SessionIndex {
    pub fn new(value: impl Into<String>) -> SamlResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(SamlError::malformed("SessionIndex must not be empty"));
        }
        Ok(SessionIndex(value))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl SamlElement for SessionIndex {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "SessionIndex";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        SessionIndex::new(node.text())
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.append_text(&self.0);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let index = SessionIndex::new("_abc123").unwrap();
        assert_eq!(SessionIndex::from_node(&index.build().unwrap()).unwrap(), index);
    }

    #[test]
    fn empty_value_is_malformed() {
        assert!(matches!(
            SessionIndex::new(""),
            Err(SamlError::MalformedValue(_))
        ));
        let node = Node::new(ns::SAMLP, "SessionIndex");
        assert!(matches!(
            SessionIndex::from_node(&node),
            Err(SamlError::MalformedValue(_))
        ));
    }
}
