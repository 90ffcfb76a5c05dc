//! `saml:Attribute` — a requested attribute with its values.

use crate::element::{children_of, require_attr, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// `saml:Attribute` as used by an attribute query: a name plus zero or more
/// string values. A query attribute with no values asks for every value the
/// responder holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    name_format: Option<String>,
    friendly_name: Option<String>,
    values: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> SamlResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SamlError::malformed("Attribute Name must not be empty"));
        }
        Ok(Attribute {
            name,
            name_format: None,
            friendly_name: None,
            values: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_name_format(mut self, format: impl Into<String>) -> Self {
        self.name_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_format(&self) -> Option<&str> {
        self.name_format.as_deref()
    }

    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl SamlElement for Attribute {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "Attribute";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let mut attribute = Attribute::new(require_attr(node, "Name")?)?;
        if let Some(v) = node.attribute("NameFormat") {
            attribute = attribute.with_name_format(v);
        }
        if let Some(v) = node.attribute("FriendlyName") {
            attribute = attribute.with_friendly_name(v);
        }
        let values = children_of::<AttributeValue>(node)?;
        Ok(attribute.with_values(values.into_iter().map(|v| v.0).collect()))
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.set_attribute("Name", &self.name);
        if let Some(v) = &self.name_format {
            node.set_attribute("NameFormat", v);
        }
        if let Some(v) = &self.friendly_name {
            node.set_attribute("FriendlyName", v);
        }
        for value in &self.values {
            AttributeValue(value.clone()).append_to(&mut node)?;
        }
        Ok(node)
    }
}

struct AttributeValue(String);

impl SamlElement for AttributeValue {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "AttributeValue";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        Ok(AttributeValue(node.text()))
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
    fn round_trips_with_values_in_order() {
        let attribute = Attribute::new("urn:oid:2.5.4.4")
            .unwrap()
            .with_name_format("urn:oasis:names:tc:SAML:2.0:attrname-format:uri")
            .with_friendly_name("sn")
            .with_values(vec!["first".into(), "second".into()]);
        let decoded = Attribute::from_node(&attribute.build().unwrap()).unwrap();
        assert_eq!(decoded, attribute);
    }

    #[test]
    fn missing_name_is_a_schema_violation() {
        let node = Node::new(ns::SAML, "Attribute");
        assert!(matches!(
            Attribute::from_node(&node),
            Err(SamlError::SchemaViolation(_))
        ));
    }
}
