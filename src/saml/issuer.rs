//! `saml:Issuer` — the entity that generated a protocol message.

use crate::element::SamlElement;
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// `saml:Issuer`. Carries the full NameIDType attribute set, though in
/// protocol messages it is almost always a bare entity ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    value: String,
    format: Option<String>,
    name_qualifier: Option<String>,
    sp_name_qualifier: Option<String>,
    sp_provided_id: Option<String>,
}

impl Issuer {
    pub fn new(value: impl Into<String>) -> SamlResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(SamlError::malformed("Issuer value must not be empty"));
        }
        Ok(Issuer {
            value,
            format: None,
            name_qualifier: None,
            sp_name_qualifier: None,
            sp_provided_id: None,
        })
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.name_qualifier = Some(qualifier.into());
        self
    }

    #[must_use]
    pub fn with_sp_name_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.sp_name_qualifier = Some(qualifier.into());
        self
    }

    #[must_use]
    pub fn with_sp_provided_id(mut self, id: impl Into<String>) -> Self {
        self.sp_provided_id = Some(id.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn name_qualifier(&self) -> Option<&str> {
        self.name_qualifier.as_deref()
    }

    pub fn sp_name_qualifier(&self) -> Option<&str> {
        self.sp_name_qualifier.as_deref()
    }

    pub fn sp_provided_id(&self) -> Option<&str> {
        self.sp_provided_id.as_deref()
    }
}

impl SamlElement for Issuer {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "Issuer";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let mut issuer = Issuer::new(node.text())?;
        if let Some(v) = node.attribute("Format") {
            issuer = issuer.with_format(v);
        }
        if let Some(v) = node.attribute("NameQualifier") {
            issuer = issuer.with_name_qualifier(v);
        }
        if let Some(v) = node.attribute("SPNameQualifier") {
            issuer = issuer.with_sp_name_qualifier(v);
        }
        if let Some(v) = node.attribute("SPProvidedID") {
            issuer = issuer.with_sp_provided_id(v);
        }
        Ok(issuer)
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        if let Some(v) = &self.format {
            node.set_attribute("Format", v);
        }
        if let Some(v) = &self.name_qualifier {
            node.set_attribute("NameQualifier", v);
        }
        if let Some(v) = &self.sp_name_qualifier {
            node.set_attribute("SPNameQualifier", v);
        }
        if let Some(v) = &self.sp_provided_id {
            node.set_attribute("SPProvidedID", v);
        }
        node.append_text(&self.value);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_attributes() {
        let issuer = Issuer::new("urn:example:issuer")
            .unwrap()
            .with_format(ns::NAMEID_FORMAT_ENTITY);
        let decoded = Issuer::from_node(&issuer.build().unwrap()).unwrap();
        assert_eq!(decoded, issuer);
    }

    #[test]
    fn rejects_empty_value() {
        assert!(matches!(
            Issuer::new(""),
            Err(SamlError::MalformedValue(_))
        ));
    }

    #[test]
    fn rejects_wrong_namespace() {
        let mut node = Node::new(ns::SAMLP, "Issuer");
        node.append_text("urn:example:issuer");
        assert!(matches!(
            Issuer::from_node(&node),
            Err(SamlError::SchemaViolation(_))
        ));
    }
}
