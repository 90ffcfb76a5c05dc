//! `samlp:AttributeQuery` — asks an attribute authority for attributes of a
//! subject.

use crate::element::{children_of, exactly_one, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::saml::{Attribute, Subject};
use crate::samlp::Envelope;
use crate::xml::Node;

/// A subject query with zero or more requested attributes. No attributes
/// means "everything you are willing to release".
#[derive(Debug, Clone)]
pub struct AttributeQuery {
    envelope: Envelope,
    subject: Subject,
    attributes: Vec<Attribute>,
}

impl AttributeQuery {
    pub fn new(subject: Subject, envelope: Envelope) -> Self {
        AttributeQuery {
            envelope,
            subject,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn from_document(xml: &str) -> SamlResult<Self> {
        Self::from_node(&Node::parse(xml)?)
    }

    pub fn to_document(&self) -> SamlResult<String> {
        Ok(self.build()?.to_document())
    }
}

impl SamlElement for AttributeQuery {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "AttributeQuery";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let envelope = Envelope::from_node(node)?;
        let subject = exactly_one::<Subject>(node)?;
        let attributes = children_of::<Attribute>(node)?;
        Ok(AttributeQuery::new(subject, envelope).with_attributes(attributes))
    }

    fn build(&self) -> SamlResult<Node> {
        let mut root = self.envelope.build_root(Self::LOCAL_NAME)?;
        self.subject.append_to(&mut root)?;
        for attribute in &self.attributes {
            attribute.append_to(&mut root)?;
        }
        self.envelope.finalize(root)
    }

    fn append_to(&self, _parent: &mut Node) -> SamlResult<()> {
        Err(SamlError::InvalidState(
            "samlp:AttributeQuery is a top-level message and cannot be embedded".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saml::{Issuer, NameId};

    fn sample_query() -> AttributeQuery {
        let envelope = Envelope::new().with_issuer(Issuer::new("urn:example:sp").unwrap());
        AttributeQuery::new(
            Subject::new(NameId::new("user@example.org").unwrap()),
            envelope,
        )
        .with_attributes(vec![
            Attribute::new("urn:oid:2.5.4.4").unwrap().with_friendly_name("sn"),
            Attribute::new("urn:oid:0.9.2342.19200300.100.1.3").unwrap(),
        ])
    }

    #[test]
    fn round_trips_with_attributes_in_order() {
        let query = sample_query();
        let decoded = AttributeQuery::from_document(&query.to_document().unwrap()).unwrap();
        assert_eq!(decoded.attributes(), query.attributes());
        assert_eq!(decoded.subject(), query.subject());
    }

    #[test]
    fn empty_attribute_list_asks_for_everything() {
        let query = AttributeQuery::new(
            Subject::new(NameId::new("user@example.org").unwrap()),
            Envelope::new(),
        );
        let decoded = AttributeQuery::from_document(&query.to_document().unwrap()).unwrap();
        assert!(decoded.attributes().is_empty());
    }

    #[test]
    fn missing_subject_is_a_schema_violation() {
        let root = Envelope::new().build_root("AttributeQuery").unwrap();
        assert!(matches!(
            AttributeQuery::from_node(&root),
            Err(SamlError::SchemaViolation(_))
        ));
    }

    #[test]
    fn duplicate_subject_is_a_schema_violation() {
        let mut root = Envelope::new().build_root("AttributeQuery").unwrap();
        let subject = Subject::new(NameId::new("user@example.org").unwrap());
        subject.append_to(&mut root).unwrap();
        subject.append_to(&mut root).unwrap();
        assert!(matches!(
            AttributeQuery::from_node(&root),
            Err(SamlError::SchemaViolation(_))
        ));
    }
}
