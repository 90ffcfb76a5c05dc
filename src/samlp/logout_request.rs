//! `samlp:LogoutRequest` — asks a session participant to terminate a
//! principal's session(s).

use crate::element::{children_of, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::saml::Identifier;
use crate::samlp::{Envelope, SessionIndex};
use crate::xml::{datetime, Node};

#[derive(Debug, Clone)]
pub struct LogoutRequest {
    envelope: Envelope,
    identifier: Identifier,
    reason: Option<String>,
    not_on_or_after: Option<i64>,
    session_indexes: Vec<SessionIndex>,
}

impl LogoutRequest {
    /// A logout request for the given principal.
    pub fn new(identifier: impl Into<Identifier>, envelope: Envelope) -> Self {
        LogoutRequest {
            envelope,
            identifier: identifier.into(),
            reason: None,
            not_on_or_after: None,
            session_indexes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_not_on_or_after(mut self, instant: i64) -> Self {
        self.not_on_or_after = Some(instant);
        self
    }

    #[must_use]
    pub fn with_session_indexes(mut self, indexes: Vec<SessionIndex>) -> Self {
        self.session_indexes = indexes;
        self
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn not_on_or_after(&self) -> Option<i64> {
        self.not_on_or_after
    }

    pub fn session_indexes(&self) -> &[SessionIndex] {
        &self.session_indexes
    }

    /// Decode from a complete XML document.
    pub fn from_document(xml: &str) -> SamlResult<Self> {
        Self::from_node(&Node::parse(xml)?)
    }

    /// Encode to a complete XML document, signing last when credentials are
    /// attached to the envelope.
    pub fn to_document(&self) -> SamlResult<String> {
        Ok(self.build()?.to_document())
    }
}

impl SamlElement for LogoutRequest {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "LogoutRequest";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let envelope = Envelope::from_node(node)?;
        let identifier = Identifier::find_in(node)?.ok_or_else(|| {
            SamlError::schema(
                "missing <saml:NameID>, <saml:BaseID> or <saml:EncryptedID> \
                 in <samlp:LogoutRequest>",
            )
        })?;
        let mut request = LogoutRequest::new(identifier, envelope);
        if let Some(reason) = node.attribute("Reason") {
            request = request.with_reason(reason);
        }
        if let Some(raw) = node.attribute("NotOnOrAfter") {
            request = request.with_not_on_or_after(datetime::parse_xs_date_time(raw)?);
        }
        Ok(request.with_session_indexes(children_of::<SessionIndex>(node)?))
    }

    fn build(&self) -> SamlResult<Node> {
        let mut root = self.envelope.build_root(Self::LOCAL_NAME)?;
        if let Some(reason) = &self.reason {
            root.set_attribute("Reason", reason);
        }
        if let Some(instant) = self.not_on_or_after {
            root.set_attribute("NotOnOrAfter", datetime::format_xs_date_time(instant)?);
        }
        self.identifier.append_to(&mut root)?;
        for index in &self.session_indexes {
            index.append_to(&mut root)?;
        }
        self.envelope.finalize(root)
    }

    fn append_to(&self, _parent: &mut Node) -> SamlResult<()> {
        Err(SamlError::InvalidState(
            "samlp:LogoutRequest is a top-level message and cannot be embedded".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saml::{Issuer, NameId};

    #[test]
    fn round_trips_with_all_fields() {
        let envelope = Envelope::new()
            .with_issuer(Issuer::new("urn:example:sp").unwrap())
            .with_destination("https://idp.example.org/slo");
        let request = LogoutRequest::new(
            NameId::new("user@example.org")
                .unwrap()
                .with_format(ns::NAMEID_FORMAT_EMAIL),
            envelope,
        )
        .with_reason(ns::LOGOUT_REASON_USER)
        .with_not_on_or_after(1_700_000_000)
        .with_session_indexes(vec![
            SessionIndex::new("_s1").unwrap(),
            SessionIndex::new("_s2").unwrap(),
        ]);

        let decoded = LogoutRequest::from_document(&request.to_document().unwrap()).unwrap();
        assert_eq!(decoded.reason(), Some(ns::LOGOUT_REASON_USER));
        assert_eq!(decoded.not_on_or_after(), Some(1_700_000_000));
        assert_eq!(decoded.session_indexes(), request.session_indexes());
        assert_eq!(
            decoded.identifier().as_name_id().map(NameId::value),
            Some("user@example.org")
        );
        assert_eq!(
            decoded.envelope().issuer().map(Issuer::value),
            Some("urn:example:sp")
        );
    }

    #[test]
    fn missing_identifier_is_a_schema_violation() {
        let envelope = Envelope::new();
        let mut root = envelope.build_root("LogoutRequest").unwrap();
        root.set_attribute("ID", envelope.id());
        assert!(matches!(
            LogoutRequest::from_node(&root),
            Err(SamlError::SchemaViolation(_))
        ));
    }

    #[test]
    fn cannot_be_embedded() {
        let request = LogoutRequest::new(
            NameId::new("user@example.org").unwrap(),
            Envelope::new(),
        );
        let mut parent = Node::new(ns::SAMLP, "Extensions");
        assert!(matches!(
            request.append_to(&mut parent),
            Err(SamlError::InvalidState(_))
        ));
    }
}
