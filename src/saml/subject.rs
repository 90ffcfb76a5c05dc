//! `saml:Subject` — the principal a subject query is about.

use crate::element::SamlElement;
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::saml::Identifier;
use crate::xml::Node;

/// `saml:Subject`. Exactly one identifier; subject confirmations belong to
/// the assertion layer and are not modeled here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    identifier: Identifier,
}

impl Subject {
    pub fn new(identifier: impl Into<Identifier>) -> Self {
        Subject {
            identifier: identifier.into(),
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl SamlElement for Subject {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "Subject";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let identifier = Identifier::find_in(node)?.ok_or_else(|| {
            SamlError::schema(
                "missing <saml:NameID>, <saml:BaseID> or <saml:EncryptedID> in <saml:Subject>",
            )
        })?;
        Ok(Subject { identifier })
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        self.identifier.append_to(&mut node)?;
        Ok(node)
    }
}
