//! Subject identifiers: `saml:NameID`, `saml:BaseID`, `saml:EncryptedID`
//! and the closed union over the three.

use crate::element::{at_most_one, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// `saml:NameID` — a plain subject identifier with the NameIDType
/// attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameId {
    value: String,
    format: Option<String>,
    name_qualifier: Option<String>,
    sp_name_qualifier: Option<String>,
    sp_provided_id: Option<String>,
}

impl NameId {
    pub fn new(value: impl Into<String>) -> SamlResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(SamlError::malformed("NameID value must not be empty"));
        }
        Ok(NameId {
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

impl SamlElement for NameId {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "NameID";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let mut name_id = NameId::new(node.text())?;
        if let Some(v) = node.attribute("Format") {
            name_id = name_id.with_format(v);
        }
        if let Some(v) = node.attribute("NameQualifier") {
            name_id = name_id.with_name_qualifier(v);
        }
        if let Some(v) = node.attribute("SPNameQualifier") {
            name_id = name_id.with_sp_name_qualifier(v);
        }
        if let Some(v) = node.attribute("SPProvidedID") {
            name_id = name_id.with_sp_provided_id(v);
        }
        Ok(name_id)
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

/// `saml:BaseID` — the schema extension point for custom identifiers. The
/// subtree is preserved verbatim and not interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseId {
    node: Node,
}

impl BaseId {
    /// Wrap a raw `saml:BaseID` subtree.
    pub fn from_raw(node: Node) -> SamlResult<Self> {
        Self::expect_qname(&node)?;
        Ok(BaseId { node })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn name_qualifier(&self) -> Option<&str> {
        self.node.attribute("NameQualifier")
    }

    pub fn sp_name_qualifier(&self) -> Option<&str> {
        self.node.attribute("SPNameQualifier")
    }
}

impl SamlElement for BaseId {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "BaseID";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::from_raw(node.clone())
    }

    fn build(&self) -> SamlResult<Node> {
        Ok(self.node.clone())
    }
}

/// `saml:EncryptedID` — an xmlenc payload naming the subject. Decryption is
/// a separate concern; the subtree is carried opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedId {
    node: Node,
}

impl EncryptedId {
    /// Wrap a raw `saml:EncryptedID` subtree.
    pub fn from_raw(node: Node) -> SamlResult<Self> {
        Self::expect_qname(&node)?;
        Ok(EncryptedId { node })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl SamlElement for EncryptedId {
    const NAMESPACE: &'static str = ns::SAML;
    const LOCAL_NAME: &'static str = "EncryptedID";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::from_raw(node.clone())
    }

    fn build(&self) -> SamlResult<Node> {
        Ok(self.node.clone())
    }
}

/// The closed set of legal subject-identifier forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    NameId(NameId),
    BaseId(BaseId),
    EncryptedId(EncryptedId),
}

impl Identifier {
    /// Resolve the identifier among `parent`'s children.
    ///
    /// Precedence is NameID, then BaseID, then EncryptedID, first match
    /// wins. A document carrying more than one identifier kind is
    /// schema-ambiguous; the higher-precedence kind is taken and the rest
    /// ignored. Two children of the *same* kind remain a `SchemaViolation`.
    pub(crate) fn find_in(parent: &Node) -> SamlResult<Option<Self>> {
        if let Some(name_id) = at_most_one::<NameId>(parent)? {
            return Ok(Some(Identifier::NameId(name_id)));
        }
        if let Some(base_id) = at_most_one::<BaseId>(parent)? {
            return Ok(Some(Identifier::BaseId(base_id)));
        }
        if let Some(encrypted) = at_most_one::<EncryptedId>(parent)? {
            return Ok(Some(Identifier::EncryptedId(encrypted)));
        }
        Ok(None)
    }

    pub(crate) fn append_to(&self, parent: &mut Node) -> SamlResult<()> {
        match self {
            Identifier::NameId(v) => v.append_to(parent),
            Identifier::BaseId(v) => v.append_to(parent),
            Identifier::EncryptedId(v) => v.append_to(parent),
        }
    }

    pub fn as_name_id(&self) -> Option<&NameId> {
        match self {
            Identifier::NameId(v) => Some(v),
            _ => None,
        }
    }
}

impl From<NameId> for Identifier {
    fn from(value: NameId) -> Self {
        Identifier::NameId(value)
    }
}

impl From<BaseId> for Identifier {
    fn from(value: BaseId) -> Self {
        Identifier::BaseId(value)
    }
}

impl From<EncryptedId> for Identifier {
    fn from(value: EncryptedId) -> Self {
        Identifier::EncryptedId(value)
    }
}
