//! `samlp:IDPList` and the proxy-scoping leaves that travel with it.

use crate::element::{at_least_one, at_most_one, require_attr, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// `samlp:IDPList` — one or more identity provider entries, optionally
/// followed by a GetComplete pointer to the full list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdpList {
    entries: Vec<IdpEntry>,
    get_complete: Option<GetComplete>,
}

impl IdpList {
    pub fn new(entries: Vec<IdpEntry>) -> SamlResult<Self> {
        if entries.is_empty() {
            return Err(SamlError::schema(
                "samlp:IDPList must carry at least one IDPEntry",
            ));
        }
        Ok(IdpList {
            entries,
            get_complete: None,
        })
    }

    #[must_use]
    pub fn with_get_complete(mut self, get_complete: GetComplete) -> Self {
        self.get_complete = Some(get_complete);
        self
    }

    pub fn entries(&self) -> &[IdpEntry] {
        &self.entries
    }

    pub fn get_complete(&self) -> Option<&GetComplete> {
        self.get_complete.as_ref()
    }
}

impl SamlElement for IdpList {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "IDPList";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let mut list = IdpList::new(at_least_one::<IdpEntry>(node)?)?;
        if let Some(get_complete) = at_most_one::<GetComplete>(node)? {
            list = list.with_get_complete(get_complete);
        }
        Ok(list)
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        for entry in &self.entries {
            entry.append_to(&mut node)?;
        }
        if let Some(get_complete) = &self.get_complete {
            get_complete.append_to(&mut node)?;
        }
        Ok(node)
    }
}

/// `samlp:IDPEntry` — one identity provider: its entity ID plus optional
/// display name and endpoint location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdpEntry {
    provider_id: String,
    name: Option<String>,
    loc: Option<String>,
}

impl IdpEntry {
    pub fn new(provider_id: impl Into<String>) -> SamlResult<Self> {
        let provider_id = provider_id.into();
        if provider_id.is_empty() {
            return Err(SamlError::malformed("IDPEntry ProviderID must not be empty"));
        }
        Ok(IdpEntry {
            provider_id,
            name: None,
            loc: None,
        })
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_loc(mut self, loc: impl Into<String>) -> Self {
        self.loc = Some(loc.into());
        self
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn loc(&self) -> Option<&str> {
        self.loc.as_deref()
    }
}

impl SamlElement for IdpEntry {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "IDPEntry";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let mut entry = IdpEntry::new(require_attr(node, "ProviderID")?)?;
        if let Some(v) = node.attribute("Name") {
            entry = entry.with_name(v);
        }
        if let Some(v) = node.attribute("Loc") {
            entry = entry.with_loc(v);
        }
        Ok(entry)
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.set_attribute("ProviderID", &self.provider_id);
        if let Some(v) = &self.name {
            node.set_attribute("Name", v);
        }
        if let Some(v) = &self.loc {
            node.set_attribute("Loc", v);
        }
        Ok(node)
    }
}

/// `samlp:GetComplete` — a URI where the complete IDP list can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetComplete(String);

impl GetComplete {
    pub fn new(uri: impl Into<String>) -> SamlResult<Self> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(SamlError::malformed("GetComplete URI must not be empty"));
        }
        Ok(GetComplete(uri))
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

impl SamlElement for GetComplete {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "GetComplete";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        GetComplete::new(node.text())
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.append_text(&self.0);
        Ok(node)
    }
}

/// `samlp:RequesterID` — the entity ID of a requester a proxied request
/// travelled through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterId(String);

impl RequesterId {
    pub fn new(entity_id: impl Into<String>) -> SamlResult<Self> {
        let entity_id = entity_id.into();
        if entity_id.is_empty() {
            return Err(SamlError::malformed("RequesterID must not be empty"));
        }
        Ok(RequesterId(entity_id))
    }

    pub fn entity_id(&self) -> &str {
        &self.0
    }
}

impl SamlElement for RequesterId {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "RequesterID";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        RequesterId::new(node.text())
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.append_text(&self.0);
        Ok(node)
    }
}
