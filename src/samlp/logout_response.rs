//! `samlp:LogoutResponse` — the outcome of a logout request.

use crate::element::{exactly_one, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::samlp::{Envelope, Status};
use crate::xml::Node;

#[derive(Debug, Clone)]
pub struct LogoutResponse {
    envelope: Envelope,
    status: Status,
}

impl LogoutResponse {
    pub fn new(status: Status, envelope: Envelope) -> Self {
        LogoutResponse { envelope, status }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn from_document(xml: &str) -> SamlResult<Self> {
        Self::from_node(&Node::parse(xml)?)
    }

    pub fn to_document(&self) -> SamlResult<String> {
        Ok(self.build()?.to_document())
    }
}

impl SamlElement for LogoutResponse {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "LogoutResponse";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let envelope = Envelope::from_node(node)?;
        let status = exactly_one::<Status>(node)?;
        Ok(LogoutResponse::new(status, envelope))
    }

    fn build(&self) -> SamlResult<Node> {
        let mut root = self.envelope.build_root(Self::LOCAL_NAME)?;
        self.status.append_to(&mut root)?;
        self.envelope.finalize(root)
    }

    fn append_to(&self, _parent: &mut Node) -> SamlResult<()> {
        Err(SamlError::InvalidState(
            "samlp:LogoutResponse is a top-level message and cannot be embedded".into(),
        ))
    }
}
