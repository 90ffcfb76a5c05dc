//! The common request/response envelope shared by every protocol message,
//! modeled as a composed value rather than an inheritance chain.

use chrono::Utc;
use uuid::Uuid;

use crate::element::{at_most_one, require_attr, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::saml::Issuer;
use crate::sig::{self, Signature, SigningCredentials};
use crate::xml::{datetime, Node};

/// The attribute/child set every protocol message carries: ID, Version,
/// IssueInstant, the optional envelope attributes, and the optional
/// Issuer / Extensions / Signature children.
///
/// Immutable after construction except for signature attachment, which may
/// happen any time before encoding.
#[derive(Debug, Clone)]
pub struct Envelope {
    id: String,
    version: String,
    issue_instant: i64,
    in_response_to: Option<String>,
    destination: Option<String>,
    consent: Option<String>,
    issuer: Option<Issuer>,
    extensions: Option<Extensions>,
    signature: Option<Signature>,
    signing: Option<SigningCredentials>,
}

impl Envelope {
    /// Fresh envelope with a generated ID and the current instant.
    pub fn new() -> Self {
        Envelope {
            // XML IDs must not start with a digit.
            id: format!("_{}", Uuid::new_v4()),
            version: ns::SAML_VERSION.to_owned(),
            issue_instant: Utc::now().timestamp(),
            in_response_to: None,
            destination: None,
            consent: None,
            issuer: None,
            extensions: None,
            signature: None,
            signing: None,
        }
    }

    /// Validating constructor shared by the builder methods and decode, so
    /// a hand-built infoset cannot bypass the envelope invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: String,
        version: String,
        issue_instant: i64,
        in_response_to: Option<String>,
        destination: Option<String>,
        consent: Option<String>,
        issuer: Option<Issuer>,
        extensions: Option<Extensions>,
    ) -> SamlResult<Self> {
        if id.is_empty() {
            return Err(SamlError::malformed("message ID must not be empty"));
        }
        if version != ns::SAML_VERSION {
            return Err(SamlError::schema(format!(
                "unsupported SAML version {version:?}, expected \"2.0\""
            )));
        }
        Ok(Envelope {
            id,
            version,
            issue_instant,
            in_response_to,
            destination,
            consent,
            issuer,
            extensions,
            signature: None,
            signing: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> SamlResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(SamlError::malformed("message ID must not be empty"));
        }
        self.id = id;
        Ok(self)
    }

    #[must_use]
    pub fn with_issue_instant(mut self, issue_instant: i64) -> Self {
        self.issue_instant = issue_instant;
        self
    }

    #[must_use]
    pub fn with_in_response_to(mut self, request_id: impl Into<String>) -> Self {
        self.in_response_to = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    #[must_use]
    pub fn with_consent(mut self, consent: impl Into<String>) -> Self {
        self.consent = Some(consent.into());
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: Issuer) -> Self {
        self.issuer = Some(issuer);
        self
    }

    #[must_use]
    pub fn with_extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn issue_instant(&self) -> i64 {
        self.issue_instant
    }

    pub fn in_response_to(&self) -> Option<&str> {
        self.in_response_to.as_deref()
    }

    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    pub fn consent(&self) -> Option<&str> {
        self.consent.as_deref()
    }

    pub fn issuer(&self) -> Option<&Issuer> {
        self.issuer.as_ref()
    }

    pub fn extensions(&self) -> Option<&Extensions> {
        self.extensions.as_ref()
    }

    /// The signature found during decode (or attached manually). Never
    /// verified implicitly; see [`crate::sig::verify_signature`].
    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Attach a pre-built signature, re-emitted verbatim on encode.
    pub fn set_signature(&mut self, signature: Signature) {
        self.signature = Some(signature);
    }

    /// Attach signing credentials; encoding will sign the finished element
    /// as its last step.
    pub fn set_signing_credentials(&mut self, credentials: SigningCredentials) {
        self.signing = Some(credentials);
    }

    /// Decode the envelope portion of a message node.
    pub(crate) fn from_node(node: &Node) -> SamlResult<Self> {
        let id = require_attr(node, "ID")?;
        let version = require_attr(node, "Version")?;
        let issue_instant = datetime::parse_xs_date_time(&require_attr(node, "IssueInstant")?)?;
        let in_response_to = node.attribute("InResponseTo").map(str::to_owned);
        let destination = node.attribute("Destination").map(str::to_owned);
        let consent = node.attribute("Consent").map(str::to_owned);
        let issuer = at_most_one::<Issuer>(node)?;
        let extensions = at_most_one::<Extensions>(node)?;

        let mut envelope = Envelope::from_parts(
            id,
            version,
            issue_instant,
            in_response_to,
            destination,
            consent,
            issuer,
            extensions,
        )?;
        if let Some(signature) = at_most_one::<Signature>(node)? {
            envelope.set_signature(signature);
        }
        Ok(envelope)
    }

    /// Build the message root with the envelope attributes and the
    /// Issuer/Extensions children. Message-specific children follow; the
    /// signature is applied afterwards by [`Envelope::finalize`].
    pub(crate) fn build_root(&self, local_name: &'static str) -> SamlResult<Node> {
        let mut root = Node::new(ns::SAMLP, local_name);
        root.set_attribute("ID", &self.id);
        root.set_attribute("Version", &self.version);
        root.set_attribute("IssueInstant", datetime::format_xs_date_time(self.issue_instant)?);
        if let Some(v) = &self.in_response_to {
            root.set_attribute("InResponseTo", v);
        }
        if let Some(v) = &self.destination {
            root.set_attribute("Destination", v);
        }
        if let Some(v) = &self.consent {
            root.set_attribute("Consent", v);
        }
        if let Some(issuer) = &self.issuer {
            issuer.append_to(&mut root)?;
        }
        if let Some(extensions) = &self.extensions {
            extensions.append_to(&mut root)?;
        }
        Ok(root)
    }

    /// Last encode step: re-emit a carried signature verbatim, or sign the
    /// finished element when credentials are attached.
    pub(crate) fn finalize(&self, mut root: Node) -> SamlResult<Node> {
        if let Some(signature) = &self.signature {
            sig::insert_after_issuer(&mut root, signature.build()?);
        } else if let Some(credentials) = &self.signing {
            sig::sign_element(&mut root, credentials)?;
        }
        Ok(root)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

/// `samlp:Extensions` — an opaque block of foreign elements, preserved
/// verbatim. At most one per message, and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    children: Vec<Node>,
}

impl Extensions {
    pub fn new(children: Vec<Node>) -> SamlResult<Self> {
        if children.is_empty() {
            return Err(SamlError::schema(
                "samlp:Extensions must carry at least one child element",
            ));
        }
        Ok(Extensions { children })
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl SamlElement for Extensions {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "Extensions";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        Extensions::new(node.child_elements().cloned().collect())
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        for child in &self.children {
            node.append_element(child.clone());
        }
        Ok(node)
    }
}
