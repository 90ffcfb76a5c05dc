//! `samlp:ArtifactResolve` — dereferences an artifact received over a
//! front-channel binding into the full message it stands for.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::element::{exactly_one, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::samlp::Envelope;
use crate::xml::Node;

#[derive(Debug, Clone)]
pub struct ArtifactResolve {
    envelope: Envelope,
    artifact: String,
}

impl ArtifactResolve {
    /// The artifact must be the base64 form handed out by the binding.
    pub fn new(artifact: impl Into<String>, envelope: Envelope) -> SamlResult<Self> {
        let artifact = artifact.into();
        if artifact.is_empty() {
            return Err(SamlError::malformed("Artifact must not be empty"));
        }
        if STANDARD.decode(&artifact).is_err() {
            return Err(SamlError::malformed("Artifact is not valid base64"));
        }
        Ok(ArtifactResolve { envelope, artifact })
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.envelope
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn from_document(xml: &str) -> SamlResult<Self> {
        Self::from_node(&Node::parse(xml)?)
    }

    pub fn to_document(&self) -> SamlResult<String> {
        Ok(self.build()?.to_document())
    }
}

impl SamlElement for ArtifactResolve {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "ArtifactResolve";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let envelope = Envelope::from_node(node)?;
        let artifact = exactly_one::<Artifact>(node)?;
        ArtifactResolve::new(artifact.0, envelope)
    }

    fn build(&self) -> SamlResult<Node> {
        let mut root = self.envelope.build_root(Self::LOCAL_NAME)?;
        Artifact(self.artifact.clone()).append_to(&mut root)?;
        self.envelope.finalize(root)
    }

    fn append_to(&self, _parent: &mut Node) -> SamlResult<()> {
        Err(SamlError::InvalidState(
            "samlp:ArtifactResolve is a top-level message and cannot be embedded".into(),
        ))
    }
}

struct Artifact(String);

impl SamlElement for Artifact {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "Artifact";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        Ok(Artifact(node.text()))
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
    use crate::saml::Issuer;

    const ARTIFACT: &str = "AAQAADWNEw5VT47wcO4zX/iEzMmFQvGknDfws2ZtqSGdkNSbsW1cmVR0bzU=";

    #[test]
    fn round_trips() {
        let envelope = Envelope::new().with_issuer(Issuer::new("urn:example:sp").unwrap());
        let resolve = ArtifactResolve::new(ARTIFACT, envelope).unwrap();
        let decoded = ArtifactResolve::from_document(&resolve.to_document().unwrap()).unwrap();
        assert_eq!(decoded.artifact(), ARTIFACT);
    }

    #[test]
    fn empty_artifact_is_malformed() {
        assert!(matches!(
            ArtifactResolve::new("", Envelope::new()),
            Err(SamlError::MalformedValue(_))
        ));
    }

    #[test]
    fn non_base64_artifact_is_malformed() {
        assert!(matches!(
            ArtifactResolve::new("not base64!", Envelope::new()),
            Err(SamlError::MalformedValue(_))
        ));
    }

    #[test]
    fn missing_artifact_element_is_a_schema_violation() {
        let root = Envelope::new().build_root("ArtifactResolve").unwrap();
        assert!(matches!(
            ArtifactResolve::from_node(&root),
            Err(SamlError::SchemaViolation(_))
        ));
    }
}
