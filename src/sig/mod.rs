//! Enveloped XML signature attachment and verification.
//!
//! Signing covers the exclusive-C14N form of the element *without* its
//! signature (enveloped-signature transform); the resulting `ds:Signature`
//! is inserted immediately after `saml:Issuer`, the position the SAML schema
//! mandates. Decode never verifies — it only exposes the parsed signature;
//! verification is a separate caller-invoked operation against a key the
//! caller already decided to trust.

pub mod credentials;

pub use credentials::SigningCredentials;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use openssl::hash::MessageDigest;
use xml_canonicalization::Canonicalizer;

use crate::element::SamlElement;
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// An opaque `ds:Signature` subtree, carried verbatim between decode and
/// encode. The cryptographic material inside is not interpreted until
/// [`verify_signature`] is explicitly called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    node: Node,
}

impl Signature {
    /// Wrap a raw `ds:Signature` subtree.
    pub fn from_raw(node: Node) -> SamlResult<Self> {
        Self::expect_qname(&node)?;
        Ok(Signature { node })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }
}

impl SamlElement for Signature {
    const NAMESPACE: &'static str = ns::DSIG;
    const LOCAL_NAME: &'static str = "Signature";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::from_raw(node.clone())
    }

    fn build(&self) -> SamlResult<Node> {
        Ok(self.node.clone())
    }
}

/// Apply Exclusive XML Canonicalization (C14N) without comments.
fn canonicalize_xml(xml: &str) -> SamlResult<String> {
    let mut output = Vec::new();
    Canonicalizer::read_from_str(xml)
        .write_to_writer(&mut output)
        .canonicalize(false)
        .map_err(|e| SamlError::SignatureInvalid(format!("canonicalization failed: {e}")))?;

    String::from_utf8(output)
        .map_err(|e| SamlError::SignatureInvalid(format!("canonical form is not UTF-8: {e}")))
}

fn sha256_base64(data: &[u8]) -> SamlResult<String> {
    let digest = openssl::hash::hash(MessageDigest::sha256(), data)?;
    Ok(STANDARD.encode(&digest))
}

/// Sign `root` in place with an enveloped RSA-SHA256 signature.
///
/// Must run as the last step of encoding so the signature covers the
/// complete, final element.
pub fn sign_element(root: &mut Node, credentials: &SigningCredentials) -> SamlResult<()> {
    let reference_id = root
        .attribute("ID")
        .ok_or_else(|| {
            SamlError::InvalidState("cannot sign an element without an ID attribute".into())
        })?
        .to_owned();

    let digest = sha256_base64(canonicalize_xml(&root.to_xml())?.as_bytes())?;
    let signed_info = build_signed_info(&reference_id, &digest);

    let canonical_signed_info = canonicalize_xml(&signed_info.to_xml())?;
    let signature_value = STANDARD.encode(credentials.sign_sha256(canonical_signed_info.as_bytes())?);

    let mut signature = Node::new(ns::DSIG, "Signature");
    signature.append_element(signed_info);
    let mut value = Node::new(ns::DSIG, "SignatureValue");
    value.append_text(signature_value);
    signature.append_element(value);

    if let Some(certificate) = credentials.certificate_base64_der()? {
        let mut cert_node = Node::new(ns::DSIG, "X509Certificate");
        cert_node.append_text(certificate);
        let mut x509_data = Node::new(ns::DSIG, "X509Data");
        x509_data.append_element(cert_node);
        let mut key_info = Node::new(ns::DSIG, "KeyInfo");
        key_info.append_element(x509_data);
        signature.append_element(key_info);
    }

    tracing::debug!(reference = %reference_id, "attached enveloped signature");
    insert_after_issuer(root, signature);
    Ok(())
}

/// Verify the enveloped signature carried by `root` against `credentials`.
///
/// Recomputes the reference digest over the signature-free element, then
/// checks the RSA-SHA256 signature over the canonicalized SignedInfo. Every
/// failure mode is `SignatureInvalid`; structural problems with the message
/// itself are a decode concern, not a verification one.
pub fn verify_signature(root: &Node, credentials: &SigningCredentials) -> SamlResult<()> {
    let signature = root.find_child(ns::DSIG, "Signature").ok_or_else(|| {
        SamlError::SignatureInvalid("no ds:Signature element present".into())
    })?;

    let signed_info = signature
        .find_child(ns::DSIG, "SignedInfo")
        .ok_or_else(|| SamlError::SignatureInvalid("missing ds:SignedInfo".into()))?;
    let signature_value = signature
        .find_child(ns::DSIG, "SignatureValue")
        .map(|n| n.text())
        .ok_or_else(|| SamlError::SignatureInvalid("missing ds:SignatureValue".into()))?;
    let reference = signed_info
        .find_child(ns::DSIG, "Reference")
        .ok_or_else(|| SamlError::SignatureInvalid("missing ds:Reference".into()))?;
    let digest_value = reference
        .find_child(ns::DSIG, "DigestValue")
        .map(|n| n.text())
        .ok_or_else(|| SamlError::SignatureInvalid("missing ds:DigestValue".into()))?;

    // The reference must point at this element, not some other ID in the
    // document.
    let expected_uri = root
        .attribute("ID")
        .map(|id| format!("#{id}"))
        .ok_or_else(|| {
            SamlError::SignatureInvalid("signed element has no ID attribute".into())
        })?;
    if reference.attribute("URI") != Some(expected_uri.as_str()) {
        return Err(SamlError::SignatureInvalid(
            "reference URI does not match the element ID".into(),
        ));
    }

    // Enveloped-signature transform: the digest covers the element without
    // its ds:Signature child.
    let mut unsigned = root.clone();
    unsigned.remove_child(ns::DSIG, "Signature");
    let computed = sha256_base64(canonicalize_xml(&unsigned.to_xml())?.as_bytes())
        .map_err(|e| SamlError::SignatureInvalid(format!("digest computation failed: {e}")))?;
    if computed != digest_value.replace(['\n', '\r', ' '], "") {
        return Err(SamlError::SignatureInvalid("reference digest mismatch".into()));
    }

    let canonical_signed_info = canonicalize_xml(&signed_info.to_xml())?;
    let raw_signature = STANDARD
        .decode(signature_value.replace(['\n', '\r', ' '], ""))
        .map_err(|e| SamlError::SignatureInvalid(format!("signature value is not base64: {e}")))?;

    let valid = credentials
        .verify_sha256(canonical_signed_info.as_bytes(), &raw_signature)
        .map_err(|e| SamlError::SignatureInvalid(format!("verification failed: {e}")))?;
    if valid {
        tracing::debug!("enveloped signature verified");
        Ok(())
    } else {
        Err(SamlError::SignatureInvalid(
            "signature value does not match SignedInfo".into(),
        ))
    }
}

/// Insert a `ds:Signature` at its schema position: immediately after
/// `saml:Issuer`, or first when no issuer is present.
pub(crate) fn insert_after_issuer(root: &mut Node, signature: Node) {
    let index = root
        .position_of_child(ns::SAML, "Issuer")
        .map_or(0, |i| i + 1);
    root.insert_element(index, signature);
}

fn build_signed_info(reference_id: &str, digest_base64: &str) -> Node {
    let mut signed_info = Node::new(ns::DSIG, "SignedInfo");

    let mut c14n_method = Node::new(ns::DSIG, "CanonicalizationMethod");
    c14n_method.set_attribute("Algorithm", ns::ALG_EXC_C14N);
    signed_info.append_element(c14n_method);

    let mut signature_method = Node::new(ns::DSIG, "SignatureMethod");
    signature_method.set_attribute("Algorithm", ns::ALG_RSA_SHA256);
    signed_info.append_element(signature_method);

    let mut reference = Node::new(ns::DSIG, "Reference");
    reference.set_attribute("URI", format!("#{reference_id}"));

    let mut transforms = Node::new(ns::DSIG, "Transforms");
    for algorithm in [ns::ALG_ENVELOPED_SIGNATURE, ns::ALG_EXC_C14N] {
        let mut transform = Node::new(ns::DSIG, "Transform");
        transform.set_attribute("Algorithm", algorithm);
        transforms.append_element(transform);
    }
    reference.append_element(transforms);

    let mut digest_method = Node::new(ns::DSIG, "DigestMethod");
    digest_method.set_attribute("Algorithm", ns::ALG_SHA256);
    reference.append_element(digest_method);

    let mut digest_node = Node::new(ns::DSIG, "DigestValue");
    digest_node.append_text(digest_base64);
    reference.append_element(digest_node);

    signed_info.append_element(reference);
    signed_info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_root() -> Node {
        let mut issuer = Node::new(ns::SAML, "Issuer");
        issuer.append_text("urn:example:issuer");
        let mut root = Node::new(ns::SAMLP, "LogoutRequest");
        root.set_attribute("ID", "_sig_test");
        root.set_attribute("Version", "2.0");
        root.append_element(issuer);
        root
    }

    #[test]
    fn sign_then_verify_succeeds() {
        let credentials = SigningCredentials::generate().unwrap();
        let mut root = sample_root();
        sign_element(&mut root, &credentials).unwrap();
        verify_signature(&root, &credentials).unwrap();
    }

    #[test]
    fn signature_sits_after_issuer() {
        let credentials = SigningCredentials::generate().unwrap();
        let mut root = sample_root();
        sign_element(&mut root, &credentials).unwrap();
        assert_eq!(root.position_of_child(ns::SAML, "Issuer"), Some(0));
        assert_eq!(root.position_of_child(ns::DSIG, "Signature"), Some(1));
    }

    #[test]
    fn tampering_breaks_the_digest() {
        let credentials = SigningCredentials::generate().unwrap();
        let mut root = sample_root();
        sign_element(&mut root, &credentials).unwrap();
        root.set_attribute("Version", "1.1");
        assert!(matches!(
            verify_signature(&root, &credentials),
            Err(SamlError::SignatureInvalid(_))
        ));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let signer = SigningCredentials::generate().unwrap();
        let other = SigningCredentials::generate().unwrap();
        let mut root = sample_root();
        sign_element(&mut root, &signer).unwrap();
        assert!(matches!(
            verify_signature(&root, &other),
            Err(SamlError::SignatureInvalid(_))
        ));
    }

    #[test]
    fn reference_uri_must_point_at_the_verified_element() {
        let credentials = SigningCredentials::generate().unwrap();
        let mut root = sample_root();
        sign_element(&mut root, &credentials).unwrap();

        root.find_child_mut(ns::DSIG, "Signature")
            .and_then(|s| s.find_child_mut(ns::DSIG, "SignedInfo"))
            .and_then(|s| s.find_child_mut(ns::DSIG, "Reference"))
            .unwrap()
            .set_attribute("URI", "#_someone_else");

        let err = verify_signature(&root, &credentials).unwrap_err();
        assert!(matches!(err, SamlError::SignatureInvalid(_)));
        assert!(err.to_string().contains("reference URI"));
    }

    #[test]
    fn unsigned_element_is_reported_as_signature_invalid() {
        let credentials = SigningCredentials::generate().unwrap();
        assert!(matches!(
            verify_signature(&sample_root(), &credentials),
            Err(SamlError::SignatureInvalid(_))
        ));
    }
}
