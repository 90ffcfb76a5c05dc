//! Enveloped signatures over complete protocol documents.

use saml2_proto::saml::{Issuer, NameId, Subject};
use saml2_proto::samlp::{AttributeQuery, Envelope, LogoutRequest};
use saml2_proto::sig::{verify_signature, SigningCredentials};
use saml2_proto::xml::Node;
use saml2_proto::SamlError;

fn signed_query_document(credentials: &SigningCredentials) -> String {
    let envelope = Envelope::new().with_issuer(Issuer::new("urn:example:sp").unwrap());
    let mut query = AttributeQuery::new(
        Subject::new(NameId::new("user@example.org").unwrap()),
        envelope,
    );
    query
        .envelope_mut()
        .set_signing_credentials(credentials.clone());
    query.to_document().unwrap()
}

#[test]
fn signed_document_verifies_after_decode() {
    let credentials = SigningCredentials::generate().unwrap();
    let xml = signed_query_document(&credentials);

    let decoded = AttributeQuery::from_document(&xml).unwrap();
    assert!(decoded.envelope().signature().is_some());

    verify_signature(&Node::parse(&xml).unwrap(), &credentials).unwrap();
}

#[test]
fn wrong_key_is_signature_invalid() {
    let signer = SigningCredentials::generate().unwrap();
    let other = SigningCredentials::generate().unwrap();
    let xml = signed_query_document(&signer);
    assert!(matches!(
        verify_signature(&Node::parse(&xml).unwrap(), &other),
        Err(SamlError::SignatureInvalid(_))
    ));
}

#[test]
fn decode_does_not_verify() {
    // A document whose content was altered after signing still decodes; the
    // broken signature only surfaces when verification is requested.
    let credentials = SigningCredentials::generate().unwrap();
    let xml = signed_query_document(&credentials)
        .replace("user@example.org", "mallory@example.org");

    let decoded = AttributeQuery::from_document(&xml).unwrap();
    assert!(decoded.envelope().signature().is_some());
    assert_eq!(
        decoded
            .subject()
            .identifier()
            .as_name_id()
            .map(NameId::value),
        Some("mallory@example.org")
    );

    assert!(matches!(
        verify_signature(&Node::parse(&xml).unwrap(), &credentials),
        Err(SamlError::SignatureInvalid(_))
    ));
}

#[test]
fn carried_signature_survives_reencoding() {
    let credentials = SigningCredentials::generate().unwrap();
    let xml = signed_query_document(&credentials);

    // Decode and re-encode without touching anything; the signature is
    // re-emitted verbatim and must still verify.
    let decoded = AttributeQuery::from_document(&xml).unwrap();
    let reencoded = decoded.to_document().unwrap();
    verify_signature(&Node::parse(&reencoded).unwrap(), &credentials).unwrap();
}

#[test]
fn signing_requires_an_id() {
    let credentials = SigningCredentials::generate().unwrap();
    let mut node = Node::new("urn:oasis:names:tc:SAML:2.0:protocol", "LogoutRequest");
    assert!(matches!(
        saml2_proto::sig::sign_element(&mut node, &credentials),
        Err(SamlError::InvalidState(_))
    ));
}

#[test]
fn signature_is_placed_after_issuer_in_the_document() {
    let credentials = SigningCredentials::generate().unwrap();
    let envelope = Envelope::new().with_issuer(Issuer::new("urn:example:sp").unwrap());
    let mut request = LogoutRequest::new(NameId::new("user@example.org").unwrap(), envelope);
    request
        .envelope_mut()
        .set_signing_credentials(credentials.clone());

    let root = Node::parse(&request.to_document().unwrap()).unwrap();
    assert_eq!(
        root.position_of_child("urn:oasis:names:tc:SAML:2.0:assertion", "Issuer"),
        Some(0)
    );
    assert_eq!(
        root.position_of_child("http://www.w3.org/2000/09/xmldsig#", "Signature"),
        Some(1)
    );
}
