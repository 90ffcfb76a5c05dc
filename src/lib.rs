//! SAML 2.0 protocol messages: a typed object model with a bidirectional
//! XML codec.
//!
//! The crate covers the single-logout and query side of the protocol:
//! [`samlp::LogoutRequest`], [`samlp::LogoutResponse`],
//! [`samlp::AttributeQuery`] and [`samlp::ArtifactResolve`], plus the
//! protocol elements that travel inside them (status codes, session
//! indexes, IDP lists) and the assertion-namespace leaves they reference
//! (issuer, name identifiers, subjects, attributes).
//!
//! Decoding is strict: wrong namespaces, missing mandatory parts and
//! cardinality violations fail with [`SamlError::SchemaViolation`], broken
//! values with [`SamlError::MalformedValue`]. Encoding is deterministic, so
//! a decoded message re-encodes to an equivalent document and enveloped
//! signatures survive the round trip. Signatures are never verified
//! implicitly; call [`sig::verify_signature`] against a key you already
//! trust.
//!
//! ```no_run
//! use saml2_proto::saml::{Issuer, NameId};
//! use saml2_proto::samlp::{Envelope, LogoutRequest};
//!
//! # fn main() -> saml2_proto::SamlResult<()> {
//! let envelope = Envelope::new()
//!     .with_issuer(Issuer::new("urn:example:sp")?)
//!     .with_destination("https://idp.example.org/slo");
//! let request = LogoutRequest::new(NameId::new("user@example.org")?, envelope);
//! let xml = request.to_document()?;
//! let decoded = LogoutRequest::from_document(&xml)?;
//! # Ok(())
//! # }
//! ```

pub mod element;
pub mod error;
pub mod ns;
pub mod saml;
pub mod samlp;
pub mod sig;
pub mod xml;

pub use element::SamlElement;
pub use error::{SamlError, SamlResult};
