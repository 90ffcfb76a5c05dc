//! SAML-specific error types

use thiserror::Error;

/// Result type for SAML operations
pub type SamlResult<T> = Result<T, SamlError>;

/// SAML-specific errors
#[derive(Debug, Error)]
pub enum SamlError {
    /// Wrong tag or namespace, missing mandatory attribute or child,
    /// cardinality violation
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Attribute or text present but unparsable (bad timestamp, empty
    /// required string, non-base64 artifact)
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// API misuse, e.g. embedding a top-level message under a parent element
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Explicit signature verification failure. Kept distinct from
    /// `SchemaViolation`: a structurally valid message can carry a bad
    /// signature and vice versa.
    #[error("Signature invalid: {0}")]
    SignatureInvalid(String),

    /// XML reader/writer failure below the infoset layer
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// OpenSSL failure while signing or verifying
    #[error("Crypto error: {0}")]
    Crypto(#[from] openssl::error::ErrorStack),
}

impl SamlError {
    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        SamlError::SchemaViolation(msg.into())
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SamlError::MalformedValue(msg.into())
    }
}
