//! Assertion-namespace elements: issuer, subject identifiers and attributes.

pub mod attribute;
pub mod issuer;
pub mod name_id;
pub mod subject;

pub use attribute::Attribute;
pub use issuer::Issuer;
pub use name_id::{BaseId, EncryptedId, Identifier, NameId};
pub use subject::Subject;
