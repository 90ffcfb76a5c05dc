//! XML infoset layer: an owned, namespace-aware element tree plus the
//! xs:dateTime codec shared by every protocol message.

pub mod datetime;
pub mod node;

pub use node::{Node, NodeContent};
