//! Protocol-namespace elements and the four concrete message types.

pub mod artifact_resolve;
pub mod attribute_query;
pub mod envelope;
pub mod idp_list;
pub mod logout_request;
pub mod logout_response;
pub mod session_index;
pub mod status;

pub use artifact_resolve::ArtifactResolve;
pub use attribute_query::AttributeQuery;
pub use envelope::{Envelope, Extensions};
pub use idp_list::{GetComplete, IdpEntry, IdpList, RequesterId};
pub use logout_request::LogoutRequest;
pub use logout_response::LogoutResponse;
pub use session_index::SessionIndex;
pub use status::{Status, StatusCode, StatusDetail};
