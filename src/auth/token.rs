//! Partner OAuth token pair shared between the exchanger (writer) and the order verifier (reader).

// self
use crate::{_prelude::*, auth::Secret};

/// Access/refresh token pair issued by the partner OAuth endpoint.
///
/// Either half may be absent: a fresh deployment has no tokens, and the partner does not always
/// return a refresh token. The pair is always replaced as a whole, never merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Bearer token attached to order lookups.
	pub access_token: Option<Secret>,
	/// Refresh token kept for the operator; nothing refreshes automatically.
	pub refresh_token: Option<Secret>,
}
impl TokenPair {
	/// Builds a pair from raw strings, treating blank values as absent.
	pub fn new(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
		Self {
			access_token: access_token.and_then(Secret::non_empty),
			refresh_token: refresh_token.and_then(Secret::non_empty),
		}
	}

	/// Returns `true` when neither token is present.
	pub fn is_empty(&self) -> bool {
		self.access_token.is_none() && self.refresh_token.is_none()
	}

	/// Exposes the access token for an `Authorization: Bearer` header.
	pub fn bearer(&self) -> Option<&str> {
		self.access_token.as_ref().map(Secret::expose)
	}
}
