//! Error taxonomy shared by the partner client, the rental client, the token stores, and the
//! redemption orchestrator.

// self
use crate::{
	_prelude::*,
	auth::OrderId,
	partner::VerifiedOrder,
	product::Product,
	rental::NumberRejection,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network or timeout failure talking to an upstream.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream replied with a shape the parser does not recognize.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Partner rejected or could not find the order.
	#[error(transparent)]
	Verification(#[from] VerificationFailure),
	/// Rental provider did not issue a number.
	#[error(transparent)]
	Provisioning(#[from] ProvisioningFailure),
	/// OAuth code exchange failed.
	#[error(transparent)]
	Exchange(#[from] ExchangeFailure),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required setting is absent or empty.
	#[error("Required setting `{key}` is missing.")]
	MissingSetting {
		/// Environment key.
		key: &'static str,
	},
	/// A setting is present but cannot be parsed.
	#[error("Setting `{key}` has an invalid value: {reason}.")]
	InvalidSetting {
		/// Environment key.
		key: &'static str,
		/// Parser-supplied reason.
		reason: String,
	},
	/// An endpoint URL cannot be joined or parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Product choice has no service-code mapping.
	#[error("Product `{choice}` has no service-code mapping.")]
	UnmappedProduct {
		/// Raw choice submitted by the caller.
		choice: String,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The upstream did not answer within the configured timeout.
	#[error("Request to {endpoint} timed out.")]
	Timeout {
		/// Logical upstream name.
		endpoint: &'static str,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Logical upstream name.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Classifies a reqwest failure raised while calling `endpoint`.
	pub fn from_reqwest(endpoint: &'static str, err: ReqwestError) -> Self {
		if err.is_timeout() {
			Self::Timeout { endpoint }
		} else {
			Self::Network { endpoint, source: Box::new(err) }
		}
	}
}

/// Upstream reply did not match the expected wire format.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// The status tag is not one the provider documents.
	#[error("Unrecognized reply `{line}` from {endpoint}.")]
	UnknownTag {
		/// Logical upstream name.
		endpoint: &'static str,
		/// Raw reply line.
		line: String,
	},
	/// A positional field is absent or empty.
	#[error("Reply tag `{tag}` is missing its {field} field.")]
	MissingField {
		/// Status tag that carried the fields.
		tag: &'static str,
		/// Field name.
		field: &'static str,
	},
	/// A JSON body could not be decoded.
	#[error("Response from {endpoint} is not valid JSON.")]
	MalformedJson {
		/// Logical upstream name.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A provider-issued identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}

/// Order verification outcomes that stop a redemption.
#[derive(Debug, ThisError)]
pub enum VerificationFailure {
	/// Partner answered but did not confirm the order.
	#[error("Order `{order_id}` was not found: {reason}.")]
	NotFound {
		/// Order identifier submitted by the customer.
		order_id: OrderId,
		/// Partner-supplied or derived reason.
		reason: String,
	},
}

/// Failures raised while renting a virtual number.
#[derive(Debug, ThisError)]
pub enum ProvisioningFailure {
	/// Provider answered with a known non-success tag.
	#[error("Provider refused to issue a number: {0}.")]
	Rejected(NumberRejection),
	/// Provider answered with an unrecognized or malformed line.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Provider could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Failures raised while exchanging an authorization code.
#[derive(Debug, ThisError)]
pub enum ExchangeFailure {
	/// Callback arrived without a code.
	#[error("Authorization code is missing.")]
	MissingCode,
	/// Request body could not be serialized.
	#[error("Token request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
	/// Token endpoint could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with a non-success HTTP status.
	#[error("Token endpoint returned HTTP {status}: {message}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Partner-supplied message or body preview.
		message: String,
	},
	/// Token endpoint answered with a body that is not JSON.
	#[error(transparent)]
	Malformed(#[from] ProtocolError),
	/// Token endpoint answered without an access token.
	#[error("Token endpoint response is missing an access token{}.", .reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
	MissingAccessToken {
		/// Partner-supplied error, if any.
		reason: Option<String>,
	},
}

/// Failures surfaced by the redemption orchestrator, split by how far the redemption got.
#[derive(Debug, ThisError)]
pub enum RedeemError {
	/// Rejected before any outbound call.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The order could not be verified; nothing was provisioned.
	#[error("Order could not be verified.")]
	Verification {
		/// Verification or transport failure.
		#[source]
		source: Error,
	},
	/// The order is verified but no number could be provisioned.
	#[error("Order `{}` is verified but no {product} number could be provisioned.", .order.order_id)]
	Provisioning {
		/// Verified order, reusable for a later provisioning attempt.
		order: Box<VerifiedOrder>,
		/// Product the customer chose.
		product: Product,
		/// Provisioning failure.
		#[source]
		source: ProvisioningFailure,
	},
}
impl RedeemError {
	/// Returns the verified order when the failure happened after verification.
	pub fn verified_order(&self) -> Option<&VerifiedOrder> {
		match self {
			Self::Provisioning { order, .. } => Some(order.as_ref()),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_into_crate_error_with_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let err: Error = store_error.clone().into();

		assert!(matches!(err, Error::Storage(_)));
		assert!(err.to_string().contains("disk full"));

		let source =
			StdError::source(&err).expect("Crate error should expose the store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn missing_access_token_message_includes_reason() {
		let bare = ExchangeFailure::MissingAccessToken { reason: None };
		let with_reason =
			ExchangeFailure::MissingAccessToken { reason: Some("error_auth".into()) };

		assert_eq!(bare.to_string(), "Token endpoint response is missing an access token.");
		assert_eq!(
			with_reason.to_string(),
			"Token endpoint response is missing an access token (error_auth)."
		);
	}

	#[test]
	fn rejected_provisioning_names_the_tag() {
		let err = ProvisioningFailure::Rejected(NumberRejection::NoNumbers);

		assert_eq!(err.to_string(), "Provider refused to issue a number: NO_NUMBERS.");
	}
}
