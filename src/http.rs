//! Shared reqwest transport for the partner and rental clients.
//!
//! Every upstream call is a single attempt bounded by the timeout the client was built with; there
//! are no retries at this layer. Redirects are not followed, because both upstreams answer
//! directly and a redirect would re-send signed payloads somewhere unexpected.

// std
use std::ops::Deref;
// crates.io
use reqwest::{Response, redirect::Policy};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, ProtocolError},
};

/// Thin wrapper around [`ReqwestClient`] so timeout and redirect policy live in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client whose requests give up after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let timeout = timeout.try_into().map_err(|_| ConfigError::InvalidSetting {
			key: "timeout",
			reason: "must be positive".into(),
		})?;
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Status and raw body of a completed upstream response.
#[derive(Clone, Debug)]
pub(crate) struct RawResponse {
	pub(crate) status: u16,
	pub(crate) body: Vec<u8>,
}
impl RawResponse {
	pub(crate) async fn read(response: Response) -> Result<Self, ReqwestError> {
		let status = response.status().as_u16();
		let body = response.bytes().await?.to_vec();

		Ok(Self { status, body })
	}

	pub(crate) fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as JSON, reporting the failing path on error.
	pub(crate) fn json<T>(&self, endpoint: &'static str) -> Result<T, ProtocolError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ProtocolError::MalformedJson { endpoint, source })
	}

	/// Body as text with surrounding whitespace removed.
	pub(crate) fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).trim().to_owned()
	}

	/// Shortened body for error messages.
	pub(crate) fn preview(&self) -> String {
		const MAX: usize = 200;

		let text = self.text();

		match text.char_indices().nth(MAX) {
			Some((idx, _)) => format!("{}...", &text[..idx]),
			None => text,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builds_with_positive_timeout() {
		assert!(ReqwestHttpClient::with_timeout(Duration::seconds(12)).is_ok());
	}

	#[test]
	fn rejects_negative_timeout() {
		let err = ReqwestHttpClient::with_timeout(Duration::seconds(-1))
			.expect_err("Negative timeouts cannot be converted.");

		assert!(matches!(err, ConfigError::InvalidSetting { key: "timeout", .. }));
	}

	#[test]
	fn preview_truncates_long_bodies() {
		let raw = RawResponse { status: 500, body: "x".repeat(500).into_bytes() };

		assert!(!raw.is_success());
		assert_eq!(raw.preview().len(), 203);

		let short = RawResponse { status: 204, body: b"  ok \n".to_vec() };

		assert!(short.is_success());
		assert_eq!(short.preview(), "ok");
	}

	#[test]
	fn json_errors_carry_the_failing_path() {
		#[derive(Debug, Deserialize)]
		struct Probe {
			#[allow(dead_code)]
			count: u8,
		}

		let raw = RawResponse { status: 200, body: br#"{"count":"many"}"#.to_vec() };
		let err = raw.json::<Probe>("probe").expect_err("A string is not a u8.");

		match err {
			ProtocolError::MalformedJson { endpoint, source } => {
				assert_eq!(endpoint, "probe");
				assert_eq!(source.path().to_string(), "count");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}
}
