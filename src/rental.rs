//! Rental-provider client: virtual number acquisition and OTP status polling.
//!
//! The provider speaks a plain-text, colon-delimited protocol over `GET` requests to a single
//! handler endpoint; [`protocol`] turns those lines into typed replies.

pub mod activation;
pub mod poll;
pub mod protocol;
pub mod provision;
pub mod session;

pub use activation::*;
pub use poll::*;
pub use protocol::*;
pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::DEFAULT_OTP_WINDOW_SECS,
	error::TransportError,
	http::{RawResponse, ReqwestHttpClient},
};

const ENDPOINT: &str = "rental provider";

/// Client for the rental provider's handler endpoint.
#[derive(Clone)]
pub struct RentalClient {
	http: ReqwestHttpClient,
	endpoint: Url,
	api_key: Secret,
	otp_window: Duration,
}
impl RentalClient {
	/// Creates a client for `endpoint` authenticated with `api_key`, using the default OTP window.
	pub fn new(http: ReqwestHttpClient, endpoint: Url, api_key: Secret) -> Self {
		Self { http, endpoint, api_key, otp_window: Duration::seconds(DEFAULT_OTP_WINDOW_SECS) }
	}

	/// Overrides the lifetime given to newly provisioned activations.
	pub fn with_otp_window(mut self, otp_window: Duration) -> Self {
		self.otp_window = otp_window;

		self
	}

	/// Lifetime given to newly provisioned activations.
	pub fn otp_window(&self) -> Duration {
		self.otp_window
	}

	/// Handler endpoint.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Sends one `action` call and returns the trimmed reply line.
	async fn call(&self, action: &str, params: &[(&str, &str)]) -> Result<String, TransportError> {
		let response = self
			.http
			.get(self.endpoint.clone())
			.query(&[("api_key", self.api_key.expose()), ("action", action)])
			.query(params)
			.send()
			.await
			.map_err(|e| TransportError::from_reqwest(ENDPOINT, e))?;
		let raw =
			RawResponse::read(response).await.map_err(|e| TransportError::from_reqwest(ENDPOINT, e))?;

		Ok(raw.text())
	}
}
impl Debug for RentalClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RentalClient")
			.field("endpoint", &self.endpoint.as_str())
			.field("api_key", &self.api_key)
			.field("otp_window", &self.otp_window)
			.finish()
	}
}
