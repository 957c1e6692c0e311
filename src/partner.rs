//! Signed partner API client: order verification and OAuth code exchange.
//!
//! Both calls sign `partner_id || path || timestamp || body` with the partner key (see
//! [`crate::sign`]). The order lookup reads the bearer token from the shared [`TokenStore`]; the
//! code exchange is the only writer of that store.

pub mod order;
pub mod token;

pub use order::*;
pub use token::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::ReqwestHttpClient,
	sign::{Credential, Signer},
	store::TokenStore,
};

/// Partner order-detail path (also part of the signature base string).
pub const ORDER_DETAIL_PATH: &str = "/api/v2/order/get_order_detail";
/// Partner token path (also part of the signature base string).
pub const TOKEN_PATH: &str = "/api/v2/auth/token/get";

const ENDPOINT: &str = "partner API";

/// Client for the partner's signed REST API.
#[derive(Clone)]
pub struct PartnerClient {
	http: ReqwestHttpClient,
	base_url: Url,
	signer: Signer,
	shop_id: Option<u64>,
	store: Arc<dyn TokenStore>,
}
impl PartnerClient {
	/// Creates a client rooted at `base_url` (scheme + host, any path is replaced).
	pub fn new(
		http: ReqwestHttpClient,
		base_url: Url,
		credential: Credential,
		store: Arc<dyn TokenStore>,
	) -> Self {
		Self { http, base_url, signer: Signer::new(credential), shop_id: None, store }
	}

	/// Sets the shop id sent with order lookups and used as the OAuth callback fallback.
	pub fn with_shop_id(mut self, shop_id: Option<u64>) -> Self {
		self.shop_id = shop_id;

		self
	}

	/// Configured shop id, if any.
	pub fn shop_id(&self) -> Option<u64> {
		self.shop_id
	}

	/// Token store shared with the exchanger.
	pub fn store(&self) -> &Arc<dyn TokenStore> {
		&self.store
	}

	fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url.join(path).map_err(|source| ConfigError::InvalidEndpoint { source })
	}
}
impl Debug for PartnerClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PartnerClient")
			.field("base_url", &self.base_url.as_str())
			.field("partner_id", &self.signer.partner_id())
			.field("shop_id", &self.shop_id)
			.finish()
	}
}

fn unix_now() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
