//! Redemption orchestration, the surface the presentation layer calls.
//!
//! A redemption verifies the order first and provisions a number only for a verified order. The
//! product choice is parsed before anything else, so an unknown product never reaches either
//! upstream.

// self
use crate::{
	_prelude::*,
	auth::{ActivationId, OrderId, TokenPair},
	config::Settings,
	error::{ConfigError, RedeemError, VerificationFailure},
	http::ReqwestHttpClient,
	obs::{self, FlowKind},
	partner::{OrderVerification, PartnerClient, VerifiedOrder},
	product::Product,
	rental::{Activation, OtpSession, OtpStatus, RentalClient},
	store::{FileStore, TokenStore},
};

/// A verified order with a freshly provisioned number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Redemption {
	/// Product the customer chose.
	pub product: Product,
	/// Product label shown to the customer.
	pub display_name: &'static str,
	/// First item name on the order, as the partner reports it.
	pub item_name: Option<String>,
	/// Rented number and its deadline.
	pub activation: Activation,
	/// Partner-confirmed order.
	pub order: VerifiedOrder,
}
impl Redemption {
	/// Starts tracking the OTP for this redemption's activation.
	pub fn session(&self) -> OtpSession {
		OtpSession::new(self.activation.clone())
	}
}

/// Poll result in the shape the page expects: a code, or nothing yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OtpReply {
	/// Delivered code, if any.
	pub code: Option<String>,
}
impl From<OtpStatus> for OtpReply {
	fn from(status: OtpStatus) -> Self {
		match status {
			OtpStatus::Delivered { code } => Self { code: Some(code) },
			OtpStatus::Pending | OtpStatus::Expired => Self { code: None },
		}
	}
}

/// Composes order verification, number provisioning, OTP polling and the OAuth callback.
#[derive(Clone, Debug)]
pub struct Redeemer {
	partner: PartnerClient,
	rental: RentalClient,
	country_code: u32,
}
impl Redeemer {
	/// Creates an orchestrator renting numbers in `country_code`.
	pub fn new(partner: PartnerClient, rental: RentalClient, country_code: u32) -> Self {
		Self { partner, rental, country_code }
	}

	/// Builds both clients from `settings`, persisting tokens to the configured token file.
	pub fn from_settings(settings: &Settings) -> Result<Self> {
		let store = FileStore::open(&settings.token_file)?;

		Ok(Self::from_settings_with_store(settings, Arc::new(store))?)
	}

	/// Builds both clients from `settings` around an existing token store.
	pub fn from_settings_with_store(
		settings: &Settings,
		store: Arc<dyn TokenStore>,
	) -> Result<Self, ConfigError> {
		let partner = PartnerClient::new(
			ReqwestHttpClient::with_timeout(settings.partner_timeout)?,
			settings.partner_base_url.clone(),
			settings.credential.clone(),
			store,
		)
		.with_shop_id(settings.shop_id);
		let rental = RentalClient::new(
			ReqwestHttpClient::with_timeout(settings.rental_timeout)?,
			settings.rental_endpoint.clone(),
			settings.sms_api_key.clone(),
		)
		.with_otp_window(settings.otp_window);

		Ok(Self::new(partner, rental, settings.country_code))
	}

	/// Partner client.
	pub fn partner(&self) -> &PartnerClient {
		&self.partner
	}

	/// Rental client.
	pub fn rental(&self) -> &RentalClient {
		&self.rental
	}

	/// Country numbers are rented in.
	pub fn country_code(&self) -> u32 {
		self.country_code
	}

	/// Verifies `order_id` and rents a number for `product_choice`.
	///
	/// A failure after verification is [`RedeemError::Provisioning`] and carries the verified order
	/// for [`Redeemer::provision`].
	pub async fn verify_and_provision(
		&self,
		order_id: &str,
		product_choice: &str,
	) -> Result<Redemption, RedeemError> {
		obs::observe(
			FlowKind::Redeem,
			"verify_and_provision",
			self.redeem_once(order_id, product_choice),
		)
		.await
	}

	/// Rents a number for an order that is already verified.
	pub async fn provision(
		&self,
		order: &VerifiedOrder,
		product: Product,
	) -> Result<Redemption, RedeemError> {
		self.provision_verified(order.clone(), product).await
	}

	/// Polls `activation_id` once. Pending, expired and failed polls all read as no code.
	pub async fn poll_otp(&self, activation_id: &str) -> Result<OtpReply, ConfigError> {
		let activation_id = ActivationId::new(activation_id)?;

		Ok(self.rental.poll(&activation_id).await.into())
	}

	/// Exchanges the authorization code from a partner redirect.
	///
	/// A parsable `shop_id` wins, then the configured shop, then `0`.
	pub async fn handle_oauth_callback(
		&self,
		code: &str,
		shop_id: Option<&str>,
	) -> Result<TokenPair> {
		let shop_id = shop_id
			.and_then(|raw| raw.trim().parse::<u64>().ok())
			.or(self.partner.shop_id())
			.unwrap_or(0);

		self.partner.exchange_code(code, shop_id).await
	}

	async fn redeem_once(
		&self,
		order_id: &str,
		product_choice: &str,
	) -> Result<Redemption, RedeemError> {
		let product = product_choice.parse::<Product>()?;
		let order_id = OrderId::new(order_id.trim()).map_err(ConfigError::from)?;
		let order = self.verify(order_id).await?;

		self.provision_verified(order, product).await
	}

	async fn verify(&self, order_id: OrderId) -> Result<VerifiedOrder, RedeemError> {
		match self.partner.verify_order(&order_id).await {
			Ok(OrderVerification::Verified(order)) => Ok(order),
			Ok(OrderVerification::NotFound { reason }) => Err(RedeemError::Verification {
				source: VerificationFailure::NotFound { order_id, reason }.into(),
			}),
			Err(source) => Err(RedeemError::Verification { source }),
		}
	}

	async fn provision_verified(
		&self,
		order: VerifiedOrder,
		product: Product,
	) -> Result<Redemption, RedeemError> {
		match self.rental.provision(product.service_code(), self.country_code).await {
			Ok(activation) => Ok(Redemption {
				product,
				display_name: product.label(),
				item_name: order.first_item_name().map(str::to_owned),
				activation,
				order,
			}),
			Err(source) =>
				Err(RedeemError::Provisioning { order: Box::new(order), product, source }),
		}
	}
}
