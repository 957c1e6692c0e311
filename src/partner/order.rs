//! Order verification against the partner order-detail endpoint.

// self
use crate::{
	_prelude::*,
	auth::OrderId,
	error::TransportError,
	http::RawResponse,
	obs::{self, FlowKind},
	partner::{ENDPOINT, ORDER_DETAIL_PATH, PartnerClient, unix_now},
};

/// Outcome of a single order lookup that reached the partner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderVerification {
	/// The partner returned details for the order.
	Verified(VerifiedOrder),
	/// The partner answered but did not confirm the order.
	NotFound {
		/// Partner error and message, or a description of the empty payload.
		reason: String,
	},
}

/// An order the partner confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerifiedOrder {
	/// Order identifier submitted by the customer.
	pub order_id: OrderId,
	/// Partner-reported details.
	pub details: OrderDetails,
}
impl VerifiedOrder {
	/// Name of the first item on the first listed order, as the partner spells it.
	pub fn first_item_name(&self) -> Option<&str> {
		self.details
			.order_list
			.first()
			.and_then(|order| order.item_list.first())
			.map(|item| item.item_name.as_str())
			.filter(|name| !name.is_empty())
	}
}

/// `response` payload of the order-detail endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
	/// Orders matching the requested ids.
	#[serde(default)]
	pub order_list: Vec<OrderSummary>,
}

/// One order in [`OrderDetails`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
	/// Partner order serial number.
	#[serde(default)]
	pub order_sn: String,
	/// Partner order status (e.g. `COMPLETED`).
	#[serde(default)]
	pub order_status: Option<String>,
	/// Purchased items.
	#[serde(default)]
	pub item_list: Vec<OrderItem>,
}

/// One purchased item in [`OrderSummary`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
	/// Listing title.
	#[serde(default)]
	pub item_name: String,
}

#[derive(Debug, Serialize)]
struct OrderDetailRequest<'a> {
	partner_id: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	shop_id: Option<u64>,
	timestamp: i64,
	sign: String,
	order_sn_list: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	response: Option<OrderDetails>,
}

impl PartnerClient {
	/// Looks `order_id` up once; transport and decoding failures are errors, a partner answer
	/// that does not confirm the order is [`OrderVerification::NotFound`].
	pub async fn verify_order(&self, order_id: &OrderId) -> Result<OrderVerification> {
		obs::observe(FlowKind::VerifyOrder, "verify_order", self.verify_order_once(order_id)).await
	}

	async fn verify_order_once(&self, order_id: &OrderId) -> Result<OrderVerification> {
		let url = self.endpoint(ORDER_DETAIL_PATH)?;
		let timestamp = unix_now();
		let body = OrderDetailRequest {
			partner_id: self.signer.partner_id(),
			shop_id: self.shop_id,
			timestamp,
			sign: self.signer.sign(ORDER_DETAIL_PATH, timestamp, ""),
			order_sn_list: [order_id.as_str()],
		};
		let tokens = self.store.get().await?;
		let mut request = self.http.post(url).json(&body);

		if let Some(token) = tokens.bearer() {
			request = request.bearer_auth(token);
		}

		let response =
			request.send().await.map_err(|e| TransportError::from_reqwest(ENDPOINT, e))?;
		let raw =
			RawResponse::read(response).await.map_err(|e| TransportError::from_reqwest(ENDPOINT, e))?;

		classify_order_response(order_id, &raw)
	}
}

fn classify_order_response(order_id: &OrderId, raw: &RawResponse) -> Result<OrderVerification> {
	let envelope: OrderEnvelope = raw.json(ENDPOINT)?;

	if let Some(error) = envelope.error.filter(|e| !e.is_empty()) {
		let reason = match envelope.message.filter(|m| !m.is_empty()) {
			Some(message) => format!("{error}: {message}"),
			None => error,
		};

		return Ok(OrderVerification::NotFound { reason });
	}

	Ok(match envelope.response {
		Some(details) if !details.order_list.is_empty() =>
			OrderVerification::Verified(VerifiedOrder { order_id: order_id.clone(), details }),
		Some(_) => OrderVerification::NotFound { reason: "partner listed no matching orders".into() },
		None => OrderVerification::NotFound {
			reason: format!("partner answered HTTP {} without an order payload", raw.status),
		},
	})
}
