//! Demonstrates a full redemption against mocked partner and rental upstreams: verify an order,
//! rent a number for the chosen product, then poll until the OTP arrives or the window closes.

// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use voucher_otp::{
	auth::Secret,
	http::ReqwestHttpClient,
	partner::{ORDER_DETAIL_PATH, PartnerClient},
	redeem::Redeemer,
	rental::RentalClient,
	sign::Credential,
	store::MemoryStore,
	time::{Duration, OffsetDateTime},
	url::Url,
};

const RENTAL_PATH: &str = "/stubs/handler_api.php";
const POLL_INTERVAL: StdDuration = StdDuration::from_secs(15);

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path(ORDER_DETAIL_PATH);
			then.status(200).body(
				r#"{"error":"","response":{"order_list":[{"order_sn":"SHOPEE123","item_list":[{"item_name":"KFC E-Voucher"}]}]}}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(RENTAL_PATH).query_param("action", "getNumber");
			then.status(200).body("ACCESS_NUMBER:99:60198887777");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(RENTAL_PATH).query_param("action", "getStatus");
			then.status(200).body("STATUS_OK:778899");
		})
		.await;

	let partner = PartnerClient::new(
		ReqwestHttpClient::with_timeout(Duration::seconds(12))?,
		Url::parse(&server.base_url())?,
		Credential::new(1, Secret::new("demo-partner-key")),
		Arc::new(MemoryStore::default()),
	);
	let rental = RentalClient::new(
		ReqwestHttpClient::with_timeout(Duration::seconds(10))?,
		Url::parse(&server.url(RENTAL_PATH))?,
		Secret::new("demo-sms-key"),
	);
	let redeemer = Redeemer::new(partner, rental, 7);
	let redemption = redeemer.verify_and_provision("SHOPEE123", "kfc").await?;

	println!(
		"{} number {} (expires {})",
		redemption.display_name,
		redemption.activation.phone_number(),
		redemption.activation.deadline()
	);

	let mut session = redemption.session();

	while !session.is_terminal() {
		let status = session.advance(redeemer.rental(), OffsetDateTime::now_utc()).await;

		println!("status: {status:?}");

		if !session.is_terminal() {
			tokio::time::sleep(POLL_INTERVAL).await;
		}
	}

	Ok(())
}
