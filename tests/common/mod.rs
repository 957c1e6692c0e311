//! Shared fixtures for integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
// self
use voucher_otp::{
	auth::Secret,
	http::ReqwestHttpClient,
	partner::PartnerClient,
	redeem::Redeemer,
	rental::RentalClient,
	sign::Credential,
	store::{MemoryStore, TokenStore},
	time::Duration,
	url::Url,
};

pub const PARTNER_ID: u64 = 2_001_887;
pub const PARTNER_KEY: &str = "partner-key-it";
pub const SMS_API_KEY: &str = "sms-key-it";
pub const COUNTRY_CODE: u32 = 7;
pub const RENTAL_PATH: &str = "/stubs/handler_api.php";

/// Client that gives up long before a delayed mock answers.
pub fn impatient_http() -> ReqwestHttpClient {
	ReqwestHttpClient::with_timeout(Duration::milliseconds(200))
		.expect("Short-timeout client should build.")
}

pub fn partner_client(server: &MockServer, store: Arc<dyn TokenStore>) -> PartnerClient {
	partner_client_with(server, store, ReqwestHttpClient::default())
}

pub fn partner_client_with(
	server: &MockServer,
	store: Arc<dyn TokenStore>,
	http: ReqwestHttpClient,
) -> PartnerClient {
	PartnerClient::new(
		http,
		Url::parse(&server.base_url()).expect("Mock partner base URL should parse."),
		Credential::new(PARTNER_ID, Secret::new(PARTNER_KEY)),
		store,
	)
}

pub fn rental_client(server: &MockServer) -> RentalClient {
	rental_client_with(server, ReqwestHttpClient::default())
}

pub fn rental_client_with(server: &MockServer, http: ReqwestHttpClient) -> RentalClient {
	RentalClient::new(
		http,
		Url::parse(&server.url(RENTAL_PATH)).expect("Mock rental endpoint should parse."),
		Secret::new(SMS_API_KEY),
	)
}

/// Redeemer whose partner and rental upstreams both point at `server`.
pub fn redeemer(server: &MockServer) -> (Redeemer, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let redeemer = Redeemer::new(
		partner_client(server, store.clone()),
		rental_client(server),
		COUNTRY_CODE,
	);

	(redeemer, store)
}

pub fn order_detail_body(order_sn: &str, item_name: &str) -> String {
	format!(
		r#"{{"error":"","message":"","request_id":"req-1","response":{{"order_list":[{{"order_sn":"{order_sn}","order_status":"COMPLETED","item_list":[{{"item_name":"{item_name}"}}]}}]}}}}"#
	)
}
