mod common;

// std
use std::{collections::HashMap, env, fs, path::PathBuf, process};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use voucher_otp::{
	auth::TokenPair,
	config::Settings,
	partner::TOKEN_PATH,
	redeem::Redeemer,
	store::{FileStore, MemoryStore, TokenStore},
};

fn temp_token_file(tag: &str) -> PathBuf {
	env::temp_dir().join(format!("voucher_otp_store_it_{tag}_{}.env", process::id()))
}

#[tokio::test]
async fn memory_store_set_fully_replaces_the_pair() {
	let store = MemoryStore::default();

	store.set(TokenPair::new(Some("a"), Some("b"))).await.expect("First set should succeed.");

	assert_eq!(
		store.get().await.expect("Read should succeed."),
		TokenPair::new(Some("a"), Some("b"))
	);

	store.set(TokenPair::new(Some("c"), None)).await.expect("Second set should succeed.");

	assert_eq!(store.get().await.expect("Read should succeed."), TokenPair::new(Some("c"), None));
}

#[tokio::test]
async fn oauth_callback_persists_tokens_into_the_configured_file() {
	let server = MockServer::start_async().await;
	let path = temp_token_file("callback");

	fs::write(&path, "PARTNER_ID=2001887\nACCESS_TOKEN=stale\nSMS_API_KEY=sms-key-it\n")
		.expect("Failed to seed token file fixture.");

	let pairs: HashMap<&str, String> = HashMap::from([
		("PARTNER_ID", PARTNER_ID.to_string()),
		("PARTNER_KEY", PARTNER_KEY.to_owned()),
		("SHOP_ID", "55".to_owned()),
		("SMS_API_KEY", SMS_API_KEY.to_owned()),
		("COUNTRY_CODE", COUNTRY_CODE.to_string()),
		("PARTNER_BASE_URL", server.base_url()),
		("SMS_API_URL", server.url(RENTAL_PATH)),
		("TOKEN_FILE", path.display().to_string()),
	]);
	let settings =
		Settings::from_lookup(|key| pairs.get(key).cloned()).expect("Settings should load.");
	let redeemer = Redeemer::from_settings(&settings).expect("Redeemer should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body_includes(r#""shop_id":55}"#);
			then.status(200)
				.body(r#"{"response":{"access_token":"fresh-a","refresh_token":"fresh-r"}}"#);
		})
		.await;

	redeemer.handle_oauth_callback("code", None).await.expect("Callback should succeed.");

	mock.assert_calls_async(1).await;

	assert_eq!(
		fs::read_to_string(&path).expect("Token file should be readable."),
		"PARTNER_ID=2001887\nSMS_API_KEY=sms-key-it\nACCESS_TOKEN=fresh-a\nREFRESH_TOKEN=fresh-r\n"
	);

	let reopened = FileStore::open(&path).expect("Token file should reopen.");

	assert_eq!(
		reopened.get().await.expect("Read should succeed."),
		TokenPair::new(Some("fresh-a"), Some("fresh-r"))
	);

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary token file {}: {e}", path.display())
	});
}
