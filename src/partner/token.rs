//! Authorization-code exchange against the partner token endpoint.
//!
//! The request carries `partner_id`, `timestamp` and `sign` as query parameters and a compact JSON
//! body; the signature covers that exact body text. Tokens may come back nested under `response` or
//! at the top level, and the nested value wins when both are present and non-empty.

// crates.io
use reqwest::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	auth::{Secret, TokenPair},
	error::{ExchangeFailure, TransportError},
	http::RawResponse,
	obs::{self, FlowKind},
	partner::{ENDPOINT, PartnerClient, TOKEN_PATH, unix_now},
};

/// Signed token request, ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTokenRequest {
	/// Compact JSON body; the signature covers this exact text.
	pub body: String,
	/// Partner id sent as a query parameter.
	pub partner_id: u64,
	/// Unix timestamp (seconds) used in the signature.
	pub timestamp: i64,
	/// Lowercase hex HMAC-SHA256 signature.
	pub sign: String,
}
impl SignedTokenRequest {
	/// Query parameters carried alongside the body.
	pub fn query(&self) -> [(&'static str, String); 3] {
		[
			("partner_id", self.partner_id.to_string()),
			("timestamp", self.timestamp.to_string()),
			("sign", self.sign.clone()),
		]
	}
}

#[derive(Debug, Serialize)]
struct TokenRequestBody<'a> {
	code: &'a str,
	partner_id: u64,
	shop_id: u64,
}

#[derive(Debug, Default, Deserialize)]
struct TokenFields {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
	#[serde(flatten)]
	flat: TokenFields,
	#[serde(default)]
	response: Option<TokenFields>,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	message: Option<String>,
}
impl TokenEnvelope {
	fn reason(&self) -> Option<String> {
		let error = self.error.as_deref().filter(|e| !e.is_empty());
		let message = self.message.as_deref().filter(|m| !m.is_empty());

		match (error, message) {
			(Some(error), Some(message)) => Some(format!("{error}: {message}")),
			(Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
			(None, None) => None,
		}
	}
}

impl PartnerClient {
	/// Builds the signed request for `code` and `shop_id` at `timestamp`.
	pub fn sign_token_request(
		&self,
		code: &str,
		shop_id: u64,
		timestamp: i64,
	) -> Result<SignedTokenRequest, ExchangeFailure> {
		let partner_id = self.signer.partner_id();
		let body = serde_json::to_string(&TokenRequestBody { code, partner_id, shop_id })
			.map_err(ExchangeFailure::Encode)?;
		let sign = self.signer.sign(TOKEN_PATH, timestamp, &body);

		Ok(SignedTokenRequest { body, partner_id, timestamp, sign })
	}

	/// Exchanges an authorization code for a token pair and stores the pair on success.
	///
	/// The store is left untouched on any failure.
	pub async fn exchange_code(&self, code: &str, shop_id: u64) -> Result<TokenPair> {
		obs::observe(FlowKind::ExchangeCode, "exchange_code", self.exchange_code_once(code, shop_id))
			.await
	}

	async fn exchange_code_once(&self, code: &str, shop_id: u64) -> Result<TokenPair> {
		if code.trim().is_empty() {
			return Err(ExchangeFailure::MissingCode.into());
		}

		let url = self.endpoint(TOKEN_PATH)?;
		let signed = self.sign_token_request(code, shop_id, unix_now())?;
		let transport = |e| ExchangeFailure::Transport(TransportError::from_reqwest(ENDPOINT, e));
		let response = self
			.http
			.post(url)
			.query(&signed.query())
			.header(CONTENT_TYPE, "application/json")
			.body(signed.body)
			.send()
			.await
			.map_err(transport)?;
		let raw = RawResponse::read(response).await.map_err(transport)?;
		let pair = parse_token_response(&raw)?;

		self.store.set(pair.clone()).await?;

		Ok(pair)
	}
}

fn parse_token_response(raw: &RawResponse) -> Result<TokenPair, ExchangeFailure> {
	if !raw.is_success() {
		let message = raw
			.json::<TokenEnvelope>(ENDPOINT)
			.ok()
			.and_then(|envelope| envelope.reason())
			.unwrap_or_else(|| raw.preview());

		return Err(ExchangeFailure::Status { status: raw.status, message });
	}

	let envelope: TokenEnvelope = raw.json(ENDPOINT)?;
	let reason = envelope.reason();
	let nested = envelope.response.unwrap_or_default();
	let pick = |nested: Option<String>, flat: Option<String>| {
		nested.filter(|v| !v.is_empty()).or_else(|| flat.filter(|v| !v.is_empty()))
	};
	let Some(access_token) = pick(nested.access_token, envelope.flat.access_token) else {
		return Err(ExchangeFailure::MissingAccessToken { reason });
	};
	let refresh_token = pick(nested.refresh_token, envelope.flat.refresh_token);

	Ok(TokenPair {
		access_token: Some(Secret::new(access_token)),
		refresh_token: refresh_token.map(Secret::new),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::Error, http::ReqwestHttpClient, sign::Credential, store::MemoryStore};

	fn raw(status: u16, body: &str) -> RawResponse {
		RawResponse { status, body: body.as_bytes().to_vec() }
	}

	fn client() -> PartnerClient {
		PartnerClient::new(
			ReqwestHttpClient::default(),
			Url::parse("https://partner.example").expect("Base URL fixture should parse."),
			Credential::new(1_001, Secret::new("partner-key")),
			Arc::new(MemoryStore::default()),
		)
	}

	#[test]
	fn signed_request_body_is_compact_and_signed_verbatim() {
		let client = client();
		let signed = client
			.sign_token_request("auth-code", 55, 1_700_000_000)
			.expect("Token request should sign.");

		assert_eq!(signed.body, r#"{"code":"auth-code","partner_id":1001,"shop_id":55}"#);
		assert_eq!(
			signed.sign,
			crate::sign::hmac_sha256_hex(
				b"partner-key",
				format!("1001{TOKEN_PATH}1700000000{}", signed.body).as_bytes(),
			)
		);
		assert_eq!(signed.query()[0], ("partner_id", "1001".to_owned()));
		assert_eq!(signed.query()[1], ("timestamp", "1700000000".to_owned()));
	}

	#[test]
	fn nested_tokens_win_over_flat_ones() {
		let pair = parse_token_response(&raw(
			200,
			r#"{"access_token":"flat-a","refresh_token":"flat-r","response":{"access_token":"nested-a"}}"#,
		))
		.expect("Nested tokens should parse.");

		assert_eq!(pair, TokenPair::new(Some("nested-a"), Some("flat-r")));
	}

	#[test]
	fn flat_tokens_are_accepted_and_blanks_fall_through() {
		let pair = parse_token_response(&raw(
			200,
			r#"{"access_token":"flat-a","refresh_token":"flat-r","response":{"access_token":""}}"#,
		))
		.expect("Flat tokens should parse.");

		assert_eq!(pair, TokenPair::new(Some("flat-a"), Some("flat-r")));
	}

	#[test]
	fn missing_access_token_carries_the_partner_reason() {
		let err = parse_token_response(&raw(
			200,
			r#"{"error":"error_param","message":"Invalid code.","response":{}}"#,
		))
		.expect_err("Responses without tokens must fail.");

		assert!(matches!(
			err,
			ExchangeFailure::MissingAccessToken { reason: Some(ref r) } if r == "error_param: Invalid code."
		));
	}

	#[test]
	fn non_success_status_prefers_the_partner_message() {
		let json = parse_token_response(&raw(400, r#"{"error":"error_auth"}"#))
			.expect_err("HTTP 400 must fail.");
		let html =
			parse_token_response(&raw(502, "<html>bad gateway</html>")).expect_err("HTTP 502 must fail.");

		assert!(matches!(
			json,
			ExchangeFailure::Status { status: 400, ref message } if message == "error_auth"
		));
		assert!(matches!(
			html,
			ExchangeFailure::Status { status: 502, ref message } if message.contains("bad gateway")
		));
	}

	#[test]
	fn non_json_success_is_malformed() {
		let err = parse_token_response(&raw(200, "ok")).expect_err("Plain text must fail.");

		assert!(matches!(err, ExchangeFailure::Malformed(_)));
	}

	#[tokio::test]
	async fn blank_code_fails_before_any_request() {
		let client = client();
		let err = client.exchange_code("  ", 55).await.expect_err("Blank codes must fail.");

		assert!(matches!(err, Error::Exchange(ExchangeFailure::MissingCode)));
		assert!(client.store().get().await.expect("Store read should succeed.").is_empty());
	}
}
