//! Environment-backed settings.
//!
//! [`Settings::from_env`] loads a `.env` file (if present) through `dotenvy` and then reads the
//! process environment. [`Settings::from_lookup`] takes any key lookup so callers and tests can
//! supply values without touching global state.

// std
use std::{env, path::PathBuf};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, sign::Credential};

/// Default partner API origin.
pub const DEFAULT_PARTNER_BASE_URL: &str = "https://partner.shopeemobile.com";
/// Default rental-provider handler endpoint.
pub const DEFAULT_RENTAL_ENDPOINT: &str = "https://api.sms-activate.org/stubs/handler_api.php";
/// Default OTP window (seconds).
pub const DEFAULT_OTP_WINDOW_SECS: i64 = 120;
/// Default partner request timeout (seconds).
pub const DEFAULT_PARTNER_TIMEOUT_SECS: i64 = 12;
/// Default rental request timeout (seconds).
pub const DEFAULT_RENTAL_TIMEOUT_SECS: i64 = 10;
/// Default token file.
pub const DEFAULT_TOKEN_FILE: &str = ".env";
/// Upper bound for the window and timeout settings (one day, in seconds).
pub const MAX_SECS: i64 = 86_400;

/// Process settings.
#[derive(Clone, Debug)]
pub struct Settings {
	/// Partner id and signing key (`PARTNER_ID`, `PARTNER_KEY`).
	pub credential: Credential,
	/// Default shop for OAuth callbacks and order lookups (`SHOP_ID`, `0` means unset).
	pub shop_id: Option<u64>,
	/// Rental-provider API key (`SMS_API_KEY`).
	pub sms_api_key: Secret,
	/// Rental-provider country id (`COUNTRY_CODE`).
	pub country_code: u32,
	/// Partner API origin (`PARTNER_BASE_URL`).
	pub partner_base_url: Url,
	/// Rental-provider handler endpoint (`SMS_API_URL`).
	pub rental_endpoint: Url,
	/// Lifetime of a provisioned number (`OTP_WINDOW_SECS`).
	pub otp_window: Duration,
	/// Partner request timeout (`PARTNER_TIMEOUT_SECS`).
	pub partner_timeout: Duration,
	/// Rental request timeout (`RENTAL_TIMEOUT_SECS`).
	pub rental_timeout: Duration,
	/// Token persistence file (`TOKEN_FILE`).
	pub token_file: PathBuf,
}
impl Settings {
	/// Loads `.env` (when present) and reads settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		let _ = dotenvy::dotenv();

		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Reads settings through `lookup`; blank values count as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
		let partner_id = parse_or(get("PARTNER_ID"), "PARTNER_ID", 0_u64)?;
		let partner_key = get("PARTNER_KEY")
			.map(Secret::new)
			.ok_or(ConfigError::MissingSetting { key: "PARTNER_KEY" })?;
		let shop_id = parse_or(get("SHOP_ID"), "SHOP_ID", 0_u64)?;
		let sms_api_key = get("SMS_API_KEY")
			.map(Secret::new)
			.ok_or(ConfigError::MissingSetting { key: "SMS_API_KEY" })?;
		let country_code = get("COUNTRY_CODE")
			.ok_or(ConfigError::MissingSetting { key: "COUNTRY_CODE" })
			.and_then(|raw| parse_value(&raw, "COUNTRY_CODE"))?;
		let partner_base_url = parse_url(get("PARTNER_BASE_URL"), DEFAULT_PARTNER_BASE_URL)?;
		let rental_endpoint = parse_url(get("SMS_API_URL"), DEFAULT_RENTAL_ENDPOINT)?;
		let secs = |key: &'static str, default: i64| parse_secs(get(key), key, default);
		let otp_window = secs("OTP_WINDOW_SECS", DEFAULT_OTP_WINDOW_SECS)?;
		let partner_timeout = secs("PARTNER_TIMEOUT_SECS", DEFAULT_PARTNER_TIMEOUT_SECS)?;
		let rental_timeout = secs("RENTAL_TIMEOUT_SECS", DEFAULT_RENTAL_TIMEOUT_SECS)?;
		let token_file = get("TOKEN_FILE").unwrap_or_else(|| DEFAULT_TOKEN_FILE.into()).into();

		Ok(Self {
			credential: Credential::new(partner_id, partner_key),
			shop_id: (shop_id > 0).then_some(shop_id),
			sms_api_key,
			country_code,
			partner_base_url,
			rental_endpoint,
			otp_window,
			partner_timeout,
			rental_timeout,
			token_file,
		})
	}
}

fn parse_value<T>(raw: &str, key: &'static str) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.parse().map_err(|e: T::Err| ConfigError::InvalidSetting { key, reason: e.to_string() })
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
	T: FromStr,
	T::Err: Display,
{
	raw.map_or(Ok(default), |raw| parse_value(&raw, key))
}

fn parse_secs(raw: Option<String>, key: &'static str, default: i64) -> Result<Duration, ConfigError> {
	let secs = parse_or(raw, key, default)?;

	if secs <= 0 {
		return Err(ConfigError::InvalidSetting { key, reason: "must be positive".into() });
	}
	if secs > MAX_SECS {
		return Err(ConfigError::InvalidSetting {
			key,
			reason: format!("must not exceed {MAX_SECS} seconds"),
		});
	}

	Ok(Duration::seconds(secs))
}

fn parse_url(raw: Option<String>, default: &str) -> Result<Url, ConfigError> {
	Url::parse(raw.as_deref().unwrap_or(default))
		.map_err(|source| ConfigError::InvalidEndpoint { source })
}
