//! Partner request signatures.
//!
//! Every partner call carries `sign = hex(HMAC-SHA256(partner_key, partner_id || path || timestamp ||
//! body))`. The partner recomputes the digest from the bytes it receives, so a signed body must be
//! serialized exactly once and the same string transmitted.

// crates.io
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::Secret};

type HmacSha256 = Hmac<Sha256>;

/// Partner credential: numeric partner id plus the shared signing key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	/// Partner identifier assigned by the e-commerce platform.
	pub partner_id: u64,
	/// Shared HMAC key.
	pub partner_key: Secret,
}
impl Credential {
	/// Creates a credential.
	pub fn new(partner_id: u64, partner_key: Secret) -> Self {
		Self { partner_id, partner_key }
	}
}

/// Computes partner signatures for a fixed [`Credential`].
#[derive(Clone, Debug)]
pub struct Signer {
	credential: Credential,
}
impl Signer {
	/// Creates a signer bound to `credential`.
	pub fn new(credential: Credential) -> Self {
		Self { credential }
	}

	/// Partner id that prefixes every base string.
	pub fn partner_id(&self) -> u64 {
		self.credential.partner_id
	}

	/// Signs `path` at `timestamp` over the exact serialized `body` (empty when unsigned).
	pub fn sign(&self, path: &str, timestamp: i64, body: &str) -> String {
		let base = format!("{}{path}{timestamp}{body}", self.credential.partner_id);

		hmac_sha256_hex(self.credential.partner_key.expose().as_bytes(), base.as_bytes())
	}
}

/// Lowercase hex HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> String {
	let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");

	mac.update(message);

	hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn signer(partner_id: u64, key: &str) -> Signer {
		Signer::new(Credential::new(partner_id, Secret::new(key)))
	}

	#[test]
	fn hmac_matches_rfc4231_vectors() {
		assert_eq!(
			hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?"),
			"5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
		);
		assert_eq!(
			hmac_sha256_hex(&[0x0b; 20], b"Hi There"),
			"b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
		);
	}

	#[test]
	fn hmac_accepts_empty_and_oversized_keys() {
		assert_eq!(
			hmac_sha256_hex(b"", b""),
			"b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
		);
		assert_eq!(
			hmac_sha256_hex(&[0xaa; 131], b"Test Using Larger Than Block-Size Key - Hash Key First"),
			"60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
		);
	}

	#[test]
	fn sign_hashes_the_concatenated_base_string() {
		let signer = signer(2001887, "partner-secret");
		let expected = hmac_sha256_hex(
			b"partner-secret",
			b"2001887/api/v2/auth/token/get1700000000{\"code\":\"abc\"}",
		);

		assert_eq!(
			signer.sign("/api/v2/auth/token/get", 1_700_000_000, "{\"code\":\"abc\"}"),
			expected
		);
	}

	#[test]
	fn sign_is_deterministic_and_input_sensitive() {
		let base = signer(1, "key");
		let digest = base.sign("/api/v2/order/get_order_detail", 1_700_000_000, "");

		assert_eq!(digest, base.sign("/api/v2/order/get_order_detail", 1_700_000_000, ""));
		assert_eq!(digest.len(), 64);
		assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

		let mutations = [
			signer(2, "key").sign("/api/v2/order/get_order_detail", 1_700_000_000, ""),
			signer(1, "kez").sign("/api/v2/order/get_order_detail", 1_700_000_000, ""),
			base.sign("/api/v2/order/get_order_detaik", 1_700_000_000, ""),
			base.sign("/api/v2/order/get_order_detail", 1_700_000_001, ""),
			base.sign("/api/v2/order/get_order_detail", 1_700_000_000, " "),
		];

		for mutated in mutations {
			assert_ne!(mutated, digest);
		}
	}

	#[test]
	fn credential_debug_redacts_key() {
		let rendered = format!("{:?}", signer(7, "very-secret"));

		assert!(!rendered.contains("very-secret"));
	}
}
