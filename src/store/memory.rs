//! Thread-safe in-memory [`TokenStore`] for tests and ephemeral deployments.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	store::{StoreFuture, TokenStore},
};

/// Keeps the token pair in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<TokenPair>>);
impl MemoryStore {
	/// Creates a store that starts with `pair`.
	pub fn with_pair(pair: TokenPair) -> Self {
		Self(Arc::new(RwLock::new(pair)))
	}

	/// Returns the current pair without going through the async contract.
	pub fn snapshot(&self) -> TokenPair {
		self.0.read().clone()
	}
}
impl TokenStore for MemoryStore {
	fn get(&self) -> StoreFuture<'_, TokenPair> {
		let pair = self.snapshot();

		Box::pin(async move { Ok(pair) })
	}

	fn set(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			*map.write() = pair;

			Ok(())
		})
	}
}
