//! Token store contract and built-in implementations.
//!
//! The store holds exactly one [`TokenPair`]. The OAuth exchanger is its only writer; the order
//! verifier reads it before every partner call. Implementations serialize writes behind a lock so
//! a reader never observes half of a new pair.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenPair};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend for the partner token pair.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current pair (empty when nothing was stored yet).
	fn get(&self) -> StoreFuture<'_, TokenPair>;

	/// Replaces the current pair and persists it.
	fn set(&self, pair: TokenPair) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
