//! List-oriented key-value persistence.
//!
//! The guestbook only needs four primitives from its backing store, so any
//! service that can hold an ordered list of strings under a key can back it.
//! Nothing here is transactional: callers that read, modify and rewrite a
//! list race against each other.

mod memory;
mod redis;

pub use self::{memory::MemoryStore, redis::RedisStore};

use std::sync::Arc;

/// An error raised by a backing store.
///
/// The Display output is logged, never sent to clients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("redis error: {0}")]
	Redis(#[from] ::redis::RedisError),
	#[error("codec error: {0}")]
	Codec(#[from] serde_json::Error),
}

/// The persistence contract of the guestbook.
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
	/// Returns every member of the list at `key`, in insertion order.
	///
	/// A missing key reads as an empty list.
	async fn read_list(&self, key: &str) -> Result<Vec<String>, Error>;

	/// Replaces the list at `key` with `members`.
	async fn write_list(&self, key: &str, members: &[String]) -> Result<(), Error>;

	/// Removes `key` entirely.
	async fn delete(&self, key: &str) -> Result<(), Error>;

	/// Whether `key` currently holds a value.
	async fn exists(&self, key: &str) -> Result<bool, Error>;
}

pub type SharedStore = Arc<dyn ListStore>;
