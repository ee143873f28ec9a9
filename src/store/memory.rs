use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{Error, ListStore};

/// A process-local store, used in development and tests.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
	lists: RwLock<HashMap<String, Vec<String>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait::async_trait]
impl ListStore for MemoryStore {
	async fn read_list(&self, key: &str) -> Result<Vec<String>, Error> {
		Ok(self.lists.read().await.get(key).cloned().unwrap_or_default())
	}

	async fn write_list(&self, key: &str, members: &[String]) -> Result<(), Error> {
		let mut lists = self.lists.write().await;

		// an empty list is indistinguishable from a missing key
		if members.is_empty() {
			lists.remove(key);
		} else {
			lists.insert(key.to_owned(), members.to_vec());
		}

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), Error> {
		self.lists.write().await.remove(key);
		Ok(())
	}

	async fn exists(&self, key: &str) -> Result<bool, Error> {
		Ok(self.lists.read().await.contains_key(key))
	}
}
