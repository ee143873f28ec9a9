use crate::store::{self, SharedStore};

use super::model::Entry;

/// The guestbook collection, kept as one JSON document per list member
/// under a single key.
///
/// Every mutation reads the whole list, changes it in memory and writes the
/// whole list back. There is no locking, so two concurrent mutations can
/// both start from the same snapshot and the later write wins.
#[derive(Clone)]
pub struct EntryStore {
	store: SharedStore,
	key: String,
}

impl EntryStore {
	pub fn new(store: SharedStore, key: impl Into<String>) -> Self {
		Self {
			store,
			key: key.into(),
		}
	}

	/// Returns every entry in storage order.
	///
	/// Backend failures are logged and read as an empty guestbook.
	pub async fn list_entries(&self) -> Vec<Entry> {
		match self.try_list_entries().await {
			Ok(entries) => entries,
			Err(error) => {
				tracing::error!(%error, key = %self.key, "failed to read guestbook entries");
				Vec::new()
			}
		}
	}

	/// Returns every entry in storage order, failing if the backend does.
	///
	/// Members that do not parse are left out.
	pub async fn try_list_entries(&self) -> Result<Vec<Entry>, store::Error> {
		Ok(self
			.read_members()
			.await?
			.into_iter()
			.filter_map(|member| match member {
				Member::Entry(entry) => Some(entry),
				Member::Raw(_) => None,
			})
			.collect())
	}

	pub async fn append_entry(&self, entry: Entry) -> Result<(), store::Error> {
		let mut members = self.read_members().await?;

		members.push(Member::Entry(entry));
		self.overwrite(&members).await
	}

	/// Removes the entry with the given id. Unknown ids leave the collection as is.
	pub async fn remove_entry(&self, id: &str) -> Result<(), store::Error> {
		let mut members = self.read_members().await?;

		members.retain(|member| !member.has_id(id));
		self.overwrite(&members).await
	}

	/// Replaces the entry with the given id, keeping its position.
	pub async fn replace_entry(&self, id: &str, updated: Entry) -> Result<(), store::Error> {
		let mut members = self.read_members().await?;

		if let Some(slot) = members.iter_mut().find(|member| member.has_id(id)) {
			*slot = Member::Entry(updated);
		}

		self.overwrite(&members).await
	}

	/// Whether the backend answers at all.
	pub async fn is_available(&self) -> bool {
		self.store.exists(&self.key).await.is_ok()
	}

	/// Reads every member, keeping the ones that do not parse as they are.
	///
	/// Backend failures are returned, so an unreachable backend never turns
	/// into a rewrite of an empty collection.
	async fn read_members(&self) -> Result<Vec<Member>, store::Error> {
		if !self.store.exists(&self.key).await? {
			return Ok(Vec::new());
		}

		let members = self.store.read_list(&self.key).await?;

		Ok(members
			.into_iter()
			.map(|member| match serde_json::from_str::<Entry>(&member) {
				Ok(entry) => Member::Entry(entry),
				Err(error) => {
					tracing::warn!(%error, "skipping malformed guestbook entry");
					Member::Raw(member)
				}
			})
			.collect())
	}

	async fn overwrite(&self, members: &[Member]) -> Result<(), store::Error> {
		let members = members
			.iter()
			.map(|member| match member {
				Member::Entry(entry) => serde_json::to_string(entry),
				Member::Raw(raw) => Ok(raw.clone()),
			})
			.collect::<Result<Vec<_>, _>>()?;

		self.store.write_list(&self.key, &members).await
	}
}

/// A stored list member. Members that do not parse are written back untouched.
enum Member {
	Entry(Entry),
	Raw(String),
}

impl Member {
	fn has_id(&self, id: &str) -> bool {
		matches!(self, Self::Entry(entry) if entry.id == id)
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use crate::{
		store::{ListStore, MemoryStore},
		test::*,
	};

	use super::*;

	const KEY: &str = "guestbook";

	fn entry_store() -> (EntryStore, Arc<MemoryStore>) {
		let backend = Arc::new(MemoryStore::new());

		(EntryStore::new(backend.clone(), KEY), backend)
	}

	fn ids(entries: &[Entry]) -> Vec<&str> {
		entries.iter().map(|entry| entry.id.as_str()).collect()
	}

	#[tokio::test]
	async fn test_append_keeps_insertion_order() {
		let (store, backend) = entry_store();

		store.append_entry(entry("1", "alice", 0)).await.unwrap();
		store.append_entry(entry("2", "bob", 10)).await.unwrap();
		store.append_entry(entry("3", "carol", 5)).await.unwrap();

		assert_eq!(ids(&store.list_entries().await), ["1", "2", "3"]);
		assert_eq!(backend.read_list(KEY).await.unwrap().len(), 3);
	}

	#[tokio::test]
	async fn test_remove_entry() {
		let (store, _) = entry_store();

		store.append_entry(entry("1", "alice", 0)).await.unwrap();
		store.append_entry(entry("2", "bob", 0)).await.unwrap();

		store.remove_entry("1").await.unwrap();
		assert_eq!(ids(&store.list_entries().await), ["2"]);

		store.remove_entry("missing").await.unwrap();
		assert_eq!(ids(&store.list_entries().await), ["2"]);
	}

	#[tokio::test]
	async fn test_remove_last_entry_clears_key() {
		let (store, backend) = entry_store();

		store.append_entry(entry("1", "alice", 0)).await.unwrap();
		store.remove_entry("1").await.unwrap();

		assert!(!backend.exists(KEY).await.unwrap());
		assert!(store.list_entries().await.is_empty());
	}

	#[tokio::test]
	async fn test_replace_keeps_position() {
		let (store, _) = entry_store();

		store.append_entry(entry("1", "alice", 0)).await.unwrap();
		store.append_entry(entry("2", "bob", 0)).await.unwrap();
		store.append_entry(entry("3", "carol", 0)).await.unwrap();

		let mut updated = entry("2", "bob", 0);
		updated.pinned = Some(true);
		store.replace_entry("2", updated).await.unwrap();

		let entries = store.list_entries().await;
		assert_eq!(ids(&entries), ["1", "2", "3"]);
		assert_eq!(entries[1].pinned, Some(true));
	}

	#[tokio::test]
	async fn test_malformed_members_are_skipped() {
		let (store, backend) = entry_store();

		backend
			.write_list(
				KEY,
				&[
					"{not json".into(),
					serde_json::to_string(&entry("1", "alice", 0)).unwrap(),
				],
			)
			.await
			.unwrap();

		assert_eq!(ids(&store.list_entries().await), ["1"]);
	}

	#[tokio::test]
	async fn test_mutations_keep_malformed_members() {
		let (store, backend) = entry_store();
		let legacy = r#"{"id":1700000000000,"author":"Old","message":"hi","verified":null}"#;

		backend
			.write_list(
				KEY,
				&[
					legacy.into(),
					serde_json::to_string(&entry("1", "alice", 0)).unwrap(),
				],
			)
			.await
			.unwrap();

		store.append_entry(entry("2", "bob", 0)).await.unwrap();

		let mut pinned = entry("1", "alice", 0);
		pinned.pinned = Some(true);
		store.replace_entry("1", pinned).await.unwrap();
		store.remove_entry("2").await.unwrap();

		let members = backend.read_list(KEY).await.unwrap();

		assert_eq!(members.len(), 2);
		assert_eq!(members[0], legacy);
		assert_eq!(ids(&store.list_entries().await), ["1"]);
		assert_eq!(store.list_entries().await[0].pinned, Some(true));
	}

	#[tokio::test]
	async fn test_unavailable_backend_reads_empty() {
		let store = EntryStore::new(Arc::new(FailingStore), KEY);

		assert!(store.list_entries().await.is_empty());
		assert!(store.try_list_entries().await.is_err());
		assert!(!store.is_available().await);
	}

	#[tokio::test]
	async fn test_unavailable_backend_fails_mutations() {
		let store = EntryStore::new(Arc::new(FailingStore), KEY);

		assert!(store.append_entry(entry("1", "alice", 0)).await.is_err());
		assert!(store.remove_entry("1").await.is_err());
	}
}
