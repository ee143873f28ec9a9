//! The guestbook: who may post, delete and pin, and how often.

pub mod model;
pub mod store;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{session::Identity, store as backend};

pub use self::{
	model::{Entry, PinAction, SubmitInput},
	store::EntryStore,
};

/// An error returned by a guestbook operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("you can only post once every {} seconds", .0.num_seconds())]
	RateLimited(Duration),
	#[error("you are not allowed to modify this entry")]
	Forbidden,
	#[error("unknown entry {0}")]
	NotFound(String),
	#[error("store error: {0}")]
	Store(#[from] backend::Error),
}

/// The guestbook policy, applied in front of an [`EntryStore`].
#[derive(Clone)]
pub struct Guestbook {
	store: EntryStore,
	admin: Arc<str>,
	rate_limit: Duration,
}

impl Guestbook {
	pub fn new(store: EntryStore, admin: &str, rate_limit: Duration) -> Self {
		Self {
			store,
			admin: admin.into(),
			rate_limit,
		}
	}

	pub fn is_admin(&self, identity: &Identity) -> bool {
		identity.username == *self.admin
	}

	pub async fn is_available(&self) -> bool {
		self.store.is_available().await
	}

	/// Returns every entry, pinned first and newest first.
	///
	/// Never fails: an unreachable store reads as an empty guestbook.
	pub async fn list(&self) -> Vec<Entry> {
		let mut entries = self.store.list_entries().await;

		model::sort_for_display(&mut entries);
		entries
	}

	/// Leaves a new message on behalf of `identity`.
	#[tracing::instrument(skip(self, identity, input), fields(username = %identity.username))]
	pub async fn submit(&self, identity: &Identity, input: SubmitInput) -> Result<Entry, Error> {
		input.validate()?;

		let now = Utc::now();
		let entries = self.store.try_list_entries().await?;

		if is_rate_limited(&entries, &identity.username, now, self.rate_limit) {
			tracing::warn!("rejected guestbook post inside rate limit window");
			return Err(Error::RateLimited(self.rate_limit));
		}

		let entry = Entry {
			id: Uuid::new_v4().to_string(),
			author: identity.name.clone(),
			username: Some(identity.username.clone()),
			avatar: identity.avatar.clone(),
			message: input.message,
			timestamp: now,
			verified: true,
			pinned: None,
		};

		self.store.append_entry(entry.clone()).await?;
		tracing::info!(id = %entry.id, "created guestbook entry");

		Ok(entry)
	}

	/// Deletes an entry. Only its author and the admin may do so.
	#[tracing::instrument(skip(self, identity), fields(username = %identity.username))]
	pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), Error> {
		let entry = self.find(id).await?;

		if !entry.is_owned_by(&identity.username) && !self.is_admin(identity) {
			tracing::warn!("rejected deletion of another user's entry");
			return Err(Error::Forbidden);
		}

		self.store.remove_entry(id).await?;
		tracing::info!("deleted guestbook entry");

		Ok(())
	}

	/// Pins or unpins an entry. Only the admin may do so.
	#[tracing::instrument(skip(self, identity), fields(username = %identity.username))]
	pub async fn set_pinned(
		&self,
		identity: &Identity,
		id: &str,
		action: PinAction,
	) -> Result<Entry, Error> {
		if !self.is_admin(identity) {
			tracing::warn!("rejected pin change from non-admin");
			return Err(Error::Forbidden);
		}

		let mut entry = self.find(id).await?;

		entry.pinned = Some(action.pinned());
		self.store.replace_entry(id, entry.clone()).await?;
		tracing::info!("updated guestbook pin");

		Ok(entry)
	}

	async fn find(&self, id: &str) -> Result<Entry, Error> {
		self.store
			.try_list_entries()
			.await?
			.into_iter()
			.find(|entry| entry.id == id)
			.ok_or_else(|| Error::NotFound(id.to_owned()))
	}
}

/// Whether `username` posted strictly after `now - window`.
///
/// A post exactly `window` old no longer counts.
pub fn is_rate_limited(
	entries: &[Entry],
	username: &str,
	now: DateTime<Utc>,
	window: Duration,
) -> bool {
	let cutoff = now - window;

	entries
		.iter()
		.filter(|entry| entry.is_owned_by(username))
		.map(|entry| entry.timestamp)
		.max()
		.is_some_and(|latest| latest > cutoff)
}
