use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single message left in the guestbook.
///
/// Stored as one JSON document per list member, so field names are part of
/// the persisted format.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Entry {
	/// The unique identifier of the entry.
	pub id: String,
	/// The display name of the author when the entry was created.
	pub author: String,
	/// The handle of the author, used for ownership checks.
	/// Only missing on entries written before sign-in was required.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	/// The avatar URL of the author when the entry was created.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// The message content.
	pub message: String,
	/// The creation time of the entry.
	pub timestamp: DateTime<Utc>,
	/// Whether the entry was created by a signed-in user.
	#[serde(default)]
	pub verified: bool,
	/// Whether the entry is pinned to the top of the guestbook.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pinned: Option<bool>,
}

impl Entry {
	pub fn is_pinned(&self) -> bool {
		self.pinned.unwrap_or(false)
	}

	pub fn is_owned_by(&self, username: &str) -> bool {
		self.username.as_deref() == Some(username)
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct SubmitInput {
	/// The message to leave, between 1 and 500 characters.
	#[validate(length(min = 1, max = 500))]
	pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PinAction {
	Pin,
	Unpin,
}

impl PinAction {
	pub fn pinned(self) -> bool {
		matches!(self, Self::Pin)
	}
}

/// Sorts entries for display: pinned first, newest first within each group.
pub fn sort_for_display(entries: &mut [Entry]) {
	entries.sort_by(|a, b| {
		b.is_pinned()
			.cmp(&a.is_pinned())
			.then_with(|| b.timestamp.cmp(&a.timestamp))
	});
}
