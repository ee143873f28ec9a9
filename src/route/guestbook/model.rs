pub use crate::guestbook::model::{Entry, PinAction, SubmitInput};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	/// The id of the entry.
	#[validate(length(min = 1))]
	pub id: String,
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct PinInput {
	/// The id of the entry.
	#[validate(length(min = 1))]
	pub id: String,
	/// Whether to pin or unpin the entry.
	pub action: PinAction,
}

#[derive(Serialize, JsonSchema)]
pub struct DeleteOutput {
	pub success: bool,
}
