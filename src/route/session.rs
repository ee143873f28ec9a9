use aide::axum::{routing::get_with, ApiRouter};
use axum::extract::State;
use macros::route;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{
	error::{AppError, RouteError},
	extract::{Json, Session},
	guestbook::Guestbook,
	openapi::tag,
	AppState,
};

/// The signed-in user, as seen by the guestbook.
#[derive(Serialize, JsonSchema)]
pub struct SessionOutput {
	/// The stable handle that entries are owned by.
	pub username: String,
	/// The display name shown as the author of new entries.
	pub name: String,
	pub avatar: Option<String>,
	/// Whether the user can pin entries and delete any entry.
	pub admin: bool,
}

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/session", get_with(current_session, current_session_docs))
}

/// Current session
/// Returns the signed-in user and whether they administer the guestbook.
#[route(tag = tag::SESSION)]
async fn current_session(
	State(guestbook): State<Guestbook>,
	session: Session,
) -> Result<Json<SessionOutput>, RouteError<AppError>> {
	let admin = guestbook.is_admin(&session.identity);
	let identity = session.identity;

	Ok(Json(SessionOutput {
		username: identity.username,
		name: identity.name,
		avatar: identity.avatar,
		admin,
	}))
}
