use axum::extract::State;
use macros::route;

use crate::{
	extract::{Created, Json, Query, Session},
	guestbook::Guestbook,
	openapi::tag,
};

use super::{model, RouteError};

/// List entries
/// Returns every guestbook entry, pinned entries first and newest first.
/// An unreachable store reads as an empty guestbook.
#[route(tag = tag::GUESTBOOK)]
pub async fn list_entries(State(guestbook): State<Guestbook>) -> Json<Vec<model::Entry>> {
	Json(guestbook.list().await)
}

/// Create entry
/// Leaves a message in the guestbook as the signed-in user.
/// Each user can post once every five minutes.
#[route(
	tag = tag::GUESTBOOK,
	response(status = 201, description = "The created entry.", shape = "Json<model::Entry>")
)]
pub async fn create_entry(
	State(guestbook): State<Guestbook>,
	session: Session,
	Json(input): Json<model::SubmitInput>,
) -> Result<Created<model::Entry>, RouteError> {
	let entry = guestbook.submit(&session.identity, input).await?;

	Ok(Created(entry))
}

/// Delete entry
/// Deletes an entry by its id. Only the author of the entry and the admin can delete it.
#[route(tag = tag::GUESTBOOK)]
pub async fn delete_entry(
	State(guestbook): State<Guestbook>,
	session: Session,
	Query(query): Query<model::IdInput>,
) -> Result<Json<model::DeleteOutput>, RouteError> {
	guestbook.delete(&session.identity, &query.id).await?;

	Ok(Json(model::DeleteOutput { success: true }))
}

/// Pin entry
/// Pins or unpins an entry by its id. Only the admin can change pins.
#[route(tag = tag::GUESTBOOK)]
pub async fn pin_entry(
	State(guestbook): State<Guestbook>,
	session: Session,
	Query(query): Query<model::PinInput>,
) -> Result<Json<model::Entry>, RouteError> {
	let entry = guestbook
		.set_pinned(&session.identity, &query.id, query.action)
		.await?;

	Ok(Json(entry))
}
