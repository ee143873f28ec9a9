use aide::axum::{routing::get_with, ApiRouter};
use axum::{
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use macros::route;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{extract::Json, guestbook::Guestbook, openapi::tag, AppState};

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	Ok,
	Degraded,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct Health {
	pub status: Status,
	/// Whether the entry store answered.
	pub store: bool,
}

impl IntoResponse for Health {
	fn into_response(self) -> Response {
		let status = match self.status {
			Status::Ok => StatusCode::OK,
			Status::Degraded => StatusCode::SERVICE_UNAVAILABLE,
		};

		(status, Json(self)).into_response()
	}
}

impl aide::OperationOutput for Health {
	type Inner = Self;
}

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/health", get_with(health, health_docs))
}

/// Health check
/// Reports whether the service can reach its entry store.
#[route(
	tag = tag::META,
	response(status = 200, description = "The store is reachable.", shape = "Json<Health>"),
	response(status = 503, description = "The store is unreachable.", shape = "Json<Health>")
)]
async fn health(State(guestbook): State<Guestbook>) -> Health {
	if guestbook.is_available().await {
		Health {
			status: Status::Ok,
			store: true,
		}
	} else {
		tracing::warn!("health check could not reach the entry store");

		Health {
			status: Status::Degraded,
			store: false,
		}
	}
}
