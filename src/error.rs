use std::{borrow::Cow, collections::BTreeMap};

use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::session;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message {
	/// A human-readable description of the error.
	pub error: Cow<'static, str>,
	/// Validation failures, keyed by field name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fields: Option<BTreeMap<String, Vec<String>>>,
	/// Additional context about the error.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl Message {
	pub fn new(error: impl Into<Cow<'static, str>>) -> Self {
		Self {
			error: error.into(),
			fields: None,
			details: None,
		}
	}

	pub fn detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}

	/// A message listing every failed field and the codes of its failed rules.
	pub fn validation(errors: &validator::ValidationErrors) -> Self {
		let fields = errors
			.field_errors()
			.into_iter()
			.map(|(field, errors)| {
				(
					field.to_string(),
					errors.iter().map(|error| error.code.to_string()).collect(),
				)
			})
			.collect();

		Self {
			error: "validation failed".into(),
			fields: Some(fields),
			details: None,
		}
	}
}

/// Describes how an error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	fn message(&self) -> Message {
		Message::new(self.to_string())
	}
}

/// Turns an error into a response, logging anything that is our fault.
///
/// Server errors never expose their Display output to the client.
pub fn respond(error: &dyn ErrorShape) -> Response<Body> {
	let status = error.status();

	if status.is_server_error() {
		tracing::error!(%error, "request failed");

		return (status, Json(Message::new("internal server error"))).into_response();
	}

	(status, Json(error.message())).into_response()
}

/// Errors raised outside of route logic, mostly by extractors.
///
/// The Display trait is not sent to the client for server errors, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("{0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("{0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("{0}")]
	Auth(#[from] session::Error),
	#[error("rate limit error: {0}")]
	Governor(#[from] GovernorError),
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Query(..) => StatusCode::BAD_REQUEST,
			Self::Auth(..) => StatusCode::UNAUTHORIZED,
			Self::Governor(GovernorError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
			Self::Governor(GovernorError::Other { code, .. }) => *code,
			Self::Governor(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn message(&self) -> Message {
		match self {
			Self::Validation(errors) => Message::validation(errors),
			Self::Json(rejection) => Message::new(rejection.body_text()),
			Self::Query(rejection) => Message::new(rejection.body_text()),
			Self::Governor(GovernorError::TooManyRequests { wait_time, .. }) => {
				Message::new("too many requests").detail("wait_time", *wait_time)
			}
			_ => Message::new(self.to_string()),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		respond(&self)
	}
}

/// The error type of a route: either a shared [`AppError`] or the route's own error.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error(transparent)]
	App(#[from] AppError),
	#[error(transparent)]
	Route(T),
}

impl<T> IntoResponse for RouteError<T>
where
	T: ErrorShape,
{
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => respond(&error),
			Self::Route(error) => respond(&error),
		}
	}
}

impl<T> aide::OperationOutput for RouteError<T> {
	type Inner = Message;
}
