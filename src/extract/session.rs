use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request, HeaderMap},
};

use crate::{
	error::AppError,
	openapi::{SECURITY_SCHEME_BEARER, SECURITY_SCHEME_SESSION},
	session::{self, Identity, SessionKeys},
};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the signed-in user from the request.
///
/// The session token is read from the `Authorization` header when present,
/// and from the session cookie otherwise.
///
/// If neither exists, a [`session::Error::NoSession`] is returned.
/// If the token is not genuine or has expired, a [`session::Error::InvalidSession`] is returned.
///
/// ```rust,ignore
/// async fn route(session: Session) {
///   println!("{:?}", session.identity);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub identity: Identity,
}

fn bearer_token(headers: &HeaderMap) -> Option<Result<String, session::Error>> {
	let value = headers.get(header::AUTHORIZATION)?;

	Some(
		value
			.to_str()
			.ok()
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
			.map(str::to_owned)
			.ok_or(session::Error::MalformedAuthorization),
	)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
	headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == session::COOKIE_NAME)
		.map(|cookie| cookie.value().to_owned())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	SessionKeys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let token = match bearer_token(&parts.headers) {
			Some(token) => token?,
			None => cookie_token(&parts.headers).ok_or(session::Error::NoSession)?,
		};

		let identity = SessionKeys::from_ref(state).verify(&token).map_err(|error| {
			tracing::debug!(%error, "rejected session token");
			error
		})?;

		Ok(Self { identity })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a session cookie or bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}
