//! Verification of the session tokens issued by the sign-in layer.
//!
//! Sign-in happens elsewhere (OAuth); this service only checks the token
//! signature and expiry, then trusts the identity it carries.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const COOKIE_NAME: &str = "session";

/// An error that can occur while authenticating a request.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("authentication required")]
	NoSession,
	#[error("malformed authorization header")]
	MalformedAuthorization,
	#[error("invalid session")]
	InvalidSession(#[source] jsonwebtoken::errors::Error),
}

/// The claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
	/// The stable username of the signed-in user.
	pub sub: String,
	/// The display name, falling back to the username when absent.
	#[serde(default)]
	pub name: Option<String>,
	/// The avatar URL.
	#[serde(default)]
	pub picture: Option<String>,
	/// Expiry as seconds since the epoch.
	pub exp: u64,
}

/// An authenticated user, as described by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Identity {
	pub username: String,
	pub name: String,
	pub avatar: Option<String>,
}

impl From<Claims> for Identity {
	fn from(claims: Claims) -> Self {
		Self {
			name: claims.name.unwrap_or_else(|| claims.sub.clone()),
			username: claims.sub,
			avatar: claims.picture,
		}
	}
}

/// Verifies HS256 session tokens signed with the shared secret.
#[derive(Clone)]
pub struct SessionKeys {
	key: DecodingKey,
	validation: Validation,
}

impl SessionKeys {
	pub fn new(secret: &[u8]) -> Self {
		Self {
			key: DecodingKey::from_secret(secret),
			validation: Validation::new(Algorithm::HS256),
		}
	}

	/// Returns the identity carried by `token`, if the token is genuine and unexpired.
	pub fn verify(&self, token: &str) -> Result<Identity, Error> {
		let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
			.map_err(Error::InvalidSession)?;

		Ok(data.claims.into())
	}
}
