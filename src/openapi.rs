use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{error, extract::Json, session};

pub const SECURITY_SCHEME_SESSION: &str = "Session";
pub const SECURITY_SCHEME_BEARER: &str = "Bearer";

pub mod tag {
	pub const GUESTBOOK: &str = "Guestbook";
	pub const SESSION: &str = "Session";
	pub const META: &str = "Meta";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Guestbook API")
		.summary("Signed guestbook messages for the portfolio site")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::GUESTBOOK.into(),
			description: Some("Guestbook entries".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::SESSION.into(),
			description: Some("The signed-in user".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::META.into(),
			description: Some("Service health and documentation".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_BEARER,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: "Authorization".into(),
				description: Some("A session token, sent as `Bearer <token>`".into()),
				extensions: Default::default(),
			},
		)
		.security_scheme(
			SECURITY_SCHEME_SESSION,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Cookie,
				name: session::COOKIE_NAME.into(),
				description: Some("A session cookie set by the sign-in flow".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<error::Message>, _>(|res| {
			res.example(error::Message::new("unknown entry 4f1c").detail("id", "4f1c"))
		})
}
