use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{
	error::{self, ErrorShape, Message},
	guestbook::Error,
	AppState,
};

pub mod model;
pub mod route;

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/guestbook-entries",
		get_with(list_entries, list_entries_docs)
			.post_with(create_entry, create_entry_docs)
			.delete_with(delete_entry, delete_entry_docs)
			.patch_with(pin_entry, pin_entry_docs),
	)
}

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

impl ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) => StatusCode::BAD_REQUEST,
			Self::RateLimited(..) => StatusCode::TOO_MANY_REQUESTS,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::NotFound(..) => StatusCode::NOT_FOUND,
			Self::Store(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn message(&self) -> Message {
		match self {
			Self::Validation(errors) => Message::validation(errors),
			Self::RateLimited(window) => {
				Message::new(self.to_string()).detail("window_seconds", window.num_seconds())
			}
			Self::NotFound(id) => Message::new(self.to_string()).detail("id", id.as_str()),
			_ => Message::new(self.to_string()),
		}
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use crate::test::*;

	const PATH: &str = "/guestbook-entries";

	async fn post(app: &TestServer, username: &str, message: &str) -> Value {
		let response = app
			.post(PATH)
			.add_header(header::AUTHORIZATION, bearer(username))
			.json(&json!({ "message": message }))
			.await;

		assert_eq!(response.status_code(), 201);
		response.json::<Value>()
	}

	fn ids(entries: &Value) -> Vec<&str> {
		entries
			.as_array()
			.unwrap()
			.iter()
			.map(|entry| entry["id"].as_str().unwrap())
			.collect()
	}

	#[tokio::test]
	async fn test_empty_guestbook() {
		let app = app();

		let response = app.get(PATH).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_unreachable_store_lists_empty() {
		let app = app_with(Arc::new(FailingStore));

		let response = app.get(PATH).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_guestbook_flow() {
		let app = app();

		let entry = post(&app, "alice", "Hello!").await;
		let id = entry["id"].as_str().unwrap();

		assert_eq!(entry["message"], "Hello!");
		assert_eq!(entry["author"], "Alice");
		assert_eq!(entry["username"], "alice");
		assert_eq!(entry["verified"], true);
		assert!(entry.get("pinned").is_none());
		assert!(entry["timestamp"].is_string());

		let response = app
			.patch(PATH)
			.add_query_param("id", &id)
			.add_query_param("action", "pin")
			.add_header(header::AUTHORIZATION, bearer(ADMIN))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["pinned"], true);

		// ownership, not pin state, gates deletion
		let response = app
			.delete(PATH)
			.add_query_param("id", &id)
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>(), json!({ "success": true }));

		let response = app.get(PATH).await;

		assert_eq!(response.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_session_cookie() {
		let app = app();

		let response = app
			.post(PATH)
			.add_header(
				header::COOKIE,
				HeaderValue::from_str(&format!("theme=dark; session={}", token("alice"))).unwrap(),
			)
			.json(&json!({ "message": "from a cookie" }))
			.await;

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json::<Value>()["username"], "alice");
	}

	#[tokio::test]
	async fn test_create_requires_session() {
		let app = app();

		let response = app.post(PATH).json(&json!({ "message": "hi" })).await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(
			response.json::<Value>(),
			json!({ "error": "authentication required" })
		);

		let response = app
			.post(PATH)
			.add_header(
				header::AUTHORIZATION,
				HeaderValue::from_str(&format!("Bearer {}", expired_token("alice"))).unwrap(),
			)
			.json(&json!({ "message": "hi" }))
			.await;

		assert_eq!(response.status_code(), 401);
		assert_eq!(app.get(PATH).await.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_create_validates_message() {
		let app = app();

		for body in [
			json!({ "message": "" }),
			json!({ "message": "x".repeat(501) }),
		] {
			let response = app
				.post(PATH)
				.add_header(header::AUTHORIZATION, bearer("alice"))
				.json(&body)
				.await;

			assert_eq!(response.status_code(), 400);
			assert_eq!(response.json::<Value>()["fields"]["message"][0], "length");
		}

		for body in [json!({}), json!({ "message": 5 })] {
			let response = app
				.post(PATH)
				.add_header(header::AUTHORIZATION, bearer("alice"))
				.json(&body)
				.await;

			assert_eq!(response.status_code(), 400);
			assert!(response.json::<Value>()["error"].is_string());
		}

		post(&app, "alice", &"x".repeat(500)).await;
	}

	#[tokio::test]
	async fn test_create_is_rate_limited() {
		let app = app();

		post(&app, "alice", "first").await;

		let response = app
			.post(PATH)
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.json(&json!({ "message": "second" }))
			.await;

		assert_eq!(response.status_code(), 429);
		assert_eq!(response.json::<Value>()["details"]["window_seconds"], 300);

		post(&app, "bob", "someone else").await;
	}

	#[tokio::test]
	async fn test_delete_rules() {
		let app = app();

		let id = post(&app, "alice", "mine").await["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let response = app.delete(PATH).add_query_param("id", &id).await;
		assert_eq!(response.status_code(), 401);

		let response = app
			.delete(PATH)
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.await;
		assert_eq!(response.status_code(), 400);

		let response = app
			.delete(PATH)
			.add_query_param("id", "")
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.await;
		assert_eq!(response.status_code(), 400);

		let response = app
			.delete(PATH)
			.add_query_param("id", &id)
			.add_header(header::AUTHORIZATION, bearer("mallory"))
			.await;
		assert_eq!(response.status_code(), 403);
		assert_eq!(ids(&app.get(PATH).await.json::<Value>()), [id.as_str()]);

		let response = app
			.delete(PATH)
			.add_query_param("id", "missing")
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.await;
		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<Value>()["details"]["id"], "missing");

		let response = app
			.delete(PATH)
			.add_query_param("id", &id)
			.add_header(header::AUTHORIZATION, bearer(ADMIN))
			.await;
		assert_eq!(response.status_code(), 200);
		assert_eq!(app.get(PATH).await.json::<Value>(), json!([]));
	}

	#[tokio::test]
	async fn test_pin_rules() {
		let app = app();

		let id = post(&app, "alice", "pin me").await["id"]
			.as_str()
			.unwrap()
			.to_owned();

		let response = app
			.patch(PATH)
			.add_query_param("id", &id)
			.add_query_param("action", "pin")
			.await;
		assert_eq!(response.status_code(), 401);

		let response = app
			.patch(PATH)
			.add_query_param("id", &id)
			.add_query_param("action", "pin")
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.await;
		assert_eq!(response.status_code(), 403);
		assert!(app.get(PATH).await.json::<Value>()[0].get("pinned").is_none());

		let response = app
			.patch(PATH)
			.add_query_param("id", &id)
			.add_query_param("action", "sideways")
			.add_header(header::AUTHORIZATION, bearer(ADMIN))
			.await;
		assert_eq!(response.status_code(), 400);

		let response = app
			.patch(PATH)
			.add_query_param("id", "missing")
			.add_query_param("action", "pin")
			.add_header(header::AUTHORIZATION, bearer(ADMIN))
			.await;
		assert_eq!(response.status_code(), 404);

		let response = app
			.patch(PATH)
			.add_query_param("id", &id)
			.add_query_param("action", "unpin")
			.add_header(header::AUTHORIZATION, bearer(ADMIN))
			.await;
		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["pinned"], false);
	}

	#[tokio::test]
	async fn test_listing_order() {
		let app = app();

		let first = post(&app, "alice", "first").await;
		let second = post(&app, "bob", "second").await;
		let third = post(&app, "carol", "third").await;
		let id = |entry: &Value| entry["id"].as_str().unwrap().to_owned();

		assert_eq!(
			ids(&app.get(PATH).await.json::<Value>()),
			[id(&third), id(&second), id(&first)]
		);

		app.patch(PATH)
			.add_query_param("id", id(&first))
			.add_query_param("action", "pin")
			.add_header(header::AUTHORIZATION, bearer(ADMIN))
			.await;

		assert_eq!(
			ids(&app.get(PATH).await.json::<Value>()),
			[id(&first), id(&third), id(&second)]
		);
	}

	#[tokio::test]
	async fn test_unreachable_store_fails_writes() {
		let app = app_with(Arc::new(FailingStore));

		let response = app
			.post(PATH)
			.add_header(header::AUTHORIZATION, bearer("alice"))
			.json(&json!({ "message": "hi" }))
			.await;

		assert_eq!(response.status_code(), 500);
		assert_eq!(
			response.json::<Value>(),
			json!({ "error": "internal server error" })
		);
	}
}
