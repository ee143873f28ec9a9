#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod guestbook;
mod openapi;
mod ratelimit;
mod route;
mod session;
mod store;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{body::Body, http::Request, Extension, Router};
use tokio::signal;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{
	config::Config,
	guestbook::{EntryStore, Guestbook},
	session::SessionKeys,
	store::{MemoryStore, RedisStore, SharedStore},
};

pub type AppState = State;

/// The shared application state.
///
/// Handlers extract the parts they need through [`axum::extract::FromRef`].
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub guestbook: Guestbook,
	pub sessions: SessionKeys,
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds every route, the OpenAPI document and the request tracing layers.
///
/// Per-address rate limiting needs the peer address, so it is applied by
/// [`main`] rather than here.
pub fn router(state: State) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.merge(route::guestbook::routes())
		.merge(route::session::routes())
		.merge(route::health::routes())
		.merge(route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
						let request_id = request
							.headers()
							.get(REQUEST_ID_HEADER)
							.and_then(|value| value.to_str().ok())
							.unwrap_or_default();

						tracing::info_span!(
							"request",
							method = %request.method(),
							uri = %request.uri(),
							request_id,
						)
					}),
				)
				.layer(PropagateRequestIdLayer::x_request_id()),
		)
		.with_state(state)
}

async fn connect_store(config: &Config) -> SharedStore {
	let Some(url) = &config.redis_url else {
		tracing::warn!("REDIS_URL is not set, guestbook entries will be kept in memory");

		return Arc::new(MemoryStore::new());
	};

	Arc::new(
		RedisStore::connect(url)
			.await
			.expect("failed to connect to redis"),
	)
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install ctrl+c handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install terminate handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();
	trace::init_tracing_subscriber();

	let config = Config::from_env().expect("invalid configuration");
	let store = connect_store(&config).await;

	let state = State {
		guestbook: Guestbook::new(
			EntryStore::new(store, config.guestbook_key.as_str()),
			&config.admin,
			config.rate_limit,
		),
		sessions: SessionKeys::new(config.session_secret.as_bytes()),
	};

	let governor = ratelimit::default();
	ratelimit::cleanup_old_limits(&governor);

	let app = router(state).layer(GovernorLayer { config: governor });

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.with_graceful_shutdown(shutdown_signal())
	.await
	.expect("server error");
}
