//! Per-address request limits, applied in front of every route.
//!
//! This is separate from the guestbook's own posting limit, which is counted
//! per user against the stored entries.

use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::middleware::StateInformationMiddleware;
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::PeerIpKeyExtractor,
	GovernorError,
};

use crate::error::AppError;

pub type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// 10 requests per second with bursts of up to 50, keyed by peer address.
pub fn default() -> Arc<Config> {
	Arc::new(
		GovernorConfigBuilder::default()
			.per_second(10)
			.burst_size(50)
			.use_headers()
			.error_handler(error_handler)
			.finish()
			.expect("rate limit period and burst size must be non-zero"),
	)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	let headers = match &error {
		GovernorError::TooManyRequests { headers, .. } | GovernorError::Other { headers, .. } => {
			headers.clone()
		}
		GovernorError::UnableToExtractKey => None,
	};

	let mut response = AppError::from(error).into_response();

	if let Some(headers) = headers {
		response.headers_mut().extend(headers);
	}

	response
}

/// Periodically forgets addresses that have not been seen recently.
pub fn cleanup_old_limits(config: &Config) {
	let limiter = config.limiter().clone();

	tokio::spawn(async move {
		let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

		loop {
			interval.tick().await;

			tracing::debug!(size = limiter.len(), "rate limiting storage size");
			limiter.retain_recent();
		}
	});
}
