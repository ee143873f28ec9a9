use std::sync::Arc;

use aide::{
	axum::{routing::get, ApiRouter, IntoApiResponse},
	openapi::OpenApi,
};
use axum::{response::IntoResponse, Extension};

use crate::{extract::Json, AppState};

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().route("/docs/api.json", get(serve_docs))
}

async fn serve_docs(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}
