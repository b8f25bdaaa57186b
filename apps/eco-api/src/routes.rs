use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;
use eco_service::{Error as ServiceError, ResolveRequest, ResolveResponse};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/scans", post(scan))
		.route("/v1/products/{barcode}", get(product))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn scan(
	State(state): State<AppState>,
	Json(payload): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
	let response = state.service.resolve(payload).await?;

	Ok(Json(response))
}

/// The score poll target: a pure cache read, never a provider call.
async fn product(
	State(state): State<AppState>,
	Path(barcode): Path<String>,
) -> Result<Json<ResolveResponse>, ApiError> {
	let response = state.service.lookup(&barcode).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation { message } => {
				Self::new(StatusCode::BAD_REQUEST, "invalid_barcode", message)
			},
			ServiceError::NotFound { message } => {
				Self::new(StatusCode::NOT_FOUND, "not_found", message)
			},
			ServiceError::Provider { message } | ServiceError::ScoreParse { message } => {
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message)
			},
			ServiceError::Storage { message } => {
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
