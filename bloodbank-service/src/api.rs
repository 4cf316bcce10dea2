use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use shared::*;
use std::sync::Arc;
use thiserror::Error;

use crate::handlers;
use crate::store::{Store, StoreError, Stored};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Reject writes whose referenced ids are missing.
    pub strict_references: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{kind} {id} references missing {target} {target_id}")]
    DanglingReference {
        kind: &'static str,
        id: String,
        target: &'static str,
        target_id: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    pub fn not_found<R: Record>(id: impl Into<String>) -> Self {
        ApiError::NotFound {
            kind: R::KIND.label(),
            id: id.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(_) | ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
            ApiError::DanglingReference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::Duplicate { .. }) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else if status != StatusCode::NOT_FOUND {
            tracing::warn!("Rejected request: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn record_routes<R: Stored>(router: Router<AppState>) -> Router<AppState> {
    let collection = format!("/{}", R::KIND.path());
    let item = format!("/{}/:id", R::KIND.path());

    router
        .route(
            &collection,
            get(handlers::list_records::<R>).post(handlers::create_record::<R>),
        )
        .route(
            &item,
            get(handlers::get_record::<R>)
                .put(handlers::update_record::<R>)
                .delete(handlers::delete_record::<R>),
        )
}

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/inventory", get(handlers::list_inventory))
        .route("/inventory/:blood_type_id", get(handlers::get_inventory))
        .route("/health", get(health_check));

    router = record_routes::<BloodType>(router);
    router = record_routes::<Hospital>(router);
    router = record_routes::<Donor>(router);
    router = record_routes::<Recipient>(router);
    router = record_routes::<DonorTransaction>(router);
    router = record_routes::<RecipientTransaction>(router);

    router.with_state(state).layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}

pub async fn health_check() -> &'static str {
    "OK"
}
