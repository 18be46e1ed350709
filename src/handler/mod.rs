use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Json,
    },
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{auth::AuthGate, client::MAX_CONTRACT_BYTES, db::Database, error::ConsoleError};

mod clients;
mod leads;

pub enum AppError {
    Console(ConsoleError),
    BadRequest(String),
    Unauthorized,
}

impl From<ConsoleError> for AppError {
    fn from(error: ConsoleError) -> Self {
        AppError::Console(error)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Console(ConsoleError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{entity} {id} not found") }),
            ),
            AppError::Console(ConsoleError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "validation failed", "fields": errors }),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "a valid access token is required" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// A filtered list view: the matching records plus the unfiltered count.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub matched: usize,
    pub total: usize,
}

/// A selectable value of a closed enumeration, with its display label.
#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

/// Identifiers picked for a bulk operation.
#[derive(Debug, Deserialize)]
pub struct Selection {
    pub ids: Vec<String>,
}

pub fn router(db: Database, gate: AuthGate) -> Router {
    let console = Router::new()
        .route(
            "/leads",
            get(leads::list_leads)
                .post(leads::create_lead)
                .delete(leads::delete_leads),
        )
        .route("/leads/stats", get(leads::lead_stats))
        .route("/leads/statuses", get(leads::lead_statuses))
        .route("/leads/sources", get(leads::lead_sources))
        .route(
            "/leads/{id}",
            get(leads::get_lead)
                .put(leads::replace_lead)
                .patch(leads::patch_lead)
                .delete(leads::delete_lead),
        )
        .route(
            "/clients",
            get(clients::list_clients)
                .post(clients::create_client)
                .delete(clients::delete_clients),
        )
        .route("/clients/stats", get(clients::client_stats))
        .route("/clients/packages", get(clients::client_packages))
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::replace_client)
                .patch(clients::patch_client)
                .delete(clients::delete_client),
        )
        .route(
            "/clients/{id}/contract",
            get(clients::download_contract)
                .put(clients::attach_contract)
                .delete(clients::detach_contract)
                .layer(DefaultBodyLimit::max(MAX_CONTRACT_BYTES * 2)),
        )
        .route_layer(middleware::from_fn_with_state(gate, crate::auth::require_token))
        .with_state(db);

    Router::new()
        .route("/health", get(|| async { "Status: OK" }))
        .merge(console)
}
