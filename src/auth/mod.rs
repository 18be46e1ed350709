use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::handler::AppError;

/// Optional bearer-token gate in front of the console routes.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    token: Option<Arc<str>>,
}

impl AuthGate {
    pub fn new(token: Option<String>) -> Self {
        AuthGate {
            token: token.map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    fn admits(&self, header: Option<&str>) -> bool {
        match &self.token {
            None => true,
            Some(expected) => header
                .and_then(|value| value.strip_prefix("Bearer "))
                .is_some_and(|token| token.trim() == expected.as_ref()),
        }
    }
}

pub async fn require_token(
    State(gate): State<AuthGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !gate.admits(header) {
        warn!(path = %request.uri().path(), "rejected request without a valid access token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
