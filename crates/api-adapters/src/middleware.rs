//! unfiltered/crates/api-adapters/src/middleware.rs
//!
//! Request tracing, CORS and caller identity.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderName, Method};
use domains::{AppError, User};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const DISPLAY_NAME_HEADER: &str = "x-display-name";

/// Logs one span per request through `tracing`.
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

// Clients run on a different origin than the API during development.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
            HeaderName::from_static(DISPLAY_NAME_HEADER),
        ])
        .max_age(Duration::from_secs(3600))
}

/// The caller as reported by the authentication collaborator in front of
/// this service. Absent headers mean a guest.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    /// The identified user, or 401 for guests.
    pub fn require(self) -> Result<User, ApiError> {
        self.0.ok_or_else(|| {
            ApiError(AppError::Unauthorized(format!("{} header is required", USER_ID_HEADER)))
        })
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let user = header(USER_ID_HEADER).map(|id| User {
            id,
            display_name: header(DISPLAY_NAME_HEADER),
            photo_url: None,
        });
        Ok(CurrentUser(user))
    }
}
