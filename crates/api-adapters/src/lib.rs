//! # api-adapters
//!
//! JSON-over-HTTP surface for UnFiltered. The web modules compile only with
//! the `web-axum` feature; metrics are always available.

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use state::AppState;

/// Builds the application router.
///
/// # Developer Note
/// Content routes live under `/api` so the binary can mount static assets or
/// a client bundle at the root later without clashing.
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    let api = axum::Router::new()
        .route("/groups", get(handlers::list_groups).post(handlers::create_group))
        .route("/groups/{group_id}", get(handlers::get_group))
        .route("/groups/{group_id}/posts", get(handlers::group_posts))
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/posts/{post_id}", get(handlers::get_post))
        .route("/posts/{post_id}/reactions", post(handlers::react_to_post))
        .route(
            "/posts/{post_id}/comments",
            get(handlers::post_comments).post(handlers::create_comment),
        )
        .route("/chats", get(handlers::list_chats).post(handlers::start_chat))
        .route(
            "/chats/{session_id}/messages",
            get(handlers::chat_messages).post(handlers::send_message),
        )
        .route("/activity", get(handlers::list_activity))
        .route("/activity/read", post(handlers::mark_all_activity_read))
        .route("/activity/{activity_id}/read", post(handlers::mark_activity_read));

    axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api)
        .layer(middleware::trace_layer())
        .layer(middleware::cors_policy())
        .with_state(state)
}
