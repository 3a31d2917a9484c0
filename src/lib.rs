pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::{events, families, health, users};
use crate::middleware::require_auth;

pub use crate::state::AppState;

/// Builds the full HTTP surface: `/health` plus everything under `/api`.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let auth = from_fn_with_state(state.clone(), require_auth);

    let protected = Router::new()
        .route("/users/authed", get(users::get_authed).put(users::update_authed))
        .route("/users/family", get(families::own_family))
        .route("/users/relationships", get(users::relationships))
        .route("/users/events", get(users::assigned_events))
        .route("/events", get(events::list_events).post(events::create_event))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/events/:id/assignees",
            get(events::list_assignees).post(events::invite),
        )
        .route_layer(auth.clone());

    let api = Router::new()
        .route(
            "/families",
            get(families::list_families).merge(post(families::create_family).route_layer(auth)),
        )
        .route("/families/:id", get(families::get_family))
        .route("/users", post(users::signup))
        .route("/users/login", put(users::login))
        .merge(protected);

    let mut router = Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .fallback(health::not_found);

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router {
        let config = AppConfig::development();
        app(AppState::new(Arc::new(MemoryStore::new()), &config), &config)
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_routes_are_json_404s() {
        let response = router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        for (method, uri) in [("GET", "/api/users/authed"), ("GET", "/api/events"), ("POST", "/api/families")] {
            let response = router()
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn signup_answers_200_with_the_token() {
        let body = r#"{"firstName":"A","lastName":"B","email":"a@example.com","password":"P@ssword1"}"#;
        let response = router()
            .oneshot(
                Request::post("/api/users")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/plain"));
    }

    #[tokio::test]
    async fn families_listing_is_public() {
        let response = router()
            .oneshot(Request::get("/api/families").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
