use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        // Element read API
        .route("/elements", get(handlers::elements::list_elements))
        .route("/elements/:hostname", get(handlers::elements::get_element))
        // Manual sync triggers
        .route("/sync/netbox", post(handlers::sync::sync_netbox))
        .route("/sync/becs", post(handlers::sync::sync_becs))
        .route("/sync/dns", post(handlers::sync::sync_dns))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::Store;
    use crate::models::{source, Element};

    async fn test_state() -> Arc<AppState> {
        let store = Store::memory().await.unwrap();
        store
            .replace_elements(
                source::NETBOX,
                &[Element {
                    hostname: "r1.example.com".to_string(),
                    ipv4_addr: "10.0.0.1".to_string(),
                    ..Default::default()
                }],
            )
            .await
            .unwrap();

        Arc::new(AppState {
            store,
            config: Config::test_defaults(),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_hostname_returns_empty_object() {
        let app = build(test_state().await);
        let (status, body) = get_json(app, "/elements/unknownhost.example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_get_element_qualifies_bare_hostname() {
        let app = build(test_state().await);
        let (status, body) = get_json(app, "/elements/r1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["r1.example.com"]["ipv4_addr"], "10.0.0.1");
    }

    #[tokio::test]
    async fn test_list_elements() {
        let app = build(test_state().await);
        let (status, body) = get_json(app, "/elements").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_object().unwrap().len(), 1);
        assert_eq!(body["r1.example.com"]["active"], true);
        assert_eq!(body["r1.example.com"]["interfaces"], serde_json::json!({}));
    }
}
