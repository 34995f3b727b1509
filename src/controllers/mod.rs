mod utils;

use crate::{
    api::{ApiResponse, Resource, CACHE_CONTROL_VALUE},
    prelude::*,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    return router
        .route("/api/guesses", any(guesses))
        .route("/api/stats", any(stats))
        .route("/health", get(|| async { StatusCode::NO_CONTENT }));
}

pub fn build_router(state: AppState) -> Router {
    let router = add_routes(Router::new());

    // static assets
    let router = match &state.cfg.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.cfg.request_timeout))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_VALUE),
        ))
        .layer(cors);

    return router.with_state(state).layer(layers);
}

async fn guesses(State(state): State<AppState>, method: Method, body: Bytes) -> ApiResponse {
    return utils::dispatch_detached(&state, Resource::Guesses, method, body).await;
}

async fn stats(State(state): State<AppState>, method: Method, body: Bytes) -> ApiResponse {
    return utils::dispatch_detached(&state, Resource::Stats, method, body).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDb;

    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(test_db: &TestDb) -> Router {
        return build_router(AppState {
            cfg: Arc::new(test_db.cfg.clone()),
            ledger: test_db.ledger(),
        });
    }

    fn request(method: Method, uri: &str, body: Body) -> Request<Body> {
        return Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, "http://example.com")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        return serde_json::from_slice(&bytes).unwrap();
    }

    #[tokio::test]
    async fn post_then_get_over_http() {
        let test_db = TestDb::new().await;
        let app = router(&test_db);

        let payload = json!({
            "name": "Ana",
            "predictedSex": "girl",
            "message": "welcome",
            "guessDate": "2024-06-15",
        });
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/guesses", Body::from(payload.to_string())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::CACHE_CONTROL], CACHE_CONTROL_VALUE);
        let created = json_body(response).await;
        assert_eq!(created["isWinner"], false);

        let response = app
            .oneshot(request(Method::GET, "/api/guesses", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let listed = json_body(response).await;
        assert_eq!(listed["guesses"][0]["id"], created["id"]);
        assert_eq!(listed["guesses"][0]["name"], "Ana");
    }

    #[tokio::test]
    async fn bad_payload_is_rejected_over_http() {
        let test_db = TestDb::new().await;
        let app = router(&test_db);

        let response = app
            .oneshot(request(Method::POST, "/api/guesses", Body::from("{not json")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid JSON"));
    }

    #[tokio::test]
    async fn stats_over_http() {
        let test_db = TestDb::new().await;
        let app = router(&test_db);

        let response = app
            .oneshot(request(Method::GET, "/api/stats", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "total": 0, "girls": 0, "boys": 0 })
        );
    }

    #[tokio::test]
    async fn unsupported_verb_is_405() {
        let test_db = TestDb::new().await;
        let app = router(&test_db);

        let response = app
            .oneshot(request(Method::PUT, "/api/guesses", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["error"], "method not allowed");
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let test_db = TestDb::new().await;
        let app = router(&test_db);

        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/guesses")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(preflight).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[tokio::test]
    async fn health_is_no_content() {
        let test_db = TestDb::new().await;
        let app = router(&test_db);

        let response = app
            .oneshot(request(Method::GET, "/health", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
