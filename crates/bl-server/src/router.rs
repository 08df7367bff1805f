//! Axum router construction.
//!
//! Builds the full application router with the review API, bulk transfer,
//! uploads, middleware layers, and static file serving.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bl_core::config::CorsConfig;

use crate::context::AppContext;
use crate::middleware::request_id::request_id_middleware;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health_check,
        routes::reviews::create_review,
        routes::reviews::list_reviews,
        routes::reviews::get_review,
        routes::reviews::update_review,
        routes::reviews::delete_review,
        routes::transfer::export_reviews,
        routes::transfer::import_reviews,
        routes::uploads::upload_image,
    ),
    components(schemas(
        bl_core::Review,
        bl_core::NewReview,
        bl_core::ReviewCreate,
        bl_core::ReviewUpdate,
        bl_core::ReviewId,
        bl_core::Rating,
        bl_core::FieldError,
        routes::reviews::DeleteResponse,
        routes::transfer::ImportResponse,
        routes::uploads::UploadResponse,
    ))
)]
pub struct ApiDoc;

/// CORS for the configured browser origins. Credentials are allowed, so
/// methods and headers mirror the request instead of using a wildcard.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let config = ctx.config.clone();

    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/reviews",
            get(routes::reviews::list_reviews).post(routes::reviews::create_review),
        )
        .route(
            "/reviews/",
            get(routes::reviews::list_reviews).post(routes::reviews::create_review),
        )
        .route(
            "/reviews/{id}",
            get(routes::reviews::get_review)
                .patch(routes::reviews::update_review)
                .delete(routes::reviews::delete_review),
        )
        .route("/export", get(routes::transfer::export_reviews))
        .route("/import", post(routes::transfer::import_reviews))
        .route("/upload", post(routes::uploads::upload_image))
        .route("/upload/", post(routes::uploads::upload_image))
        .layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes));

    let mut app = Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let prefix = config.uploads.url_prefix.trim_end_matches('/');
    if prefix.starts_with('/') && prefix.len() > 1 {
        app = app.nest_service(prefix, ServeDir::new(&config.uploads.dir));
    } else {
        tracing::warn!(
            "Not serving uploads: url_prefix {:?} is not a sub-path",
            config.uploads.url_prefix
        );
    }

    // Frontend bundle, with SPA fallback to index.html.
    if let Some(dir) = &config.server.static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app.layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bl_core::config::Config;
    use bl_media::LocalMediaStore;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router(dir: &std::path::Path) -> Router {
        let mut config = Config::default();
        config.server.static_dir = None;
        config.uploads.dir = dir.to_path_buf();
        let media = LocalMediaStore::new(dir, "/uploads", 400).unwrap();
        let ctx = AppContext::new(
            bl_db::pool::init_memory_pool().unwrap(),
            config,
            Arc::new(media),
        );
        build_router(ctx)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn list_with_and_without_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_router(dir.path());
        for uri in ["/reviews", "/reviews/"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_422() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .oneshot(
                Request::post("/reviews/")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["details"][0]["field"], "body");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }

    #[tokio::test]
    async fn cors_ignores_unknown_origin() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn openapi_document_served() {
        let dir = tempfile::tempdir().unwrap();
        let response = test_router(dir.path())
            .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn openapi_lists_review_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/reviews/"));
        assert!(doc.paths.paths.contains_key("/reviews/{id}"));
        assert!(doc.paths.paths.contains_key("/import"));
    }
}
