//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary
//! upload directory, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use bl_core::config::Config;
use bl_db::pool::{init_memory_pool, DbPool};
use bl_media::LocalMediaStore;
use bl_server::context::AppContext;
use bl_server::router::build_router;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub uploads: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration and in-memory DB.
    /// The upload directory is always a fresh temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let uploads = tempfile::tempdir().expect("failed to create upload dir");

        config.server.static_dir = None;
        config.uploads.dir = uploads.path().to_path_buf();
        let media = LocalMediaStore::new(
            uploads.path(),
            &config.uploads.url_prefix,
            config.uploads.thumbnail_max_edge,
        )
        .expect("failed to create media store");

        let ctx = AppContext::new(db.clone(), config, Arc::new(media));
        Self { ctx, db, uploads }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Number of stored reviews.
    pub fn count(&self) -> u64 {
        self.ctx.catalog.count().expect("failed to count reviews")
    }
}

/// A complete, valid create payload.
pub fn review_body() -> Value {
    json!({
        "shop_name": "Joe's",
        "burger_name": "Classic",
        "rating": 4,
        "rating_style": 2,
        "rating_volume": 3,
        "rating_patty": 3,
        "rating_buns": 2,
        "rating_sauce": 3,
        "price": 12,
        "visit_date": "2024-01-15T12:00:00"
    })
}

/// POST a review and return the decoded response body.
pub async fn create_review(addr: SocketAddr, body: &Value) -> Value {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/reviews/"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "create failed");
    resp.json().await.unwrap()
}

/// Field paths named in a validation error response.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
