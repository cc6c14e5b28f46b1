//! Documentation of a college admission booking platform.
//!
//! # General Infrastructure
//! - Browser talks to this API over JSON, nothing else is exposed
//! - API is stateless per request, every handler reads or writes the document store directly
//! - Document store is Redis, one hash per collection
//! - Identity lives with an external provider, the API never sees passwords
//! - Seeding is a separate CLI (`seed`) run by an admin, the public API never writes colleges
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Notes |
//! |---|---|---|
//! | GET | `/api/colleges` | every college |
//! | GET | `/api/colleges/{id}` | 404 if absent, 400 if the id is malformed |
//! | POST | `/api/admissions` | 201, body validated |
//! | GET | `/api/admissions/{email}` | full college populated |
//! | POST | `/api/reviews` | 201, rating 1-5, comment up to 500 chars |
//! | GET | `/api/reviews` | newest first, college name and image |
//! | POST | `/api/papers` | 201 |
//! | GET | `/api/papers?category=&college=` | newest publish date first |
//! | GET | `/api/papers/college/{id}` | raw `collegeId` |
//! | GET | `/api/papers/{id}` | extended college projection |
//! | GET | `/api/users/{email}` | 404 means no profile yet |
//! | PATCH | `/api/users/{email}` | upsert |
//! | GET | `/health` | store connectivity |
//!
//! Error bodies are always `{"message": "..."}`. Only validation failures carry
//! detail, store failures come back as a bare `Server error`.
//!
//!
//!
//! # Notes
//!
//! ## Retries and duplicates
//! Clients retry on 5xx and network errors. There is no idempotency key, so a
//! create whose response was lost can be stored twice. Creates are rare and
//! user driven, so this is accepted.
//!
//! ## researchCount
//! Seeded per college and never recomputed from the papers collection.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! docker run -p 6379:6379 redis
//! cargo run -p campus
//! ```
//!
//! Run without Redis.
//! ```sh
//! STORE=memory cargo run -p campus
//! ```
//!
//! Seed colleges and papers.
//! ```sh
//! cargo run -p seed -- --path data/seed.json
//! ```
//!
//! Verbose logs.
//! ```sh
//! RUST_LOG=server=debug,tower_http=debug cargo run -p campus
//! ```
//!
//!
//!
//! # Environment
//!
//! - `RUST_PORT`: listen port, default 5000
//! - `STORE`: `redis` or `memory`, default redis
//! - `REDIS_URL`: connection string, read from `/run/secrets/REDIS_URL` first
//! - `CORS_MAX_AGE_SECS`: preflight cache, default 3600
use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod memory;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use config::Config;
use routes::{
    admissions_handler, college_handler, college_papers_handler, colleges_handler,
    create_admission_handler, create_paper_handler, create_review_handler, health_handler,
    paper_handler, papers_handler, reviews_handler, root_handler, update_user_handler,
    user_handler,
};
use state::AppState;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config)
        .await
        .context("Failed to connect to the document store")?;

    info!("Starting server...");

    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");

    Ok(())
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(state.config.cors_max_age));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/colleges", get(colleges_handler))
        .route("/api/colleges/{id}", get(college_handler))
        .route("/api/admissions", post(create_admission_handler))
        .route("/api/admissions/{email}", get(admissions_handler))
        .route(
            "/api/reviews",
            get(reviews_handler).post(create_review_handler),
        )
        .route("/api/papers", get(papers_handler).post(create_paper_handler))
        .route("/api/papers/college/{college_id}", get(college_papers_handler))
        .route("/api/papers/{id}", get(paper_handler))
        .route(
            "/api/users/{email}",
            get(user_handler).patch(update_user_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
