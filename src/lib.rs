//! # Bookie
//!
//! Backend for a personal book-tracking app: every reader keeps a shelf of
//! books (title, author, rating, review, category, reading status, cover)
//! and browses it filtered, sorted, and paginated. A chat endpoint proxies
//! recommendation questions to an LLM completion API.
//!
//!
//!
//! # General Infrastructure
//! - One axum process, one SQLite file, one outbound HTTP client
//! - Identity lives elsewhere: the frontend's identity provider hands out a
//!   stable opaque `uid`, and every shelf query is scoped by it
//! - Requests are share-nothing; the pooled store connection is the only
//!   suspension point
//! - Uniqueness and ownership are enforced by constraints, not by
//!   check-then-insert sequences, so concurrent duplicates resolve to one
//!   winner and one conflict response
//!
//!
//!
//! # Recommendation Proxy
//! The chat endpoint could let the frontend talk to the completion API
//! directly, but the proxy keeps the API key out of the browser and lets
//! the backend inline the caller's shelf into the prompt without shipping
//! it back and forth. See [`chat`].
//!
//!
//!
//! # Configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `BOOKIE_PORT` | `3000` |
//! | `DATABASE_URL` | `sqlite://bookie.db` |
//! | `RECOMMENDER_URL` | `https://api.openai.com/v1/chat/completions` |
//! | `RECOMMENDER_MODEL` | `gpt-4o-mini` |
//! | `OPENAI_API_KEY` | unset (chat disabled); `/run/secrets/OPENAI_API_KEY` wins over the environment |
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{delete, get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod books;
pub mod chat;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod users;

use routes::{
    add_handler, book_handler, chat_handler, dashboard_handler, delete_handler,
    delete_user_handler, email_handler, health_handler, page_count_handler, register_handler,
    update_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/", get(health_handler))
        .route("/dashboard/{uid}", get(dashboard_handler))
        .route("/books/count/{uid}", get(page_count_handler))
        .route("/getData/{id}", get(book_handler))
        .route("/add/{uid}", post(add_handler))
        .route("/update/{uid}/{id}", put(update_handler))
        .route("/delete/{uid}/{id}", delete(delete_handler))
        .route("/register", post(register_handler))
        .route("/user/email", put(email_handler))
        .route("/user/delete", delete(delete_user_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
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
