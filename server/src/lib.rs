//! HTTP server for the todo API.
//!
//! # Overview
//! Wires the handlers in `handlers` to routes, wraps them in the middleware
//! stack and serves the result. The store is injected by the caller, so the
//! same router runs against the in-process collection in production and
//! against test doubles in tests.
//!
//! # Routes
//! The todo routes are mounted under both `/todos` and `/api/v1/todos`:
//!
//! - `GET    {prefix}`       list, filtered by `?status=` and `?search=`
//! - `POST   {prefix}`       create
//! - `GET    {prefix}/{id}`  read one
//! - `PUT    {prefix}/{id}`  partial update
//! - `PATCH  {prefix}/{id}`  partial update
//! - `DELETE {prefix}/{id}`  delete
//!
//! Anything else falls through to a JSON 404.

pub mod config;
pub mod error;
pub mod handlers;

use axum::{
    http::{header, HeaderName, HeaderValue},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use todo_core::TodoStore;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub use config::Config;
pub use error::{AppError, ErrorBody};

const TODO_PREFIXES: [&str; 2] = ["/todos", "/api/v1/todos"];

const SECURITY_HEADERS: [(HeaderName, &str); 3] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (header::REFERRER_POLICY, "no-referrer"),
];

pub fn app<S: TodoStore>(store: S) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/api/v1", get(handlers::index));

    for prefix in TODO_PREFIXES {
        router = router
            .route(
                prefix,
                get(handlers::list_todos::<S>).post(handlers::create_todo::<S>),
            )
            .route(
                &format!("{prefix}/{{id}}"),
                get(handlers::get_todo::<S>)
                    .put(handlers::update_todo::<S>)
                    .patch(handlers::update_todo::<S>)
                    .delete(handlers::delete_todo::<S>),
            );
    }

    let mut router = router.fallback(handlers::not_found).with_state(store);
    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve `app(store)` on `listener` until ctrl-c.
pub async fn run<S: TodoStore>(listener: TcpListener, store: S) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(error) => {
            tracing::error!(%error, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
