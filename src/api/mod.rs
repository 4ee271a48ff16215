//! HTTP surface: router assembly and the server loop.
//!
//! Routes live under `/api/v1`; `/health` and the Swagger UI at `/docs`
//! sit outside the prefix. Every request gets a ULID request id that is
//! propagated to the response and recorded on the request span.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::TokenKeys;
use crate::facade::Facade;

mod error;
pub(crate) mod handlers;
mod openapi;

pub use error::ApiError;
pub use openapi::openapi;

/// Build the application router with all routes and layers.
#[must_use]
pub fn app(facade: Arc<Facade>, keys: Arc<TokenKeys>) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh))
        .route(
            "/api/v1/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/api/v1/users/:id",
            get(handlers::users::get)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/api/v1/amenities",
            get(handlers::amenities::list).post(handlers::amenities::create),
        )
        .route(
            "/api/v1/amenities/:id",
            get(handlers::amenities::get)
                .put(handlers::amenities::update)
                .delete(handlers::amenities::delete),
        )
        .route(
            "/api/v1/places",
            get(handlers::places::list).post(handlers::places::create),
        )
        .route(
            "/api/v1/places/:id",
            get(handlers::places::get)
                .put(handlers::places::update)
                .delete(handlers::places::delete),
        )
        .route(
            "/api/v1/places/:id/reviews",
            get(handlers::places::list_reviews).post(handlers::places::create_review),
        )
        .route(
            "/api/v1/places/:id/amenities",
            get(handlers::places::list_amenities),
        )
        .route(
            "/api/v1/places/:id/amenities/:amenity_id",
            post(handlers::places::link_amenity).delete(handlers::places::unlink_amenity),
        )
        .route(
            "/api/v1/reviews",
            get(handlers::reviews::list).post(handlers::reviews::create),
        )
        .route(
            "/api/v1/reviews/:id",
            get(handlers::reviews::get)
                .put(handlers::reviews::update)
                .delete(handlers::reviews::delete),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(facade))
                .layer(Extension(keys)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn serve(port: u16, facade: Arc<Facade>, keys: Arc<TokenKeys>) -> Result<()> {
    let router = app(facade, keys);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
