//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use factura_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        // Documents
        .route("/documents", post(handlers::documents::upload_document))
        .route("/documents", get(handlers::documents::list_documents))
        .route("/documents/{id}", get(handlers::documents::get_document))
        .route(
            "/documents/{id}",
            delete(handlers::documents::delete_document),
        )
        // Processing
        .route(
            "/documents/{id}/process",
            post(handlers::processing::process_document),
        )
        .route(
            "/documents/{id}/info",
            get(handlers::processing::get_document_info),
        )
        .route(
            "/documents/{id}/logs",
            get(handlers::processing::list_processing_logs),
        )
        .route(
            "/documents/{id}/pages",
            get(handlers::processing::get_page_count),
        )
        // Departments
        .route(
            "/departments",
            post(handlers::departments::create_department),
        )
        .route("/departments", get(handlers::departments::list_departments))
        .route(
            "/departments/{id}",
            get(handlers::departments::get_department),
        )
        .route(
            "/departments/{id}",
            put(handlers::departments::update_department),
        )
        .route(
            "/departments/{id}",
            delete(handlers::departments::delete_department),
        )
        // Employees
        .route("/employees", post(handlers::employees::create_employee))
        .route("/employees", get(handlers::employees::list_employees))
        .route("/employees/{id}", get(handlers::employees::get_employee))
        .route(
            "/employees/{id}",
            put(handlers::employees::update_employee),
        )
        .route(
            "/employees/{id}",
            delete(handlers::employees::delete_employee),
        );

    let app = Router::new()
        .nest(API_PREFIX, api_routes)
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(
            config.max_document_size_bytes(),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {o:?}: {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };
    Ok(cors)
}
