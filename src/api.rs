//! # API Server Module
//!
//! ## Purpose
//! HTTP boundary for the lookup engine. Thin by design: handlers translate
//! query parameters into engine calls and map each typed outcome onto one
//! consistent HTTP signal.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP GET requests with query-string keys
//! - **Output**: JSON bodies; `{"detail": ...}` envelopes for errors
//! - **Status mapping**: 200 hit, 404 not-found (both endpoints), 400 caller
//!   error, 500 unavailable dataset or internal failure
//!
//! ## Key Features
//! - One outcome-to-status mapping shared by every endpoint
//! - Internal failures are logged in full and surfaced as a generic message
//! - Optional CORS for browser frontends
//! - Health endpoint exposing dataset readiness

use crate::errors::{LookupError, Result};
use crate::AppState;
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use serde_json::json;

/// API server wrapping the shared application state
pub struct ApiServer {
    app_state: AppState,
}

/// Query parameters for `/carrier`
#[derive(Debug, Deserialize)]
pub struct CarrierQuery {
    pub dot_number: i64,
}

/// Query parameters for `/search-container`
#[derive(Debug, Deserialize)]
pub struct ContainerQuery {
    pub container_number: Option<String>,
    pub bol: Option<String>,
    pub consignee: Option<String>,
}

impl ApiServer {
    /// Create new API server
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until the process is stopped
    pub async fn run(self) -> Result<()> {
        // The non-`Send` `HttpServer` builder is confined to `build_server`,
        // which returns actix's `Send` `Server` handle; only that handle
        // crosses the `.await` below, so the returned future is `Send` and can
        // be driven from a spawned task.
        let server = self.build_server()?;

        server.await.map_err(|e| LookupError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }

    /// Construct and bind the HTTP server, returning actix's `Server` handle.
    fn build_server(self) -> Result<actix_web::dev::Server> {
        let server_config = self.app_state.config.server.clone();
        let bind_addr = format!("{}:{}", server_config.host, server_config.port);
        let enable_cors = server_config.enable_cors;
        let app_state = self.app_state;

        tracing::info!("Starting API server on {}", bind_addr);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .configure(configure)
        })
        .workers(server_config.workers)
        .bind(&bind_addr)
        .map_err(|e| LookupError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run();

        Ok(server)
    }
}

/// Route table, shared between the server and handler tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/carrier", web::get().to(carrier_handler))
        .route("/search-container", web::get().to(container_handler))
        .route("/health", web::get().to(health_handler))
        .route("/", web::get().to(index_handler));
}

/// Map a lookup error onto its HTTP response
fn error_response(err: &LookupError) -> HttpResponse {
    if err.is_caller_error() {
        return HttpResponse::BadRequest().json(json!({ "detail": err.to_string() }));
    }
    match err {
        LookupError::DatasetUnavailable { .. } => {
            tracing::error!("Lookup refused: {}", err);
            HttpResponse::InternalServerError().json(json!({ "detail": "Dataset not loaded" }))
        }
        _ => {
            tracing::error!("Request failed ({}): {}", err.category(), err);
            HttpResponse::InternalServerError().json(json!({ "detail": "Internal server error" }))
        }
    }
}

/// Carrier lookup endpoint
async fn carrier_handler(
    app_state: web::Data<AppState>,
    query: web::Query<CarrierQuery>,
) -> HttpResponse {
    match app_state.engine.lookup_carrier(query.dot_number) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "detail": format!("Carrier with DOT number {} not found", query.dot_number)
        })),
        Err(e) => error_response(&e),
    }
}

/// Container lookup endpoint
async fn container_handler(
    app_state: web::Data<AppState>,
    query: web::Query<ContainerQuery>,
) -> HttpResponse {
    let result = app_state.engine.lookup_container(
        query.container_number.as_deref(),
        query.bol.as_deref(),
        query.consignee.as_deref(),
    );
    match result {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "detail": "No matching container record found"
        })),
        Err(e) => error_response(&e),
    }
}

/// Health check endpoint
async fn health_handler(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "data_loaded": app_state.engine.is_ready(),
    }))
}

/// Usage message endpoint
async fn index_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Use /carrier?dot_number=XXXX or /search-container?container_number=XXXX to search for freight records."
    }))
}
