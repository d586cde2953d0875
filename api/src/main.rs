//! Library Catalog API Server
//!
//! Catalog display, borrowing and returns, late fees and fee payments for a
//! small lending library. Uses hexagonal (ports & adapters) architecture for
//! clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;
mod views;

#[cfg(test)]
mod test_utils;


use adapters::{
    ensure_schema, HttpPaymentGateway, PostgresBookRepository, PostgresLoanRepository, SystemClock,
};
use app::{CatalogService, CirculationService, PaymentService};
use config::Config;
use domain::ports::{BookRepository, Clock, LoanRepository, PaymentGateway};

pub type Catalog = CatalogService<dyn BookRepository>;
pub type Circulation = CirculationService<dyn BookRepository, dyn LoanRepository>;
pub type Payments = PaymentService<dyn BookRepository, dyn LoanRepository, dyn PaymentGateway>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub circulation: Arc<Circulation>,
    pub payments: Arc<Payments>,
    pub config: Config,
}

impl AppState {
    /// Wire the services over the given store, gateway and clock
    pub fn new(
        books: Arc<dyn BookRepository>,
        loans: Arc<dyn LoanRepository>,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
        config: Config,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(books.clone()));
        let circulation = Arc::new(CirculationService::new(books, loans, clock));
        let payments = Arc::new(PaymentService::new(circulation.clone(), gateway));

        Self {
            catalog,
            circulation,
            payments,
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the router
///
/// `rate_limit` wraps the borrow, return and payment routes; the server
/// passes a governor layer there.
pub fn app_router<F>(state: AppState, rate_limit: F) -> Router
where
    F: FnOnce(Router<AppState>) -> Router<AppState>,
{
    // Circulation and payments (rate limited)
    let circulation_routes = rate_limit(
        Router::new()
            .route("/borrow", post(handlers::borrow_book))
            .route("/return", post(handlers::return_book))
            .route(
                "/patrons/:patron_id/fees/:book_id/pay",
                post(handlers::pay_late_fees),
            ),
    );

    // Librarian-only routes
    let librarian_routes = Router::new()
        .route("/books", post(handlers::add_book))
        .route("/payments/refund", post(handlers::refund_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::librarian_auth,
        ));

    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Public catalog
        .route("/", get(handlers::get_catalog))
        .route("/catalog", get(handlers::get_catalog))
        .route("/books/:id", get(handlers::get_book))
        .route("/search", get(handlers::search_page))
        .route("/api/search", get(handlers::api_search))
        // Patron lookups
        .route(
            "/api/late_fee/:patron_id/:book_id",
            get(handlers::get_late_fee),
        )
        .route(
            "/patrons/:patron_id/status",
            get(handlers::get_patron_status),
        )
        .merge(circulation_routes)
        .merge(librarian_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,libcat_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Library Catalog API...");

    // Load configuration
    let config = Config::from_env()?;
    if !config.librarian_auth_enabled() {
        tracing::warn!(
            "LIBRARIAN_API_KEY is not set; catalog changes and refunds are open to anyone"
        );
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    ensure_schema(&db)
        .await
        .context("Failed to create database schema")?;
    tracing::info!("Database connected");

    // Create adapters
    let books: Arc<dyn BookRepository> = Arc::new(PostgresBookRepository::new(db.clone()));
    let loans: Arc<dyn LoanRepository> = Arc::new(PostgresLoanRepository::new(db));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(
        config.payment_gateway_url.clone(),
        config.payment_gateway_secret.clone(),
    ));

    let state = AppState::new(books, loans, gateway, Arc::new(SystemClock), config.clone());

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    let app = app_router(state, |routes| {
        routes.layer(GovernorLayer {
            config: governor_config,
        })
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
