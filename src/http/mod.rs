//! JSON HTTP API over [`InvoiceService`].
//!
//! # Example
//!
//! ```rust,ignore
//! use factuur::http::create_router;
//!
//! let app = create_router(InvoiceService::from_settings(settings));
//! axum::serve(listener, app).await?;
//! ```

pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::invoicing::InvoiceService;

use self::error::ApiError;
use self::handlers::*;

/// Application state shared across handlers.
///
/// The ledger and record stores do read-modify-write cycles on whole
/// documents, so requests are serialized on one lock.
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<InvoiceService>>,
}

impl AppState {
    pub fn new(service: InvoiceService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    /// Run `f` against the service on the blocking pool, holding the lock
    /// for the whole call.
    pub(crate) async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&InvoiceService) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || f(&lock(&service)))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "service task failed");
                ApiError::Internal("service task failed".to_string())
            })?
    }
}

/// Documents are only ever replaced whole, so the service behind a
/// poisoned lock is still consistent.
fn lock(service: &Mutex<InvoiceService>) -> MutexGuard<'_, InvoiceService> {
    service.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("service lock poisoned by an earlier request, recovering");
        service.clear_poison();
        poisoned.into_inner()
    })
}

/// Creates the API router
pub fn create_router(service: InvoiceService) -> Router {
    let state = AppState::new(service);

    let customer_routes = Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", put(update_customer).delete(delete_customer));

    let company_routes = Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/:id", put(update_company).delete(delete_company));

    let invoice_routes = Router::new()
        .route("/", post(create_invoice))
        .route("/preview", post(preview_invoice));

    let counter_routes = Router::new()
        .route("/", get(counter_overview))
        .route("/reset", post(reset_counter));

    Router::new()
        .route("/health", get(health_check))
        .route("/descriptions", get(recent_descriptions))
        .nest("/customers", customer_routes)
        .nest("/companies", company_routes)
        .nest("/invoices", invoice_routes)
        .nest("/counters", counter_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
