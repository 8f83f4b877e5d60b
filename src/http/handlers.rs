//! Request handlers.
//!
//! Each handler runs its read-modify-write cycle through [`AppState::run`],
//! on the blocking pool and under the service lock.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::{Datelike, Local, NaiveDate};

use crate::core::{Collection, Record, RecordKind};
use crate::html::render_invoice;
use crate::invoicing::InvoiceService;
use crate::pdf::{download_filename, render_pdf};
use crate::store::{CounterView, RecordStore};

use super::AppState;
use super::dto::*;
use super::error::ApiError;

const INVOICE_NUMBER_HEADER: HeaderName = HeaderName::from_static("x-invoice-number");

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn store(service: &InvoiceService, kind: RecordKind) -> &RecordStore {
    match kind {
        RecordKind::Customer => service.customers(),
        RecordKind::Company => service.companies(),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Collection>, ApiError> {
    let customers = state.run(|service| Ok(service.customers().load()?)).await?;
    Ok(Json(customers))
}

/// Lists companies, seeding the default company on first use.
pub async fn list_companies(State(state): State<AppState>) -> Result<Json<Collection>, ApiError> {
    let companies = state.run(|service| Ok(service.companies_or_default()?)).await?;
    Ok(Json(companies))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    create_record(&state, RecordKind::Customer, record).await
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    create_record(&state, RecordKind::Company, record).await
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Record>,
) -> Result<Json<RecordResponse>, ApiError> {
    update_record(&state, RecordKind::Customer, id, patch).await
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Record>,
) -> Result<Json<RecordResponse>, ApiError> {
    update_record(&state, RecordKind::Company, id, patch).await
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_record(&state, RecordKind::Customer, id).await
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    delete_record(&state, RecordKind::Company, id).await
}

async fn create_record(
    state: &AppState,
    kind: RecordKind,
    record: Record,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    let (id, record) = state
        .run(move |service| Ok(store(service, kind).add(record)?))
        .await?;
    Ok((StatusCode::CREATED, Json(RecordResponse { id, record })))
}

async fn update_record(
    state: &AppState,
    kind: RecordKind,
    id: String,
    patch: Record,
) -> Result<Json<RecordResponse>, ApiError> {
    state
        .run(move |service| {
            let record = store(service, kind).update(&id, &patch)?;
            Ok(Json(RecordResponse { id, record }))
        })
        .await
}

async fn delete_record(
    state: &AppState,
    kind: RecordKind,
    id: String,
) -> Result<StatusCode, ApiError> {
    state
        .run(move |service| {
            store(service, kind).delete(&id)?;
            Ok(StatusCode::NO_CONTENT)
        })
        .await
}

/// Issues an invoice and returns it as a PDF attachment.
///
/// The counter only advances when the PDF was rendered.
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<Response, ApiError> {
    let request = body.to_request()?;
    let date = body.issue_date.unwrap_or_else(today);

    let (invoice, pdf) = state
        .run(move |service| Ok(service.generate_with(&request, date, render_pdf)?))
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_filename(&invoice)),
        ),
        (INVOICE_NUMBER_HEADER, invoice.number.clone()),
    ];
    Ok((headers, pdf).into_response())
}

/// Renders the invoice that would be issued, without issuing it.
pub async fn preview_invoice(
    State(state): State<AppState>,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<Html<String>, ApiError> {
    let request = body.to_request()?;
    let date = body.issue_date.unwrap_or_else(today);

    let invoice = state
        .run(move |service| Ok(service.preview(&request, date)?))
        .await?;
    Ok(Html(render_invoice(&invoice)?))
}

pub async fn counter_overview(
    State(state): State<AppState>,
    Query(query): Query<CounterQuery>,
) -> Result<Json<Vec<CounterView>>, ApiError> {
    let year = query.year.unwrap_or_else(|| today().year());
    let rows = state
        .run(move |service| Ok(service.counter_overview(year)?))
        .await?;
    Ok(Json(rows))
}

/// Overwrites one counter; returns the stored value.
pub async fn reset_counter(
    State(state): State<AppState>,
    Json(body): Json<ResetCounterRequest>,
) -> Result<Json<CounterView>, ApiError> {
    let year = body.year.unwrap_or_else(|| today().year());
    state
        .run(move |service| {
            let key = service.reset_counter(
                body.company_id.as_deref(),
                &body.customer_id,
                year,
                &body.value.as_text(),
            )?;
            let value = service.ledger().peek(&key)?;

            Ok(Json(CounterView {
                company_id: body.company_id,
                customer_id: body.customer_id,
                key: key.to_string(),
                value,
            }))
        })
        .await
}

pub async fn recent_descriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let descriptions = state
        .run(|service| Ok(service.descriptions().recent()?))
        .await?;
    Ok(Json(descriptions))
}
