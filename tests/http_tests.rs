//! HTTP API tests against the router, without a socket.
//!
//! Run with: `cargo test --features http --test http_tests`

#![cfg(feature = "http")]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use factuur::http::create_router;
use factuur::http::error::ErrorResponse;
use factuur::invoicing::InvoiceService;
use factuur::settings::Settings;
use factuur::store::{Backend, MemoryBackend};
use serde_json::{Value, json};
use tower::ServiceExt;

const CUSTOMERS: &str = r#"{"3": {"name": "Jan Jansen", "address_line1": "Dorpsstraat 1", "address_line2": ""}}"#;

fn app() -> (Router, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new().with_document("customers.json", CUSTOMERS));
    let service = InvoiceService::new(backend.clone(), Settings::default());
    (create_router(service), backend)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn invoice_body(customer: &str) -> Value {
    json!({
        "company_id": "1",
        "customer_id": customer,
        "description": "Eye exam",
        "amount_incl": "121,00",
        "issue_date": "2024-03-15"
    })
}

#[tokio::test]
async fn health() {
    let (app, _) = app();
    let (status, body) = send_json(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn customer_crud() {
    let (app, _) = app();

    let (status, created) = send_json(
        &app,
        json_request(Method::POST, "/customers", json!({"name": "Piet Pietersen", "address_line1": "Laan 3"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "4");
    assert_eq!(created["name"], "Piet Pietersen");

    let (status, updated) = send_json(
        &app,
        json_request(Method::PUT, "/customers/4", json!({"name": "", "address_line1": "Laan 5"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Piet Pietersen");
    assert_eq!(updated["address_line1"], "Laan 5");

    let (status, _) = send(
        &app,
        Request::builder()
            .method(Method::DELETE)
            .uri("/customers/4")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send_json(&app, get("/customers")).await;
    assert_eq!(list.as_object().unwrap().len(), 1);
    assert_eq!(list["3"]["name"], "Jan Jansen");
}

#[tokio::test]
async fn blank_customer_name_is_422() {
    let (app, backend) = app();
    let (status, body) = send_json(
        &app,
        json_request(Method::POST, "/customers", json!({"name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.error, "validation_error");
    assert!(error.message.contains("name"));
    assert_eq!(backend.read("customers.json").unwrap().unwrap(), CUSTOMERS);
}

#[tokio::test]
async fn unknown_record_is_404() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        json_request(Method::PUT, "/companies/9", json!({"kvk": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn companies_are_seeded_on_list() {
    let (app, backend) = app();
    let (status, body) = send_json(&app, get("/companies")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["1"]["name"], "Mijn Bedrijf");
    assert!(backend.read("companies.json").unwrap().is_some());
}

#[tokio::test]
async fn issue_invoice_as_pdf() {
    let (app, _) = app();
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/invoices", invoice_body("3")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(headers["x-invoice-number"], "20240301");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"20240301_Jan.pdf\""
    );
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.starts_with(b"%PDF-"));

    let (_, counters) = send_json(&app, get("/counters?year=2024")).await;
    assert_eq!(counters[0]["key"], "2024-COMP01-CUST03");
    assert_eq!(counters[0]["value"], 1);

    let (_, descriptions) = send_json(&app, get("/descriptions")).await;
    assert_eq!(descriptions, json!(["Eye exam"]));
}

#[tokio::test]
async fn invalid_invoice_is_422_and_writes_nothing() {
    let (app, backend) = app();
    let mut body = invoice_body("3");
    body["amount_incl"] = json!("-5");

    let (status, error) = send_json(&app, json_request(Method::POST, "/invoices", body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error["message"].as_str().unwrap().contains("amount_incl"));
    assert!(backend.read("invoice_log.json").unwrap().is_none());
}

#[tokio::test]
async fn unknown_customer_invoice_is_404() {
    let (app, backend) = app();
    let (status, _) = send_json(&app, json_request(Method::POST, "/invoices", invoice_body("8"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(backend.read("invoice_log.json").unwrap().is_none());
}

#[tokio::test]
async fn corrupt_ledger_is_500() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_document("customers.json", CUSTOMERS)
            .with_document("invoice_log.json", "[]"),
    );
    let app = create_router(InvoiceService::new(backend, Settings::default()));
    let (status, body) = send_json(&app, json_request(Method::POST, "/invoices", invoice_body("3"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
}

#[tokio::test]
async fn preview_does_not_issue() {
    let (app, backend) = app();
    for _ in 0..2 {
        let (status, body) =
            send(&app, json_request(Method::POST, "/invoices/preview", invoice_body("3"))).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("20240301"));
        assert!(html.contains("€ 100.00"));
    }
    assert!(backend.read("invoice_log.json").unwrap().is_none());
}

#[tokio::test]
async fn reset_counter_then_issue() {
    let (app, _) = app();
    let (status, body) = send_json(
        &app,
        json_request(
            Method::POST,
            "/counters/reset",
            json!({"company_id": "1", "customer_id": "3", "year": 2024, "value": 9}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "2024-COMP01-CUST03");
    assert_eq!(body["value"], 9);

    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/invoices", invoice_body("3")))
        .await
        .unwrap();
    assert_eq!(response.headers()["x-invoice-number"], "20240310");
}

#[tokio::test]
async fn negative_reset_is_422() {
    let (app, backend) = app();
    let (status, _) = send_json(
        &app,
        json_request(
            Method::POST,
            "/counters/reset",
            json!({"company_id": "1", "customer_id": "3", "year": 2024, "value": "-4"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(backend.read("invoice_log.json").unwrap().is_none());
}

#[tokio::test]
async fn unusable_vat_rate_does_not_take_the_server_down() {
    let backend = Arc::new(MemoryBackend::new().with_document("customers.json", CUSTOMERS));
    let settings = Settings {
        vat_rate: rust_decimal_macros::dec!(-100),
        ..Settings::default()
    };
    let app = create_router(InvoiceService::new(backend.clone(), settings));

    let (status, body) = send_json(&app, json_request(Method::POST, "/invoices", invoice_body("3"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("vat_rate"));
    assert!(backend.read("invoice_log.json").unwrap().is_none());

    let (status, list) = send_json(&app, get("/customers")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["3"]["name"], "Jan Jansen");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invoices_get_distinct_numbers() {
    let (app, _) = app();
    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let app = app.clone();
        tasks.spawn(async move {
            let response = app
                .oneshot(json_request(Method::POST, "/invoices", invoice_body("3")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            response.headers()["x-invoice-number"].to_str().unwrap().to_string()
        });
    }

    let mut numbers = Vec::new();
    while let Some(number) = tasks.join_next().await {
        numbers.push(number.unwrap());
    }
    numbers.sort();
    let expected: Vec<String> = (1..=8).map(|seq| format!("202403{seq:02}")).collect();
    assert_eq!(numbers, expected);
}
