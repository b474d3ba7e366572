use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::{LoanService, LoanStore};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

fn memory_app() -> Router {
    let service = LoanService::builder().repository(LoanStore::memory()).build();
    server::app(service, &[])
}

async fn sqlite_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let service = LoanService::builder()
        .repository(LoanStore::database(db))
        .build();
    server::app(service, &[])
}

fn loan_body(loan_number: &str) -> Value {
    json!({
        "loanNumber": loan_number,
        "amount": 100000,
        "startDate": "2024-01-01",
        "endDate": "2026-01-01",
        "emi": 5000,
        "outstandingAmount": 80000,
        "overdueAmount": 0
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect()
}

async fn loan_lifecycle(app: Router) {
    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-100"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = send(&app, "GET", "/api/v1/loans/LN-100", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loanNumber"], "LN-100");
    assert_eq!(body["amount"], 100000.0);
    assert_eq!(body["startDate"], "2024-01-01");
    assert_eq!(body["amountDisplay"], "MVR 100,000.00");

    let mut changed = loan_body("LN-100");
    changed["outstandingAmount"] = json!(75000);
    let (status, body) = send(&app, "PUT", "/api/v1/loans/LN-100", Some(changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outstandingAmount"], 75000.0);

    let (status, body) = send(&app, "GET", "/api/v1/loans/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAmount"], 100000.0);
    assert_eq!(body["totalOutstanding"], 75000.0);
    assert_eq!(body["totalOverdue"], 0.0);
    assert_eq!(body["totalOutstandingDisplay"], "MVR 75,000.00");

    let (status, _) = send(&app, "DELETE", "/api/v1/loans/LN-100", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/api/v1/loans/LN-100", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Loan not found");

    let (status, _) = send(&app, "DELETE", "/api/v1/loans/LN-100", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/v1/loans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["items"], json!([]));

    let (status, body) = send(&app, "GET", "/api/v1/loans/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAmount"], 0.0);
}

#[tokio::test]
async fn loan_lifecycle_in_memory() {
    loan_lifecycle(memory_app()).await;
}

#[tokio::test]
async fn loan_lifecycle_on_sqlite() {
    loan_lifecycle(sqlite_app().await).await;
}

#[tokio::test]
async fn duplicate_active_number_is_a_conflict() {
    let app = memory_app();
    let (status, _) = send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-7"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-7"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Loan number already exists");
}

#[tokio::test]
async fn number_can_be_reused_after_delete() {
    let app = sqlite_app().await;
    send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-7"))).await;
    send(&app, "DELETE", "/api/v1/loans/LN-7", None).await;

    let (status, _) = send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-7"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/v1/loans", None).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn emi_above_amount_is_rejected() {
    let app = memory_app();
    let mut body = loan_body("LN-1");
    body["emi"] = json!(200000);

    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["emi"]);
    assert_eq!(body["errors"][0]["message"], "EMI cannot exceed Amount");

    let (_, listing) = send(&app, "GET", "/api/v1/loans", None).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn end_date_must_follow_start_date() {
    let app = memory_app();
    let mut body = loan_body("LN-1");
    body["endDate"] = json!("2024-01-01");

    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["endDate"]);
    assert_eq!(
        body["errors"][0]["message"],
        "Loan's End Date must be after Start Date"
    );
}

#[tokio::test]
async fn every_invalid_field_is_reported() {
    let app = memory_app();
    let body = json!({
        "loanNumber": "X-1",
        "amount": "abc",
        "startDate": "2024-02-30",
        "endDate": "01/01/2025",
        "emi": 0,
        "outstandingAmount": -1,
        "overdueAmount": "12.345"
    });

    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_fields(&body),
        vec![
            "loanNumber",
            "amount",
            "startDate",
            "endDate",
            "emi",
            "outstandingAmount",
            "overdueAmount"
        ]
    );
}

#[tokio::test]
async fn numeric_strings_are_accepted() {
    let app = memory_app();
    let mut body = loan_body("LN-2");
    body["amount"] = json!("1500.50");
    body["emi"] = json!("100.25");
    body["outstandingAmount"] = json!("1000");

    let (status, _) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, "GET", "/api/v1/loans/LN-2", None).await;
    assert_eq!(body["amount"], 1500.5);
    assert_eq!(body["emiDisplay"], "MVR 100.25");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = memory_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/loans")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_cannot_change_the_number() {
    let app = memory_app();
    send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-3"))).await;

    let (status, body) = send(&app, "PUT", "/api/v1/loans/LN-3", Some(loan_body("LN-4"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Loan number cannot be changed");

    let (status, _) = send(&app, "GET", "/api/v1/loans/LN-4", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_missing_loan_is_not_found() {
    let app = memory_app();
    let (status, _) = send(&app, "PUT", "/api/v1/loans/LN-9", Some(loan_body("LN-9"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_path_number_is_a_bad_request() {
    let app = memory_app();
    for (method, body) in [("GET", None), ("DELETE", None), ("PUT", Some(loan_body("LN-1")))] {
        let (status, body) = send(&app, method, "/api/v1/loans/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(error_fields(&body), vec!["loanNumber"]);
    }
}

#[tokio::test]
async fn list_pages_and_sorts() {
    let app = memory_app();
    for (number, amount) in [("LN-1", 300), ("LN-2", 100), ("LN-3", 200)] {
        let mut body = loan_body(number);
        body["amount"] = json!(amount);
        body["emi"] = json!(10);
        body["outstandingAmount"] = json!(50);
        let (status, _) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/v1/loans?page=2&pageSize=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 2);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["items"][0]["loanNumber"], "LN-3");

    let (_, body) = send(
        &app,
        "GET",
        "/api/v1/loans?sortBy=amount&sortDir=desc",
        None,
    )
    .await;
    let numbers: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["loanNumber"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["LN-1", "LN-3", "LN-2"]);

    let (_, body) = send(&app, "GET", "/api/v1/loans?page=5", None).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn invalid_list_queries_are_rejected() {
    let app = memory_app();

    let (status, body) = send(&app, "GET", "/api/v1/loans?page=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["page"]);

    let (status, body) = send(&app, "GET", "/api/v1/loans?pageSize=51", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["pageSize"]);

    for query in ["page=abc", "sortBy=name", "sortDir=sideways"] {
        let (status, _) = send(&app, "GET", &format!("/api/v1/loans?{query}"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
    }
}

#[tokio::test]
async fn huge_page_numbers_return_an_empty_page() {
    let app = sqlite_app().await;
    send(&app, "POST", "/api/v1/loans", Some(loan_body("LN-1"))).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/loans?page=9223372036854775807&pageSize=50",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn amounts_past_the_limit_are_rejected() {
    for app in [memory_app(), sqlite_app().await] {
        let mut body = loan_body("LN-1");
        body["amount"] = json!("50000000000000000");

        let (status, body) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_fields(&body), vec!["amount"]);
        assert_eq!(
            body["errors"][0]["message"],
            "Amount cannot exceed MVR 1,000,000,000,000.00"
        );

        let (status, body) = send(&app, "GET", "/api/v1/loans/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalAmount"], 0.0);
    }
}

#[tokio::test]
async fn largest_amounts_still_sum() {
    let app = memory_app();
    for number in ["LN-1", "LN-2"] {
        let mut body = loan_body(number);
        body["amount"] = json!("1000000000000");
        let (status, _) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/v1/loans/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalAmountDisplay"], "MVR 2,000,000,000,000.00");
}

#[tokio::test]
async fn mistyped_fields_are_reported_per_field() {
    let app = memory_app();
    let mut body = loan_body("LN-1");
    body["loanNumber"] = json!(5);
    body["amount"] = json!(true);
    body["startDate"] = json!(20240101);

    let (status, body) = send(&app, "POST", "/api/v1/loans", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["loanNumber", "amount", "startDate"]);
    assert_eq!(body["errors"][1]["message"], "Amount must be a number");
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&memory_app(), "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
