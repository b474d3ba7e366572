//! Loans API endpoints.

use api_types::loan::{
    LoanCreated, LoanListQuery, LoanListResponse, LoanPayload, LoanSortBy, LoanSummary, LoanView,
    SortDirection,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{
    Currency, Loan, LoanAggregates, LoanListParams, Money, SortBy, SortDir,
    validation::{self, LoanDraft, RawAmount},
};
use serde_json::Value;

use crate::{ServerError, server::ServerState};

fn display(amount: Money) -> String {
    amount.display(Currency::Mvr)
}

fn map_loan(loan: &Loan) -> LoanView {
    LoanView {
        loan_number: loan.loan_number.to_string(),
        amount: loan.amount.to_major(),
        start_date: loan.start_date,
        end_date: loan.end_date,
        emi: loan.emi.to_major(),
        outstanding_amount: loan.outstanding_amount.to_major(),
        overdue_amount: loan.overdue_amount.to_major(),
        amount_display: display(loan.amount),
        emi_display: display(loan.emi),
        outstanding_display: display(loan.outstanding_amount),
        overdue_display: display(loan.overdue_amount),
    }
}

fn map_summary(totals: LoanAggregates) -> LoanSummary {
    LoanSummary {
        total_amount: totals.total_amount.to_major(),
        total_outstanding: totals.total_outstanding.to_major(),
        total_overdue: totals.total_overdue.to_major(),
        total_amount_display: display(totals.total_amount),
        total_outstanding_display: display(totals.total_outstanding),
        total_overdue_display: display(totals.total_overdue),
    }
}

/// Non-string values keep their JSON text, so they fail the format checks.
fn map_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn map_amount(value: Value) -> RawAmount {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(n) => RawAmount::Number(n),
            None => RawAmount::Text(n.to_string()),
        },
        other => RawAmount::Text(map_text(other)),
    }
}

fn map_draft(payload: LoanPayload) -> LoanDraft {
    LoanDraft {
        loan_number: payload.loan_number.map(map_text),
        amount: payload.amount.map(map_amount),
        start_date: payload.start_date.map(map_text),
        end_date: payload.end_date.map(map_text),
        emi: payload.emi.map(map_amount),
        outstanding_amount: payload.outstanding_amount.map(map_amount),
        overdue_amount: payload.overdue_amount.map(map_amount),
    }
}

fn map_sort_by(value: LoanSortBy) -> SortBy {
    match value {
        LoanSortBy::LoanNumber => SortBy::LoanNumber,
        LoanSortBy::Amount => SortBy::Amount,
        LoanSortBy::OutstandingAmount => SortBy::OutstandingAmount,
        LoanSortBy::Emi => SortBy::Emi,
    }
}

fn map_sort_dir(value: SortDirection) -> SortDir {
    match value {
        SortDirection::Asc => SortDir::Asc,
        SortDirection::Desc => SortDir::Desc,
    }
}

fn payload(body: Result<Json<LoanPayload>, JsonRejection>) -> Result<LoanPayload, ServerError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<LoanListQuery>, QueryRejection>,
) -> Result<Json<LoanListResponse>, ServerError> {
    let Query(query) = query.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;
    validation::validate_list_query(query.page, query.page_size)?;

    let listing = state
        .service
        .loans(LoanListParams {
            page: query.page,
            page_size: query.page_size,
            sort_by: query.sort_by.map(map_sort_by),
            sort_dir: query.sort_dir.map(map_sort_dir),
        })
        .await?;

    Ok(Json(LoanListResponse {
        items: listing.items.iter().map(map_loan).collect(),
        total: listing.total,
        page: listing.page,
        page_size: listing.page_size,
    }))
}

pub async fn summary(State(state): State<ServerState>) -> Result<Json<LoanSummary>, ServerError> {
    let totals = state.service.aggregates().await?;
    Ok(Json(map_summary(totals)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(loan_number): Path<String>,
) -> Result<Json<LoanView>, ServerError> {
    let loan_number = validation::validate_loan_number(&loan_number)?;
    let loan = state.service.loan(&loan_number).await?;
    Ok(Json(map_loan(&loan)))
}

pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<LoanPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<LoanCreated>), ServerError> {
    let input = validation::validate_loan(&map_draft(payload(body)?))?;
    let loan = state.service.create_loan(input).await?;
    tracing::info!(loan_number = %loan.loan_number, id = %loan.id, "loan created");

    Ok((StatusCode::CREATED, Json(LoanCreated { success: true })))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(loan_number): Path<String>,
    body: Result<Json<LoanPayload>, JsonRejection>,
) -> Result<Json<LoanView>, ServerError> {
    let loan_number = validation::validate_loan_number(&loan_number)?;
    let input = validation::validate_loan(&map_draft(payload(body)?))?;
    let loan = state.service.update_loan(&loan_number, input).await?;
    tracing::info!(loan_number = %loan.loan_number, "loan updated");

    Ok(Json(map_loan(&loan)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(loan_number): Path<String>,
) -> Result<StatusCode, ServerError> {
    let loan_number = validation::validate_loan_number(&loan_number)?;
    state.service.deactivate_loan(&loan_number).await?;
    tracing::info!(loan_number = %loan_number, "loan deactivated");

    Ok(StatusCode::NO_CONTENT)
}
