use serde::{Deserialize, Serialize};

pub mod loan {
    use chrono::NaiveDate;
    use serde_json::Value;

    use super::*;

    /// Body of `POST /loans` and `PUT /loans/{loanNumber}`.
    ///
    /// Fields are kept as raw JSON values so that missing or mistyped ones
    /// are reported per field by validation instead of failing extraction.
    /// Amounts are expected as numbers or numeric strings.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoanPayload {
        pub loan_number: Option<Value>,
        pub amount: Option<Value>,
        pub start_date: Option<Value>,
        pub end_date: Option<Value>,
        pub emi: Option<Value>,
        pub outstanding_amount: Option<Value>,
        pub overdue_amount: Option<Value>,
    }

    /// A loan as returned to clients.
    ///
    /// Amounts are in major units (MVR); the `*Display` fields are the same
    /// amounts formatted for people, e.g. `MVR 100,000.00`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoanView {
        pub loan_number: String,
        pub amount: f64,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub emi: f64,
        pub outstanding_amount: f64,
        pub overdue_amount: f64,
        pub amount_display: String,
        pub emi_display: String,
        pub outstanding_display: String,
        pub overdue_display: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum LoanSortBy {
        LoanNumber,
        Amount,
        OutstandingAmount,
        Emi,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SortDirection {
        Asc,
        Desc,
    }

    /// Query string of `GET /loans`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoanListQuery {
        pub page: Option<u64>,
        pub page_size: Option<u64>,
        pub sort_by: Option<LoanSortBy>,
        pub sort_dir: Option<SortDirection>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoanListResponse {
        pub items: Vec<LoanView>,
        pub total: u64,
        pub page: u64,
        pub page_size: u64,
    }

    /// Totals over active loans.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoanSummary {
        pub total_amount: f64,
        pub total_outstanding: f64,
        pub total_overdue: f64,
        pub total_amount_display: String,
        pub total_outstanding_display: String,
        pub total_overdue_display: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LoanCreated {
        pub success: bool,
    }
}

pub mod error {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        pub message: String,
    }

    /// Body of a `400` caused by invalid input.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ValidationErrors {
        pub errors: Vec<FieldError>,
    }

    /// Body of every other error response.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorMessage {
        pub error: String,
    }
}

pub mod health {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}
