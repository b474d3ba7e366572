//! Boundary validation for loan input.
//!
//! Everything that arrives from outside (HTTP bodies, path segments, query
//! strings, CLI arguments) goes through these helpers before reaching the
//! [`LoanService`](crate::LoanService). They turn raw values into typed ones
//! and report every problem at once as a list of [`FieldError`]s, which the
//! service never produces itself.

use chrono::NaiveDate;

use crate::{
    Currency, EngineError, LoanInput, LoanNumber, Money, ResultEngine, money::ParseMoneyError,
    repository::MAX_PAGE_SIZE,
};

/// One rejected field and the reason, in wire naming (`camelCase`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// An amount as received: either a JSON number or a numeric string.
#[derive(Clone, Debug, PartialEq)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// A loan as received at the boundary, every field optional and unparsed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoanDraft {
    pub loan_number: Option<String>,
    pub amount: Option<RawAmount>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub emi: Option<RawAmount>,
    pub outstanding_amount: Option<RawAmount>,
    pub overdue_amount: Option<RawAmount>,
}

/// Largest amount any loan field may carry.
///
/// Keeps totals over tens of thousands of loans inside `i64` minor units.
pub const MAX_AMOUNT: Money = Money::from_major(1_000_000_000_000);

const DATE_FORMAT_MESSAGE: &str = "Date must be in YYYY-MM-DD format";

/// Sign rule applied to an amount field.
#[derive(Clone, Copy)]
enum Bound {
    Positive,
    NonNegative,
}

struct AmountRule {
    field: &'static str,
    label: &'static str,
    bound: Bound,
}

#[derive(Default)]
struct Issues(Vec<FieldError>);

impl Issues {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }
}

/// Validates a path/CLI loan number.
pub fn validate_loan_number(raw: &str) -> ResultEngine<LoanNumber> {
    raw.parse().map_err(|err: crate::loan_number::InvalidLoanNumber| {
        EngineError::Validation(vec![FieldError::new("loanNumber", err.to_string())])
    })
}

/// Validates the paging parameters of a list query.
///
/// Absent values are fine (the service applies defaults); present ones must
/// satisfy `page >= 1` and `1 <= pageSize <= 50`.
pub fn validate_list_query(page: Option<u64>, page_size: Option<u64>) -> ResultEngine<()> {
    let mut issues = Issues::default();
    if page == Some(0) {
        issues.push("page", "page must be at least 1");
    }
    if let Some(size) = page_size
        && !(1..=MAX_PAGE_SIZE).contains(&size)
    {
        issues.push(
            "pageSize",
            format!("pageSize must be between 1 and {MAX_PAGE_SIZE}"),
        );
    }
    finish(issues, ())
}

/// Validates a full loan body and converts it into a [`LoanInput`].
pub fn validate_loan(draft: &LoanDraft) -> ResultEngine<LoanInput> {
    let mut issues = Issues::default();

    let loan_number = match draft.loan_number.as_deref() {
        None => {
            issues.push("loanNumber", "Loan number is required");
            None
        }
        Some(raw) => match raw.parse::<LoanNumber>() {
            Ok(number) => Some(number),
            Err(err) => {
                issues.push("loanNumber", err.to_string());
                None
            }
        },
    };

    let amount = amount_field(
        &mut issues,
        draft.amount.as_ref(),
        AmountRule {
            field: "amount",
            label: "Amount",
            bound: Bound::Positive,
        },
    );
    let start_date = date_field(
        &mut issues,
        draft.start_date.as_deref(),
        "startDate",
        "Loan Start Date must be a valid date",
    );
    let end_date = date_field(
        &mut issues,
        draft.end_date.as_deref(),
        "endDate",
        "Loan End Date must be a valid date",
    );
    let emi = amount_field(
        &mut issues,
        draft.emi.as_ref(),
        AmountRule {
            field: "emi",
            label: "EMI",
            bound: Bound::Positive,
        },
    );
    let outstanding_amount = amount_field(
        &mut issues,
        draft.outstanding_amount.as_ref(),
        AmountRule {
            field: "outstandingAmount",
            label: "Outstanding Amount",
            bound: Bound::NonNegative,
        },
    );
    let overdue_amount = amount_field(
        &mut issues,
        draft.overdue_amount.as_ref(),
        AmountRule {
            field: "overdueAmount",
            label: "Overdue Amount",
            bound: Bound::NonNegative,
        },
    );

    if let (Some(start), Some(end)) = (start_date, end_date)
        && end <= start
    {
        issues.push("endDate", "Loan's End Date must be after Start Date");
    }
    if let (Some(emi), Some(amount)) = (emi, amount)
        && emi > amount
    {
        issues.push("emi", "EMI cannot exceed Amount");
    }
    if let (Some(outstanding), Some(amount)) = (outstanding_amount, amount)
        && outstanding > amount
    {
        issues.push("outstandingAmount", "Outstanding Amount cannot exceed amount");
    }
    if let (Some(overdue), Some(outstanding)) = (overdue_amount, outstanding_amount)
        && overdue > outstanding
    {
        issues.push(
            "overdueAmount",
            "Overdue Amount cannot exceed Outstanding Amount",
        );
    }

    match (
        loan_number,
        amount,
        start_date,
        end_date,
        emi,
        outstanding_amount,
        overdue_amount,
    ) {
        (
            Some(loan_number),
            Some(amount),
            Some(start_date),
            Some(end_date),
            Some(emi),
            Some(outstanding_amount),
            Some(overdue_amount),
        ) if issues.0.is_empty() => Ok(LoanInput {
            loan_number,
            amount,
            start_date,
            end_date,
            emi,
            outstanding_amount,
            overdue_amount,
        }),
        _ => Err(EngineError::Validation(issues.0)),
    }
}

fn finish<T>(issues: Issues, value: T) -> ResultEngine<T> {
    if issues.0.is_empty() {
        Ok(value)
    } else {
        Err(EngineError::Validation(issues.0))
    }
}

fn amount_field(issues: &mut Issues, raw: Option<&RawAmount>, rule: AmountRule) -> Option<Money> {
    let label = rule.label;
    let parsed = match raw {
        None => {
            issues.push(rule.field, format!("{label} is required"));
            return None;
        }
        Some(RawAmount::Text(text)) if text.trim().is_empty() => {
            issues.push(rule.field, format!("{label} is required"));
            return None;
        }
        Some(RawAmount::Number(n)) if !n.is_finite() => Err(ParseMoneyError::Invalid),
        Some(RawAmount::Number(n)) => n.to_string().parse::<Money>(),
        Some(RawAmount::Text(text)) => text.parse::<Money>(),
    };

    let money = match parsed {
        Ok(money) => money,
        Err(ParseMoneyError::TooManyDecimals) => {
            issues.push(
                rule.field,
                format!("{label} must have at most 2 decimal places"),
            );
            return None;
        }
        Err(_) => {
            issues.push(rule.field, format!("{label} must be a number"));
            return None;
        }
    };

    match rule.bound {
        Bound::Positive if !money.is_positive() => {
            issues.push(rule.field, format!("{label} must be greater than 0"));
            None
        }
        Bound::NonNegative if money.is_negative() => {
            issues.push(rule.field, format!("{label} cannot be negative"));
            None
        }
        _ if money > MAX_AMOUNT => {
            issues.push(
                rule.field,
                format!(
                    "{label} cannot exceed {}",
                    MAX_AMOUNT.display(Currency::Mvr)
                ),
            );
            None
        }
        _ => Some(money),
    }
}

fn date_field(
    issues: &mut Issues,
    raw: Option<&str>,
    field: &str,
    invalid_message: &str,
) -> Option<NaiveDate> {
    let Some(raw) = raw.filter(|s| is_date_shaped(s)) else {
        issues.push(field, DATE_FORMAT_MESSAGE);
        return None;
    };
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            issues.push(field, invalid_message);
            None
        }
    }
}

/// `^\d{4}-\d{2}-\d{2}$`
fn is_date_shaped(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
