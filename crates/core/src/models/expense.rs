use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Whether an expense record is money spent or a settling payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseKind {
    /// Money spent on behalf of the group, still to be settled.
    Cost,
    /// A settling payment that was already made. Runs through the same
    /// credit/debit rule as a cost, which is how it retires the debt
    /// it covers.
    Refund,
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseKind::Cost => write!(f, "Cost"),
            ExpenseKind::Refund => write!(f, "Refund"),
        }
    }
}

/// One participant's share of an expense.
///
/// Shares conventionally sum to the expense's `total_amount`, but the
/// backend does not enforce that and neither do we.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseShare {
    /// Username of the participant this share is charged to.
    #[serde(rename = "travelerUsername")]
    pub participant: String,

    /// Amount charged to the participant (non-negative).
    #[serde(default)]
    pub amount: f64,

    /// Currency code of the share (e.g., "EUR").
    pub currency: String,
}

impl ExpenseShare {
    pub fn new(participant: impl Into<String>, amount: f64, currency: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            amount,
            currency: currency.into(),
        }
    }
}

/// A shared expense record as the backend reports it.
///
/// Field names on the wire follow the backend's JSON contract, including
/// its `payedBy` spelling and the `costUnitList` share list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Option<i64>,

    #[serde(rename = "costType")]
    pub kind: ExpenseKind,

    /// Free-text label ("Dinner at the harbour").
    pub reason: String,

    #[serde(default)]
    pub total_amount: f64,

    pub currency: String,

    /// Username of the participant who fronted the money.
    #[serde(rename = "payedBy")]
    pub paid_by: String,

    #[serde(rename = "costUnitList", default)]
    pub shares: Vec<ExpenseShare>,

    #[serde(default)]
    pub payers: Vec<String>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub date: Option<DateTime<Utc>>,

    #[serde(rename = "travelId")]
    pub trip_id: i64,
}

impl Expense {
    /// Check the record against the settlement engine's input contract.
    /// Called at the boundary, before any balance is derived.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_record(
            &self.reason,
            &self.paid_by,
            self.total_amount,
            &self.shares,
        )
    }
}

/// Payload for creating an expense (the backend assigns the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    #[serde(rename = "costType")]
    pub kind: ExpenseKind,

    pub reason: String,

    pub total_amount: f64,

    pub currency: String,

    #[serde(rename = "payedBy")]
    pub paid_by: String,

    #[serde(rename = "costUnitList")]
    pub shares: Vec<ExpenseShare>,

    pub payers: Vec<String>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub date: Option<DateTime<Utc>>,

    #[serde(rename = "travelId")]
    pub trip_id: i64,
}

impl NewExpense {
    /// Draft a cost paid by one participant and split across `shares`.
    pub fn cost(
        trip_id: i64,
        reason: impl Into<String>,
        total_amount: f64,
        currency: impl Into<String>,
        paid_by: impl Into<String>,
        shares: Vec<ExpenseShare>,
    ) -> Self {
        let paid_by = paid_by.into();
        Self {
            kind: ExpenseKind::Cost,
            reason: reason.into(),
            total_amount,
            currency: currency.into(),
            payers: vec![paid_by.clone()],
            paid_by,
            shares,
            date: None,
            trip_id,
        }
    }

    /// Draft a refund: `from` paid `amount` to `to`, settling that much debt.
    pub fn refund(
        trip_id: i64,
        reason: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let from = from.into();
        let currency = currency.into();
        Self {
            kind: ExpenseKind::Refund,
            reason: reason.into(),
            total_amount: amount,
            currency: currency.clone(),
            payers: vec![from.clone()],
            paid_by: from,
            shares: vec![ExpenseShare::new(to, amount, currency)],
            date: None,
            trip_id,
        }
    }

    /// Same contract as [`Expense::validate`], applied before the record
    /// is sent to the backend.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_record(
            &self.reason,
            &self.paid_by,
            self.total_amount,
            &self.shares,
        )
    }
}

fn validate_record(
    reason: &str,
    paid_by: &str,
    total_amount: f64,
    shares: &[ExpenseShare],
) -> Result<(), CoreError> {
    let label = if reason.is_empty() { "<unnamed>" } else { reason };

    if paid_by.trim().is_empty() {
        return Err(CoreError::InvalidExpenseData {
            expense: label.to_string(),
            message: "payedBy must not be empty".to_string(),
        });
    }
    if !total_amount.is_finite() || total_amount < 0.0 {
        return Err(CoreError::InvalidExpenseData {
            expense: label.to_string(),
            message: format!("totalAmount must be a non-negative number, got {total_amount}"),
        });
    }
    for share in shares {
        if share.participant.trim().is_empty() {
            return Err(CoreError::InvalidExpenseData {
                expense: label.to_string(),
                message: "share travelerUsername must not be empty".to_string(),
            });
        }
        if !share.amount.is_finite() || share.amount < 0.0 {
            return Err(CoreError::InvalidExpenseData {
                expense: label.to_string(),
                message: format!(
                    "share amount for '{}' must be a non-negative number, got {}",
                    share.participant, share.amount
                ),
            });
        }
    }
    Ok(())
}
