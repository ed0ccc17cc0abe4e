use serde::{Deserialize, Serialize};

use super::expense::NewExpense;

/// A participant's net position, derived fresh from the full expense list.
///
/// Positive = the trip owes them money (net creditor).
/// Negative = they owe the trip money (net debtor).
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub participant: String,
    pub amount: f64,
}

impl Balance {
    pub fn new(participant: impl Into<String>, amount: f64) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }

    /// Whether this participant is owed money.
    pub fn is_creditor(&self) -> bool {
        self.amount > 0.0
    }
}

/// A suggested payment that reduces outstanding balances toward zero.
///
/// Derived, not persisted. One of these may be promoted to a real
/// [`ExpenseKind::Refund`](super::expense::ExpenseKind) expense once the
/// user confirms the payment actually happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    /// The debtor making the payment.
    pub from: String,
    /// The creditor receiving it.
    pub to: String,
    /// Positive amount, rounded to 2 decimals.
    pub amount: f64,
}

impl SettlementTransaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// Promote this suggestion to a refund expense draft, ready to be
    /// recorded once the user confirms the payment was made.
    pub fn into_refund(self, trip_id: i64, currency: impl Into<String>) -> NewExpense {
        let reason = format!("Settlement: {} pays {}", self.from, self.to);
        NewExpense::refund(trip_id, reason, self.amount, currency, self.from, self.to)
    }
}

impl std::fmt::Display for SettlementTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}: {:.2}", self.from, self.to, self.amount)
    }
}
