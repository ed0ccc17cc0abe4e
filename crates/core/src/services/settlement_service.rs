use std::cmp::Ordering;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::settlement::{Balance, SettlementTransaction};
use crate::models::traveler::Traveler;

/// Balances whose magnitude is at or below this are settled noise from
/// floating-point accumulation and are treated as zero.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// Round to 2 decimal places, half away from zero (the `f64::round`
/// rule): `round2(0.125) == 0.13`, `round2(-0.125) == -0.13`.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Turns a trip's expense records into net balances and a near-minimal
/// set of settling payments.
///
/// Pure business logic — no I/O, no API calls, never mutates its input.
/// Same input always yields the same output, including element order.
pub struct SettlementService;

impl SettlementService {
    pub fn new() -> Self {
        Self
    }

    /// Net position per participant, derived from every cost and refund.
    ///
    /// The payer of a record is credited its `total_amount`; every share
    /// is debited from its participant. Refunds run through the same rule
    /// — that is how a recorded settlement retires the debt it covers.
    ///
    /// `roster` seeds every known traveler with a zero balance so someone
    /// who never appears in an expense is still representable; with an
    /// empty roster only participants appearing in expenses are tracked.
    ///
    /// Negligible balances (|amount| ≤ 0.01) are dropped. The result is
    /// sorted descending by amount, ties by username, so map iteration
    /// order never leaks into the output.
    pub fn compute_balances(
        &self,
        expenses: &[Expense],
        roster: &[Traveler],
    ) -> Result<Vec<Balance>, CoreError> {
        // Reject malformed input before deriving anything.
        for expense in expenses {
            expense.validate()?;
        }

        let mut balances: HashMap<String, f64> = HashMap::new();
        for traveler in roster {
            balances.entry(traveler.username.clone()).or_insert(0.0);
        }

        for expense in expenses {
            *balances.entry(expense.paid_by.clone()).or_insert(0.0) += expense.total_amount;
            for share in &expense.shares {
                *balances.entry(share.participant.clone()).or_insert(0.0) -= share.amount;
            }
        }

        let mut result: Vec<Balance> = balances
            .into_iter()
            .filter(|(_, amount)| amount.abs() > SETTLEMENT_EPSILON)
            .map(|(participant, amount)| Balance { participant, amount })
            .collect();

        result.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.participant.cmp(&b.participant))
        });

        Ok(result)
    }

    /// A set of payments that zeroes out all balances.
    pub fn compute_transactions(
        &self,
        expenses: &[Expense],
        roster: &[Traveler],
    ) -> Result<Vec<SettlementTransaction>, CoreError> {
        let balances = self.compute_balances(expenses, roster)?;
        Ok(self.settle(&balances))
    }

    /// Greedy two-pointer settlement over already-computed balances.
    ///
    /// Creditors and debtors are each sorted descending by magnitude,
    /// ties broken by username ascending, which makes the output fully
    /// deterministic regardless of input order. Each step pays
    /// `min(creditor, debtor)` and advances whichever side dropped below
    /// the epsilon (both in the same step if both did).
    ///
    /// Greedy does not guarantee the theoretical minimum number of
    /// payments — that is a subset-sum-hard optimization — but it always
    /// terminates with every residual balance below the epsilon.
    pub fn settle(&self, balances: &[Balance]) -> Vec<SettlementTransaction> {
        let mut creditors: Vec<(String, f64)> = balances
            .iter()
            .filter(|b| b.amount > SETTLEMENT_EPSILON)
            .map(|b| (b.participant.clone(), b.amount))
            .collect();
        let mut debtors: Vec<(String, f64)> = balances
            .iter()
            .filter(|b| b.amount < -SETTLEMENT_EPSILON)
            .map(|b| (b.participant.clone(), -b.amount))
            .collect();

        let by_amount_desc = |a: &(String, f64), b: &(String, f64)| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        };
        creditors.sort_by(by_amount_desc);
        debtors.sort_by(by_amount_desc);

        let mut transactions = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < creditors.len() && j < debtors.len() {
            let amount = creditors[i].1.min(debtors[j].1);

            transactions.push(SettlementTransaction::new(
                debtors[j].0.clone(),
                creditors[i].0.clone(),
                round2(amount),
            ));

            creditors[i].1 -= amount;
            debtors[j].1 -= amount;

            if creditors[i].1 < SETTLEMENT_EPSILON {
                i += 1;
            }
            if debtors[j].1 < SETTLEMENT_EPSILON {
                j += 1;
            }
        }

        transactions
    }
}

impl Default for SettlementService {
    fn default() -> Self {
        Self::new()
    }
}
