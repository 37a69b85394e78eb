//! Balance and installment reconciliation over a card's transaction list.

use std::collections::HashSet;

use cardcycle_domain::{Transaction, TransactionKind};
use serde::Serialize;

use crate::{CoreError, CoreResult};

/// Amounts paid against one installment purchase.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct InstallmentProgress {
    pub paid: f64,
    pub remaining: f64,
    /// Number of payments recorded, not calendar months elapsed.
    pub payment_count: usize,
}

/// Display-ready view of an installment purchase.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InstallmentStatus {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub installments: u32,
    pub monthly_share: f64,
    pub paid: f64,
    pub remaining: f64,
    pub payment_count: usize,
    pub progress_percent: f64,
}

/// Pure helpers over a card's transactions; no hidden state.
pub struct LedgerService;

impl LedgerService {
    /// Remaining amounts at or below this are treated as paid off.
    pub const AMOUNT_EPSILON: f64 = 1e-9;

    /// Net balance where installment purchases count only their unpaid part.
    pub fn balance(transactions: &[Transaction]) -> f64 {
        transactions
            .iter()
            .map(|txn| match txn.kind {
                TransactionKind::InstallmentPurchase => {
                    Self::remaining_and_paid(txn, transactions).remaining
                }
                _ => txn.amount,
            })
            .sum()
    }

    /// Paid and remaining amounts for `purchase`. Payments whose target does
    /// not match are ignored.
    pub fn remaining_and_paid(
        purchase: &Transaction,
        transactions: &[Transaction],
    ) -> InstallmentProgress {
        let (paid, payment_count) = transactions
            .iter()
            .filter(|txn| txn.pays_installment(&purchase.id))
            .fold((0.0, 0), |(paid, count), txn| (paid + txn.amount.abs(), count + 1));
        InstallmentProgress {
            paid,
            remaining: purchase.amount - paid,
            payment_count,
        }
    }

    pub fn is_active_installment(purchase: &Transaction, transactions: &[Transaction]) -> bool {
        purchase.kind == TransactionKind::InstallmentPurchase
            && !Self::is_paid_off(&Self::remaining_and_paid(purchase, transactions))
    }

    /// Whether what is left is only floating point residue, or an over-payment.
    pub fn is_paid_off(progress: &InstallmentProgress) -> bool {
        progress.remaining <= Self::AMOUNT_EPSILON
    }

    /// Installment purchases still owing money, in insertion order.
    pub fn active_installments(transactions: &[Transaction]) -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|txn| Self::is_active_installment(txn, transactions))
            .collect()
    }

    pub fn installment_status(
        purchase: &Transaction,
        transactions: &[Transaction],
    ) -> InstallmentStatus {
        let progress = Self::remaining_and_paid(purchase, transactions);
        let progress_percent = if purchase.amount > 0.0 {
            (progress.paid / purchase.amount) * 100.0
        } else {
            0.0
        };
        InstallmentStatus {
            id: purchase.id.clone(),
            description: purchase.description.clone(),
            amount: purchase.amount,
            installments: purchase.installment_count(),
            monthly_share: purchase.monthly_share(),
            paid: progress.paid,
            remaining: progress.remaining,
            payment_count: progress.payment_count,
            progress_percent,
        }
    }

    /// Removes the transaction `id`; deleting an installment purchase also
    /// removes every payment targeting it. Returns everything removed.
    pub fn remove_transaction(
        transactions: &mut Vec<Transaction>,
        id: &str,
    ) -> CoreResult<Vec<Transaction>> {
        let target = transactions
            .iter()
            .find(|txn| txn.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        let cascade = target.kind == TransactionKind::InstallmentPurchase;

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(transactions)
            .into_iter()
            .partition(|txn| txn.id == id || (cascade && txn.pays_installment(id)));
        *transactions = kept;
        tracing::debug!(
            transaction = id,
            removed = removed.len(),
            "removed transaction with linked payments"
        );
        Ok(removed)
    }

    /// Installment payments whose target is missing or is not an installment
    /// purchase. They still count in [`LedgerService::balance`].
    pub fn dangling_payments(transactions: &[Transaction]) -> Vec<&Transaction> {
        let purchases: HashSet<&str> = transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::InstallmentPurchase)
            .map(|txn| txn.id.as_str())
            .collect();
        transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::InstallmentPayment)
            .filter(|txn| {
                txn.target_installment_id
                    .as_deref()
                    .map_or(true, |target| !purchases.contains(target))
            })
            .collect()
    }
}
