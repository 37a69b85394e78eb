//! Business logic helpers for recording and listing card transactions.

use cardcycle_domain::{Card, CardStore, Transaction, TransactionFilter, TransactionKind};
use chrono::NaiveDate;

use crate::{CoreError, CoreResult, LedgerService};

/// Provides validated entry points for every transaction kind.
pub struct TransactionService;

impl TransactionService {
    /// Records a one-time charge and returns its identifier.
    pub fn add_expense(
        store: &mut CardStore,
        card_id: &str,
        description: &str,
        amount: f64,
        date: NaiveDate,
        category: Option<&str>,
    ) -> CoreResult<String> {
        let description = Self::require_description(description)?;
        Self::validate_amount(amount)?;
        let mut txn = Transaction::expense(description, amount, date);
        if let Some(category) = category {
            txn = txn.with_category(category);
        }
        Self::push(store, card_id, txn)
    }

    /// Records a purchase split into `installments` monthly shares.
    pub fn add_installment_purchase(
        store: &mut CardStore,
        card_id: &str,
        description: &str,
        amount: f64,
        installments: u32,
        date: NaiveDate,
        category: Option<&str>,
    ) -> CoreResult<String> {
        let description = Self::require_description(description)?;
        Self::validate_amount(amount)?;
        if installments < 1 {
            return Err(CoreError::Validation(
                "Installment count must be at least 1".into(),
            ));
        }
        let mut txn = Transaction::installment_purchase(description, amount, installments, date);
        if let Some(category) = category {
            txn = txn.with_category(category);
        }
        Self::push(store, card_id, txn)
    }

    /// Records a payment against the card balance. `amount` is given positive.
    pub fn add_general_payment(
        store: &mut CardStore,
        card_id: &str,
        description: &str,
        amount: f64,
        date: NaiveDate,
    ) -> CoreResult<String> {
        Self::validate_amount(amount)?;
        let description = match description.trim() {
            "" => "Payment".to_string(),
            text => text.to_string(),
        };
        Self::push(store, card_id, Transaction::general_payment(description, amount, date))
    }

    /// Records a payment toward one installment purchase.
    ///
    /// The target must be an installment purchase on the same card and the
    /// payment may not exceed what is still owed on it.
    pub fn add_installment_payment(
        store: &mut CardStore,
        card_id: &str,
        target_id: &str,
        amount: f64,
        date: NaiveDate,
        description: Option<&str>,
    ) -> CoreResult<String> {
        Self::validate_amount(amount)?;
        let card = Self::card_mut(store, card_id)?;
        let target = card
            .transaction(target_id)
            .ok_or_else(|| CoreError::InstallmentNotFound(target_id.to_string()))?;
        if target.kind != TransactionKind::InstallmentPurchase {
            return Err(CoreError::InvalidOperation(format!(
                "transaction {target_id} is a {} and cannot receive installment payments",
                target.kind
            )));
        }

        let progress = LedgerService::remaining_and_paid(target, &card.transactions);
        if LedgerService::is_paid_off(&progress) {
            return Err(CoreError::InvalidOperation(format!(
                "installment purchase {target_id} is already paid off"
            )));
        }
        if amount > progress.remaining + LedgerService::AMOUNT_EPSILON {
            return Err(CoreError::Validation(format!(
                "Payment of {amount:.2} exceeds the remaining {:.2}",
                progress.remaining
            )));
        }

        let description = match description.map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("Payment toward \"{}\"", target.description),
        };
        let txn = Transaction::installment_payment(description, target_id, amount, date);
        let id = card.push_transaction(txn);
        tracing::info!(card = card_id, transaction = %id, target = target_id, "recorded installment payment");
        Ok(id)
    }

    /// Removes a transaction. Removing an installment purchase also removes
    /// its payments; everything removed is returned.
    pub fn remove(store: &mut CardStore, card_id: &str, id: &str) -> CoreResult<Vec<Transaction>> {
        let card = Self::card_mut(store, card_id)?;
        let removed = LedgerService::remove_transaction(&mut card.transactions, id)?;
        tracing::info!(card = card_id, transaction = id, removed = removed.len(), "removed transaction");
        Ok(removed)
    }

    /// Stores the listing filter for a card. An empty filter clears it.
    pub fn set_filter(
        store: &mut CardStore,
        card_id: &str,
        filter: TransactionFilter,
    ) -> CoreResult<()> {
        Self::card_mut(store, card_id)?;
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if end < start {
                return Err(CoreError::Validation(format!(
                    "Filter end {end} is before start {start}"
                )));
            }
        }
        if filter.is_empty() {
            store.filters.remove(card_id);
        } else {
            store.filters.insert(card_id.to_string(), filter);
        }
        Ok(())
    }

    pub fn clear_filter(store: &mut CardStore, card_id: &str) -> CoreResult<()> {
        Self::card_mut(store, card_id)?;
        store.filters.remove(card_id);
        Ok(())
    }

    /// Returns the card's transactions matching its filter, newest first.
    pub fn list<'a>(store: &'a CardStore, card_id: &str) -> CoreResult<Vec<&'a Transaction>> {
        let card = store
            .card(card_id)
            .ok_or_else(|| CoreError::CardNotFound(card_id.to_string()))?;
        let filter = store.filter_for(card_id);
        let mut listed: Vec<&Transaction> = card
            .transactions
            .iter()
            .filter(|txn| filter.matches(txn.date))
            .collect();
        listed.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(listed)
    }

    fn push(store: &mut CardStore, card_id: &str, txn: Transaction) -> CoreResult<String> {
        let kind = txn.kind;
        let card = Self::card_mut(store, card_id)?;
        let id = card.push_transaction(txn);
        tracing::info!(card = card_id, transaction = %id, %kind, "recorded transaction");
        Ok(id)
    }

    fn card_mut<'a>(store: &'a mut CardStore, card_id: &str) -> CoreResult<&'a mut Card> {
        store
            .card_mut(card_id)
            .ok_or_else(|| CoreError::CardNotFound(card_id.to_string()))
    }

    fn require_description(description: &str) -> CoreResult<String> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            Err(CoreError::Validation("Description is required".into()))
        } else {
            Ok(trimmed.to_string())
        }
    }

    fn validate_amount(amount: f64) -> CoreResult<()> {
        if amount.is_finite() && amount > 0.0 {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Amount must be a positive number, got {amount}"
            )))
        }
    }
}
