//! Validated CRUD helpers for cards in a [`CardStore`].

use cardcycle_domain::{Card, CardStore, MAX_DAY_OF_MONTH};

use crate::{CoreError, CoreResult};

/// Attributes supplied when creating a card.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard {
    pub nickname: String,
    pub bank: String,
    pub last4: String,
    pub credit_limit: f64,
    pub cutoff_day: u32,
    pub payment_day: u32,
}

impl NewCard {
    pub fn new(
        nickname: impl Into<String>,
        bank: impl Into<String>,
        last4: impl Into<String>,
        credit_limit: f64,
        cutoff_day: u32,
        payment_day: u32,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            bank: bank.into(),
            last4: last4.into(),
            credit_limit,
            cutoff_day,
            payment_day,
        }
    }
}

/// Replacement attributes for an existing card. Transactions are kept.
pub type CardChanges = NewCard;

pub struct CardService;

impl CardService {
    /// Adds a card, selects it and returns its identifier.
    pub fn add(store: &mut CardStore, new_card: NewCard) -> CoreResult<String> {
        Self::validate(&new_card)?;
        let card = Card::new(
            new_card.nickname.trim(),
            new_card.bank.trim(),
            new_card.last4,
            new_card.credit_limit,
            new_card.cutoff_day,
            new_card.payment_day,
        );
        let id = store.add_card(card);
        store.selected_card_id = Some(id.clone());
        tracing::info!(card = %id, "added card");
        Ok(id)
    }

    pub fn edit(store: &mut CardStore, id: &str, changes: CardChanges) -> CoreResult<()> {
        Self::validate(&changes)?;
        let card = store
            .card_mut(id)
            .ok_or_else(|| CoreError::CardNotFound(id.to_string()))?;
        card.nickname = changes.nickname.trim().to_string();
        card.bank = changes.bank.trim().to_string();
        card.last4 = changes.last4;
        card.credit_limit = changes.credit_limit;
        card.cutoff_day = changes.cutoff_day;
        card.payment_day = changes.payment_day;
        tracing::info!(card = %id, "updated card");
        Ok(())
    }

    /// Removes a card with all its transactions.
    pub fn remove(store: &mut CardStore, id: &str) -> CoreResult<Card> {
        let removed = store
            .remove_card(id)
            .ok_or_else(|| CoreError::CardNotFound(id.to_string()))?;
        tracing::info!(
            card = %id,
            transactions = removed.transactions.len(),
            "removed card"
        );
        Ok(removed)
    }

    pub fn select(store: &mut CardStore, id: &str) -> CoreResult<()> {
        if store.card(id).is_none() {
            return Err(CoreError::CardNotFound(id.to_string()));
        }
        store.selected_card_id = Some(id.to_string());
        Ok(())
    }

    pub fn get<'a>(store: &'a CardStore, id: &str) -> CoreResult<&'a Card> {
        store
            .card(id)
            .ok_or_else(|| CoreError::CardNotFound(id.to_string()))
    }

    pub fn list(store: &CardStore) -> Vec<&Card> {
        store.cards.iter().collect()
    }

    fn validate(card: &NewCard) -> CoreResult<()> {
        if card.nickname.trim().is_empty() {
            return Err(CoreError::Validation("Card nickname is required".into()));
        }
        if !card.credit_limit.is_finite() || card.credit_limit < 0.0 {
            return Err(CoreError::Validation(
                "Credit limit must be zero or greater".into(),
            ));
        }
        Self::validate_day("Cutoff day", card.cutoff_day)?;
        Self::validate_day("Payment day", card.payment_day)?;
        if card.last4.len() != 4 || !card.last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::Validation(format!(
                "Last four digits must be exactly 4 digits, got `{}`",
                card.last4
            )));
        }
        Ok(())
    }

    fn validate_day(label: &str, day: u32) -> CoreResult<()> {
        if (1..=MAX_DAY_OF_MONTH).contains(&day) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "{label} must be between 1 and {MAX_DAY_OF_MONTH}, got {day}"
            )))
        }
    }
}
