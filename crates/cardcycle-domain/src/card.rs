//! Credit card accounts and their transaction lists.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::transaction::Transaction;

/// Day used for cards saved before cutoff/payment days were tracked.
pub const LEGACY_DEFAULT_DAY: u32 = 1;

/// A revolving credit card with its ordered transaction history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub nickname: String,
    pub bank: String,
    /// Last four digits, display only.
    pub last4: String,
    pub credit_limit: f64,
    /// Day of month the statement closes. Not checked against month length.
    #[serde(default = "Card::legacy_default_day")]
    pub cutoff_day: u32,
    /// Day of month payment is due, in the month after the cutoff.
    #[serde(default = "Card::legacy_default_day")]
    pub payment_day: u32,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Card {
    pub fn new(
        nickname: impl Into<String>,
        bank: impl Into<String>,
        last4: impl Into<String>,
        credit_limit: f64,
        cutoff_day: u32,
        payment_day: u32,
    ) -> Self {
        Self {
            id: new_card_id(),
            nickname: nickname.into(),
            bank: bank.into(),
            last4: last4.into(),
            credit_limit,
            cutoff_day,
            payment_day,
            transactions: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        find_by_id(&self.transactions, id)
    }

    pub fn push_transaction(&mut self, transaction: Transaction) -> String {
        let id = transaction.id.clone();
        self.transactions.push(transaction);
        id
    }

    pub fn legacy_default_day() -> u32 {
        LEGACY_DEFAULT_DAY
    }
}

impl Identifiable for Card {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Card {
    fn display_label(&self) -> String {
        format!("{} ({} **** {})", self.nickname, self.bank, self.last4)
    }
}

pub fn new_card_id() -> String {
    format!("card_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_cards_default_cycle_days() {
        let json = r#"{
            "id": "card_1",
            "nickname": "Travel",
            "bank": "BBVA",
            "last4": "1234",
            "creditLimit": 5000,
            "transactions": []
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.cutoff_day, LEGACY_DEFAULT_DAY);
        assert_eq!(card.payment_day, LEGACY_DEFAULT_DAY);
        assert_eq!(card.credit_limit, 5000.0);
    }

    #[test]
    fn display_label_masks_number() {
        let card = Card::new("Travel", "BBVA", "1234", 5000.0, 15, 5);
        assert_eq!(card.display_label(), "Travel (BBVA **** 1234)");
        assert!(card.id.starts_with("card_"));
    }
}
