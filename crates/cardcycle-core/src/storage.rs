use std::path::PathBuf;

use cardcycle_domain::{Card, MAX_DAY_OF_MONTH};

use crate::{CoreError, LedgerService};

/// Describes a persisted backup of the card list.
#[derive(Debug, Clone)]
pub struct CardBackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Cards read from storage together with what had to be fixed or flagged.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub cards: Vec<Card>,
    /// One entry per transaction upgraded from a legacy layout.
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Abstraction over persistence backends capable of storing the card list and backups.
pub trait CardStorage: Send + Sync {
    fn save_cards(&self, cards: &[Card]) -> Result<(), CoreError> {
        self.save_cards_noted(cards, None)
    }
    /// Saves `cards`, labelling the backup of the replaced file with `note`.
    fn save_cards_noted(&self, cards: &[Card], note: Option<&str>) -> Result<(), CoreError>;
    /// Loads the stored cards. A missing store yields an empty report.
    fn load_cards(&self) -> Result<LoadReport, CoreError>;
    fn backup_cards(&self, note: Option<&str>) -> Result<Option<CardBackupInfo>, CoreError>;
    fn list_backups(&self) -> Result<Vec<CardBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &CardBackupInfo) -> Result<LoadReport, CoreError>;
}

/// Detects dangling installment references and other anomalies in a card list.
pub fn card_warnings(cards: &[Card]) -> Vec<String> {
    let mut warnings = Vec::new();
    for card in cards {
        for payment in LedgerService::dangling_payments(&card.transactions) {
            warnings.push(format!(
                "card {} payment {} references missing installment purchase {}",
                card.id,
                payment.id,
                payment.target_installment_id.as_deref().unwrap_or("<none>")
            ));
        }
        for payment in card
            .transactions
            .iter()
            .filter(|txn| txn.kind.is_payment() && txn.amount > 0.0)
        {
            warnings.push(format!(
                "card {} payment {} is stored as a positive charge of {:.2}",
                card.id, payment.id, payment.amount
            ));
        }
        let days = 1..=MAX_DAY_OF_MONTH;
        if !days.contains(&card.cutoff_day) || !days.contains(&card.payment_day) {
            warnings.push(format!(
                "card {} has out-of-range cycle days {}/{}",
                card.id, card.cutoff_day, card.payment_day
            ));
        }
    }
    warnings
}
