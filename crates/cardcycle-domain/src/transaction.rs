//! Domain models for card transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Classifies how a transaction affects balances and period payments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// One-time charge.
    Expense,
    /// Charge split into monthly shares.
    InstallmentPurchase,
    /// Payment applied to the overall balance.
    GeneralPayment,
    /// Payment earmarked for one installment purchase.
    InstallmentPayment,
}

impl TransactionKind {
    pub fn is_payment(self) -> bool {
        matches!(
            self,
            TransactionKind::GeneralPayment | TransactionKind::InstallmentPayment
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::InstallmentPurchase => "installment_purchase",
            TransactionKind::GeneralPayment => "general_payment",
            TransactionKind::InstallmentPayment => "installment_payment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    /// Positive increases the balance, negative is a payment.
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_installment_id: Option<String>,
}

impl Transaction {
    fn base(kind: TransactionKind, description: String, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: new_transaction_id(),
            description,
            amount,
            date,
            kind,
            category: None,
            installments: None,
            target_installment_id: None,
        }
    }

    pub fn expense(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::base(TransactionKind::Expense, description.into(), amount, date)
    }

    pub fn installment_purchase(
        description: impl Into<String>,
        amount: f64,
        installments: u32,
        date: NaiveDate,
    ) -> Self {
        let mut txn = Self::base(
            TransactionKind::InstallmentPurchase,
            description.into(),
            amount,
            date,
        );
        txn.installments = Some(installments);
        txn
    }

    /// Records a general payment; `amount` is stored negative whatever its sign.
    pub fn general_payment(description: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self::base(
            TransactionKind::GeneralPayment,
            description.into(),
            -amount.abs(),
            date,
        )
    }

    /// Records a payment against `target_id`; `amount` is stored negative.
    pub fn installment_payment(
        description: impl Into<String>,
        target_id: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        let mut txn = Self::base(
            TransactionKind::InstallmentPayment,
            description.into(),
            -amount.abs(),
            date,
        );
        txn.target_installment_id = Some(target_id.into());
        txn
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Declared number of installments, at least one.
    pub fn installment_count(&self) -> u32 {
        self.installments.unwrap_or(1).max(1)
    }

    /// Theoretical monthly share of an installment purchase.
    pub fn monthly_share(&self) -> f64 {
        self.amount / f64::from(self.installment_count())
    }

    /// Whether this is an installment payment pointing at `purchase_id`.
    pub fn pays_installment(&self, purchase_id: &str) -> bool {
        self.kind == TransactionKind::InstallmentPayment
            && self.target_installment_id.as_deref() == Some(purchase_id)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}] {:.2}",
            self.date, self.description, self.kind, self.amount
        )
    }
}

pub fn new_transaction_id() -> String {
    format!("tx_{}", Uuid::new_v4().simple())
}
