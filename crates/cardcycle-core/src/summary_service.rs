use cardcycle_domain::{Card, CycleWindow};
use chrono::NaiveDate;
use serde::Serialize;

use crate::{CycleResolver, InstallmentStatus, LedgerService, PeriodPaymentService};

/// Limits used to classify credit usage and payment urgency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Days before the due date at which a payment becomes urgent.
    pub urgent_days: i64,
    pub soon_days: i64,
    /// Usage percent above which usage is reported as high.
    pub high_usage_percent: f64,
    pub critical_usage_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            urgent_days: 3,
            soon_days: 7,
            high_usage_percent: 75.0,
            critical_usage_percent: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UsageLevel {
    Normal,
    High,
    Critical,
}

impl UsageLevel {
    pub fn classify(usage_percent: f64, thresholds: &AlertThresholds) -> Self {
        if usage_percent > thresholds.critical_usage_percent {
            UsageLevel::Critical
        } else if usage_percent > thresholds.high_usage_percent {
            UsageLevel::High
        } else {
            UsageLevel::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAlert {
    Overdue,
    Urgent,
    Soon,
    Clear,
}

impl PaymentAlert {
    pub fn classify(cycle: &CycleWindow, thresholds: &AlertThresholds) -> Self {
        let days = cycle.days_until_payment;
        if cycle.is_overdue() {
            PaymentAlert::Overdue
        } else if days <= thresholds.urgent_days {
            PaymentAlert::Urgent
        } else if days <= thresholds.soon_days {
            PaymentAlert::Soon
        } else {
            PaymentAlert::Clear
        }
    }
}

/// Everything the card detail view shows, derived from one snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardSummary {
    pub card_id: String,
    pub balance: f64,
    pub available_credit: f64,
    pub usage_percent: f64,
    pub usage_level: UsageLevel,
    pub cycle: CycleWindow,
    pub period_payment: f64,
    pub next_period_payment: f64,
    pub payment_alert: PaymentAlert,
    pub installments: Vec<InstallmentStatus>,
}

/// Totals across every card.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PortfolioSummary {
    pub card_count: usize,
    pub total_balance: f64,
    pub total_limit: f64,
    pub total_available: f64,
    pub usage_percent: f64,
    pub usage_level: UsageLevel,
}

pub struct SummaryService;

impl SummaryService {
    pub fn card_summary(card: &Card, today: NaiveDate, thresholds: &AlertThresholds) -> CardSummary {
        let balance = LedgerService::balance(&card.transactions);
        let usage_percent = usage_percent(balance, card.credit_limit);
        let cycle = CycleResolver::resolve_for_card(card, today);
        let payments = PeriodPaymentService::for_cycle(card, &cycle);
        let installments = LedgerService::active_installments(&card.transactions)
            .into_iter()
            .map(|purchase| LedgerService::installment_status(purchase, &card.transactions))
            .collect();

        tracing::debug!(card = %card.id, balance, %today, "recomputed card summary");
        CardSummary {
            card_id: card.id.clone(),
            balance,
            available_credit: card.credit_limit - balance,
            usage_percent,
            usage_level: UsageLevel::classify(usage_percent, thresholds),
            cycle,
            period_payment: payments.current,
            next_period_payment: payments.next,
            payment_alert: PaymentAlert::classify(&cycle, thresholds),
            installments,
        }
    }

    pub fn portfolio(cards: &[Card], thresholds: &AlertThresholds) -> PortfolioSummary {
        let total_balance: f64 = cards
            .iter()
            .map(|card| LedgerService::balance(&card.transactions))
            .sum();
        let total_limit: f64 = cards.iter().map(|card| card.credit_limit).sum();
        let usage_percent = usage_percent(total_balance, total_limit);
        PortfolioSummary {
            card_count: cards.len(),
            total_balance,
            total_limit,
            total_available: total_limit - total_balance,
            usage_percent,
            usage_level: UsageLevel::classify(usage_percent, thresholds),
        }
    }
}

fn usage_percent(balance: f64, limit: f64) -> f64 {
    if limit > 0.0 {
        (balance / limit) * 100.0
    } else {
        0.0
    }
}
