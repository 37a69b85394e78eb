//! Derived billing-cycle dates for a card.

use chrono::NaiveDate;
use serde::Serialize;

use crate::common::DateWindow;

/// Billing-cycle dates resolved for one card relative to a reference day.
///
/// Never persisted; rebuilt from the card's cutoff and payment days each time
/// it is needed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CycleWindow {
    /// Upcoming statement cutoff, the end of the active cycle.
    pub cutoff_date: NaiveDate,
    /// Due date of the statement pending payment.
    pub payment_date: NaiveDate,
    /// Signed day count from the reference day to `payment_date`.
    /// Negative values mean the payment is overdue.
    pub days_until_payment: i64,
    /// First day of the most recently closed cycle.
    pub cycle_start_date: NaiveDate,
    /// Cutoff of the most recently closed cycle.
    pub cycle_end_date: NaiveDate,
    /// First day of the active cycle.
    pub next_cycle_start_date: NaiveDate,
    /// Last day of the active cycle; equals `cutoff_date`.
    pub next_cycle_end_date: NaiveDate,
}

impl CycleWindow {
    /// Window of the statement pending payment.
    pub fn cycle(&self) -> DateWindow {
        DateWindow {
            start: self.cycle_start_date,
            end: self.cycle_end_date,
        }
    }

    /// Window of the cycle currently accruing charges.
    pub fn next_cycle(&self) -> DateWindow {
        DateWindow {
            start: self.next_cycle_start_date,
            end: self.next_cycle_end_date,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.days_until_payment < 0
    }
}
