//! Statement cutoff and payment due date resolution.

use cardcycle_domain::{clamped_date_in_month_of, Card, CycleWindow, MAX_DAY_OF_MONTH};
use chrono::NaiveDate;

/// Turns a card's cutoff and payment days into concrete cycle dates.
///
/// Every referenced month is clamped on its own, so a cutoff day of 31 lands
/// on the 28th/29th in February and on the 30th in April.
pub struct CycleResolver;

impl CycleResolver {
    /// Resolves the cycle dates relative to `today`.
    ///
    /// The active cycle ends at this month's cutoff while `today` is on or
    /// before it, and at next month's cutoff afterwards. The closed cycle is
    /// the one before it. Its payment falls in the month after its cutoff and
    /// rolls one more month forward when that day is already behind `today`.
    pub fn resolve(cutoff_day: u32, payment_day: u32, today: NaiveDate) -> CycleWindow {
        let cutoff_day = normalize_day(cutoff_day);
        let payment_day = normalize_day(payment_day);

        let this_month_cutoff = clamped_date_in_month_of(today, 0, cutoff_day);
        let active_offset = if today <= this_month_cutoff { 0 } else { 1 };

        let active_end = clamped_date_in_month_of(today, active_offset, cutoff_day);
        let closed_end = clamped_date_in_month_of(today, active_offset - 1, cutoff_day);
        let closed_start = day_after(clamped_date_in_month_of(
            today,
            active_offset - 2,
            cutoff_day,
        ));

        let mut payment_date = clamped_date_in_month_of(closed_end, 1, payment_day);
        if payment_date < today {
            payment_date = clamped_date_in_month_of(closed_end, 2, payment_day);
        }

        CycleWindow {
            cutoff_date: active_end,
            payment_date,
            days_until_payment: (payment_date - today).num_days(),
            cycle_start_date: closed_start,
            cycle_end_date: closed_end,
            next_cycle_start_date: day_after(closed_end),
            next_cycle_end_date: active_end,
        }
    }

    pub fn resolve_for_card(card: &Card, today: NaiveDate) -> CycleWindow {
        Self::resolve(card.cutoff_day, card.payment_day, today)
    }
}

fn normalize_day(day: u32) -> u32 {
    day.clamp(1, MAX_DAY_OF_MONTH)
}

fn day_after(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}
