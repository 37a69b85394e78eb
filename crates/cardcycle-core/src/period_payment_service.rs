use cardcycle_domain::{Card, CycleWindow, DateWindow, TransactionKind};
use chrono::NaiveDate;
use serde::Serialize;

use crate::LedgerService;

/// Amounts due for the closed statement and for the cycle still accruing.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PeriodPayments {
    pub current: f64,
    pub next: f64,
}

/// Computes the minimum amount to clear a cycle without carrying a balance.
pub struct PeriodPaymentService;

impl PeriodPaymentService {
    /// Expenses and general payments dated inside `[start, end]`, plus one
    /// monthly share for every active installment purchase made on or before
    /// `end`. Installment payments are left out. Never negative; an inverted
    /// window owes nothing.
    pub fn period_payment(card: &Card, start: NaiveDate, end: NaiveDate) -> f64 {
        let window = match DateWindow::new(start, end) {
            Ok(window) => window,
            Err(err) => {
                tracing::debug!(card = %card.id, %err, "skipping period payment");
                return 0.0;
            }
        };
        let transactions = &card.transactions;

        let total: f64 = transactions
            .iter()
            .map(|txn| match txn.kind {
                TransactionKind::Expense | TransactionKind::GeneralPayment
                    if window.contains(txn.date) =>
                {
                    txn.amount
                }
                TransactionKind::InstallmentPurchase
                    if txn.date <= end
                        && LedgerService::is_active_installment(txn, transactions) =>
                {
                    txn.monthly_share()
                }
                _ => 0.0,
            })
            .sum();

        let clamped = total.max(0.0);
        tracing::debug!(card = %card.id, %start, %end, total, "computed period payment");
        clamped
    }

    /// Same computation as [`PeriodPaymentService::period_payment`], applied
    /// to the cycle currently accruing charges.
    pub fn next_period_payment(
        card: &Card,
        next_cycle_start: NaiveDate,
        next_cycle_end: NaiveDate,
    ) -> f64 {
        Self::period_payment(card, next_cycle_start, next_cycle_end)
    }

    pub fn for_cycle(card: &Card, window: &CycleWindow) -> PeriodPayments {
        PeriodPayments {
            current: Self::period_payment(card, window.cycle_start_date, window.cycle_end_date),
            next: Self::next_period_payment(
                card,
                window.next_cycle_start_date,
                window.next_cycle_end_date,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardcycle_domain::Transaction;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card_with(transactions: Vec<Transaction>) -> Card {
        let mut card = Card::new("Daily", "Bank", "4321", 3000.0, 15, 5);
        card.transactions = transactions;
        card
    }

    #[test]
    fn sums_expenses_inside_window_only() {
        let card = card_with(vec![
            Transaction::expense("Before", 40.0, date(2024, 1, 15)),
            Transaction::expense("First day", 10.0, date(2024, 1, 16)),
            Transaction::expense("Last day", 20.0, date(2024, 2, 15)),
            Transaction::expense("After", 80.0, date(2024, 2, 16)),
        ]);
        let due = PeriodPaymentService::period_payment(&card, date(2024, 1, 16), date(2024, 2, 15));
        assert_eq!(due, 30.0);
    }

    #[test]
    fn adds_monthly_share_of_active_installments() {
        let card = card_with(vec![
            Transaction::installment_purchase("TV", 1200.0, 12, date(2023, 10, 2)).with_id("tv"),
            Transaction::installment_payment("TV", "tv", 100.0, date(2023, 11, 5)),
            Transaction::installment_purchase("Later", 600.0, 6, date(2024, 3, 1)),
            Transaction::expense("Fuel", 25.0, date(2024, 2, 1)),
        ]);
        // Installment payments never reduce the period amount.
        let due = PeriodPaymentService::period_payment(&card, date(2024, 1, 16), date(2024, 2, 15));
        assert_eq!(due, 125.0);
    }

    #[test]
    fn paid_off_installments_drop_out() {
        let card = card_with(vec![
            Transaction::installment_purchase("Chair", 200.0, 2, date(2024, 1, 1)).with_id("c"),
            Transaction::installment_payment("Chair", "c", 200.0, date(2024, 1, 20)),
        ]);
        let due = PeriodPaymentService::period_payment(&card, date(2024, 1, 16), date(2024, 2, 15));
        assert_eq!(due, 0.0);
    }

    #[test]
    fn installment_settled_by_decimal_payments_drops_out() {
        let mut transactions =
            vec![Transaction::installment_purchase("Cable", 1.0, 10, date(2024, 1, 2)).with_id("c")];
        for day in 3..13 {
            transactions.push(Transaction::installment_payment("Cable", "c", 0.1, date(2024, 1, day)));
        }
        let card = card_with(transactions);
        let due = PeriodPaymentService::period_payment(&card, date(2024, 1, 16), date(2024, 2, 15));
        assert_eq!(due, 0.0);
    }

    #[test]
    fn inverted_window_owes_nothing() {
        let card = card_with(vec![Transaction::expense("Dinner", 60.0, date(2024, 1, 20))]);
        let due = PeriodPaymentService::period_payment(&card, date(2024, 2, 15), date(2024, 1, 16));
        assert_eq!(due, 0.0);
    }

    #[test]
    fn general_payments_reduce_but_never_below_zero() {
        let card = card_with(vec![
            Transaction::expense("Dinner", 60.0, date(2024, 1, 20)),
            Transaction::general_payment("Payment", 40.0, date(2024, 1, 25)),
        ]);
        let window = (date(2024, 1, 16), date(2024, 2, 15));
        assert_eq!(PeriodPaymentService::period_payment(&card, window.0, window.1), 20.0);

        let overpaid = card_with(vec![
            Transaction::expense("Dinner", 60.0, date(2024, 1, 20)),
            Transaction::general_payment("Payment", 500.0, date(2024, 1, 25)),
        ]);
        assert_eq!(PeriodPaymentService::period_payment(&overpaid, window.0, window.1), 0.0);
    }

    #[test]
    fn for_cycle_covers_closed_and_active_windows() {
        let card = card_with(vec![
            Transaction::expense("Closed", 70.0, date(2024, 1, 10)),
            Transaction::expense("Active", 30.0, date(2024, 1, 18)),
        ]);
        let window = crate::CycleResolver::resolve(15, 5, date(2024, 1, 20));
        let payments = PeriodPaymentService::for_cycle(&card, &window);
        assert_eq!(payments, PeriodPayments { current: 70.0, next: 30.0 });
    }
}
