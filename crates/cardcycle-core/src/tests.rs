use chrono::NaiveDate;

use crate::{
    card_service::{CardService, NewCard},
    cycle_service::CycleResolver,
    ledger_service::LedgerService,
    period_payment_service::PeriodPaymentService,
    storage::card_warnings,
    summary_service::{AlertThresholds, PaymentAlert, SummaryService},
    transaction_service::TransactionService,
    Clock, FixedClock,
};
use cardcycle_domain::{Card, CardStore, Transaction};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn card_service_creates_and_selects_card() {
    let mut store = CardStore::new();
    let id = CardService::add(&mut store, NewCard::new("Main", "Chase", "4242", 2500.0, 15, 5))
        .expect("add card");

    assert_eq!(store.card_count(), 1);
    assert_eq!(store.selected_card().map(|card| card.id.as_str()), Some(id.as_str()));
}

#[test]
fn installment_flow_nets_payments_against_purchase() {
    let mut store = CardStore::new();
    let card_id =
        CardService::add(&mut store, NewCard::new("Main", "Chase", "4242", 2500.0, 15, 5)).unwrap();
    let purchase = TransactionService::add_installment_purchase(
        &mut store, &card_id, "Laptop", 900.0, 9, date(2024, 1, 3), None,
    )
    .expect("add purchase");
    for month in 2..=4 {
        TransactionService::add_installment_payment(
            &mut store, &card_id, &purchase, 100.0, date(2024, month, 5), None,
        )
        .expect("add payment");
    }

    let card = store.card(&card_id).unwrap();
    let target = card.transaction(&purchase).unwrap();
    let progress = LedgerService::remaining_and_paid(target, &card.transactions);
    assert_eq!(progress.paid, 300.0);
    assert_eq!(progress.remaining, 600.0);
    assert_eq!(progress.payment_count, 3);
    // The payments count once in the raw sum and once against the purchase.
    assert_eq!(LedgerService::balance(&card.transactions), 300.0);

    TransactionService::remove(&mut store, &card_id, &purchase).expect("cascade delete");
    let card = store.card(&card_id).unwrap();
    assert!(card
        .transactions
        .iter()
        .all(|txn| txn.target_installment_id.as_deref() != Some(purchase.as_str())));
    assert_eq!(LedgerService::balance(&card.transactions), 0.0);
}

#[test]
fn scenario_closed_cycle_and_period_payment() {
    let mut card = Card::new("Scenario", "Bank", "0001", 5000.0, 15, 5);
    card.transactions = vec![
        Transaction::expense("Closed cycle", 120.0, date(2024, 1, 2)),
        Transaction::expense("Active cycle", 45.0, date(2024, 1, 17)),
        Transaction::general_payment("Payment", 20.0, date(2024, 1, 12)),
    ];
    let clock = FixedClock(date(2024, 1, 20));

    let window = CycleResolver::resolve_for_card(&card, clock.today());
    assert_eq!(window.cycle_end_date, date(2024, 1, 15));
    assert_eq!(window.cutoff_date, date(2024, 2, 15));
    assert_eq!(window.payment_date, date(2024, 2, 5));

    let payments = PeriodPaymentService::for_cycle(&card, &window);
    assert_eq!(payments.current, 100.0);
    assert_eq!(payments.next, 45.0);
}

#[test]
fn period_payment_is_never_negative() {
    let mut card = Card::new("Overpaid", "Bank", "0002", 500.0, 10, 1);
    card.transactions = vec![
        Transaction::expense("Small", 10.0, date(2024, 5, 1)),
        Transaction::general_payment("Big", 400.0, date(2024, 5, 2)),
    ];
    for offset in 0..60 {
        let today = date(2024, 4, 1) + chrono::Duration::days(offset);
        let window = CycleResolver::resolve_for_card(&card, today);
        let payments = PeriodPaymentService::for_cycle(&card, &window);
        assert!(payments.current >= 0.0 && payments.next >= 0.0);
    }
}

#[test]
fn summary_flags_urgent_payment() {
    let card = Card::new("Due", "Bank", "0003", 1000.0, 25, 5);
    let summary = SummaryService::card_summary(&card, date(2024, 3, 3), &AlertThresholds::default());
    assert_eq!(summary.cycle.payment_date, date(2024, 3, 5));
    assert_eq!(summary.cycle.days_until_payment, 2);
    assert_eq!(summary.payment_alert, PaymentAlert::Urgent);
}

#[test]
fn dangling_payments_surface_as_warnings() {
    let mut card = Card::new("Legacy", "Bank", "0004", 1000.0, 10, 1).with_id("card_legacy");
    card.transactions.push(
        Transaction::installment_payment("Orphan", "tx_gone", 50.0, date(2024, 1, 1)).with_id("tx_o"),
    );
    let warnings = card_warnings(&[card]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("tx_gone"));
}

#[test]
fn positive_payments_surface_as_warnings() {
    let mut card = Card::new("Legacy", "Bank", "0005", 1000.0, 10, 1).with_id("card_sign");
    let mut payment = Transaction::general_payment("Payment", 30.0, date(2024, 1, 1)).with_id("tx_p");
    payment.amount = 30.0;
    card.transactions.push(payment);
    card.transactions
        .push(Transaction::expense("Dinner", 30.0, date(2024, 1, 2)).with_id("tx_e"));
    let warnings = card_warnings(&[card]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("tx_p"));
}
