//! Upgrades legacy card documents before they are deserialized.

use cardcycle_core::{CoreError, CoreResult};
use cardcycle_domain::{Card, TransactionKind};
use serde_json::{Map, Value};

const LEGACY_INSTALLMENT_FLAG: &str = "isInstallment";

/// Cards decoded from a JSON document plus one note per upgraded transaction.
#[derive(Debug, Clone, Default)]
pub struct MigratedCards {
    pub cards: Vec<Card>,
    pub migrations: Vec<String>,
}

/// Validates a card array, fills in missing transaction kinds and decodes it.
///
/// Every card needs `id`, `nickname`, a numeric `creditLimit` and a
/// `transactions` array. Failures are reported as [`CoreError::MalformedImport`].
pub fn cards_from_value(value: Value) -> CoreResult<MigratedCards> {
    let Value::Array(entries) = value else {
        return Err(CoreError::MalformedImport(
            "expected an array of cards".into(),
        ));
    };

    let mut migrated = MigratedCards::default();
    for (index, mut entry) in entries.into_iter().enumerate() {
        let card_id = validate_card(index, &entry)?;
        if let Some(transactions) = entry
            .get_mut("transactions")
            .and_then(Value::as_array_mut)
        {
            for txn in transactions.iter_mut().filter_map(Value::as_object_mut) {
                if let Some(note) = migrate_transaction(txn) {
                    migrated.migrations.push(format!("card {card_id}: {note}"));
                }
            }
        }
        let card: Card = serde_json::from_value(entry)
            .map_err(|err| CoreError::MalformedImport(format!("card {card_id}: {err}")))?;
        migrated.cards.push(card);
    }

    if !migrated.migrations.is_empty() {
        tracing::warn!(
            count = migrated.migrations.len(),
            "upgraded legacy transactions"
        );
    }
    Ok(migrated)
}

fn validate_card(index: usize, entry: &Value) -> CoreResult<String> {
    let malformed = |reason: &str| {
        CoreError::MalformedImport(format!("card at position {index} {reason}"))
    };
    let object = entry.as_object().ok_or_else(|| malformed("is not an object"))?;
    let id = object
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| malformed("has no id"))?;
    if !object.get("nickname").is_some_and(Value::is_string) {
        return Err(malformed("has no nickname"));
    }
    if !object.get("creditLimit").is_some_and(Value::is_number) {
        return Err(malformed("has no numeric creditLimit"));
    }
    if !object.get("transactions").is_some_and(Value::is_array) {
        return Err(malformed("has no transactions array"));
    }
    Ok(id.to_string())
}

/// Applies the legacy upgrades to one transaction, describing what changed.
fn migrate_transaction(txn: &mut Map<String, Value>) -> Option<String> {
    let mut changes = Vec::new();
    let id = txn
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();

    if !txn.get("type").is_some_and(Value::is_string) {
        let amount = txn.get("amount").and_then(Value::as_f64).unwrap_or(0.0);
        let legacy_installment = txn
            .get(LEGACY_INSTALLMENT_FLAG)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let kind = if amount < 0.0 {
            TransactionKind::GeneralPayment
        } else if legacy_installment {
            TransactionKind::InstallmentPurchase
        } else {
            TransactionKind::Expense
        };
        txn.insert("type".into(), Value::String(kind.as_str().into()));
        changes.push(format!("set type to {kind}"));
    }
    txn.remove(LEGACY_INSTALLMENT_FLAG);

    if let Some(Value::String(date)) = txn.get_mut("date") {
        // ISO timestamps keep only the calendar day.
        if date.len() > 10 && date.is_char_boundary(10) {
            date.truncate(10);
            changes.push("truncated date to the calendar day".into());
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(format!("transaction {id} {}", changes.join(", ")))
    }
}
