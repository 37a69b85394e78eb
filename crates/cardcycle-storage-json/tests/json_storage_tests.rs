use cardcycle_core::CardStorage;
use cardcycle_domain::{Card, Transaction};
use cardcycle_storage_json::{JsonCardStorage, CARDS_FILE_NAME};
use chrono::NaiveDate;
use std::fs;
use tempfile::tempdir;

fn sample_card(id: &str) -> Card {
    let mut card = Card::new("Travel", "BBVA", "1234", 5000.0, 15, 5).with_id(id);
    let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    card.push_transaction(Transaction::expense("Hotel", 320.0, date).with_category("Trips"));
    card
}

#[test]
fn json_storage_can_save_and_load_cards() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::new(dir.path().join("data")).expect("create storage");

    let cards = vec![sample_card("card_a"), sample_card("card_b")];
    storage.save_cards(&cards).expect("save cards");
    let report = storage.load_cards().expect("load cards");

    assert_eq!(report.cards, cards);
    assert!(report.migrations.is_empty());
    assert!(report.warnings.is_empty());
    let path = storage.cards_path();
    assert_eq!(path.file_name().and_then(|name| name.to_str()), Some(CARDS_FILE_NAME));
    assert!(!path.with_file_name("cards.json.partial").exists());
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::new(dir.path().to_path_buf()).expect("create storage");
    let report = storage.load_cards().expect("load cards");
    assert!(report.cards.is_empty());
    assert!(storage.list_backups().unwrap().is_empty());
}

#[test]
fn saving_over_existing_file_creates_pruned_backups() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::with_retention(dir.path().to_path_buf(), 2).expect("create storage");

    for round in 0..5 {
        storage
            .save_cards(&[sample_card(&format!("card_{round}"))])
            .expect("save cards");
    }

    let backups = storage.list_backups().expect("list backups");
    assert_eq!(backups.len(), 2);
    // The newest backup holds the state before the last save.
    let restored = storage.restore_backup(&backups[0]).expect("restore backup");
    assert_eq!(restored.cards[0].id, "card_3");
    let reloaded = storage.load_cards().expect("reload");
    assert_eq!(reloaded.cards[0].id, "card_3");
}

#[test]
fn manual_backup_carries_note() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::new(dir.path().to_path_buf()).expect("create storage");
    assert!(storage.backup_cards(Some("first")).unwrap().is_none());

    storage.save_cards(&[sample_card("card_a")]).unwrap();
    let info = storage
        .backup_cards(Some("Before import"))
        .expect("create backup")
        .expect("file exists");
    assert!(info.id.starts_with("cards_"));
    assert!(info.id.ends_with("_before-import.json"));
    assert!(info.path.starts_with(storage.backups_dir()));

    storage.delete_backup(&info.id).unwrap();
    assert!(storage.list_backups().unwrap().is_empty());
}

#[test]
fn noted_save_makes_a_single_labelled_backup() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_cards_noted(&[sample_card("card_a")], Some("ignored")).unwrap();
    assert!(storage.list_backups().unwrap().is_empty());

    storage
        .save_cards_noted(&[sample_card("card_b")], Some("before import"))
        .expect("noted save");
    let backups = storage.list_backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].id.ends_with("_before-import.json"));
    assert_eq!(storage.load_cards().unwrap().cards[0].id, "card_b");
}

#[test]
fn legacy_file_is_migrated_on_load() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(
        storage.cards_path(),
        r#"[{
            "id": "card_1", "nickname": "Old", "bank": "B", "last4": "9999",
            "creditLimit": 1000,
            "transactions": [
                { "id": "tx_1", "description": "Refund", "amount": -20, "date": "2023-06-01" },
                { "id": "tx_2", "description": "Pay", "amount": -5, "date": "2023-06-02",
                  "type": "installment_payment", "targetInstallmentId": "tx_none" }
            ]
        }]"#,
    )
    .unwrap();

    let report = storage.load_cards().expect("load legacy");
    assert_eq!(report.cards[0].cutoff_day, 1);
    assert_eq!(report.migrations.len(), 1);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonCardStorage::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(storage.cards_path(), r#"[{"nickname": "no id"}]"#).unwrap();
    let err = storage.load_cards().unwrap_err();
    assert!(matches!(err, cardcycle_core::CoreError::Storage(_)), "{err:?}");
}
