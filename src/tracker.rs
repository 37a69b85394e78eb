//! Facade that owns the card store and keeps it in step with storage and config.

use std::path::{Path, PathBuf};

use cardcycle_config::{Config, ConfigManager, Theme};
use cardcycle_core::{
    AlertThresholds, CardBackupInfo, CardChanges, CardService, CardStorage, CardSummary, Clock,
    CoreResult, CycleResolver, NewCard, PeriodPaymentService, PeriodPayments, PortfolioSummary,
    SummaryService, SystemClock, TransactionService,
};
use cardcycle_domain::{Card, CardStore, CycleWindow, Transaction, TransactionFilter};
use cardcycle_storage_json::{export_document, export_file_name, parse_import, JsonCardStorage};
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{TrackerError, TrackerResult};

const APP_DIR_NAME: &str = "cardcycle";
const IMPORT_BACKUP_NOTE: &str = "before import";

/// What a successful import changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub card_count: usize,
    /// Theme applied from the document, if it named a known one.
    pub theme: Option<Theme>,
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

/// A rendered export ready to be written wherever the caller wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    pub file_name: String,
    pub contents: String,
}

/// Coordinates the in-memory [`CardStore`], persistence and preferences.
///
/// Every mutation is persisted before it returns. When saving fails the
/// in-memory state is rolled back so memory and disk never disagree.
pub struct Tracker {
    store: CardStore,
    storage: Box<dyn CardStorage>,
    config_manager: ConfigManager,
    config: Config,
    clock: Box<dyn Clock>,
    migrations: Vec<String>,
    warnings: Vec<String>,
}

impl Tracker {
    /// Builds a tracker and loads the stored cards and config.
    pub fn new(
        storage: Box<dyn CardStorage>,
        config_manager: ConfigManager,
        clock: Box<dyn Clock>,
    ) -> TrackerResult<Self> {
        let config = config_manager.load()?;
        let report = storage.load_cards()?;
        tracing::info!(
            cards = report.cards.len(),
            migrations = report.migrations.len(),
            warnings = report.warnings.len(),
            "loaded cards"
        );
        Ok(Self {
            store: CardStore::from_cards(report.cards),
            storage,
            config_manager,
            config,
            clock,
            migrations: report.migrations,
            warnings: report.warnings,
        })
    }

    /// Opens the tracker with config under the platform config directory and
    /// cards under [`Config::resolve_data_dir`].
    pub fn open_default() -> TrackerResult<Self> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let data_dir = config.resolve_data_dir();
        Self::open_with(config_manager, &config, data_dir, Box::new(SystemClock))
    }

    /// Opens the tracker with config under `base`. Cards live in the configured
    /// data directory, or `<base>/data` when none is set.
    pub fn open_in(base: &Path, clock: Box<dyn Clock>) -> TrackerResult<Self> {
        let config_manager = ConfigManager::with_base_dir(base.to_path_buf())?;
        let config = config_manager.load()?;
        let data_dir = config
            .data_dir
            .clone()
            .unwrap_or_else(|| base.join("data"));
        Self::open_with(config_manager, &config, data_dir, clock)
    }

    fn open_with(
        config_manager: ConfigManager,
        config: &Config,
        data_dir: PathBuf,
        clock: Box<dyn Clock>,
    ) -> TrackerResult<Self> {
        tracing::debug!(data_dir = %data_dir.display(), "opening card storage");
        let storage = JsonCardStorage::with_retention(data_dir, config.backup_retention)?;
        Self::new(Box::new(storage), config_manager, clock)
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn cards(&self) -> &[Card] {
        &self.store.cards
    }

    pub fn card(&self, id: &str) -> TrackerResult<&Card> {
        Ok(CardService::get(&self.store, id)?)
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.store.selected_card()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Legacy upgrades applied by the last load or import.
    pub fn migrations(&self) -> &[String] {
        &self.migrations
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn thresholds(&self) -> AlertThresholds {
        let alerts = self.config.alerts;
        AlertThresholds {
            urgent_days: alerts.urgent_days,
            soon_days: alerts.soon_days,
            high_usage_percent: alerts.high_usage_percent,
            critical_usage_percent: alerts.critical_usage_percent,
        }
    }

    pub fn add_card(&mut self, new_card: NewCard) -> TrackerResult<String> {
        self.commit(|store| CardService::add(store, new_card))
    }

    pub fn edit_card(&mut self, id: &str, changes: CardChanges) -> TrackerResult<()> {
        self.commit(|store| CardService::edit(store, id, changes))
    }

    pub fn remove_card(&mut self, id: &str) -> TrackerResult<Card> {
        self.commit(|store| CardService::remove(store, id))
    }

    /// Selection is session state and is not persisted.
    pub fn select_card(&mut self, id: &str) -> TrackerResult<()> {
        Ok(CardService::select(&mut self.store, id)?)
    }

    pub fn add_expense(
        &mut self,
        card_id: &str,
        description: &str,
        amount: f64,
        date: NaiveDate,
        category: Option<&str>,
    ) -> TrackerResult<String> {
        self.commit(|store| {
            TransactionService::add_expense(store, card_id, description, amount, date, category)
        })
    }

    pub fn add_installment_purchase(
        &mut self,
        card_id: &str,
        description: &str,
        amount: f64,
        installments: u32,
        date: NaiveDate,
        category: Option<&str>,
    ) -> TrackerResult<String> {
        self.commit(|store| {
            TransactionService::add_installment_purchase(
                store,
                card_id,
                description,
                amount,
                installments,
                date,
                category,
            )
        })
    }

    pub fn add_general_payment(
        &mut self,
        card_id: &str,
        description: &str,
        amount: f64,
        date: NaiveDate,
    ) -> TrackerResult<String> {
        self.commit(|store| {
            TransactionService::add_general_payment(store, card_id, description, amount, date)
        })
    }

    pub fn add_installment_payment(
        &mut self,
        card_id: &str,
        target_id: &str,
        amount: f64,
        date: NaiveDate,
        description: Option<&str>,
    ) -> TrackerResult<String> {
        self.commit(|store| {
            TransactionService::add_installment_payment(
                store,
                card_id,
                target_id,
                amount,
                date,
                description,
            )
        })
    }

    pub fn remove_transaction(
        &mut self,
        card_id: &str,
        transaction_id: &str,
    ) -> TrackerResult<Vec<Transaction>> {
        self.commit(|store| TransactionService::remove(store, card_id, transaction_id))
    }

    pub fn set_filter(&mut self, card_id: &str, filter: TransactionFilter) -> TrackerResult<()> {
        Ok(TransactionService::set_filter(&mut self.store, card_id, filter)?)
    }

    pub fn clear_filter(&mut self, card_id: &str) -> TrackerResult<()> {
        Ok(TransactionService::clear_filter(&mut self.store, card_id)?)
    }

    /// The card's transactions matching its filter, newest first.
    pub fn transactions(&self, card_id: &str) -> TrackerResult<Vec<&Transaction>> {
        Ok(TransactionService::list(&self.store, card_id)?)
    }

    pub fn cycle_window(&self, card_id: &str) -> TrackerResult<CycleWindow> {
        let card = self.card(card_id)?;
        Ok(CycleResolver::resolve_for_card(card, self.today()))
    }

    pub fn period_payments(&self, card_id: &str) -> TrackerResult<PeriodPayments> {
        let card = self.card(card_id)?;
        let window = CycleResolver::resolve_for_card(card, self.today());
        Ok(PeriodPaymentService::for_cycle(card, &window))
    }

    pub fn card_summary(&self, card_id: &str) -> TrackerResult<CardSummary> {
        let card = self.card(card_id)?;
        Ok(SummaryService::card_summary(card, self.today(), &self.thresholds()))
    }

    pub fn portfolio(&self) -> PortfolioSummary {
        SummaryService::portfolio(&self.store.cards, &self.thresholds())
    }

    /// Replaces every card with the contents of an import document.
    ///
    /// Nothing changes in memory or on disk when the document is rejected. A
    /// known theme in the document is applied to the config.
    pub fn import_json(&mut self, text: &str) -> TrackerResult<ImportOutcome> {
        let document = parse_import(text)?;

        let card_count = document.cards.len();
        let cards = document.cards;
        self.commit_noted(Some(IMPORT_BACKUP_NOTE), |store| {
            store.replace_cards(cards);
            Ok(())
        })?;
        tracing::info!(cards = card_count, "imported cards");
        self.migrations = document.migrations.clone();
        self.warnings = document.warnings;

        // The cards are already saved, so a theme problem only warns.
        let theme = match document.theme.as_deref() {
            Some(class) => match Theme::from_class(class) {
                Some(theme) => match self.set_theme(theme) {
                    Ok(()) => Some(theme),
                    Err(err) => {
                        tracing::warn!(theme = class, error = %err, "could not apply imported theme");
                        self.warnings
                            .push(format!("could not apply theme `{class}`: {err}"));
                        None
                    }
                },
                None => {
                    self.warnings.push(format!("ignored unknown theme `{class}`"));
                    None
                }
            },
            None => None,
        };

        let warnings = self.warnings.clone();
        Ok(ImportOutcome {
            card_count,
            theme,
            migrations: document.migrations,
            warnings,
        })
    }

    /// Renders every card for download, optionally wrapped with the theme.
    pub fn export_json(&self, include_theme: bool) -> TrackerResult<ExportedDocument> {
        if self.store.is_empty() {
            return Err(TrackerError::NothingToExport);
        }
        let theme = include_theme.then(|| self.config.theme.class());
        let contents = export_document(&self.store.cards, theme)?;
        let file_name = export_file_name(self.today());
        tracing::info!(cards = self.store.card_count(), file = %file_name, "exported cards");
        Ok(ExportedDocument {
            file_name,
            contents,
        })
    }

    pub fn set_theme(&mut self, theme: Theme) -> TrackerResult<()> {
        let mut config = self.config.clone();
        config.theme = theme;
        self.update_config(config)
    }

    pub fn update_config(&mut self, config: Config) -> TrackerResult<()> {
        self.config_manager.save(&config)?;
        self.config = config;
        tracing::info!(theme = %self.config.theme.class(), "saved config");
        Ok(())
    }

    /// Writes the current config to a named backup and returns its file name.
    pub fn backup_config(&self, note: Option<&str>) -> TrackerResult<String> {
        Ok(self.config_manager.backup(&self.config, note)?)
    }

    pub fn list_config_backups(&self) -> TrackerResult<Vec<String>> {
        Ok(self.config_manager.list_backups()?)
    }

    /// Makes a config backup current again. Storage location changes apply
    /// the next time the tracker is opened.
    pub fn restore_config(&mut self, backup_name: &str) -> TrackerResult<()> {
        let config = self.config_manager.restore(backup_name)?;
        self.update_config(config)
    }

    pub fn backup(&self, note: Option<&str>) -> TrackerResult<Option<CardBackupInfo>> {
        Ok(self.storage.backup_cards(note)?)
    }

    pub fn list_backups(&self) -> TrackerResult<Vec<CardBackupInfo>> {
        Ok(self.storage.list_backups()?)
    }

    /// Restores a backup over the stored cards and reloads them.
    pub fn restore_backup(&mut self, backup: &CardBackupInfo) -> TrackerResult<()> {
        let report = self.storage.restore_backup(backup)?;
        self.store.replace_cards(report.cards);
        self.migrations = report.migrations;
        self.warnings = report.warnings;
        Ok(())
    }

    /// Applies `op` to the store and saves, rolling back if either step fails.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut CardStore) -> CoreResult<T>,
    ) -> TrackerResult<T> {
        self.commit_noted(None, op)
    }

    /// Like [`Tracker::commit`], labelling the backup of the replaced file.
    fn commit_noted<T>(
        &mut self,
        note: Option<&str>,
        op: impl FnOnce(&mut CardStore) -> CoreResult<T>,
    ) -> TrackerResult<T> {
        let snapshot = self.store.clone();
        let result = op(&mut self.store).and_then(|value| {
            self.storage.save_cards_noted(&self.store.cards, note)?;
            Ok(value)
        });
        if result.is_err() {
            self.store = snapshot;
        }
        Ok(result?)
    }
}
