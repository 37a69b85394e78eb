//! In-memory card book shared between callers and services.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{card::Card, common::*};

/// Optional inclusive date bounds used when listing a card's transactions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn between(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// Owns the card list plus the per-session selection and filter state.
///
/// Only `cards` is persisted; selection and filters live for the session.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    pub cards: Vec<Card>,
    pub selected_card_id: Option<String>,
    pub filters: HashMap<String, TransactionFilter>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded cards, selecting the first one.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let mut store = Self::new();
        store.replace_cards(cards);
        store
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        find_by_id(&self.cards, id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        find_by_id_mut(&mut self.cards, id)
    }

    pub fn add_card(&mut self, card: Card) -> String {
        let id = card.id.clone();
        self.cards.push(card);
        id
    }

    /// Removes a card together with its filter and, if needed, the selection.
    pub fn remove_card(&mut self, id: &str) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.id == id)?;
        let removed = self.cards.remove(index);
        self.filters.remove(id);
        if self.selected_card_id.as_deref() == Some(id) {
            self.selected_card_id = None;
        }
        Some(removed)
    }

    /// Swaps the whole card list, resetting session state.
    pub fn replace_cards(&mut self, cards: Vec<Card>) {
        self.selected_card_id = cards.first().map(|card| card.id.clone());
        self.filters.clear();
        self.cards = cards;
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.selected_card_id
            .as_deref()
            .and_then(|id| self.card(id))
    }

    pub fn filter_for(&self, card_id: &str) -> TransactionFilter {
        self.filters.get(card_id).copied().unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card(id: &str) -> Card {
        Card::new("Card", "Bank", "0000", 1000.0, 10, 1).with_id(id)
    }

    #[test]
    fn remove_card_cascades_session_state() {
        let mut store = CardStore::from_cards(vec![card("a"), card("b")]);
        assert_eq!(store.selected_card_id.as_deref(), Some("a"));
        store
            .filters
            .insert("a".into(), TransactionFilter::between(Some(date(2024, 1, 1)), None));

        let removed = store.remove_card("a").expect("card removed");
        assert_eq!(removed.id, "a");
        assert!(store.selected_card_id.is_none());
        assert!(store.filters.is_empty());
        assert_eq!(store.card_count(), 1);
        assert!(store.remove_card("a").is_none());
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let filter = TransactionFilter::between(Some(date(2024, 1, 10)), Some(date(2024, 1, 20)));
        assert!(filter.matches(date(2024, 1, 10)));
        assert!(filter.matches(date(2024, 1, 20)));
        assert!(!filter.matches(date(2024, 1, 21)));
        assert!(TransactionFilter::default().matches(date(1999, 1, 1)));
        assert!(TransactionFilter::default().is_empty());
    }

    #[test]
    fn replace_cards_selects_first_and_clears_filters() {
        let mut store = CardStore::from_cards(vec![card("a")]);
        store.filters.insert("a".into(), TransactionFilter::default());
        store.replace_cards(vec![card("x"), card("y")]);
        assert_eq!(store.selected_card().map(|c| c.id.as_str()), Some("x"));
        assert!(store.filters.is_empty());
        store.replace_cards(Vec::new());
        assert!(store.selected_card_id.is_none());
        assert!(store.is_empty());
    }
}
