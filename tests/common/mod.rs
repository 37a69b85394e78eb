#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use cardcycle::services::{FixedClock, NewCard};
use cardcycle::Tracker;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Creates an isolated base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a tracker over a fresh directory with the clock pinned to `today`.
pub fn setup_tracker(today: NaiveDate) -> (Tracker, PathBuf) {
    let base = temp_base();
    let tracker = Tracker::open_in(&base, Box::new(FixedClock(today))).expect("open tracker");
    (tracker, base)
}

pub fn reopen(base: &Path, today: NaiveDate) -> Tracker {
    Tracker::open_in(base, Box::new(FixedClock(today))).expect("reopen tracker")
}

pub fn travel_card() -> NewCard {
    NewCard::new("Travel", "BBVA", "1234", 5000.0, 15, 5)
}
