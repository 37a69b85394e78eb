#![doc(test(attr(deny(warnings))))]

//! cardcycle tracks credit cards through their billing cycles: statement
//! cutoffs, payment due dates, installment purchases and the amount to pay
//! each period.
//!
//! The [`Tracker`] facade ties the domain, core services, JSON storage and
//! user config crates together.

pub mod errors;
pub mod tracker;
pub mod utils;

pub use cardcycle_config as config;
pub use cardcycle_core as services;
pub use cardcycle_domain as domain;
pub use cardcycle_storage_json as storage;

pub use errors::{TrackerError, TrackerResult};
pub use tracker::{ExportedDocument, ImportOutcome, Tracker};
pub use utils::build_info;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(build = %build_info::current(), "cardcycle tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }

    #[test]
    fn build_info_reports_package_version() {
        let info = super::build_info::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.summary().starts_with("cardcycle "));
    }
}
