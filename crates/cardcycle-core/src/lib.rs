//! cardcycle-core
//!
//! Billing-cycle resolution, ledger reconciliation and period payments.
//! Depends on cardcycle-domain. No terminal I/O, no direct storage interactions.

pub mod card_service;
pub mod cycle_service;
pub mod error;
pub mod ledger_service;
pub mod period_payment_service;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;

pub use card_service::*;
pub use cycle_service::*;
pub use error::{CoreError, CoreResult};
pub use ledger_service::*;
pub use period_payment_service::*;
pub use storage::{card_warnings, CardBackupInfo, CardStorage, LoadReport};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use transaction_service::*;

#[cfg(test)]
mod tests;
