//! cardcycle-domain
//!
//! Pure domain models (Card, Transaction, CycleWindow, CardStore, etc.).
//! No I/O, no storage. Only data types, calendar helpers and core enums.

pub mod card;
pub mod common;
pub mod cycle;
pub mod store;
pub mod transaction;

pub use card::*;
pub use common::*;
pub use cycle::*;
pub use store::*;
pub use transaction::*;
