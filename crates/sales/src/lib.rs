//! Sales ledger domain module.
//!
//! Sale events are facts: created once when a sale is registered, appended to
//! the ledger, never edited. No IO here.

pub mod channel;
pub mod ledger;

pub use channel::Channel;
pub use ledger::{Ledger, SaleEvent};
