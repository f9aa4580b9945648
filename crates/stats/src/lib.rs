//! Sales statistics over a catalog + ledger snapshot.
//!
//! Everything here is a pure function of the two snapshots: no IO, no
//! mutation. "No data" is reported with `None` / empty series, never an error.

pub mod aggregator;
pub mod series;

pub use aggregator::{ChannelShare, Dimension, GroupTotal, Statistics, StatisticsReport};
pub use series::{Series, SeriesPoint, SeriesShape};
