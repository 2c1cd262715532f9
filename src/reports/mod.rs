//! Reporting layer: pure transformations over the in-memory prospect list.
//!
//! Every report runs the same pipeline: [`scope`] the records to what the
//! caller may see, narrow them with [`filter_by_period`], then group them with
//! one of the aggregation functions. Nothing here touches the database and
//! nothing here can fail; the same inputs always produce the same rows.

pub mod aggregate;
pub mod breakdown;
pub mod channel;
pub mod heatmap;
pub mod metrics;
pub mod period;
pub mod scope;

pub use aggregate::*;
pub use breakdown::*;
pub use channel::*;
pub use heatmap::*;
pub use metrics::*;
pub use period::*;
pub use scope::*;

#[cfg(test)]
pub(crate) mod fixtures;
