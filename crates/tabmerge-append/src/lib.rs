//! Appends the rows of a source table to a target table.
//!
//! The source is first viewed through a finalized column mapping, then
//! restricted to the columns it shares with the target. Target rows are kept
//! unchanged and source rows follow them in their original order.

#![deny(unsafe_code)]

mod align;
mod merge;

pub use align::{RenamedView, common_columns};
pub use merge::{MergeOutcome, MergeStats, merge};
