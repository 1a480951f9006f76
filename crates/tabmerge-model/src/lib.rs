//! Shared table model for tabmerge.
//!
//! A [`Table`] is an ordered header of unique column names plus ordered
//! [`Row`]s keyed by column name.

#![deny(unsafe_code)]

pub mod error;
pub mod table;

pub use error::{ModelError, Result};
pub use table::{CellValue, Row, Table, first_duplicate};
