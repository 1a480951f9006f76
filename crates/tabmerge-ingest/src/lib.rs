//! Table ingestion and output over CSV files.
//!
//! This crate is the file I/O collaborator of the merge engine: it turns CSV
//! files into [`Table`](tabmerge_model::Table) values and writes merged tables
//! back out.
//!
//! # Features
//!
//! - **Header loading**: read only the header row for mapping review
//! - **Table loading**: read every row, empty cells become blanks
//! - **Table saving**: write a table under its own header order
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use tabmerge_ingest::{load_headers, load_table, save_table};
//!
//! let headers = load_headers(Path::new("target.csv"))?;
//! let table = load_table(Path::new("source.csv"))?;
//! save_table(Path::new("merged.csv"), &table)?;
//! ```

mod error;
mod reader;
mod writer;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, load_headers, load_table,
    validate_encoding,
};

// === CSV Writing ===
pub use writer::save_table;
