//! Column reconciliation between a source and a target header.
//!
//! The [`score`] module ranks source columns against a target column name;
//! the [`mapping`] module turns those rankings into a reviewable
//! target-to-source [`Mapping`].
//!
//! # Example
//!
//! ```
//! use tabmerge_map::{MappingStatus, build_initial_mapping};
//!
//! let mut mapping = build_initial_mapping(&["Name", "Email"], &["Name", "E-mail"])?;
//! assert_eq!(mapping.entry("E-mail").unwrap().status(), MappingStatus::Suggested);
//!
//! mapping.set_manual_mapping("E-mail", Some("Email"))?;
//! let final_mapping = mapping.finalize();
//! assert_eq!(final_mapping["E-mail"], "Email");
//! # Ok::<(), tabmerge_map::MappingError>(())
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod mapping;
pub mod score;

pub use error::{MappingError, Result};
pub use mapping::{
    DEFAULT_LIMIT, DEFAULT_THRESHOLD, FinalMapping, Mapping, MappingEntry, MappingResolver,
    MappingStatus, MappingSummary, MatchOptions, build_initial_mapping,
};
pub use score::{Candidate, MAX_SCORE, score, top_k};
