//! CLI library components for tabmerge.

pub mod logging;
pub mod overrides;
pub mod pipeline;
