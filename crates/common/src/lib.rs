//! Shared building blocks for the grade book binaries and crates:
//! logging setup and small wire types.

pub mod types;
pub mod utils;
