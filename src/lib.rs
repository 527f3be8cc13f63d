//! Rename SGF game records from the metadata they carry.
//!
//! The core is [`extract_fields`]: it pulls the date, players, ranks, result
//! and originating server out of a record and normalizes the many regional
//! spellings into one vocabulary. The rest of the crate renders those fields
//! into filenames and moves files.

pub mod cli;
pub mod parsers;
pub mod services;
pub mod types;

pub use parsers::{classify_platform, find_prop};
pub use services::{extract_fields, normalize, parse_date, Category};
pub use types::{FieldMapping, Result, SgfRenameError};
