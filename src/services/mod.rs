//! Services for field extraction, normalization and renaming

pub mod aggregator;
pub mod config;
pub mod normalizer;
pub mod renamer;
pub mod template;

pub use aggregator::extract_fields;
pub use config::RenameConfig;
pub use normalizer::{normalize, parse_date, Category};
pub use renamer::Renamer;
pub use template::NameTemplate;
