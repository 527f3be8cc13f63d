//! Record parsers: SGF property extraction and platform detection

pub mod platform;
pub mod tags;

pub use platform::{classify_platform, PlatformSignature, PLATFORMS};
pub use tags::{find_prop, TagPattern};
