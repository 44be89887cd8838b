//! Configuration types
//!
//! Board-agnostic configuration structures, filled from `tiltguard.toml`
//! at boot and passed to each component at construction.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
