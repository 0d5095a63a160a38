//! # LPF Common Library
//!
//! Shared code for the LinkedIn Post Factory services including:
//! - Error taxonomy (Error enum)
//! - Configuration loading (ENV → TOML → default resolution)
//! - Media kind / MIME / data-URI helpers

pub mod config;
pub mod error;
pub mod media;

pub use error::{Error, Result};
pub use media::MediaKind;
