//! # vocard Common Library
//!
//! Shared code for the vocard workspace:
//! - Error types
//! - Bootstrap configuration (TOML) and root folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
