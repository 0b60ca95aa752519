//! textsplit-core - Core types and traits for textsplit
//!
//! This crate provides the configuration, length measures, traits and error
//! handling shared by the splitter implementations.

pub mod config;
pub mod error;
pub mod length;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{Result, SplitError};
pub use length::LengthMeasure;
pub use traits::*;
pub use types::*;
