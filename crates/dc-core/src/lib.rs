//! # dc-core
//!
//! Core types for datacard2ws: the error type and the counting-experiment
//! [`ModelDescription`] handed from the datacard parser to the factory generator.

#![warn(clippy::all)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::ModelDescription;
