//! # dc-translate
//!
//! Datacard translation for datacard2ws.
//!
//! - [`datacard`] — counting-experiment datacard parser
//! - [`factory`] — workspace-factory script generator

#![warn(clippy::all)]
#![allow(clippy::needless_range_loop)]

pub mod datacard;
pub mod factory;

pub use datacard::{parse_file, parse_str};
pub use factory::{FactoryOptions, FactoryScript, generate, translate};
