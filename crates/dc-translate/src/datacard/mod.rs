//! Datacard → [`ModelDescription`](dc_core::ModelDescription) parser.
//!
//! A datacard is a line-oriented, whitespace-tokenized description of a
//! counting experiment: header counts (`imax`, `jmax`, `kmax`), an optional
//! `Observation` row, the `bin`/`process`/`rate` table, and one lnN row per
//! systematic. The header table and the systematics table are read by two
//! separate passes over the same materialized lines.

mod parser;

#[cfg(test)]
mod tests;

pub use parser::{LNN, parse_file, parse_str};
