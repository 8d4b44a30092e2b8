//! Error types for datacard2ws

use thiserror::Error;

/// datacard2ws error type.
///
/// Every datacard variant is fatal for the current run. Line numbers are 1-based
/// positions in the input text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Header value could not be read as a non-negative integer.
    #[error("line {line}: invalid value '{token}' for '{keyword}'")]
    InvalidHeader { line: usize, keyword: &'static str, token: String },

    /// `Observation` row length differs from `imax`.
    #[error("line {line}: found {found} observations but {expected} bins")]
    ObservationCount { line: usize, found: usize, expected: usize },

    /// `bin` row does not hold exactly bins*processes cells.
    #[error("line {line}: malformed bin line: {found} fields, while bins*processes = {expected}")]
    BinRowLength { line: usize, found: usize, expected: usize },

    /// `bin` row is not bin-major with contiguous processes.
    #[error(
        "line {line}: malformed bin line: column {column} is '{found}', expected bin {expected}"
    )]
    BinRowOrder { line: usize, column: usize, found: String, expected: usize },

    /// `process`, `rate` or systematics row is shorter than bins*processes.
    #[error("line {line}: malformed {row} line: {found} fields, while bins*processes = {expected}")]
    RowTooShort { line: usize, row: &'static str, found: usize, expected: usize },

    /// A numeric cell failed to parse.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// No `rate` row before end of input.
    #[error("datacard has no 'rate' line")]
    MissingRate,

    /// Systematic index out of sequence.
    #[error("line {line}: unexpected systematic {found}, expected {expected}")]
    UnexpectedSystematic { line: usize, found: String, expected: usize },

    /// Distribution family other than lnN.
    #[error("line {line}: unsupported pdf '{pdf}'")]
    UnsupportedPdf { line: usize, pdf: String },

    /// Systematics rows parsed differ from `kmax`.
    #[error("found {found} systematics, expected {expected}")]
    SystematicsCount { found: usize, expected: usize },

    /// Model shape validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
