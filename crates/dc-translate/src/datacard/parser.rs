//! Two-pass datacard parser.

use dc_core::{Error, ModelDescription, Result};
use std::path::Path;

/// The only supported systematic distribution family.
pub const LNN: &str = "lnN";

/// A non-blank input line with its 1-based position.
struct Line<'a> {
    number: usize,
    tokens: Vec<&'a str>,
}

/// Everything the first pass reads: counts, observations and the rate table.
#[derive(Debug)]
struct Header {
    bins: usize,
    processes: usize,
    nuisances: usize,
    /// bins*processes, the width of every table row.
    cells: usize,
    observations: Vec<f64>,
    expected: Vec<Vec<f64>>,
}

/// Parse a datacard file.
pub fn parse_file(path: &Path) -> Result<ModelDescription> {
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read datacard");
    parse_str(&text)
}

/// Parse datacard text.
pub fn parse_str(text: &str) -> Result<ModelDescription> {
    let lines: Vec<Line> = text
        .lines()
        .enumerate()
        .map(|(i, l)| Line { number: i + 1, tokens: l.split_whitespace().collect() })
        .filter(|l| !l.tokens.is_empty())
        .collect();

    let (header, rest) = parse_header(&lines)?;
    let systematics = parse_systematics(&lines[rest..], header.processes, header.cells)?;

    if systematics.len() != header.nuisances {
        return Err(Error::SystematicsCount {
            found: systematics.len(),
            expected: header.nuisances,
        });
    }

    tracing::info!(
        bins = header.bins,
        processes = header.processes,
        nuisances = header.nuisances,
        observed = !header.observations.is_empty(),
        "datacard parsed"
    );

    ModelDescription::new(
        header.bins,
        header.processes,
        header.nuisances,
        header.observations,
        header.expected,
        systematics,
    )
}

/// First pass: header keywords up to and including `rate`.
///
/// Returns the header and the index of the first line after `rate`. Anything
/// after `rate` belongs to the systematics pass, even a second `bin`/`process` pair.
fn parse_header(lines: &[Line]) -> Result<(Header, usize)> {
    let mut bins = 1;
    let mut processes = 1;
    let mut nuisances = 0;
    let mut cells = 1;
    let mut observations = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let fields = &line.tokens[1..];
        match line.tokens[0] {
            "imax" => {
                bins = parse_count(line, "imax")?;
                if bins == 0 {
                    return Err(invalid_header(line, "imax"));
                }
                cells = table_size(line, "imax", bins, processes)?;
                tracing::debug!(bins, "imax");
            }
            "jmax" => {
                processes = parse_count(line, "jmax")?
                    .checked_add(1)
                    .ok_or_else(|| invalid_header(line, "jmax"))?;
                cells = table_size(line, "jmax", bins, processes)?;
                tracing::debug!(processes, "jmax");
            }
            "kmax" => {
                nuisances = parse_count(line, "kmax")?;
                tracing::debug!(nuisances, "kmax");
            }
            "Observation" => {
                observations = parse_floats(line.number, fields)?;
                if observations.len() != bins {
                    return Err(Error::ObservationCount {
                        line: line.number,
                        found: observations.len(),
                        expected: bins,
                    });
                }
            }
            "bin" => check_bin_row(line, processes, cells)?,
            "process" => {
                check_row_length(line, "process", fields.len(), cells)?;
            }
            "rate" => {
                check_row_length(line, "rate", fields.len(), cells)?;
                let rates = parse_floats(line.number, &fields[..cells])?;
                let expected = rates.chunks(processes).map(<[f64]>::to_vec).collect();
                let header =
                    Header { bins, processes, nuisances, cells, observations, expected };
                return Ok((header, idx + 1));
            }
            _ => {}
        }
    }

    Err(Error::MissingRate)
}

/// Second pass: one lnN row per systematic, indices dense from 1.
fn parse_systematics(lines: &[Line], processes: usize, n: usize) -> Result<Vec<Vec<Vec<f64>>>> {
    let mut systematics: Vec<Vec<Vec<f64>>> = Vec::new();

    for line in lines {
        let first = line.tokens[0];
        if first.starts_with("--") || first.starts_with('#') {
            continue;
        }

        let expected_index = systematics.len() + 1;
        if first.parse::<usize>().ok() != Some(expected_index) {
            return Err(Error::UnexpectedSystematic {
                line: line.number,
                found: first.to_string(),
                expected: expected_index,
            });
        }

        let pdf = line.tokens.get(1).copied().unwrap_or("");
        if pdf != LNN {
            return Err(Error::UnsupportedPdf { line: line.number, pdf: pdf.to_string() });
        }

        let cells = &line.tokens[2..];
        check_row_length(line, "systematic", cells.len(), n)?;

        let scales = cells[..n]
            .iter()
            .map(|tok| match *tok {
                "-" => Ok(1.0),
                _ => parse_float(line.number, tok),
            })
            .collect::<Result<Vec<f64>>>()?;

        tracing::debug!(index = expected_index, line = line.number, "systematic row");
        systematics.push(scales.chunks(processes).map(<[f64]>::to_vec).collect());
    }

    Ok(systematics)
}

fn check_bin_row(line: &Line, processes: usize, cells: usize) -> Result<()> {
    let fields = &line.tokens[1..];
    if fields.len() != cells {
        return Err(Error::BinRowLength {
            line: line.number,
            found: fields.len(),
            expected: cells,
        });
    }
    for (i, cell) in fields.iter().enumerate() {
        let expected = i / processes + 1;
        if cell.parse::<usize>().ok() != Some(expected) {
            return Err(Error::BinRowOrder {
                line: line.number,
                column: i + 1,
                found: cell.to_string(),
                expected,
            });
        }
    }
    Ok(())
}

fn check_row_length(line: &Line, row: &'static str, found: usize, expected: usize) -> Result<()> {
    if found < expected {
        return Err(Error::RowTooShort { line: line.number, row, found, expected });
    }
    Ok(())
}

fn parse_count(line: &Line, keyword: &'static str) -> Result<usize> {
    let token = line.tokens.get(1).copied().unwrap_or("");
    token.parse().map_err(|_| invalid_header(line, keyword))
}

/// bins*processes, rejected when it does not fit in `usize`.
fn table_size(line: &Line, keyword: &'static str, bins: usize, processes: usize) -> Result<usize> {
    bins.checked_mul(processes).ok_or_else(|| invalid_header(line, keyword))
}

fn invalid_header(line: &Line, keyword: &'static str) -> Error {
    let token = line.tokens.get(1).copied().unwrap_or("");
    Error::InvalidHeader { line: line.number, keyword, token: token.to_string() }
}

fn parse_floats(line: usize, tokens: &[&str]) -> Result<Vec<f64>> {
    tokens.iter().map(|t| parse_float(line, t)).collect()
}

/// Finite numbers only: `nan` and `inf` parse as `f64` but are rejected.
fn parse_float(line: usize, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidNumber { line, token: token.to_string() })
}
