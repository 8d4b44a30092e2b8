//! The model description shared by the datacard parser and the factory generator.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Counting-experiment model read from a datacard.
///
/// Index conventions: `expected[b][p]` is the nominal yield of process `p` in
/// bin `b`; `systematics[n][b][p]` is the lnN scale factor of nuisance `n`.
/// Process 0 is always the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelDescription")]
pub struct ModelDescription {
    bins: usize,
    processes: usize,
    nuisances: usize,
    observations: Vec<f64>,
    expected: Vec<Vec<f64>>,
    systematics: Vec<Vec<Vec<f64>>>,
}

#[derive(Deserialize)]
struct RawModelDescription {
    bins: usize,
    processes: usize,
    nuisances: usize,
    #[serde(default)]
    observations: Vec<f64>,
    expected: Vec<Vec<f64>>,
    #[serde(default)]
    systematics: Vec<Vec<Vec<f64>>>,
}

impl TryFrom<RawModelDescription> for ModelDescription {
    type Error = Error;

    fn try_from(raw: RawModelDescription) -> Result<Self> {
        Self::new(
            raw.bins,
            raw.processes,
            raw.nuisances,
            raw.observations,
            raw.expected,
            raw.systematics,
        )
    }
}

impl ModelDescription {
    /// Build a model, checking every shape invariant.
    pub fn new(
        bins: usize,
        processes: usize,
        nuisances: usize,
        observations: Vec<f64>,
        expected: Vec<Vec<f64>>,
        systematics: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self> {
        if bins == 0 {
            return Err(Error::Validation("bins must be >= 1".into()));
        }
        if processes == 0 {
            return Err(Error::Validation("processes must be >= 1".into()));
        }
        if !observations.is_empty() && observations.len() != bins {
            return Err(Error::Validation(format!(
                "{} observations for {} bins",
                observations.len(),
                bins
            )));
        }
        check_table("expected", &expected, bins, processes)?;
        if systematics.len() != nuisances {
            return Err(Error::SystematicsCount { found: systematics.len(), expected: nuisances });
        }
        for (n, table) in systematics.iter().enumerate() {
            check_table(&format!("systematic {}", n + 1), table, bins, processes)?;
        }

        Ok(Self { bins, processes, nuisances, observations, expected, systematics })
    }

    /// Number of counting bins.
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Number of processes per bin (signal included).
    pub fn processes(&self) -> usize {
        self.processes
    }

    /// Number of nuisance parameters.
    pub fn nuisances(&self) -> usize {
        self.nuisances
    }

    /// Observed counts per bin, or empty if unobserved.
    pub fn observations(&self) -> &[f64] {
        &self.observations
    }

    pub fn has_observations(&self) -> bool {
        !self.observations.is_empty()
    }

    /// Nominal yields, bin-major.
    pub fn expected(&self) -> &[Vec<f64>] {
        &self.expected
    }

    /// lnN scale factors, one bin-major table per nuisance.
    pub fn systematics(&self) -> &[Vec<Vec<f64>>] {
        &self.systematics
    }

    pub fn expected_yield(&self, bin: usize, process: usize) -> f64 {
        self.expected[bin][process]
    }

    pub fn scale(&self, nuisance: usize, bin: usize, process: usize) -> f64 {
        self.systematics[nuisance][bin][process]
    }

    /// Background-only expectation in `bin`: every process except the signal.
    pub fn background_yield(&self, bin: usize) -> f64 {
        self.expected[bin].iter().skip(1).sum()
    }

    /// Statistics-only variant: all systematics dropped.
    pub fn into_stat_only(mut self) -> Self {
        self.nuisances = 0;
        self.systematics.clear();
        self
    }

    /// Asimov variant: observations replaced by the background-only expectation.
    pub fn into_asimov(mut self) -> Self {
        self.observations = (0..self.bins).map(|b| self.background_yield(b)).collect();
        self
    }
}

fn check_table(what: &str, table: &[Vec<f64>], bins: usize, processes: usize) -> Result<()> {
    if table.len() != bins {
        return Err(Error::Validation(format!("{what}: {} bins, expected {bins}", table.len())));
    }
    if let Some((b, row)) = table.iter().enumerate().find(|(_, row)| row.len() != processes) {
        return Err(Error::Validation(format!(
            "{what}: bin {b} has {} processes, expected {processes}",
            row.len()
        )));
    }
    Ok(())
}
