//! Generator constants and option flags.

use dc_core::ModelDescription;
use serde::{Deserialize, Serialize};

/// Upper bound of every `n_obs_bin<b>` observable.
pub const N_OBS_MAX: i64 = 10_000;

/// Signal-strength modifier.
pub const POI_NAME: &str = "r";

/// Range of the signal-strength modifier.
pub const POI_RANGE: (i64, i64) = (0, 20);

/// Range of every `theta_<n>` nuisance parameter.
pub const THETA_RANGE: (i64, i64) = (-5, 5);

/// Bins per partial product when the likelihood is aggregated in blocks.
pub const BLOCK_SIZE: usize = 10;

/// Above this many bins the likelihood is aggregated in blocks; at or below it
/// a single direct product of at most this many bins is emitted.
pub const BLOCKING_THRESHOLD: usize = 50;

/// Expression flavor used for every parametrized term.
pub const EXPR_FLAVOR: ExprFlavor = ExprFlavor::Expr;

/// Interpreted or compiled formula expressions in the factory syntax.
///
/// Compiled expressions evaluate faster but take longer to start up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprFlavor {
    /// `expr('...')`
    Expr,
    /// `cexpr('...')`
    CExpr,
}

impl ExprFlavor {
    /// Factory keyword for this flavor.
    pub fn keyword(self) -> &'static str {
        match self {
            ExprFlavor::Expr => "expr",
            ExprFlavor::CExpr => "cexpr",
        }
    }
}

/// Option flags applied to the parsed model before generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryOptions {
    /// Drop every systematic (statistics-only model).
    #[serde(default)]
    pub stat_only: bool,
    /// Replace observations with the background-only expectation.
    #[serde(default)]
    pub asimov: bool,
}

impl FactoryOptions {
    /// Apply the option-driven mutations: statistics-only first, then Asimov.
    pub fn apply(&self, mut model: ModelDescription) -> ModelDescription {
        if self.stat_only {
            tracing::debug!(dropped = model.nuisances(), "statistics-only: dropping systematics");
            model = model.into_stat_only();
        }
        if self.asimov {
            tracing::debug!(
                bins = model.bins(),
                "asimov: observations set to background expectation"
            );
            model = model.into_asimov();
        }
        model
    }
}
