//! Model description → workspace-factory script.
//!
//! Produces the declarative statements that build observables, the
//! signal-strength POI, Gaussian nuisance priors, per-bin expected yields
//! (lnN systematics as `pow(scale,theta)` factors), per-bin Poisson terms and
//! the joint `model_s`/`model_b` densities.

pub mod config;
pub mod emit;
pub mod expr;


pub use config::{ExprFlavor, FactoryOptions};
pub use emit::{FactoryScript, Statement, generate, translate};
pub use expr::{ExprBuilder, format_f, format_g};
