//! Formula builder and the number formats of the factory syntax.

use std::fmt::Write;

use super::config::ExprFlavor;
use super::emit::Statement;

/// Significant digits of [`format_g`].
const G_PRECISION: usize = 6;

/// Format like C `%g`: 6 significant digits, trailing zeros removed,
/// scientific notation for exponents below -4 or from 6 upwards.
pub fn format_g(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return if value == 0.0 { "0".to_string() } else { value.to_string() };
    }

    let sci = format!("{:.*e}", G_PRECISION - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= G_PRECISION as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (G_PRECISION as i32 - 1 - exp) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

/// Format like C `%f`: fixed, 6 decimals.
pub fn format_f(value: f64) -> String {
    format!("{value:.6}")
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}

/// Accumulates a formula string and the parameter list it references.
///
/// ```
/// use dc_translate::factory::ExprBuilder;
///
/// let e = ExprBuilder::new("10").times_pow(1.1, "theta_0");
/// assert_eq!(e.formula(), "10*pow(1.100000,theta_0)");
/// assert_eq!(e.args(), ["theta_0"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExprBuilder {
    formula: String,
    args: Vec<String>,
}

impl ExprBuilder {
    /// Start from a literal formula with no arguments.
    pub fn new(formula: impl Into<String>) -> Self {
        Self { formula: formula.into(), args: Vec::new() }
    }

    /// `poi*(t0+t1+...)` over `poi` and every term.
    pub fn scaled_sum(poi: &str, terms: &[String]) -> Self {
        let mut b = Self::new(format!("{poi}*({})", terms.join("+")));
        b.args.push(poi.to_string());
        b.args.extend(terms.iter().cloned());
        b
    }

    /// `t0+t1+...` over every term.
    pub fn sum(terms: &[String]) -> Self {
        Self { formula: terms.join("+"), args: terms.to_vec() }
    }

    /// Multiply by `pow(base,param)` and register `param`.
    pub fn times_pow(mut self, base: f64, param: &str) -> Self {
        // Writing to a String cannot fail.
        let _ = write!(self.formula, "*pow({},{param})", format_f(base));
        self.args.push(param.to_string());
        self
    }

    /// True once any argument has been registered.
    pub fn is_parametrized(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Finish as a named expression statement.
    pub fn build(self, name: impl Into<String>, flavor: ExprFlavor) -> Statement {
        Statement::Expr { name: name.into(), flavor, formula: self.formula, args: self.args }
    }
}
