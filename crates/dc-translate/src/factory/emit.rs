//! Workspace-factory script generation.
//!
//! Statement order is fixed: observables, parameter of interest, nuisance
//! priors, per-bin expected yields, per-bin Poisson terms, then the joint
//! signal+background (`*_s`) and background-only (`*_b`) products.

use std::fmt;
use std::io;

use dc_core::ModelDescription;
use rayon::prelude::*;

use super::config::{
    BLOCK_SIZE, BLOCKING_THRESHOLD, EXPR_FLAVOR, ExprFlavor, FactoryOptions, N_OBS_MAX, POI_NAME,
    POI_RANGE, THETA_RANGE,
};
use super::expr::{ExprBuilder, format_f, format_g};

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// One line of the factory script.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Empty line.
    Blank,
    /// `/// ----- title -----`
    Section(&'static str),
    /// `// text`
    Note(&'static str),
    /// Real variable: `name[value]`, `name[lo,hi]` or `name[value,lo,hi]`.
    ///
    /// A lone value prints `%g`-style; a value inside a range prints `%f`-style.
    Var { name: String, value: Option<f64>, range: Option<(i64, i64)> },
    /// `name = set(a,b,...)`
    Set { name: String, members: Vec<String> },
    /// `name = expr('formula', a, b, ...)`
    Expr { name: String, flavor: ExprFlavor, formula: String, args: Vec<String> },
    /// `name = Gaussian(param[lo,hi], mean, sigma)`
    Gaussian { name: String, param: String, range: (i64, i64), mean: f64, sigma: f64 },
    /// `name = Poisson(x, mean)`
    Poisson { name: String, x: String, mean: String },
    /// `name = PROD(a,b,...)`, or `PROD({a,b,...})` when `braced`.
    Prod { name: String, factors: Vec<String>, braced: bool },
}

impl Statement {
    /// Declared symbol, if the statement declares one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Statement::Blank | Statement::Section(_) | Statement::Note(_) => None,
            Statement::Var { name, .. }
            | Statement::Set { name, .. }
            | Statement::Expr { name, .. }
            | Statement::Gaussian { name, .. }
            | Statement::Poisson { name, .. }
            | Statement::Prod { name, .. } => Some(name.as_str()),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Blank => Ok(()),
            Statement::Section(title) => write!(f, "/// ----- {title} -----"),
            Statement::Note(text) => write!(f, "// {text}"),
            Statement::Var { name, value, range } => match (value, range) {
                (Some(v), Some((lo, hi))) => write!(f, "{name}[{},{lo},{hi}];", format_f(*v)),
                (None, Some((lo, hi))) => write!(f, "{name}[{lo},{hi}];"),
                (Some(v), None) => write!(f, "{name}[{}];", format_g(*v)),
                (None, None) => write!(f, "{name}[];"),
            },
            Statement::Set { name, members } => write!(f, "{name} = set({});", members.join(",")),
            Statement::Expr { name, flavor, formula, args } => {
                write!(f, "{name} = {}('{formula}'", flavor.keyword())?;
                for a in args {
                    write!(f, ", {a}")?;
                }
                f.write_str(");")
            }
            Statement::Gaussian { name, param, range: (lo, hi), mean, sigma } => write!(
                f,
                "{name} = Gaussian({param}[{lo},{hi}], {}, {});",
                format_g(*mean),
                format_g(*sigma)
            ),
            Statement::Poisson { name, x, mean } => write!(f, "{name} = Poisson({x}, {mean});"),
            Statement::Prod { name, factors, braced } => {
                if *braced {
                    write!(f, "{name} = PROD({{{}}});", factors.join(","))
                } else {
                    write!(f, "{name} = PROD({});", factors.join(","))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Symbol names
// ---------------------------------------------------------------------------

pub fn obs_name(bin: usize) -> String {
    format!("n_obs_bin{bin}")
}

pub fn yield_name(bin: usize, process: usize) -> String {
    format!("n_exp_bin{bin}_proc{process}")
}

pub fn exp_name(bin: usize) -> String {
    format!("n_exp_bin{bin}")
}

pub fn exp_bonly_name(bin: usize) -> String {
    format!("n_exp_bin{bin}_bonly")
}

pub fn pdf_name(bin: usize) -> String {
    format!("pdf_bin{bin}")
}

pub fn pdf_bonly_name(bin: usize) -> String {
    format!("pdf_bin{bin}_bonly")
}

pub fn theta_name(nuisance: usize) -> String {
    format!("theta_{nuisance}")
}

pub fn theta_pdf_name(nuisance: usize) -> String {
    format!("thetaPdf_{nuisance}")
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Ordered factory statements for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryScript {
    statements: Vec<Statement>,
}

impl FactoryScript {
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Find a declaration by symbol name.
    pub fn get(&self, name: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.name() == Some(name))
    }

    /// Whole script, one statement per line.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        for s in &self.statements {
            writeln!(w, "{s}")?;
        }
        w.flush()
    }
}

impl fmt::Display for FactoryScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.statements {
            writeln!(f, "{s}")?;
        }
        Ok(())
    }
}

/// Apply `options` to `model`, then generate its script.
pub fn translate(model: ModelDescription, options: &FactoryOptions) -> FactoryScript {
    generate(&options.apply(model))
}

/// Generate the factory script for an already option-mutated model.
pub fn generate(model: &ModelDescription) -> FactoryScript {
    let mut out = Vec::new();

    emit_observables(model, &mut out);
    emit_poi(&mut out);
    if model.nuisances() > 0 {
        emit_nuisances(model, &mut out);
    }
    emit_expected_yields(model, &mut out);
    emit_likelihoods(model, &mut out);
    emit_products(model, &mut out);

    tracing::debug!(statements = out.len(), "factory script generated");
    FactoryScript { statements: out }
}

fn emit_observables(model: &ModelDescription, out: &mut Vec<Statement>) {
    let range = Some((0, N_OBS_MAX));
    if model.has_observations() {
        out.push(Statement::Section("observables (set to observed values)"));
        for (b, &obs) in model.observations().iter().enumerate() {
            out.push(Statement::Var { name: obs_name(b), value: Some(obs), range });
        }
    } else {
        out.push(Statement::Section("observables"));
        for b in 0..model.bins() {
            out.push(Statement::Var { name: obs_name(b), value: None, range });
        }
    }
    out.push(Statement::Set {
        name: "observables".into(),
        members: (0..model.bins()).map(obs_name).collect(),
    });
}

fn emit_poi(out: &mut Vec<Statement>) {
    out.extend([
        Statement::Blank,
        Statement::Section("parameters of interest"),
        Statement::Note("signal strength"),
        Statement::Var { name: POI_NAME.into(), value: None, range: Some(POI_RANGE) },
        Statement::Note("set of all parameters of interest"),
        Statement::Set { name: "POI".into(), members: vec![POI_NAME.into()] },
        Statement::Blank,
    ]);
}

fn emit_nuisances(model: &ModelDescription, out: &mut Vec<Statement>) {
    let n = model.nuisances();
    out.push(Statement::Section("nuisances"));
    for i in 0..n {
        out.push(Statement::Gaussian {
            name: theta_pdf_name(i),
            param: theta_name(i),
            range: THETA_RANGE,
            mean: 0.0,
            sigma: 1.0,
        });
    }
    out.push(Statement::Set {
        name: "nuisances".into(),
        members: (0..n).map(theta_name).collect(),
    });
    out.push(Statement::Prod {
        name: "nuisancePdf".into(),
        factors: (0..n).map(theta_pdf_name).collect(),
        braced: false,
    });
}

fn emit_expected_yields(model: &ModelDescription, out: &mut Vec<Statement>) {
    out.push(Statement::Section("expected events in each bin, for each process"));

    let per_bin: Vec<(Vec<Statement>, usize)> =
        (0..model.bins()).into_par_iter().map(|b| bin_yields(model, b)).collect();

    let mut parametrized = 0;
    for (stmts, n) in per_bin {
        parametrized += n;
        out.extend(stmts);
    }
    tracing::debug!(
        parametrized,
        fixed = model.bins() * model.processes() - parametrized,
        "expected-yield terms"
    );
}

/// Statements for one bin and how many of its process terms carry nuisances.
fn bin_yields(model: &ModelDescription, bin: usize) -> (Vec<Statement>, usize) {
    let processes = model.processes();
    let mut stmts = Vec::with_capacity(processes + 2);
    let mut parametrized = 0;

    for p in 0..processes {
        let value = model.expected_yield(bin, p);
        let mut expr = ExprBuilder::new(format_g(value));
        for n in 0..model.nuisances() {
            let scale = model.scale(n, bin, p);
            // 1.0 means unaffected: leave it out of both formula and arguments
            if scale != 1.0 {
                expr = expr.times_pow(scale, &theta_name(n));
            }
        }

        if expr.is_parametrized() {
            parametrized += 1;
            stmts.push(expr.build(yield_name(bin, p), EXPR_FLAVOR));
        } else {
            let name = yield_name(bin, p);
            stmts.push(Statement::Var { name, value: Some(value), range: None });
        }
    }

    let terms: Vec<String> = (0..processes).map(|p| yield_name(bin, p)).collect();
    stmts.push(ExprBuilder::scaled_sum(POI_NAME, &terms).build(exp_name(bin), EXPR_FLAVOR));
    if terms.len() > 1 {
        stmts.push(ExprBuilder::sum(&terms[1..]).build(exp_bonly_name(bin), EXPR_FLAVOR));
    } else {
        // signal-only card: nothing left for the background-only hypothesis
        stmts.push(Statement::Var { name: exp_bonly_name(bin), value: Some(0.0), range: None });
    }

    (stmts, parametrized)
}

fn emit_likelihoods(model: &ModelDescription, out: &mut Vec<Statement>) {
    out.push(Statement::Section("per-bin likelihoods (S+B and B)"));
    for b in 0..model.bins() {
        out.push(Statement::Poisson { name: pdf_name(b), x: obs_name(b), mean: exp_name(b) });
        out.push(Statement::Poisson {
            name: pdf_bonly_name(b),
            x: obs_name(b),
            mean: exp_bonly_name(b),
        });
    }
}

fn emit_products(model: &ModelDescription, out: &mut Vec<Statement>) {
    let bins = model.bins();
    let with_nuisances = model.nuisances() > 0;
    let prefix = if with_nuisances { "modelObs" } else { "model" };

    out.push(Statement::Section("joint models"));

    if bins > BLOCKING_THRESHOLD {
        let n_blocks = bins.div_ceil(BLOCK_SIZE);
        tracing::debug!(bins, n_blocks, "aggregating likelihood in blocks");
        for i in 0..n_blocks {
            let block = BLOCK_SIZE * i..bins.min(BLOCK_SIZE * (i + 1));
            out.push(Statement::Prod {
                name: format!("{prefix}_s_{i}"),
                factors: block.clone().map(pdf_name).collect(),
                braced: false,
            });
            out.push(Statement::Prod {
                name: format!("{prefix}_b_{i}"),
                factors: block.map(pdf_bonly_name).collect(),
                braced: false,
            });
        }
        for tag in ["s", "b"] {
            out.push(Statement::Prod {
                name: format!("{prefix}_{tag}"),
                factors: (0..n_blocks).map(|i| format!("{prefix}_{tag}_{i}")).collect(),
                braced: false,
            });
        }
    } else {
        let n = bins.min(BLOCKING_THRESHOLD);
        out.push(Statement::Prod {
            name: format!("{prefix}_s"),
            factors: (0..n).map(pdf_name).collect(),
            braced: true,
        });
        out.push(Statement::Prod {
            name: format!("{prefix}_b"),
            factors: (0..n).map(pdf_bonly_name).collect(),
            braced: true,
        });
    }

    if with_nuisances {
        for tag in ["s", "b"] {
            out.push(Statement::Prod {
                name: format!("model_{tag}"),
                factors: vec![format!("modelObs_{tag}"), "nuisancePdf".into()],
                braced: false,
            });
        }
    }
}
