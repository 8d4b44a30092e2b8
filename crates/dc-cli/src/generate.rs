//! `datacard2ws` — datacard → workspace-factory script.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use dc_translate::{FactoryOptions, datacard, factory};

pub fn cmd_generate(
    input: &Path,
    options: FactoryOptions,
    output: Option<&PathBuf>,
    dump_model: Option<&PathBuf>,
) -> Result<()> {
    tracing::info!(path = %input.display(), "loading datacard");
    let model = datacard::parse_file(input)
        .with_context(|| format!("failed to parse datacard {}", input.display()))?;

    let model = options.apply(model);
    tracing::info!(
        bins = model.bins(),
        processes = model.processes(),
        nuisances = model.nuisances(),
        stat_only = options.stat_only,
        asimov = options.asimov,
        "model ready"
    );

    if let Some(path) = dump_model {
        std::fs::write(path, serde_json::to_string_pretty(&model)?)
            .with_context(|| format!("failed to write model JSON {}", path.display()))?;
    }

    let script = factory::generate(&model);

    if let Some(path) = output {
        std::fs::write(path, script.render())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            statements = script.statements().len(),
            "script written"
        );
    } else {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        script.write_to(&mut lock).context("failed to write script to stdout")?;
    }

    Ok(())
}
