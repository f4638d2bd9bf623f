//! Generation Pipeline
//!
//! Load, render, write. The writer is only invoked once the whole document
//! has been validated and the artifact fully rendered in memory.

use std::borrow::Cow;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::codegen::{render, EmitTarget};
use crate::config::Config;
use crate::error::TweakError;
use crate::output::{ArtifactWriter, FileWriter, StdoutWriter, WriteOutcome};
use crate::tweaks::{self, DocumentFormat, TweaksFormat};

/// What a generation run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub features: usize,
    pub variables: usize,
    pub outcome: WriteOutcome,
}

impl Summary {
    fn new(tweaks: &TweaksFormat, outcome: WriteOutcome) -> Self {
        Self {
            features: tweaks.len(),
            variables: tweaks.variable_count(),
            outcome,
        }
    }
}

/// Generate from document text into `writer`
pub fn generate<W: ArtifactWriter + ?Sized>(
    source: &str,
    format: DocumentFormat,
    target: &EmitTarget,
    writer: &mut W,
) -> Result<Summary, TweakError> {
    let tweaks = tweaks::load_str(source, format)?;
    emit(&tweaks, target, writer)
}

/// Render a loaded schema and hand it to `writer`
pub fn emit<W: ArtifactWriter + ?Sized>(
    tweaks: &TweaksFormat,
    target: &EmitTarget,
    writer: &mut W,
) -> Result<Summary, TweakError> {
    let artifact = render(tweaks, target)?;
    let outcome = writer.write_artifact(&artifact)?;
    Ok(Summary::new(tweaks, outcome))
}

/// Generate `output` from `input`, for use from build scripts
///
/// The input format is inferred from its extension, and the input file
/// name is recorded in the header unless `target` already names a source.
pub fn generate_file(input: &Path, output: &Path, target: &EmitTarget) -> Result<Summary, TweakError> {
    let tweaks = tweaks::load_path(input, None)?;
    let target = named_after(input, target);
    emit(&tweaks, &target, &mut FileWriter::new(output))
}

/// Whether `output` already holds exactly what `input` would generate
///
/// `target` is completed the same way [`generate_file`] completes it.
pub fn is_up_to_date(
    input: &Path,
    format: Option<DocumentFormat>,
    output: &Path,
    target: &EmitTarget,
) -> Result<bool, TweakError> {
    let tweaks = tweaks::load_path(input, format)?;
    let artifact = render(&tweaks, &named_after(input, target))?;
    Ok(FileWriter::new(output).existing().as_deref() == Some(artifact.as_str()))
}

/// `target` with the input file name as its source, unless it names one
fn named_after<'a>(input: &Path, target: &'a EmitTarget) -> Cow<'a, EmitTarget> {
    match (&target.source_name, input.file_name()) {
        (None, Some(name)) => {
            Cow::Owned(target.clone().with_source_name(name.to_string_lossy()))
        }
        _ => Cow::Borrowed(target),
    }
}

/// Run the generator as configured on the command line
pub fn run(config: &Config) -> Result<Summary> {
    log::info!(
        "Generating {} from {}",
        config.target.accessor_name,
        config.input.display()
    );

    let tweaks = tweaks::load_path(&config.input, config.format).map_err(|err| diagnose(err, config))?;

    if config.check {
        if config.writes_to_stdout() {
            bail!("--check needs an output file, not stdout");
        }
        let artifact = render(&tweaks, &config.target).map_err(|err| diagnose(err, config))?;
        let existing = FileWriter::new(&config.output).existing();
        if existing.as_deref() != Some(artifact.as_str()) {
            bail!(
                "{} is missing or out of date; rerun tweakgen without --check",
                config.output.display()
            );
        }
        log::info!("{} is up to date", config.output.display());
        return Ok(Summary::new(&tweaks, WriteOutcome::Unchanged));
    }

    let summary = if config.writes_to_stdout() {
        emit(&tweaks, &config.target, &mut StdoutWriter)
    } else {
        emit(&tweaks, &config.target, &mut FileWriter::new(&config.output))
    }
    .map_err(|err| diagnose(err, config))?;

    log::info!(
        "Generated {} accessors across {} features ({:?})",
        summary.variables,
        summary.features,
        summary.outcome
    );
    Ok(summary)
}

/// Attach the failure kind and input path for the diagnostic stream
fn diagnose(err: TweakError, config: &Config) -> anyhow::Error {
    let kind = err.kind();
    log::debug!("Generation failed: {:?}", err);
    anyhow::Error::new(err).context(format!("{} in {}", kind, config.input.display()))
}
