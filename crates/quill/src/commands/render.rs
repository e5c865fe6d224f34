//! `quill render` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use quill_config::{CliSettings, Config};
use quill_engine::{RenderResult, RenderingEngine};
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Documents to convert. Reads stdin when none are given.
    files: Vec<PathBuf>,

    /// Input syntax id (overrides config).
    #[arg(short, long)]
    from: Option<String>,

    /// Output syntax id (overrides config).
    #[arg(short, long)]
    to: Option<String>,

    /// Write converted documents into this directory instead of stdout.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not execute macros.
    #[arg(long)]
    no_macros: bool,

    /// Base URL for links to wiki documents (overrides config).
    #[arg(long, env = "QUILL_WIKI_BASE_URL")]
    wiki_base_url: Option<String>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the engine can't be
    /// built, or any document fails to convert.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            default_input: self.from.clone(),
            default_output: self.to.clone(),
            macros_enabled: self.no_macros.then_some(false),
            wiki_base_url: self.wiki_base_url.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let engine = RenderingEngine::from_config(&config)?;
        let from = config.rendering.default_input.as_str();
        let to = config.rendering.default_output.as_str();

        if self.files.is_empty() {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            let result = engine.convert_document(&source, from, to)?;
            report_warnings(&output, "<stdin>", &result);
            output.document(&result.output)?;
            return Ok(());
        }

        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)?;
        }

        let results: Vec<Result<RenderResult, CliError>> = self
            .files
            .par_iter()
            .map(|path| render_file(&engine, path, from, to))
            .collect();

        let mut failed = 0;
        for (path, result) in self.files.iter().zip(results) {
            match result {
                Ok(result) => {
                    report_warnings(&output, &path.display().to_string(), &result);
                    if let Some(dir) = &self.output_dir {
                        let target = output_path(dir, path, to);
                        std::fs::write(&target, &result.output)?;
                        output.success(&format!(
                            "Rendered {} -> {}",
                            path.display(),
                            target.display()
                        ));
                    } else {
                        output.document(&result.output)?;
                    }
                }
                Err(err) => {
                    output.error(&format!("Error: {err}"));
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} documents failed to render",
                self.files.len()
            )));
        }
        Ok(())
    }
}

fn render_file(
    engine: &RenderingEngine,
    path: &Path,
    from: &str,
    to: &str,
) -> Result<RenderResult, CliError> {
    let source = std::fs::read_to_string(path)?;
    tracing::info!(path = %path.display(), from, to, "Rendering document");
    engine
        .convert_document(&source, from, to)
        .map_err(|source| CliError::Document {
            path: path.display().to_string(),
            source,
        })
}

fn report_warnings(output: &Output, name: &str, result: &RenderResult) {
    for warning in &result.warnings {
        output.warning(&format!("{name}: {warning}"));
    }
}

/// Target file for `path` converted to syntax `to`, inside `dir`.
fn output_path(dir: &Path, path: &Path, to: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or(path.as_os_str());
    dir.join(stem).with_extension(extension_for(to))
}

/// File extension for a syntax id.
fn extension_for(syntax_id: &str) -> &str {
    match syntax_id.split_once('/').map_or(syntax_id, |(kind, _)| kind) {
        "xhtml" => "html",
        "plain" => "txt",
        other => other,
    }
}
