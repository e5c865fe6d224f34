//! `quill syntaxes` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::Config;
use quill_engine::RenderingEngine;
use quill_syntax::Syntax;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the syntaxes command.
#[derive(Args)]
pub(crate) struct SyntaxesArgs {
    /// Print the list as JSON.
    #[arg(long)]
    json: bool,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SyntaxesArgs {
    /// Execute the syntaxes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let engine = RenderingEngine::from_config(&config)?;
        let syntaxes = sorted_syntaxes(&engine);

        if self.json {
            output.document(&serde_json::to_string_pretty(&syntaxes)?)?;
            return Ok(());
        }

        output.highlight("Registered syntaxes:");
        for syntax in &syntaxes {
            output.document(&format!("  {:<12} {syntax}", syntax.to_id_string()))?;
        }
        Ok(())
    }
}

fn sorted_syntaxes(engine: &RenderingEngine) -> Vec<Syntax> {
    let mut syntaxes: Vec<Syntax> = engine.registry().get_syntaxes().into_values().collect();
    syntaxes.sort_by_key(Syntax::to_id_string);
    syntaxes
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sorted_syntaxes() {
        let engine = RenderingEngine::from_config(&Config::default()).unwrap();

        let ids: Vec<String> = sorted_syntaxes(&engine)
            .iter()
            .map(Syntax::to_id_string)
            .collect();

        assert_eq!(ids, vec!["plain/1.0", "xhtml/1.0", "xwiki/2.0", "xwiki/2.1"]);
    }

    #[test]
    fn test_syntax_json() {
        let json = serde_json::to_value(Syntax::XHTML_1_0).unwrap();

        assert_eq!(json["version"], "1.0");
        assert_eq!(json["type"]["id"], "xhtml");
    }
}
