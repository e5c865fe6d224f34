//! `quill macros` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::Config;
use quill_engine::RenderingEngine;
use quill_macro::{Macro, MacroDescriptor};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the macros command.
#[derive(Args)]
pub(crate) struct MacrosArgs {
    /// Print the list as JSON.
    #[arg(long)]
    json: bool,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// One row of the macro listing.
#[derive(Serialize)]
struct MacroInfo<'a> {
    #[serde(flatten)]
    descriptor: &'a MacroDescriptor,
    priority: i32,
    inline: bool,
}

impl<'a> MacroInfo<'a> {
    fn new(handler: &'a dyn Macro) -> Self {
        Self {
            descriptor: handler.descriptor(),
            priority: handler.priority(),
            inline: handler.supports_inline_mode(),
        }
    }
}

impl MacrosArgs {
    /// Execute the macros command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or output fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let engine = RenderingEngine::from_config(&config)?;

        let Some(transformation) = engine.transformation() else {
            output.warning("Macros are disabled in configuration");
            return Ok(());
        };
        let macros: Vec<MacroInfo<'_>> = transformation
            .macros()
            .into_iter()
            .map(|handler| MacroInfo::new(handler.as_ref()))
            .collect();

        if self.json {
            output.document(&serde_json::to_string_pretty(&macros)?)?;
            return Ok(());
        }

        output.highlight("Available macros:");
        for info in &macros {
            let inline = if info.inline { "inline" } else { "block" };
            output.document(&format!(
                "  {:<14} {:>5}  {inline:<6}  {}",
                info.descriptor.id(),
                info.priority,
                info.descriptor.description()
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_macro::{FootnoteMacro, PutFootnotesMacro};

    use super::*;

    #[test]
    fn test_macro_info_json() {
        let footnote = FootnoteMacro::new();

        let json = serde_json::to_value(MacroInfo::new(&footnote)).unwrap();

        assert_eq!(json["id"], "footnote");
        assert_eq!(json["priority"], 500);
        assert_eq!(json["inline"], true);
        assert_eq!(json["default_category"], "Content");
    }

    #[test]
    fn test_put_footnotes_runs_late() {
        let put_footnotes = PutFootnotesMacro::new();

        let info = MacroInfo::new(&put_footnotes);

        assert_eq!(info.priority, 2000);
        assert!(!info.inline);
    }
}
