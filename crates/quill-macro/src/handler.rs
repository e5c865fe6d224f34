//! Macro trait.

use quill_xdom::{Block, Parameters};

use crate::context::MacroTransformationContext;
use crate::descriptor::MacroDescriptor;
use crate::error::MacroExecutionError;

/// Parameters of a macro call, by name.
pub type MacroParameters = Parameters;

/// Priority of macros that do not care when they run.
pub const DEFAULT_PRIORITY: i32 = 1000;

/// A named tree-rewriting unit.
///
/// Implementations are shared by every transformation running on any thread,
/// so per-call state belongs in the [`MacroTransformationContext`].
pub trait Macro: Send + Sync {
    /// Identity and documentation.
    fn descriptor(&self) -> &MacroDescriptor;

    /// Execution order; lower runs first.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Whether the macro may be called inside inline content.
    fn supports_inline_mode(&self) -> bool {
        false
    }

    /// Execute one call.
    ///
    /// The returned blocks replace the call in the tree. The context gives
    /// mutable access to the whole document, so a macro may also edit blocks
    /// outside its own position.
    ///
    /// # Errors
    ///
    /// Returns [`MacroExecutionError`] when the call cannot be executed.
    fn execute(
        &self,
        parameters: &MacroParameters,
        content: Option<&str>,
        context: &mut MacroTransformationContext<'_>,
    ) -> Result<Vec<Block>, MacroExecutionError>;
}
