//! Macro transformation engine.

use std::collections::HashMap;
use std::sync::Arc;

use quill_syntax::Syntax;
use quill_xdom::{Axes, Block, BlockKind, BlockPath, MacroBlockMatcher, Parameters};

use crate::context::MacroTransformationContext;
use crate::error::{MacroExecutionError, TransformationError};
use crate::handler::Macro;

/// What to do when a macro call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Replace the call with an error block and keep going.
    #[default]
    Marker,
    /// Stop and return the error.
    Abort,
}

/// Configuration for [`MacroTransformation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationConfig {
    /// Upper bound on macro calls handled in one pass.
    ///
    /// Default: 1000
    pub max_executions: usize,
    /// Failure handling.
    pub on_error: ErrorPolicy,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            max_executions: 1000,
            on_error: ErrorPolicy::Marker,
        }
    }
}

impl TransformationConfig {
    /// Set the execution bound.
    #[must_use]
    pub fn with_max_executions(mut self, max_executions: usize) -> Self {
        self.max_executions = max_executions;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_error_policy(mut self, on_error: ErrorPolicy) -> Self {
        self.on_error = on_error;
        self
    }
}

/// Outcome of one transformation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationReport {
    /// Number of macro calls handled, failed ones included.
    pub executions: usize,
    /// Failures turned into error blocks.
    pub errors: Vec<MacroExecutionError>,
}

/// Pending call picked for execution.
struct PendingCall {
    path: BlockPath,
    id: String,
    parameters: Parameters,
    content: Option<String>,
    inline: bool,
}

/// Executes the macro calls of a document.
///
/// Macros are registered once and shared by every pass; a pass only borrows
/// the engine, so one engine can transform many documents concurrently.
pub struct MacroTransformation {
    config: TransformationConfig,
    macros: HashMap<String, Arc<dyn Macro>>,
}

impl Default for MacroTransformation {
    fn default() -> Self {
        Self::new(TransformationConfig::default())
    }
}

impl MacroTransformation {
    /// Create an engine without macros.
    #[must_use]
    pub fn new(config: TransformationConfig) -> Self {
        Self {
            config,
            macros: HashMap::new(),
        }
    }

    /// Register a macro.
    #[must_use]
    pub fn with_macro(mut self, handler: impl Macro + 'static) -> Self {
        self.register(Arc::new(handler));
        self
    }

    /// Register a shared macro, replacing any macro with the same id.
    pub fn register(&mut self, handler: Arc<dyn Macro>) {
        let id = handler.descriptor().id().to_owned();
        if self.macros.insert(id.clone(), handler).is_some() {
            tracing::warn!(macro_id = %id, "Macro registered twice, keeping the last one");
        }
    }

    /// Macro registered under `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Macro>> {
        self.macros.get(id)
    }

    /// Registered macros, sorted by id.
    #[must_use]
    pub fn macros(&self) -> Vec<&Arc<dyn Macro>> {
        let mut macros: Vec<_> = self.macros.values().collect();
        macros.sort_by(|a, b| a.descriptor().id().cmp(b.descriptor().id()));
        macros
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &TransformationConfig {
        &self.config
    }

    /// Execute every pending macro call in `xdom`.
    ///
    /// Calls run one at a time, lowest priority first, ties in document order.
    /// The tree is rescanned after each call, so calls produced by a macro run
    /// in the same pass. Each call's result replaces it, wrapped in a
    /// [`MacroMarker`](BlockKind::MacroMarker).
    ///
    /// # Errors
    ///
    /// Returns [`TransformationError::MaxExecutionsExceeded`] when more calls
    /// than allowed are pending, and [`TransformationError::Macro`] for a
    /// failed call under [`ErrorPolicy::Abort`].
    pub fn transform(
        &self,
        xdom: &mut Block,
        syntax: Option<&Syntax>,
    ) -> Result<TransformationReport, TransformationError> {
        let mut report = TransformationReport::default();

        while let Some(call) = self.next_call(xdom) {
            if report.executions >= self.config.max_executions {
                return Err(TransformationError::MaxExecutionsExceeded(
                    self.config.max_executions,
                ));
            }
            report.executions += 1;

            match self.execute(xdom, &call, syntax) {
                Ok(blocks) => {
                    tracing::debug!(
                        macro_id = %call.id,
                        path = %call.path,
                        produced = blocks.len(),
                        "Executed macro"
                    );
                    place_result(xdom, &call, blocks);
                }
                Err(err) => {
                    if self.config.on_error == ErrorPolicy::Abort {
                        return Err(err.into());
                    }
                    tracing::warn!(
                        macro_id = %call.id,
                        path = %call.path,
                        error = %err,
                        "Macro failed"
                    );
                    place_result(xdom, &call, vec![error_block(&err)]);
                    report.errors.push(err);
                }
            }
        }

        Ok(report)
    }

    /// Pick the pending call with the lowest (priority, document order).
    ///
    /// Unknown macros sort first so they turn into errors before anything runs.
    fn next_call(&self, xdom: &Block) -> Option<PendingCall> {
        let path = xdom
            .find_all_from(&BlockPath::root(), &MacroBlockMatcher::any(), Axes::DescendantOrSelf)
            .into_iter()
            .enumerate()
            .min_by_key(|(order, path)| {
                let priority = xdom
                    .get(path)
                    .and_then(|block| block.kind().macro_id())
                    .and_then(|id| self.macros.get(id))
                    .map_or(i32::MIN, |handler| handler.priority());
                (priority, *order)
            })
            .map(|(_, path)| path)?;

        let block = xdom.get(&path)?;
        let BlockKind::Macro {
            id,
            content,
            inline,
        } = block.kind()
        else {
            return None;
        };

        Some(PendingCall {
            id: id.clone(),
            parameters: block.parameters().clone(),
            content: content.clone(),
            inline: *inline,
            path,
        })
    }

    fn execute(
        &self,
        xdom: &mut Block,
        call: &PendingCall,
        syntax: Option<&Syntax>,
    ) -> Result<Vec<Block>, MacroExecutionError> {
        let Some(handler) = self.macros.get(&call.id) else {
            return Err(MacroExecutionError::UnknownMacro(call.id.clone()));
        };
        if call.inline && !handler.supports_inline_mode() {
            return Err(MacroExecutionError::InlineNotSupported(call.id.clone()));
        }

        // The call stops being pending before the macro sees the tree.
        if let Some(block) = xdom.get_mut(&call.path) {
            block.set_kind(marker_kind(call));
        }

        let mut context =
            MacroTransformationContext::new(xdom, call.path.clone(), call.inline, syntax);
        handler.execute(&call.parameters, call.content.as_deref(), &mut context)
    }
}

fn marker_kind(call: &PendingCall) -> BlockKind {
    BlockKind::MacroMarker {
        id: call.id.clone(),
        content: call.content.clone(),
        inline: call.inline,
    }
}

/// Whether `block` still stands for `call` and has not received a result.
fn is_call_site(block: &Block, call: &PendingCall) -> bool {
    block.children().is_empty()
        && match block.kind() {
            BlockKind::Macro { id, content, .. } | BlockKind::MacroMarker { id, content, .. } => {
                *id == call.id && *content == call.content
            }
            _ => false,
        }
}

/// Put `blocks` at the call site as children of its marker.
///
/// A macro that reshapes the tree around itself moves its call site; in that
/// case the first matching empty marker is used.
fn place_result(xdom: &mut Block, call: &PendingCall, blocks: Vec<Block>) {
    let path = if xdom.get(&call.path).is_some_and(|block| is_call_site(block, call)) {
        Some(call.path.clone())
    } else {
        xdom.find_first_from(
            &BlockPath::root(),
            &|block: &Block| {
                matches!(block.kind(), BlockKind::MacroMarker { .. }) && is_call_site(block, call)
            },
            Axes::DescendantOrSelf,
        )
    };

    let Some(block) = path.and_then(|path| xdom.get_mut(&path)) else {
        tracing::warn!(
            macro_id = %call.id,
            path = %call.path,
            "Macro call site vanished, dropping result"
        );
        return;
    };
    block.set_kind(marker_kind(call));
    *block.children_mut() = blocks;
}

fn error_block(err: &MacroExecutionError) -> Block {
    let description = match err {
        MacroExecutionError::UnknownMacro(_) => "No macro is registered under this id.",
        MacroExecutionError::InlineNotSupported(_) => {
            "Move the macro call to its own paragraph."
        }
        MacroExecutionError::InvalidParameter { .. } => "Check the macro parameters.",
        MacroExecutionError::Failed { .. } => "The macro raised an error while executing.",
    };
    Block::new(BlockKind::Error {
        message: err.to_string(),
        description: description.to_owned(),
    })
}
