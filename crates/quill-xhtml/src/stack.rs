//! Tag-stack state machine building a document tree from tag events.

use std::collections::BTreeMap;

use quill_xdom::{Block, BlockKind, Parameters, PlainTextParser};

use crate::error::XhtmlParseError;
use crate::handler::{ElementHandler, TagHandler, default_handlers};
use crate::tag::{IgnoreElementRule, TagContext};

/// An open tag.
struct Frame {
    context: TagContext,
    /// Whether the handler opened a block that must be closed with the tag.
    opened: bool,
}

/// Builds a document tree from open, close and text events.
///
/// Every open and close event is checked against the ignore rules, which may
/// toggle. An event is hidden when any rule is active before or after the
/// toggle, so the tag that starts an ignored region and the tag that ends it
/// are hidden along with everything between. Open tags are tracked while
/// ignoring, so nesting stays correct and a rule can end at the matching
/// close tag.
pub struct TagStack {
    frames: Vec<Frame>,
    rules: Vec<IgnoreElementRule>,
    handlers: Vec<Box<dyn TagHandler>>,
    /// Blocks under construction, root first.
    open: Vec<Block>,
    /// Nesting of macro output regions; their content is dropped.
    macro_depth: usize,
}

impl Default for TagStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TagStack {
    /// Create a stack with the default handlers and no ignore rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            rules: Vec::new(),
            handlers: default_handlers(),
            open: vec![Block::xdom(Vec::new())],
            macro_depth: 0,
        }
    }

    /// Add an ignore rule.
    #[must_use]
    pub fn with_rule(mut self, rule: IgnoreElementRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a handler; it takes precedence over earlier handlers for the same tags.
    #[must_use]
    pub fn with_handler(mut self, handler: impl TagHandler + 'static) -> Self {
        self.handlers.insert(0, Box::new(handler));
        self
    }

    /// Whether content is currently hidden.
    #[must_use]
    pub fn is_ignoring(&self) -> bool {
        self.macro_depth > 0 || self.rules.iter().any(IgnoreElementRule::is_active)
    }

    /// Number of open tags.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open tag `name`.
    pub fn begin_element(&mut self, name: &str, attributes: BTreeMap<String, String>) {
        let context = TagContext::new(name, attributes);
        let hidden = toggle_rules(&mut self.rules, &context) || self.macro_depth > 0;

        let mut opened = false;
        if !hidden && let Some(block) = self.handler(&context).open(&context) {
            self.open.push(block);
            opened = true;
        }
        self.frames.push(Frame { context, opened });
    }

    /// Close tag `name`.
    ///
    /// A block opened for the tag is always closed, even when the close tag
    /// itself is hidden, so the tree stays balanced.
    ///
    /// # Errors
    ///
    /// Returns [`XhtmlParseError::UnbalancedClose`] when `name` is not the
    /// innermost open tag.
    pub fn end_element(&mut self, name: &str) -> Result<(), XhtmlParseError> {
        let name = name.to_ascii_lowercase();
        let Some(frame) = self.frames.pop() else {
            return Err(XhtmlParseError::UnbalancedClose {
                found: name,
                expected: "nothing".to_owned(),
            });
        };
        if frame.context.name() != name {
            let expected = frame.context.name().to_owned();
            self.frames.push(frame);
            return Err(XhtmlParseError::UnbalancedClose {
                found: name,
                expected,
            });
        }

        toggle_rules(&mut self.rules, &frame.context);
        if frame.opened {
            self.close_block();
        }
        Ok(())
    }

    /// Tag `name` without content (`<br/>`), one event for the ignore rules.
    pub fn empty_element(&mut self, name: &str, attributes: BTreeMap<String, String>) {
        let context = TagContext::new(name, attributes);
        if toggle_rules(&mut self.rules, &context) || self.macro_depth > 0 {
            return;
        }
        if let Some(block) = self.handler(&context).open(&context) {
            self.append(block);
        }
    }

    /// Start of a macro call's output region.
    ///
    /// Appends a pending macro call, inline when the enclosing block holds
    /// inline content. Everything up to the matching [`end_macro`](Self::end_macro)
    /// is the output of an earlier execution and is dropped, nested macro
    /// regions included.
    pub fn begin_macro(&mut self, id: &str, parameters: Parameters, content: Option<String>) {
        if !self.is_ignoring() {
            let inline = !self.in_block_container();
            tracing::trace!(macro_id = id, inline, "Macro call");
            self.append(Block::macro_call(id, parameters, content, inline));
        }
        self.macro_depth += 1;
    }

    /// End of a macro call's output region.
    pub fn end_macro(&mut self) {
        self.macro_depth = self.macro_depth.saturating_sub(1);
    }

    /// Text content.
    ///
    /// Whitespace runs collapse to one space; whitespace-only text between
    /// block-level tags is dropped.
    pub fn characters(&mut self, text: &str) {
        if self.is_ignoring() || text.is_empty() {
            return;
        }
        let collapsed = collapse_whitespace(text);
        if collapsed == " " && self.in_block_container() {
            return;
        }
        for block in PlainTextParser::inline_blocks(&collapsed) {
            self.append_inline(block);
        }
    }

    /// Close what is still open and return the document root.
    #[must_use]
    pub fn finish(mut self) -> Block {
        if !self.frames.is_empty() {
            tracing::debug!(open = self.frames.len(), "Closing tags left open at end of input");
        }
        while let Some(frame) = self.frames.pop() {
            if frame.opened {
                self.close_block();
            }
        }
        while self.open.len() > 1 {
            self.close_block();
        }
        self.open.pop().unwrap_or_else(|| Block::xdom(Vec::new()))
    }

    fn handler(&self, context: &TagContext) -> &dyn TagHandler {
        self.handlers
            .iter()
            .find(|handler| handler.names().contains(&context.name()))
            .map_or(&ElementHandler as &dyn TagHandler, |handler| handler.as_ref())
    }

    fn append(&mut self, block: Block) {
        if let Some(parent) = self.open.last_mut() {
            parent.add_child(block);
        }
    }

    /// Append text, joining words split across text events (`caf&#233;`).
    fn append_inline(&mut self, block: Block) {
        if let BlockKind::Word(word) = block.kind()
            && let Some(parent) = self.open.last_mut()
            && let Some(last) = parent.children_mut().last_mut()
            && let BlockKind::Word(previous) = last.kind()
        {
            let joined = format!("{previous}{word}");
            last.set_kind(BlockKind::Word(joined));
            return;
        }
        self.append(block);
    }

    fn close_block(&mut self) {
        if self.open.len() > 1
            && let Some(block) = self.open.pop()
        {
            self.append(block);
        }
    }

    fn in_block_container(&self) -> bool {
        self.open.last().is_none_or(|block| {
            matches!(
                block.kind(),
                BlockKind::Xdom | BlockKind::Group | BlockKind::List { .. }
            )
        })
    }
}

/// Toggle the rules matching `context`; returns whether the event is hidden.
fn toggle_rules(rules: &mut [IgnoreElementRule], context: &TagContext) -> bool {
    let before = rules.iter().any(IgnoreElementRule::is_active);
    for rule in rules.iter_mut() {
        if rule.switch_rule(context) {
            tracing::trace!(
                tag = %context.name(),
                active = rule.is_active(),
                "Toggled ignore rule"
            );
        }
    }
    before || rules.iter().any(IgnoreElementRule::is_active)
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_ascii_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(ch);
            in_space = false;
        }
    }
    collapsed
}
