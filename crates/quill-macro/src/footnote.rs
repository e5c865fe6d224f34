//! Footnotes: `footnote` marks a note in the text, `putfootnotes` lists them.

use std::sync::LazyLock;

use quill_xdom::{
    Axes, Block, BlockKind, BlockPath, MacroBlockMatcher, MacroMarkerBlockMatcher, OrBlockMatcher,
    PageResourceReference, Parameters, PlainTextParser, ResourceReference, ResourceType,
};

use crate::context::MacroTransformationContext;
use crate::descriptor::{MacroCategory, MacroDescriptor};
use crate::error::MacroExecutionError;
use crate::handler::Macro;

const FOOTNOTE: &str = "footnote";
const PUT_FOOTNOTES: &str = "putfootnotes";

/// Pending or executed `putfootnotes` calls.
static PUT_FOOTNOTES_MATCHER: LazyLock<OrBlockMatcher<'static>> = LazyLock::new(|| {
    OrBlockMatcher::new(
        MacroBlockMatcher::new(PUT_FOOTNOTES),
        MacroMarkerBlockMatcher::new(PUT_FOOTNOTES),
    )
});

/// Marks a footnote in the text.
///
/// Produces nothing at its own position. It makes sure the document ends
/// with one `putfootnotes` call, which numbers the notes and lists them.
pub struct FootnoteMacro {
    descriptor: MacroDescriptor,
}

impl Default for FootnoteMacro {
    fn default() -> Self {
        Self::new()
    }
}

impl FootnoteMacro {
    /// Create the macro.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: MacroDescriptor::new(
                FOOTNOTE,
                "Footnote",
                "Generates a footnote to display at the end of the page.",
            )
            .with_content_description("the text to place in the footnote")
            .with_category(MacroCategory::Content),
        }
    }
}

impl Macro for FootnoteMacro {
    fn descriptor(&self) -> &MacroDescriptor {
        &self.descriptor
    }

    fn priority(&self) -> i32 {
        500
    }

    fn supports_inline_mode(&self) -> bool {
        true
    }

    fn execute(
        &self,
        _parameters: &Parameters,
        _content: Option<&str>,
        context: &mut MacroTransformationContext<'_>,
    ) -> Result<Vec<Block>, MacroExecutionError> {
        let root = context.xdom_mut();
        if root
            .first_block(&*PUT_FOOTNOTES_MATCHER, Axes::Descendant)
            .is_none()
        {
            root.add_child(Block::macro_call(PUT_FOOTNOTES, Parameters::new(), None, false));
        }
        Ok(Vec::new())
    }
}

/// Numbers the executed footnotes of the document and lists their text.
///
/// Each footnote position gets a superscript link to its entry; each entry
/// links back to its position.
pub struct PutFootnotesMacro {
    descriptor: MacroDescriptor,
}

impl Default for PutFootnotesMacro {
    fn default() -> Self {
        Self::new()
    }
}

impl PutFootnotesMacro {
    /// Create the macro.
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: MacroDescriptor::new(
                PUT_FOOTNOTES,
                "Put Footnotes",
                "Displays the footnotes defined so far.",
            )
            .with_category(MacroCategory::Content),
        }
    }
}

impl Macro for PutFootnotesMacro {
    fn descriptor(&self) -> &MacroDescriptor {
        &self.descriptor
    }

    fn priority(&self) -> i32 {
        2000
    }

    fn execute(
        &self,
        _parameters: &Parameters,
        _content: Option<&str>,
        context: &mut MacroTransformationContext<'_>,
    ) -> Result<Vec<Block>, MacroExecutionError> {
        let root = context.xdom_mut();
        let footnotes = root.find_all_from(
            &BlockPath::root(),
            &MacroMarkerBlockMatcher::new(FOOTNOTE),
            Axes::Descendant,
        );
        if footnotes.is_empty() {
            return Ok(Vec::new());
        }

        let mut items = Vec::with_capacity(footnotes.len());
        for (index, path) in footnotes.iter().enumerate() {
            let number = index + 1;
            let Some(footnote) = root.get_mut(path) else {
                continue;
            };
            let text = match footnote.kind() {
                BlockKind::MacroMarker { content, .. } => content.clone().unwrap_or_default(),
                _ => String::new(),
            };
            *footnote.children_mut() = vec![footnote_reference(number)];
            items.push(footnote_entry(number, &text));
        }

        Ok(vec![
            Block::new(BlockKind::List { ordered: true })
                .with_parameter("class", "footnotes")
                .with_children(items),
        ])
    }
}

fn anchor_link(anchor: String, label: Vec<Block>) -> Block {
    let mut reference = ResourceReference::new("", ResourceType::Document);
    reference.set_parameter(PageResourceReference::ANCHOR, anchor);
    Block::new(BlockKind::Link {
        reference,
        freestanding: false,
    })
    .with_children(label)
}

/// Superscript number linking to the entry.
fn footnote_reference(number: usize) -> Block {
    Block::new(BlockKind::Element {
        name: "sup".to_owned(),
    })
    .with_parameter("id", format!("x_footnote_ref_{number}"))
    .with_parameter("class", "footnoteRef")
    .with_children(vec![anchor_link(
        format!("x_footnote_{number}"),
        vec![Block::word(number.to_string())],
    )])
}

/// List item with a back link followed by the footnote text.
fn footnote_entry(number: usize, text: &str) -> Block {
    let mut children = vec![
        anchor_link(
            format!("x_footnote_ref_{number}"),
            vec![Block::new(BlockKind::SpecialSymbol('^'))],
        )
        .with_parameter("class", "footnoteBackRef"),
        Block::new(BlockKind::Space),
    ];
    children.extend(PlainTextParser::inline_blocks(text.trim()));

    Block::new(BlockKind::ListItem)
        .with_parameter("id", format!("x_footnote_{number}"))
        .with_children(children)
}
