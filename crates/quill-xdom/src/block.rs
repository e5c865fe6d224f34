//! Document tree nodes.

use std::collections::BTreeMap;
use std::fmt;

use crate::reference::ResourceReference;

/// String parameters attached to a block (macro parameters, element attributes).
pub type Parameters = BTreeMap<String, String>;

/// Kind of a block together with its kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// Document root.
    Xdom,
    /// Generic container without semantics of its own.
    Group,
    /// Paragraph.
    Paragraph,
    /// A word of text.
    Word(String),
    /// A single space.
    Space,
    /// A punctuation or symbol character.
    SpecialSymbol(char),
    /// Explicit line break.
    NewLine,
    /// Element kept from tag-based input that has no dedicated kind.
    Element {
        /// Tag name.
        name: String,
    },
    /// Link; children are the label (empty for a generated label).
    Link {
        /// Link target.
        reference: ResourceReference,
        /// Whether the link was written as a bare URL.
        freestanding: bool,
    },
    /// Image.
    Image {
        /// Image source.
        reference: ResourceReference,
    },
    /// Ordered or bulleted list; children are list items.
    List {
        /// Numbered list when true.
        ordered: bool,
    },
    /// Item of a list.
    ListItem,
    /// Macro call waiting to be executed.
    Macro {
        /// Macro id.
        id: String,
        /// Raw macro content.
        content: Option<String>,
        /// Whether the call sits in inline content.
        inline: bool,
    },
    /// Executed macro; children are what the macro produced.
    MacroMarker {
        /// Macro id.
        id: String,
        /// Raw macro content.
        content: Option<String>,
        /// Whether the call sat in inline content.
        inline: bool,
    },
    /// Rendering error shown in place of failed content.
    Error {
        /// Short message.
        message: String,
        /// Longer description.
        description: String,
    },
}

impl BlockKind {
    /// The fieldless type of this kind.
    #[must_use]
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Xdom => BlockType::Xdom,
            Self::Group => BlockType::Group,
            Self::Paragraph => BlockType::Paragraph,
            Self::Word(_) => BlockType::Word,
            Self::Space => BlockType::Space,
            Self::SpecialSymbol(_) => BlockType::SpecialSymbol,
            Self::NewLine => BlockType::NewLine,
            Self::Element { .. } => BlockType::Element,
            Self::Link { .. } => BlockType::Link,
            Self::Image { .. } => BlockType::Image,
            Self::List { .. } => BlockType::List,
            Self::ListItem => BlockType::ListItem,
            Self::Macro { .. } => BlockType::Macro,
            Self::MacroMarker { .. } => BlockType::MacroMarker,
            Self::Error { .. } => BlockType::Error,
        }
    }

    /// Macro id for pending or executed macro blocks.
    #[must_use]
    pub fn macro_id(&self) -> Option<&str> {
        match self {
            Self::Macro { id, .. } | Self::MacroMarker { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Fieldless discriminant of [`BlockKind`], used to match blocks by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// [`BlockKind::Xdom`].
    Xdom,
    /// [`BlockKind::Group`].
    Group,
    /// [`BlockKind::Paragraph`].
    Paragraph,
    /// [`BlockKind::Word`].
    Word,
    /// [`BlockKind::Space`].
    Space,
    /// [`BlockKind::SpecialSymbol`].
    SpecialSymbol,
    /// [`BlockKind::NewLine`].
    NewLine,
    /// [`BlockKind::Element`].
    Element,
    /// [`BlockKind::Link`].
    Link,
    /// [`BlockKind::Image`].
    Image,
    /// [`BlockKind::List`], ordered or not.
    List,
    /// [`BlockKind::ListItem`].
    ListItem,
    /// [`BlockKind::Macro`], a pending call.
    Macro,
    /// [`BlockKind::MacroMarker`], an executed call.
    MacroMarker,
    /// [`BlockKind::Error`].
    Error,
}

/// A node of the document tree.
///
/// A block owns its children; no block is shared between two parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    parameters: Parameters,
    children: Vec<Block>,
}

impl Block {
    /// Create a childless block without parameters.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            parameters: Parameters::new(),
            children: Vec::new(),
        }
    }

    /// Create a document root.
    #[must_use]
    pub fn xdom(children: Vec<Block>) -> Self {
        Self::new(BlockKind::Xdom).with_children(children)
    }

    /// Create a paragraph.
    #[must_use]
    pub fn paragraph(children: Vec<Block>) -> Self {
        Self::new(BlockKind::Paragraph).with_children(children)
    }

    /// Create a word.
    #[must_use]
    pub fn word(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Word(text.into()))
    }

    /// Create a pending macro call.
    #[must_use]
    pub fn macro_call(
        id: impl Into<String>,
        parameters: Parameters,
        content: Option<String>,
        inline: bool,
    ) -> Self {
        Self::new(BlockKind::Macro {
            id: id.into(),
            content,
            inline,
        })
        .with_parameters(parameters)
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Set all parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set one parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Kind of this block.
    #[must_use]
    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    /// Replace the kind of this block, keeping parameters and children.
    pub fn set_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
    }

    /// Parameters of this block.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// A single parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Set a parameter, returning the previous value.
    pub fn set_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        self.parameters.insert(name.into(), value.into())
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// Mutable access to the children.
    pub fn children_mut(&mut self) -> &mut Vec<Block> {
        &mut self.children
    }

    /// Append a child as the last one.
    pub fn add_child(&mut self, child: Block) {
        self.children.push(child);
    }

    /// Insert a child at `index`, shifting later children.
    ///
    /// # Panics
    ///
    /// Panics if `index > children().len()`.
    pub fn insert_child(&mut self, index: usize, child: Block) {
        self.children.insert(index, child);
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<Block> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Replace the child at `index` by zero or more blocks.
    ///
    /// Returns the replaced child, or `None` (and changes nothing) if `index`
    /// is out of range.
    pub fn replace_child(&mut self, index: usize, replacement: Vec<Block>) -> Option<Block> {
        if index >= self.children.len() {
            return None;
        }
        self.children.splice(index..=index, replacement).next()
    }

    /// Block at `path`, relative to this block.
    #[must_use]
    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        path.indices()
            .iter()
            .try_fold(self, |block, &index| block.children.get(index))
    }

    /// Mutable block at `path`, relative to this block.
    pub fn get_mut(&mut self, path: &BlockPath) -> Option<&mut Block> {
        path.indices()
            .iter()
            .try_fold(self, |block, &index| block.children.get_mut(index))
    }

    /// Replace the block at `path` by zero or more blocks.
    ///
    /// Returns the replaced block. The root itself (empty path) can't be
    /// replaced and yields `None`.
    pub fn replace_at(&mut self, path: &BlockPath, replacement: Vec<Block>) -> Option<Block> {
        let (parent, index) = path.split_last()?;
        self.get_mut(&parent)?.replace_child(index, replacement)
    }

    /// Concatenated text of all word, space, symbol and newline descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }
}

fn collect_text(block: &Block, out: &mut String) {
    match block.kind() {
        BlockKind::Word(word) => out.push_str(word),
        BlockKind::Space => out.push(' '),
        BlockKind::SpecialSymbol(symbol) => out.push(*symbol),
        BlockKind::NewLine => out.push('\n'),
        _ => {}
    }
    for child in block.children() {
        collect_text(child, out);
    }
}

/// Location of a block as child indices from a root.
///
/// The empty path designates the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    /// Path of the root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from child indices.
    #[must_use]
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Child indices from the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path of the `index`-th child of this block.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.split_last().map(|(parent, _)| parent)
    }

    /// Parent path and the index within the parent.
    #[must_use]
    pub fn split_last(&self) -> Option<(Self, usize)> {
        let (&last, rest) = self.0.split_last()?;
        Some((Self(rest.to_vec()), last))
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}
