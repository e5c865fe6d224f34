//! Syntax value types.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::ParseError;

/// Separator between type id and version in a composite syntax key.
const ID_SEPARATOR: char = '/';

/// Kind of markup dialect, independent of its version.
///
/// Two syntax types are equal when their ids are equal; the pretty name is
/// presentation only.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SyntaxType {
    id: Cow<'static, str>,
    pretty_name: Cow<'static, str>,
}

impl SyntaxType {
    /// `XWiki` markup.
    pub const XWIKI: Self = Self::from_static("xwiki", "XWiki");
    /// XHTML markup.
    pub const XHTML: Self = Self::from_static("xhtml", "XHTML");
    /// Plain text.
    pub const PLAIN: Self = Self::from_static("plain", "Plain");

    /// Create a syntax type from owned or borrowed strings.
    #[must_use]
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        pretty_name: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            id: id.into(),
            pretty_name: pretty_name.into(),
        }
    }

    /// Create a syntax type from static strings (usable in constants).
    #[must_use]
    pub const fn from_static(id: &'static str, pretty_name: &'static str) -> Self {
        Self {
            id: Cow::Borrowed(id),
            pretty_name: Cow::Borrowed(pretty_name),
        }
    }

    /// Machine identifier, e.g. `xwiki`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable name, e.g. `XWiki`.
    #[must_use]
    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }
}

impl PartialEq for SyntaxType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for SyntaxType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for SyntaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_name)
    }
}

/// A markup dialect at a specific version.
///
/// Equal iff type id and version are equal. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Syntax {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    syntax_type: SyntaxType,
    version: Cow<'static, str>,
}

impl Syntax {
    /// `XWiki` 2.0.
    pub const XWIKI_2_0: Self = Self::from_static(SyntaxType::XWIKI, "2.0");
    /// `XWiki` 2.1.
    pub const XWIKI_2_1: Self = Self::from_static(SyntaxType::XWIKI, "2.1");
    /// XHTML 1.0.
    pub const XHTML_1_0: Self = Self::from_static(SyntaxType::XHTML, "1.0");
    /// Plain text 1.0.
    pub const PLAIN_1_0: Self = Self::from_static(SyntaxType::PLAIN, "1.0");

    /// Create a syntax.
    #[must_use]
    pub fn new(syntax_type: SyntaxType, version: impl Into<Cow<'static, str>>) -> Self {
        Self {
            syntax_type,
            version: version.into(),
        }
    }

    /// Create a syntax from a static version (usable in constants).
    #[must_use]
    pub const fn from_static(syntax_type: SyntaxType, version: &'static str) -> Self {
        Self {
            syntax_type,
            version: Cow::Borrowed(version),
        }
    }

    /// Parse a composite key such as `xwiki/2.1`.
    ///
    /// The type id doubles as pretty name since the key does not carry one.
    /// Use the registry to get the registered syntax with its real metadata.
    pub fn from_id(id: &str) -> Result<Self, ParseError> {
        let (type_id, version) = id
            .split_once(ID_SEPARATOR)
            .filter(|(t, v)| !t.is_empty() && !v.is_empty())
            .ok_or_else(|| ParseError::InvalidSyntaxId(id.to_owned()))?;
        Ok(Self::new(
            SyntaxType::new(type_id.to_owned(), type_id.to_owned()),
            version.to_owned(),
        ))
    }

    /// The syntax type.
    #[must_use]
    pub fn syntax_type(&self) -> &SyntaxType {
        &self.syntax_type
    }

    /// The version string.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Composite key `"<type-id>/<version>"`.
    #[must_use]
    pub fn to_id_string(&self) -> String {
        format!("{}{ID_SEPARATOR}{}", self.syntax_type.id(), self.version)
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.syntax_type.pretty_name(), self.version)
    }
}
