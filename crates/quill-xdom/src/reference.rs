//! References to resources (documents, pages, URLs, attachments...).

use std::collections::BTreeMap;
use std::fmt;

/// Type of resource a reference points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Document,
    Page,
    Space,
    Url,
    Attachment,
    Mailto,
    Path,
    Unknown,
}

impl ResourceType {
    /// Scheme prefix used when the type is written explicitly (`doc:`, `page:`...).
    #[must_use]
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Document => "doc",
            Self::Page => "page",
            Self::Space => "space",
            Self::Url => "url",
            Self::Attachment => "attach",
            Self::Mailto => "mailto",
            Self::Path => "path",
            Self::Unknown => "unknown",
        }
    }

    /// Resource type for an explicit scheme prefix.
    #[must_use]
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        Some(match scheme {
            "doc" => Self::Document,
            "page" => Self::Page,
            "space" => Self::Space,
            "url" => Self::Url,
            "attach" => Self::Attachment,
            "mailto" => Self::Mailto,
            "path" => Self::Path,
            _ => return None,
        })
    }
}

/// A reference to a resource plus optional parameters.
///
/// `typed` records whether the type was written explicitly in the source
/// (`doc:Main.WebHome`) or inferred (`Main.WebHome`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReference {
    reference: String,
    resource_type: ResourceType,
    typed: bool,
    parameters: BTreeMap<String, String>,
}

impl ResourceReference {
    /// Create an untyped reference.
    #[must_use]
    pub fn new(reference: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            reference: reference.into(),
            resource_type,
            typed: false,
            parameters: BTreeMap::new(),
        }
    }

    /// Parse a reference as written in markup.
    ///
    /// - `scheme:rest` with a known scheme gives a typed reference
    /// - anything containing `://` is an untyped URL
    /// - everything else is an untyped document reference
    ///
    /// Page references get their `?query` and `#anchor` split into parameters.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.contains("://") {
            return Self::new(raw, ResourceType::Url);
        }
        if let Some((scheme, rest)) = raw.split_once(':')
            && let Some(resource_type) = ResourceType::from_scheme(scheme)
        {
            if resource_type == ResourceType::Page {
                return PageResourceReference::parse(rest).with_typed(true).into();
            }
            return Self::new(rest, resource_type).with_typed(true);
        }
        Self::new(raw, ResourceType::Document)
    }

    /// Mark the reference as explicitly typed.
    #[must_use]
    pub fn with_typed(mut self, typed: bool) -> Self {
        self.typed = typed;
        self
    }

    /// The reference string, without scheme prefix.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Type of the referenced resource.
    #[must_use]
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Whether the type was written explicitly.
    #[must_use]
    pub fn is_typed(&self) -> bool {
        self.typed
    }

    /// All parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// A single parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Set a parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Remove a parameter.
    pub fn remove_parameter(&mut self, name: &str) -> Option<String> {
        self.parameters.remove(name)
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.typed {
            write!(f, "{}:", self.resource_type.scheme())?;
        }
        f.write_str(&self.reference)
    }
}

/// Reference to a page, with optional query string and anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResourceReference(ResourceReference);

impl PageResourceReference {
    /// Name of the parameter holding the query string.
    pub const QUERY_STRING: &'static str = "queryString";
    /// Name of the parameter holding the anchor.
    pub const ANCHOR: &'static str = "anchor";

    /// Create a page reference.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(ResourceReference::new(reference, ResourceType::Page))
    }

    /// Parse `Path/To/Page?query#anchor`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let (rest, anchor) = raw.split_once('#').unwrap_or((raw, ""));
        let (page, query) = rest.split_once('?').unwrap_or((rest, ""));
        let mut reference = Self::new(page);
        reference.set_query_string(query);
        reference.set_anchor(anchor);
        reference
    }

    /// Query string used when building the page URL (e.g. `a=1&b=2`).
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.0.parameter(Self::QUERY_STRING)
    }

    /// Set the query string. Empty values are ignored.
    pub fn set_query_string(&mut self, query_string: &str) {
        if !query_string.is_empty() {
            self.0.set_parameter(Self::QUERY_STRING, query_string);
        }
    }

    /// Anchor inside the page, `None` for the top of the page.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.0.parameter(Self::ANCHOR)
    }

    /// Set the anchor. Empty values are ignored.
    pub fn set_anchor(&mut self, anchor: &str) {
        if !anchor.is_empty() {
            self.0.set_parameter(Self::ANCHOR, anchor);
        }
    }

    /// Mark the reference as explicitly typed.
    #[must_use]
    pub fn with_typed(self, typed: bool) -> Self {
        Self(self.0.with_typed(typed))
    }

    /// The underlying generic reference.
    #[must_use]
    pub fn as_reference(&self) -> &ResourceReference {
        &self.0
    }
}

impl From<PageResourceReference> for ResourceReference {
    fn from(page: PageResourceReference) -> Self {
        page.0
    }
}
