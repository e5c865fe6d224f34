//! Static description of a macro.

/// Category a macro is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MacroCategory {
    /// Adds content such as notes, quotes or includes.
    Content,
    /// Changes how existing content looks.
    Formatting,
    /// Links between documents or within one, like tables of contents.
    Navigation,
    /// Arranges content into columns, boxes or sections.
    Layout,
    /// Meant for authors of macros and syntaxes.
    Development,
}

/// Identity and documentation of a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacroDescriptor {
    id: String,
    name: String,
    description: String,
    content_description: Option<String>,
    default_category: Option<MacroCategory>,
}

impl MacroDescriptor {
    /// Create a descriptor for macro `id`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            content_description: None,
            default_category: None,
        }
    }

    /// Describe the content the macro expects (macros without one take no content).
    #[must_use]
    pub fn with_content_description(mut self, description: impl Into<String>) -> Self {
        self.content_description = Some(description.into());
        self
    }

    /// Set the default category.
    #[must_use]
    pub fn with_category(mut self, category: MacroCategory) -> Self {
        self.default_category = Some(category);
        self
    }

    /// Id used in markup to call the macro.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the macro does.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// What the content should be, if the macro takes content.
    #[must_use]
    pub fn content_description(&self) -> Option<&str> {
        self.content_description.as_deref()
    }

    /// Default category.
    #[must_use]
    pub fn default_category(&self) -> Option<MacroCategory> {
        self.default_category
    }
}
