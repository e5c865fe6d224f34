//! Tag contexts and ignore rules.

use std::collections::BTreeMap;
use std::fmt;

/// An open tag: name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagContext {
    name: String,
    attributes: BTreeMap<String, String>,
}

impl TagContext {
    /// Create a context; the name is lowercased.
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attributes,
        }
    }

    /// Lowercased tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All attributes.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

type Predicate = dyn Fn(&TagContext) -> bool + Send + Sync;

/// Rule hiding tag content from the tree while active.
///
/// Each time the predicate matches a tag, the active flag flips. One predicate
/// therefore describes both where ignoring starts and where it stops: an
/// element matching it is ignored with its whole subtree, and two empty
/// elements matching it hide everything between them.
pub struct IgnoreElementRule {
    activate_when: Box<Predicate>,
    active: bool,
}

impl IgnoreElementRule {
    /// Create a rule with its initial active flag.
    pub fn new<F>(activate_when: F, active: bool) -> Self
    where
        F: Fn(&TagContext) -> bool + Send + Sync + 'static,
    {
        Self {
            activate_when: Box::new(activate_when),
            active,
        }
    }

    /// Inactive rule matching elements with CSS class `class`.
    #[must_use]
    pub fn for_class(class: impl Into<String>) -> Self {
        let class = class.into();
        Self::new(move |context| context.has_class(&class), false)
    }

    /// Whether content is currently ignored.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flip the active flag if the predicate matches `context`.
    ///
    /// Returns whether the flag flipped.
    pub fn switch_rule(&mut self, context: &TagContext) -> bool {
        if (self.activate_when)(context) {
            self.active = !self.active;
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for IgnoreElementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreElementRule")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
