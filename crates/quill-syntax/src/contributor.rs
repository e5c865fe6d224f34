//! Plugin-side syntax contribution capability.

use std::collections::HashMap;
use std::sync::Arc;

use crate::syntax::Syntax;

/// Entry point implemented by plugins that bring syntaxes.
///
/// [`initialize`](Self::initialize) is called once per activation and must only
/// return the list. Registration is the job of the
/// [`ContributorBridge`](crate::ContributorBridge), not the plugin's.
///
/// Closures returning `Vec<Syntax>` implement this trait too.
pub trait SyntaxContributor: Send + Sync {
    /// The syntaxes to register into the registry.
    fn initialize(&self) -> Vec<Syntax>;
}

impl<F> SyntaxContributor for F
where
    F: Fn() -> Vec<Syntax> + Send + Sync,
{
    fn initialize(&self) -> Vec<Syntax> {
        self()
    }
}

/// Stable identity of a registered contributor plugin.
///
/// The role hint is the name under which the hosting container registered the
/// plugin (conventionally the syntax id it provides, e.g. `xwiki/2.1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContributorDescriptor {
    role_hint: String,
}

impl ContributorDescriptor {
    /// Create a descriptor for the given role hint.
    #[must_use]
    pub fn new(role_hint: impl Into<String>) -> Self {
        Self {
            role_hint: role_hint.into(),
        }
    }

    /// Role hint the contributor was registered under.
    #[must_use]
    pub fn role_hint(&self) -> &str {
        &self.role_hint
    }
}

/// Capability of the hosting container: resolve a descriptor to a live contributor.
pub trait ContributorLookup {
    /// Return the live contributor registered under `descriptor`, if any.
    fn lookup(&self, descriptor: &ContributorDescriptor) -> Option<Arc<dyn SyntaxContributor>>;
}

/// In-memory [`ContributorLookup`] for hosts without a component container.
#[derive(Default)]
pub struct StaticContributors {
    contributors: HashMap<ContributorDescriptor, Arc<dyn SyntaxContributor>>,
}

impl StaticContributors {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contributor under the given role hint.
    #[must_use]
    pub fn with<C: SyntaxContributor + 'static>(mut self, role_hint: &str, contributor: C) -> Self {
        self.insert(ContributorDescriptor::new(role_hint), Arc::new(contributor));
        self
    }

    /// Add or replace a contributor, returning its descriptor.
    pub fn insert(
        &mut self,
        descriptor: ContributorDescriptor,
        contributor: Arc<dyn SyntaxContributor>,
    ) -> ContributorDescriptor {
        self.contributors.insert(descriptor.clone(), contributor);
        descriptor
    }

    /// Remove a contributor.
    pub fn remove(
        &mut self,
        descriptor: &ContributorDescriptor,
    ) -> Option<Arc<dyn SyntaxContributor>> {
        self.contributors.remove(descriptor)
    }

    /// All known descriptors, in no particular order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ContributorDescriptor> {
        self.contributors.keys()
    }
}

impl ContributorLookup for StaticContributors {
    fn lookup(&self, descriptor: &ContributorDescriptor) -> Option<Arc<dyn SyntaxContributor>> {
        self.contributors.get(descriptor).cloned()
    }
}
