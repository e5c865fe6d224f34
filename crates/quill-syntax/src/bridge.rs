//! Plugin lifecycle bridge between contributors and the registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::contributor::{ContributorDescriptor, ContributorLookup, SyntaxContributor};
use crate::error::ContributorLookupError;
use crate::registry::SyntaxRegistry;
use crate::syntax::Syntax;

/// Registers the syntaxes of activated contributors and removes them again on
/// deactivation.
///
/// The bridge remembers, per descriptor, exactly the list a contributor
/// returned at activation. Deactivation unregisters that list and never calls
/// the contributor again, so a contributor whose answer changes over time is
/// still removed correctly. Syntaxes registered directly against the
/// [`SyntaxRegistry`] are not tracked and are left alone.
///
/// # Thread Safety
///
/// The descriptor table sits behind a `Mutex` that is held across the
/// registry update, so an activation and a deactivation of the same
/// descriptor can't interleave. The registry lock is never held while taking
/// the table lock.
pub struct ContributorBridge {
    registry: Arc<SyntaxRegistry>,
    contributed: Mutex<HashMap<ContributorDescriptor, Vec<Syntax>>>,
}

impl ContributorBridge {
    /// Create a bridge feeding the given registry.
    #[must_use]
    pub fn new(registry: Arc<SyntaxRegistry>) -> Self {
        Self {
            registry,
            contributed: Mutex::new(HashMap::new()),
        }
    }

    /// The registry this bridge feeds.
    #[must_use]
    pub fn registry(&self) -> &Arc<SyntaxRegistry> {
        &self.registry
    }

    /// Handle a "contributor added" notification from the hosting container.
    ///
    /// Resolves the live contributor through `lookup` and activates it.
    ///
    /// # Errors
    ///
    /// Returns [`ContributorLookupError`] when the container can't resolve a
    /// descriptor it has just reported as registered. That is a broken host
    /// contract: callers must treat the error as fatal and abort start-up or
    /// the plugin transaction, never retry or skip the contributor. Nothing is
    /// registered or recorded for the descriptor.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn on_contributor_added(
        &self,
        lookup: &dyn ContributorLookup,
        descriptor: &ContributorDescriptor,
    ) -> Result<(), ContributorLookupError> {
        let Some(contributor) = lookup.lookup(descriptor) else {
            tracing::error!(
                role_hint = %descriptor.role_hint(),
                "Syntax contributor reported as registered but lookup failed"
            );
            return Err(ContributorLookupError {
                role_hint: descriptor.role_hint().to_owned(),
            });
        };
        self.on_contributor_activated(descriptor, contributor.as_ref());
        Ok(())
    }

    /// Activate a contributor: register what it returns and remember it.
    ///
    /// Re-activating a descriptor that is still tracked replaces its record;
    /// syntaxes from the old record that the new list no longer contains are
    /// unregistered.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn on_contributor_activated(
        &self,
        descriptor: &ContributorDescriptor,
        contributor: &dyn SyntaxContributor,
    ) {
        let syntaxes = contributor.initialize();

        let mut contributed = self.contributed.lock().unwrap();
        self.registry.register_syntaxes(&syntaxes);
        tracing::info!(
            role_hint = %descriptor.role_hint(),
            count = syntaxes.len(),
            "Activated syntax contributor"
        );

        if let Some(previous) = contributed.insert(descriptor.clone(), syntaxes) {
            let current = &contributed[descriptor];
            let stale: Vec<Syntax> = previous
                .into_iter()
                .filter(|syntax| !current.contains(syntax))
                .collect();
            self.registry.unregister_syntaxes(&stale);
        }
    }

    /// Handle a "contributor removed" notification.
    ///
    /// Unregisters exactly the syntaxes recorded at activation and drops the
    /// record. Unknown descriptors are ignored: their syntaxes, if any, were
    /// registered directly and must be removed by their owner.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn on_contributor_deactivated(&self, descriptor: &ContributorDescriptor) {
        let mut contributed = self.contributed.lock().unwrap();
        match contributed.remove(descriptor) {
            Some(syntaxes) => {
                self.registry.unregister_syntaxes(&syntaxes);
                tracing::info!(
                    role_hint = %descriptor.role_hint(),
                    count = syntaxes.len(),
                    "Deactivated syntax contributor"
                );
            }
            None => {
                tracing::debug!(
                    role_hint = %descriptor.role_hint(),
                    "No syntaxes recorded for contributor, nothing to unregister"
                );
            }
        }
    }

    /// Syntaxes recorded for a descriptor at its activation.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    #[must_use]
    pub fn contributed_syntaxes(&self, descriptor: &ContributorDescriptor) -> Option<Vec<Syntax>> {
        self.contributed.lock().unwrap().get(descriptor).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::builtin::XWikiSyntaxContributor;
    use crate::contributor::StaticContributors;
    use crate::syntax::SyntaxType;

    assert_impl_all!(ContributorBridge: Send, Sync);

    fn my_syntax() -> Syntax {
        Syntax::new(SyntaxType::new("myid", "My Id"), "1.0")
    }

    fn setup() -> (Arc<SyntaxRegistry>, ContributorBridge) {
        let registry = Arc::new(SyntaxRegistry::new());
        let bridge = ContributorBridge::new(Arc::clone(&registry));
        (registry, bridge)
    }

    #[test]
    fn test_register_and_unregister_through_lookup() {
        let (registry, bridge) = setup();
        let lookup = StaticContributors::new().with("my", || vec![my_syntax()]);
        let descriptor = ContributorDescriptor::new("my");

        bridge.on_contributor_added(&lookup, &descriptor).unwrap();

        assert_eq!(registry.get_syntax("myid/1.0"), Some(my_syntax()));
        let syntaxes = registry.get_syntaxes();
        assert_eq!(syntaxes.len(), 1);
        assert_eq!(syntaxes.get("myid/1.0"), Some(&my_syntax()));

        bridge.on_contributor_deactivated(&descriptor);

        assert!(registry.get_syntax("myid/1.0").is_none());
        assert!(registry.get_syntaxes().is_empty());
        assert!(bridge.contributed_syntaxes(&descriptor).is_none());
    }

    #[test]
    fn test_lookup_failure_is_reported() {
        let (registry, bridge) = setup();
        let lookup = StaticContributors::new();

        let err = bridge
            .on_contributor_added(&lookup, &ContributorDescriptor::new("ghost"))
            .unwrap_err();

        assert_eq!(err.role_hint, "ghost");
        assert!(registry.is_empty());
        assert_eq!(
            bridge.contributed_syntaxes(&ContributorDescriptor::new("ghost")),
            None
        );
    }

    #[test]
    fn test_removal_of_untracked_descriptor_is_noop() {
        let (registry, bridge) = setup();
        registry.register_syntax(my_syntax());

        bridge.on_contributor_deactivated(&ContributorDescriptor::new("my"));

        assert_eq!(registry.get_syntax("myid/1.0"), Some(my_syntax()));
    }

    #[test]
    fn test_multi_syntax_contributor_round_trip() {
        let (registry, bridge) = setup();
        let descriptor = ContributorDescriptor::new("xwiki");

        bridge.on_contributor_activated(&descriptor, &XWikiSyntaxContributor);
        assert_eq!(registry.len(), 2);

        bridge.on_contributor_deactivated(&descriptor);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_other_contributors_survive_deactivation() {
        let (registry, bridge) = setup();
        let xwiki = ContributorDescriptor::new("xwiki");
        let mine = ContributorDescriptor::new("my");

        bridge.on_contributor_activated(&xwiki, &XWikiSyntaxContributor);
        bridge.on_contributor_activated(&mine, &|| vec![my_syntax()]);
        registry.register_syntax(Syntax::XHTML_1_0);

        bridge.on_contributor_deactivated(&xwiki);

        let mut keys: Vec<_> = registry.get_syntaxes().into_keys().collect();
        keys.sort();
        assert_eq!(keys, ["myid/1.0", "xhtml/1.0"]);
    }

    #[test]
    fn test_recorded_list_is_not_recomputed() {
        let (registry, bridge) = setup();
        let calls = AtomicUsize::new(0);
        let fickle = || {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                vec![my_syntax()]
            } else {
                vec![Syntax::PLAIN_1_0]
            }
        };
        let descriptor = ContributorDescriptor::new("fickle");

        bridge.on_contributor_activated(&descriptor, &fickle);
        bridge.on_contributor_deactivated(&descriptor);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reactivation_drops_stale_syntaxes() {
        let (registry, bridge) = setup();
        let descriptor = ContributorDescriptor::new("xwiki");

        bridge.on_contributor_activated(&descriptor, &XWikiSyntaxContributor);
        bridge.on_contributor_activated(&descriptor, &|| vec![Syntax::XWIKI_2_1]);

        assert!(registry.get_syntax("xwiki/2.0").is_none());
        assert!(registry.get_syntax("xwiki/2.1").is_some());
        assert_eq!(
            bridge.contributed_syntaxes(&descriptor),
            Some(vec![Syntax::XWIKI_2_1])
        );
    }

    #[test]
    fn test_concurrent_contributors() {
        let (registry, bridge) = setup();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let bridge = &bridge;
                scope.spawn(move || {
                    let descriptor = ContributorDescriptor::new(format!("plugin-{i}"));
                    let syntax = Syntax::new(SyntaxType::new(format!("s{i}"), "S"), "1.0");
                    bridge.on_contributor_activated(&descriptor, &move || vec![syntax.clone()]);
                    if i % 2 == 0 {
                        bridge.on_contributor_deactivated(&descriptor);
                    }
                });
            }
        });

        let mut keys: Vec<_> = registry.get_syntaxes().into_keys().collect();
        keys.sort();
        assert_eq!(keys, ["s1/1.0", "s3/1.0", "s5/1.0", "s7/1.0"]);
    }
}
