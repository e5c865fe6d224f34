//! Thread-safe registry of available syntaxes.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::ParseError;
use crate::syntax::Syntax;

/// Registry mapping composite syntax keys (`"<type-id>/<version>"`) to syntaxes.
///
/// Entries are added either directly through the `register_*` methods or by a
/// [`ContributorBridge`](crate::ContributorBridge) when a plugin activates.
/// Syntaxes registered directly are not tracked by any bridge and must be
/// unregistered by whoever registered them.
///
/// # Thread Safety
///
/// Designed for concurrent reads alongside occasional writes:
/// - Uses an internal `RwLock<HashMap<..>>`
/// - Each register/unregister call holds the write lock for the whole batch,
///   so readers never observe a partially applied batch
/// - No ordering is promised between independent calls
///
/// Mutation never fails: registering an empty list or unregistering an absent
/// syntax is a no-op.
#[derive(Debug, Default)]
pub struct SyntaxRegistry {
    syntaxes: RwLock<HashMap<String, Syntax>>,
}

impl SyntaxRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register several syntaxes in one atomic batch.
    ///
    /// A syntax whose key is already present replaces the previous entry.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn register_syntaxes(&self, syntaxes: &[Syntax]) {
        if syntaxes.is_empty() {
            return;
        }

        let mut map = self.syntaxes.write().unwrap();
        for syntax in syntaxes {
            let key = syntax.to_id_string();
            if let Some(previous) = map.insert(key.clone(), syntax.clone())
                && previous.syntax_type().pretty_name() != syntax.syntax_type().pretty_name()
            {
                tracing::warn!(
                    syntax = %key,
                    previous = %previous,
                    replacement = %syntax,
                    "Syntax key registered twice with different metadata, keeping the last one"
                );
            }
            tracing::debug!(syntax = %key, "Registered syntax");
        }
    }

    /// Register a single syntax.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn register_syntax(&self, syntax: Syntax) {
        self.register_syntaxes(std::slice::from_ref(&syntax));
    }

    /// Unregister several syntaxes in one atomic batch.
    ///
    /// Removal is by composite key and is complete: a syntax registered twice
    /// is gone after a single unregistration.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn unregister_syntaxes(&self, syntaxes: &[Syntax]) {
        if syntaxes.is_empty() {
            return;
        }

        let mut map = self.syntaxes.write().unwrap();
        for syntax in syntaxes {
            let key = syntax.to_id_string();
            if map.remove(&key).is_some() {
                tracing::debug!(syntax = %key, "Unregistered syntax");
            }
        }
    }

    /// Unregister a single syntax.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn unregister_syntax(&self, syntax: &Syntax) {
        self.unregister_syntaxes(std::slice::from_ref(syntax));
    }

    /// Point-in-time snapshot of all registered syntaxes keyed by composite key.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get_syntaxes(&self) -> HashMap<String, Syntax> {
        self.syntaxes.read().unwrap().clone()
    }

    /// Look up a syntax by its composite key.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get_syntax(&self, id: &str) -> Option<Syntax> {
        self.syntaxes.read().unwrap().get(id).cloned()
    }

    /// Look up a syntax that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnknownSyntax`] carrying `id` when nothing is registered under it.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    pub fn resolve_syntax(&self, id: &str) -> Result<Syntax, ParseError> {
        self.get_syntax(id)
            .ok_or_else(|| ParseError::UnknownSyntax(id.to_owned()))
    }

    /// Number of registered syntaxes.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.syntaxes.read().unwrap().len()
    }

    /// Whether no syntax is registered.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.syntaxes.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::syntax::SyntaxType;

    assert_impl_all!(SyntaxRegistry: Send, Sync);

    fn my_syntax() -> Syntax {
        Syntax::new(SyntaxType::new("myid", "My Id"), "1.0")
    }

    #[test]
    fn test_register_then_get() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(my_syntax());

        assert_eq!(registry.get_syntax("myid/1.0"), Some(my_syntax()));
        assert_eq!(registry.get_syntaxes().len(), 1);
    }

    #[test]
    fn test_unregister_then_get() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(my_syntax());
        registry.unregister_syntax(&my_syntax());

        assert_eq!(registry.get_syntax("myid/1.0"), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_twice_unregister_once_removes() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(my_syntax());
        registry.register_syntax(my_syntax());
        assert_eq!(registry.len(), 1);

        registry.unregister_syntax(&my_syntax());
        assert!(registry.get_syntax("myid/1.0").is_none());
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(Syntax::XWIKI_2_1);
        registry.unregister_syntax(&my_syntax());
        registry.unregister_syntaxes(&[]);

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_empty_list_is_noop() {
        let registry = SyntaxRegistry::new();
        registry.register_syntaxes(&[]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_writer_wins_on_colliding_key() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(Syntax::new(SyntaxType::new("myid", "First"), "1.0"));
        registry.register_syntax(Syntax::new(SyntaxType::new("myid", "Second"), "1.0"));

        let syntax = registry.get_syntax("myid/1.0").unwrap();
        assert_eq!(syntax.syntax_type().pretty_name(), "Second");
    }

    #[test]
    fn test_keys_match_entries() {
        let registry = SyntaxRegistry::new();
        registry.register_syntaxes(&[Syntax::XWIKI_2_0, Syntax::XWIKI_2_1, Syntax::XHTML_1_0]);

        for (key, syntax) in registry.get_syntaxes() {
            assert_eq!(key, syntax.to_id_string());
        }
    }

    #[test]
    fn test_resolve_syntax() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(Syntax::XWIKI_2_1);

        assert_eq!(registry.resolve_syntax("xwiki/2.1"), Ok(Syntax::XWIKI_2_1));
        assert_eq!(
            registry.resolve_syntax("xwiki/9.9"),
            Err(ParseError::UnknownSyntax("xwiki/9.9".to_owned()))
        );
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = SyntaxRegistry::new();
        registry.register_syntax(Syntax::XWIKI_2_1);
        let snapshot = registry.get_syntaxes();
        registry.unregister_syntax(&Syntax::XWIKI_2_1);

        assert!(snapshot.contains_key("xwiki/2.1"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_batches_are_atomic_for_readers() {
        let registry = Arc::new(SyntaxRegistry::new());
        let batch = [
            Syntax::new(SyntaxType::new("a", "A"), "1.0"),
            Syntax::new(SyntaxType::new("b", "B"), "1.0"),
            Syntax::new(SyntaxType::new("c", "C"), "1.0"),
        ];

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..200 {
                    registry.register_syntaxes(&batch);
                    registry.unregister_syntaxes(&batch);
                }
            });
            scope.spawn(|| {
                for _ in 0..200 {
                    let size = registry.get_syntaxes().len();
                    assert!(size == 0 || size == batch.len(), "observed partial batch: {size}");
                }
            });
        });

        assert!(registry.is_empty());
    }
}
