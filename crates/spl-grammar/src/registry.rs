use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::commands;
use crate::syntax::CommandSyntax;

/// Command aliases. Each alias shares the target's `CommandSyntax` by
/// identity, observable through `Arc::ptr_eq`.
const ALIASES: &[(&str, &str)] = &[
    ("bucket", "bin"),
    ("kv", "extract"),
    ("af", "analyzefields"),
    ("run", "script"),
];

/// The immutable command grammar registry.
///
/// Maps lowercase command names to their grammar entries. Constructed
/// once, injected into the analyzer, and shared read-only from there;
/// there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    entries: FxHashMap<String, Arc<CommandSyntax>>,
}

impl PatternRegistry {
    /// Build a registry from explicit entries, applying no aliases.
    pub fn from_entries(entries: Vec<CommandSyntax>) -> Self {
        let mut map = FxHashMap::default();
        for entry in entries {
            map.insert(entry.name.clone(), Arc::new(entry));
        }
        Self { entries: map }
    }

    /// Build the standard registry: the full command corpus plus aliases.
    pub fn standard() -> Self {
        let mut registry = Self::from_entries(commands::all());
        for (alias, target) in ALIASES {
            registry.add_alias(alias, target);
        }
        registry
    }

    /// Register `alias` as another name for `target`'s entry. A missing
    /// target is a programming error in the alias table and is ignored.
    fn add_alias(&mut self, alias: &str, target: &str) {
        if let Some(entry) = self.entries.get(target) {
            let shared = Arc::clone(entry);
            self.entries.insert(alias.to_ascii_lowercase(), shared);
        }
    }

    /// Look up a command by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Arc<CommandSyntax>> {
        self.entries.get(&name.to_ascii_lowercase())
    }

    /// Whether a command (or alias) is registered.
    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// All registered names (aliases included), sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names, aliases included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (name, entry) pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<CommandSyntax>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = PatternRegistry::standard();
        assert!(registry.has("stats"));
        assert!(registry.has("STATS"));
        assert!(registry.has("IPLocation"));
        assert!(!registry.has("frobnicate"));
    }

    #[test]
    fn aliases_share_the_entry_by_identity() {
        let registry = PatternRegistry::standard();
        let bin = registry.get("bin").unwrap();
        let bucket = registry.get("bucket").unwrap();
        assert!(Arc::ptr_eq(bin, bucket));
        let extract = registry.get("extract").unwrap();
        let kv = registry.get("kv").unwrap();
        assert!(Arc::ptr_eq(extract, kv));
    }

    #[test]
    fn names_are_sorted_and_include_aliases() {
        let registry = PatternRegistry::standard();
        let names = registry.names();
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names.contains(&"bucket"));
        assert!(names.contains(&"af"));
        assert!(names.len() >= 140, "registry has {} names", names.len());
    }
}
