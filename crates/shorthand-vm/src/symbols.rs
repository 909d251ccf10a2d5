//! Symbol table: append-only history of committed records plus a
//! label index pointing at the most recent record for each label.

use std::collections::HashMap;

use crate::source_map::SourceMap;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<SourceMap>,
    labels: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent record bound to `label`, or the not-found sentinel.
    pub fn get(&self, label: &str) -> SourceMap {
        self.lookup(label)
            .cloned()
            .unwrap_or_else(SourceMap::not_found)
    }

    pub fn lookup(&self, label: &str) -> Option<&SourceMap> {
        self.labels.get(label).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }

    /// One record per bound label, latest value only. Order is unspecified.
    pub fn get_all(&self) -> impl Iterator<Item = &SourceMap> {
        self.labels.values().map(|&i| &self.entries[i])
    }

    /// Append `sm` and rebind its label. Returns the new position.
    ///
    /// Callers must not pass a record with an empty label.
    pub fn set(&mut self, sm: SourceMap) -> usize {
        debug_assert!(!sm.label.is_empty(), "cannot bind an empty label");
        let position = self.entries.len();
        self.labels.insert(sm.label.clone(), position);
        self.entries.push(sm);
        position
    }

    /// Number of distinct bound labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Every record ever committed, oldest first.
    pub fn history(&self) -> &[SourceMap] {
        &self.entries
    }
}
