//! In-memory dedup store of registered announcements.
//!
//! Maps `key -> value -> {handles}`. A pair stays registered as long as at
//! least one handle references it; emptied value and key entries are pruned
//! immediately so an empty registry is always structurally empty.


use std::collections::HashMap;
use std::collections::HashSet;

use tracing::trace;

use crate::Handle;
use crate::Key;
use crate::Value;

#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<Key, HashMap<Value, HashSet<Handle>>>,
    // Reverse index so removal does not scan every entry
    owners: HashMap<Handle, (Key, Value)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` against `(key, value)`, creating entries as needed.
    ///
    /// A handle already registered elsewhere is moved to the new pair.
    pub fn add(
        &mut self,
        key: Key,
        value: Value,
        handle: Handle,
    ) {
        if self.owners.contains_key(&handle) {
            self.remove(&handle);
        }

        self.entries
            .entry(key.clone())
            .or_default()
            .entry(value.clone())
            .or_default()
            .insert(handle.clone());

        trace!(%handle, key_len = key.len(), value_len = value.len(), "registered");
        self.owners.insert(handle, (key, value));
    }

    /// Drops `handle` and prunes whatever it leaves empty.
    ///
    /// Returns the pair the handle pointed at, `None` for unknown handles.
    pub fn remove(
        &mut self,
        handle: &Handle,
    ) -> Option<(Key, Value)> {
        let (key, value) = self.owners.remove(handle)?;

        if let Some(values) = self.entries.get_mut(&key) {
            if let Some(handles) = values.get_mut(&value) {
                handles.remove(handle);
                if handles.is_empty() {
                    values.remove(&value);
                }
            }
            if values.is_empty() {
                self.entries.remove(&key);
            }
        }

        trace!(%handle, "unregistered");
        Some((key, value))
    }

    pub fn contains(
        &self,
        key: &Key,
        value: &Value,
    ) -> bool {
        self.entries.get(key).is_some_and(|values| values.contains_key(value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct registered pairs
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn handle_count(&self) -> usize {
        self.owners.len()
    }

    /// Every registered pair, once each
    pub fn snapshot(&self) -> Vec<(Key, Value)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.keys().map(move |value| (key.clone(), value.clone())))
            .collect()
    }

    /// Clears all registrations
    pub fn clear(&mut self) {
        self.entries.clear();
        self.owners.clear();
    }

    /// True when no key maps to an empty value map and no value to an empty handle set
    pub(crate) fn is_pruned(&self) -> bool {
        self.entries
            .values()
            .all(|values| !values.is_empty() && values.values().all(|handles| !handles.is_empty()))
    }
}
