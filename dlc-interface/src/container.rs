use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::{
    entry::{canonical_name, Entry},
    Error, Result,
};

/// A shared map from canonical entry name to entry.
///
/// Cloning the container clones the handle, not the entries. Adding an
/// entry under a name that already exists appends its domains to the
/// existing entry instead of replacing it, so several input steps can
/// contribute to the same named list. Entries handed out are snapshots:
/// a later merge replaces the stored `Arc` without mutating what readers
/// already hold.
#[derive(Debug, Clone, Default)]
pub struct Container {
    entries: Arc<RwLock<HashMap<String, Arc<Entry>>>>,
}

impl Container {
    pub fn new() -> Container {
        Container::default()
    }

    /// Insert or merge an entry. Fails if the canonical name is empty.
    pub fn add(&self, entry: Entry) -> Result<()> {
        let name = canonical_name(entry.name());
        if name.is_empty() {
            return Err(Error::EmptyEntry);
        }

        let mut entries = self.entries.write();
        match entries.get_mut(&name) {
            Some(existing) => {
                Arc::make_mut(existing).add_domains(entry.into_domains());
            }
            None => {
                entries.insert(name, Arc::new(entry));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Entry>> {
        self.entries.read().get(&canonical_name(name)).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.read().contains_key(&canonical_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All entry names, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Snapshot of all entries, in no particular order. The read lock is
    /// held only while the snapshot is built.
    pub fn entries(&self) -> Vec<Arc<Entry>> {
        self.entries.read().values().cloned().collect()
    }
}
