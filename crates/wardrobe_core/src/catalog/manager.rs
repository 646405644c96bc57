//! In-memory catalog manager.

use crate::model::garment::{GarmentEntry, GarmentId};
use log::{debug, info, warn};
use std::collections::HashSet;

/// A committed catalog mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    /// Entries added at the end, in display order.
    Appended { ids: Vec<GarmentId> },
    Removed { id: GarmentId },
    Relabeled { id: GarmentId },
}

/// Receives a notification after each catalog mutation.
///
/// `revision` increases by one per notified mutation, so observers can
/// detect missed or stale renders.
pub trait CatalogObserver: Send {
    fn on_catalog_changed(&mut self, revision: u64, change: &CatalogChange);
}

/// Handle returned by [`Catalog::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Sole owner of the garment collection.
#[derive(Default)]
pub struct Catalog {
    entries: Vec<GarmentEntry>,
    ids: HashSet<GarmentId>,
    revision: u64,
    observers: Vec<(SubscriptionId, Box<dyn CatalogObserver>)>,
    next_subscription: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer notified after every mutation.
    pub fn subscribe(&mut self, observer: Box<dyn CatalogObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Drops a registered observer. Returns whether it was still registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Appends entries at the end, keeping their relative order.
    ///
    /// Empty input is a no-op. An entry whose id is already present is
    /// skipped so the uniqueness invariant holds even for misbehaving callers.
    pub fn append(&mut self, entries: Vec<GarmentEntry>) {
        if entries.is_empty() {
            return;
        }

        let mut appended = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = entry.id();
            if !self.ids.insert(id) {
                warn!("event=catalog_append module=catalog status=skipped reason=duplicate_id id={id}");
                continue;
            }
            self.entries.push(entry);
            appended.push(id);
        }

        if appended.is_empty() {
            return;
        }
        info!(
            "event=catalog_append module=catalog status=ok count={} total={}",
            appended.len(),
            self.entries.len()
        );
        self.notify(CatalogChange::Appended { ids: appended });
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    ///
    /// Unknown ids are a no-op, so repeated deletes are safe.
    pub fn remove(&mut self, id: GarmentId) -> bool {
        if !self.ids.remove(&id) {
            debug!("event=catalog_remove module=catalog status=noop id={id}");
            return false;
        }
        self.entries.retain(|entry| entry.id() != id);
        info!(
            "event=catalog_remove module=catalog status=ok id={id} total={}",
            self.entries.len()
        );
        self.notify(CatalogChange::Removed { id });
        true
    }

    /// Changes the label of one entry. Returns whether the entry exists.
    pub fn relabel(&mut self, id: GarmentId, label: impl Into<String>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id() == id) else {
            return false;
        };
        entry.set_label(label);
        self.notify(CatalogChange::Relabeled { id });
        true
    }

    /// Current entries in display order.
    pub fn list(&self) -> &[GarmentEntry] {
        &self.entries
    }

    /// Owned copy of the current entries.
    pub fn snapshot(&self) -> Vec<GarmentEntry> {
        self.entries.clone()
    }

    pub fn get(&self, id: GarmentId) -> Option<&GarmentEntry> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn contains(&self, id: GarmentId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of notified mutations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn notify(&mut self, change: CatalogChange) {
        self.revision += 1;
        for (_, observer) in &mut self.observers {
            observer.on_catalog_changed(self.revision, &change);
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("entries", &self.entries)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}
