use crate::core::{Item, ItemId, LedgerError, Result};
use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Local snapshot of the remote table.
///
/// Every mutation builds the next collection off to the side and swaps it in
/// as a whole, so a reader never sees a partially applied change. `revision`
/// increases by one per successful mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    items: Vec<Item>,
    revision: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection.
    ///
    /// Input order is kept until the next sort-triggering mutation.
    pub fn load(&mut self, items: Vec<Item>) -> Result<()> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            let id = item.id.as_ref().ok_or_else(|| {
                LedgerError::InvalidState(format!(
                    "cannot load item '{}' without an id",
                    item.item_number
                ))
            })?;
            if !seen.insert(id) {
                return Err(LedgerError::InvalidState(format!(
                    "duplicate id '{}' in loaded records",
                    id
                )));
            }
        }

        debug!("record store: loaded {} items", items.len());
        self.replace(items);
        Ok(())
    }

    /// Append a persisted item.
    pub fn insert(&mut self, item: Item) -> Result<()> {
        let Some(id) = item.id.as_ref() else {
            return Err(LedgerError::InvalidState(format!(
                "cannot insert pending item '{}' without an id",
                item.item_number
            )));
        };
        if self.contains(id) {
            return Err(LedgerError::InvalidState(format!(
                "item '{}' is already present",
                id
            )));
        }

        debug!("record store: inserting item '{}'", id);
        let mut next = Vec::with_capacity(self.items.len() + 1);
        next.extend(self.items.iter().cloned());
        next.push(item);
        self.replace(next);
        Ok(())
    }

    /// Replace existing items by id, then order by numeric item number.
    ///
    /// Inputs without a matching id in the store are skipped. Returns the
    /// number of items that were replaced.
    pub fn merge_and_sort(&mut self, updated: &[Item]) -> usize {
        let mut next = self.items.clone();
        let mut merged = 0;

        for update in updated {
            let Some(id) = update.id.as_ref() else {
                warn!(
                    "record store: ignoring pending item '{}' in merge",
                    update.item_number
                );
                continue;
            };
            match next.iter_mut().find(|existing| existing.id.as_ref() == Some(id)) {
                Some(existing) => {
                    *existing = update.clone();
                    merged += 1;
                }
                None => warn!("record store: no item '{}' to merge into, ignoring", id),
            }
        }

        sort_by_item_number(&mut next);
        debug!(
            "record store: merged {} of {} updates",
            merged,
            updated.len()
        );
        self.replace(next);
        merged
    }

    /// Remove the item with `id`. Returns `false` if it was not present.
    pub fn remove_by_id(&mut self, id: &ItemId) -> bool {
        if !self.contains(id) {
            return false;
        }

        debug!("record store: removing item '{}'", id);
        let next = self
            .items
            .iter()
            .filter(|item| item.id.as_ref() != Some(id))
            .cloned()
            .collect();
        self.replace(next);
        true
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Owned copy of the current collection.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.clone()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id.as_ref() == Some(id))
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Items claimed by `bidder`, in store order.
    pub fn select_by_bidder(&self, bidder: i64) -> Vec<Item> {
        crate::checkout::select_by_bidder(&self.items, bidder)
    }

    fn replace(&mut self, items: Vec<Item>) {
        self.items = items;
        self.revision += 1;
    }
}

/// Stable ascending sort on the numeric item number; labels that are not
/// numbers go last, keeping their relative order.
fn sort_by_item_number(items: &mut [Item]) {
    items.sort_by(|a, b| match (a.sort_key(), b.sort_key()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
