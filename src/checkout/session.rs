use crate::core::{Item, ItemId, Result};
use crate::engine::ReconciliationEngine;
use crate::remote::RemoteTableClient;
use crate::storage::RecordStore;
use log::debug;

/// A bidder's items, held locally while `paid` flags are toggled.
///
/// Toggles stay local until [`CheckoutSession::commit`], which saves the
/// whole subset through the engine's batch save.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    bidder: i64,
    items: Vec<Item>,
}

impl CheckoutSession {
    /// Copy the bidder's items out of the store.
    pub fn open(store: &RecordStore, bidder: i64) -> Self {
        let items = store.select_by_bidder(bidder);
        debug!("checkout for bidder {}: {} items", bidder, items.len());
        Self { bidder, items }
    }

    pub fn bidder(&self) -> i64 {
        self.bidder
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Set `paid` on one item. Returns `false` if the id is not in this checkout.
    pub fn toggle_paid(&mut self, id: &ItemId, paid: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id.as_ref() == Some(id)) {
            Some(item) => {
                item.paid = paid;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_paid(&mut self) {
        for item in &mut self.items {
            item.paid = true;
        }
    }

    pub fn total_due(&self) -> f64 {
        super::total_due(&self.items)
    }

    /// Persist the subset. On failure the session keeps its local toggles so
    /// the commit can be attempted again.
    pub async fn commit<C: RemoteTableClient>(
        &self,
        engine: &mut ReconciliationEngine<C>,
    ) -> Result<()> {
        engine.save_all(self.items.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        let mut store = RecordStore::new();
        store
            .load(vec![
                Item::pending(7, "1", "Lamp", Some(10.0)).with_id("r1"),
                Item::pending(9, "2", "Vase", Some(4.0)).with_id("r2"),
                Item::pending(7, "3", "Rug", Some(6.0)).with_id("r3"),
            ])
            .unwrap();
        store
    }

    #[test]
    fn test_toggle_is_local_to_session() {
        let store = store();
        let mut session = CheckoutSession::open(&store, 7);
        assert_eq!(session.total_due(), 16.0);

        assert!(session.toggle_paid(&ItemId::new("r1"), true));
        assert_eq!(session.total_due(), 6.0);
        assert!(!store.get(&ItemId::new("r1")).unwrap().paid);

        assert!(!session.toggle_paid(&ItemId::new("r2"), true));
    }

    #[test]
    fn test_mark_all_paid_and_empty_session() {
        let store = store();
        let mut session = CheckoutSession::open(&store, 7);
        session.mark_all_paid();
        assert_eq!(session.total_due(), 0.0);

        let empty = CheckoutSession::open(&store, 42);
        assert!(empty.is_empty());
        assert_eq!(empty.bidder(), 42);
    }
}
