use crate::core::{Item, ItemId, LedgerError, RecordUpdate, Result};
use crate::remote::{RemoteOp, RemoteTableClient};
use crate::storage::RecordStore;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Keeps a [`RecordStore`] in step with a remote table.
///
/// Each operation issues its remote call first and touches the store only
/// once the call has succeeded. Operations borrow the engine mutably, so a
/// store read taken before an operation cannot outlive it.
pub struct ReconciliationEngine<C> {
    client: C,
    store: RecordStore,
}

impl<C: RemoteTableClient> ReconciliationEngine<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            store: RecordStore::new(),
        }
    }

    /// Start from an already populated store.
    pub fn with_store(client: C, store: RecordStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Replace the local collection with the full remote table.
    ///
    /// Returns the number of loaded items.
    pub async fn refresh(&mut self) -> Result<usize> {
        let records = self
            .client
            .fetch_all()
            .await
            .inspect_err(|e| remote_failed(RemoteOp::FetchAll, e))?;

        let items: Vec<Item> = records.into_iter().map(Item::from).collect();
        let count = items.len();
        self.store.load(items)?;
        info!("loaded {} items from remote table", count);
        Ok(count)
    }

    /// Persist a pending item and append the server's version of it.
    pub async fn create(&mut self, pending: &Item) -> Result<Item> {
        if let Some(id) = &pending.id {
            return Err(LedgerError::InvalidArgument(format!(
                "item '{}' already has id '{}'",
                pending.item_number, id
            )));
        }

        debug!("creating item '{}'", pending.item_number);
        let record = self
            .client
            .create(pending.to_fields())
            .await
            .inspect_err(|e| remote_failed(RemoteOp::Create, e))?;

        let item = Item::from(record);
        self.store.insert(item.clone())?;
        info!("created item '{}'", item.item_number);
        Ok(item)
    }

    /// Persist a single edited item.
    pub async fn save(&mut self, item: Item) -> Result<()> {
        self.save_all(vec![item]).await
    }

    /// Persist a batch of edited items, then merge the edited values locally
    /// and re-sort.
    ///
    /// The local values are merged as sent; the server's echo is not read
    /// back. Nothing is merged unless the whole batch is accepted.
    pub async fn save_all(&mut self, edited: Vec<Item>) -> Result<()> {
        if edited.is_empty() {
            return Ok(());
        }

        let updates = self.validate_batch(&edited)?;

        debug!("saving {} items", updates.len());
        self.client
            .update(updates)
            .await
            .inspect_err(|e| remote_failed(RemoteOp::Update, e))?;

        let merged = self.store.merge_and_sort(&edited);
        info!("saved {} items", merged);
        Ok(())
    }

    /// Delete a persisted item remotely, then drop it locally.
    pub async fn delete(&mut self, item: &Item) -> Result<()> {
        let Some(id) = item.id.clone() else {
            return Err(LedgerError::InvalidArgument(format!(
                "cannot delete pending item '{}'",
                item.item_number
            )));
        };

        debug!("deleting item '{}'", id);
        self.client
            .destroy(vec![id.clone()])
            .await
            .inspect_err(|e| remote_failed(RemoteOp::Destroy, e))?;

        self.store.remove_by_id(&id);
        info!("deleted item '{}'", id);
        Ok(())
    }

    /// Delete by id, looking the item up in the store.
    pub async fn delete_by_id(&mut self, id: &ItemId) -> Result<()> {
        let item = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::InvalidState(format!("no item '{}' in store", id)))?;
        self.delete(&item).await
    }

    /// Every item needs an id, unique within the batch and present locally.
    fn validate_batch(&self, edited: &[Item]) -> Result<Vec<RecordUpdate>> {
        let mut seen = HashSet::with_capacity(edited.len());
        let mut updates = Vec::with_capacity(edited.len());

        for item in edited {
            let update = RecordUpdate::from_item(item).ok_or_else(|| {
                LedgerError::InvalidArgument(format!(
                    "cannot save pending item '{}'",
                    item.item_number
                ))
            })?;
            if !seen.insert(update.id.clone()) {
                return Err(LedgerError::InvalidArgument(format!(
                    "item '{}' appears twice in one save",
                    update.id
                )));
            }
            if !self.store.contains(&update.id) {
                return Err(LedgerError::InvalidState(format!(
                    "no item '{}' in store to save into",
                    update.id
                )));
            }
            updates.push(update);
        }

        Ok(updates)
    }
}

fn remote_failed(op: RemoteOp, err: &LedgerError) {
    warn!("remote {} failed, local store unchanged: {}", op, err);
}
