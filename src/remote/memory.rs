use super::{RemoteOp, RemoteTableClient};
use crate::core::{ItemFields, ItemId, LedgerError, RawRecord, RecordFields, RecordUpdate, Result};
use async_trait::async_trait;
use log::debug;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// A remote table held in memory.
///
/// Ids are assigned as `rec1`, `rec2`, ..., skipping any already held by a
/// seeded record. Writes that reference an unknown
/// id are rejected as a whole. Failures can be injected per operation.
#[derive(Debug, Default)]
pub struct InMemoryTable {
    state: Mutex<TableState>,
}

#[derive(Debug, Default)]
struct TableState {
    records: Vec<RawRecord>,
    next_id: u64,
    offline: bool,
    fail_next: HashSet<RemoteOp>,
    calls: HashMap<RemoteOp, usize>,
}

impl TableState {
    /// Count the call and decide whether it should fail.
    fn begin(&mut self, op: RemoteOp) -> Result<()> {
        *self.calls.entry(op).or_insert(0) += 1;
        if self.offline {
            return Err(LedgerError::RemoteCallFailure(format!(
                "{}: remote table is offline",
                op
            )));
        }
        if self.fail_next.remove(&op) {
            return Err(LedgerError::RemoteCallFailure(format!(
                "{}: injected failure",
                op
            )));
        }
        Ok(())
    }

    /// Next `rec<n>` id not already held by a record.
    fn fresh_id(&mut self) -> ItemId {
        loop {
            self.next_id += 1;
            let id = ItemId::new(format!("rec{}", self.next_id));
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    fn position(&self, id: &ItemId) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    fn ensure_known(&self, op: RemoteOp, ids: &[&ItemId]) -> Result<()> {
        match ids.iter().find(|id| self.position(id).is_none()) {
            Some(missing) => Err(LedgerError::RemoteCallFailure(format!(
                "{}: record '{}' does not exist",
                op, missing
            ))),
            None => Ok(()),
        }
    }
}

impl InMemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the table with existing records.
    pub fn with_records(records: Vec<RawRecord>) -> Self {
        Self {
            state: Mutex::new(TableState {
                records,
                ..TableState::default()
            }),
        }
    }

    /// Make the next call of `op` fail.
    pub async fn fail_next(&self, op: RemoteOp) {
        self.state.lock().await.fail_next.insert(op);
    }

    /// Fail every call while offline.
    pub async fn set_offline(&self, offline: bool) {
        self.state.lock().await.offline = offline;
    }

    /// Number of calls made for `op`, including failed ones.
    pub async fn calls(&self, op: RemoteOp) -> usize {
        self.state.lock().await.calls.get(&op).copied().unwrap_or(0)
    }

    pub async fn total_calls(&self) -> usize {
        self.state.lock().await.calls.values().sum()
    }

    /// Current remote contents.
    pub async fn records(&self) -> Vec<RawRecord> {
        self.state.lock().await.records.clone()
    }
}

#[async_trait]
impl RemoteTableClient for InMemoryTable {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>> {
        let mut state = self.state.lock().await;
        state.begin(RemoteOp::FetchAll)?;
        Ok(state.records.clone())
    }

    async fn create(&self, fields: ItemFields) -> Result<RawRecord> {
        let mut state = self.state.lock().await;
        state.begin(RemoteOp::Create)?;

        let id = state.fresh_id();
        let mut fields = RecordFields::from(fields);
        fields.paid = Some(false);
        let record = RawRecord::new(id, fields);
        debug!("in-memory table: created '{}'", record.id);

        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, updates: Vec<RecordUpdate>) -> Result<Vec<RawRecord>> {
        let mut state = self.state.lock().await;
        state.begin(RemoteOp::Update)?;

        let ids: Vec<&ItemId> = updates.iter().map(|update| &update.id).collect();
        state.ensure_known(RemoteOp::Update, &ids)?;

        let mut updated = Vec::with_capacity(updates.len());
        for RecordUpdate { id, fields } in updates {
            let Some(index) = state.position(&id) else {
                continue;
            };
            let current = &mut state.records[index].fields;
            if fields.bid_number.is_some() {
                current.bid_number = fields.bid_number;
            }
            if fields.item_number.is_some() {
                current.item_number = fields.item_number;
            }
            if fields.item_description.is_some() {
                current.item_description = fields.item_description;
            }
            if fields.paid.is_some() {
                current.paid = fields.paid;
            }
            current.price = fields.price;
            updated.push(state.records[index].clone());
        }

        debug!("in-memory table: updated {} records", updated.len());
        Ok(updated)
    }

    async fn destroy(&self, ids: Vec<ItemId>) -> Result<()> {
        let mut state = self.state.lock().await;
        state.begin(RemoteOp::Destroy)?;

        let refs: Vec<&ItemId> = ids.iter().collect();
        state.ensure_known(RemoteOp::Destroy, &refs)?;

        state.records.retain(|record| !ids.contains(&record.id));
        debug!("in-memory table: destroyed {} records", ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Item;

    fn lamp() -> ItemFields {
        Item::pending(1, "2", "Lamp", Some(20.0)).to_fields()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let table = InMemoryTable::new();
        let first = table.create(lamp()).await.unwrap();
        let second = table.create(lamp()).await.unwrap();

        assert_eq!(first.id, ItemId::new("rec1"));
        assert_eq!(second.id, ItemId::new("rec2"));
        assert_eq!(first.fields.paid, Some(false));
        assert_eq!(table.calls(RemoteOp::Create).await, 2);
    }

    #[tokio::test]
    async fn test_create_skips_ids_held_by_seeded_records() {
        let seeded = RawRecord::new("rec2", RecordFields::from(lamp()));
        let table = InMemoryTable::with_records(vec![seeded.clone()]);

        let first = table.create(lamp()).await.unwrap();
        let second = table.create(lamp()).await.unwrap();

        assert_eq!(first.id, ItemId::new("rec1"));
        assert_eq!(second.id, ItemId::new("rec3"));
        let ids: Vec<ItemId> = table.records().await.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![seeded.id, first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_with_unknown_id_applies_nothing() {
        let table = InMemoryTable::new();
        let created = table.create(lamp()).await.unwrap();

        let mut changed = Item::from(created.clone());
        changed.paid = true;
        let ghost = Item::pending(1, "3", "Ghost", None).with_id("nope");

        let result = table
            .update(vec![
                RecordUpdate::from_item(&changed).unwrap(),
                RecordUpdate::from_item(&ghost).unwrap(),
            ])
            .await;

        assert!(matches!(result, Err(LedgerError::RemoteCallFailure(_))));
        assert_eq!(table.records().await, vec![created]);
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let table = InMemoryTable::new();
        table.fail_next(RemoteOp::FetchAll).await;

        assert!(table.fetch_all().await.is_err());
        assert!(table.fetch_all().await.is_ok());
        assert_eq!(table.calls(RemoteOp::FetchAll).await, 2);
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let table = InMemoryTable::new();
        table.set_offline(true).await;

        assert!(table.create(lamp()).await.is_err());
        assert!(table.destroy(vec![ItemId::new("rec1")]).await.is_err());
        assert!(table.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_destroy_removes_records() {
        let table = InMemoryTable::new();
        let a = table.create(lamp()).await.unwrap();
        let b = table.create(lamp()).await.unwrap();

        table.destroy(vec![a.id.clone()]).await.unwrap();
        assert_eq!(table.records().await, vec![b]);
        assert!(table.destroy(vec![a.id]).await.is_err());
    }
}
