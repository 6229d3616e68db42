// ============================================================================
// bidbook Library
// ============================================================================

pub mod checkout;
pub mod core;
pub mod engine;
pub mod remote;
pub mod storage;
pub mod view;

// Re-export main types for convenience
pub use checkout::{CheckoutSession, select_by_bidder, total_due};
pub use crate::core::{Item, ItemFields, ItemId, LedgerError, RawRecord, RecordFields, RecordUpdate, Result};
pub use engine::ReconciliationEngine;
pub use remote::{HttpTableClient, InMemoryTable, RemoteConfig, RemoteOp, RemoteTableClient};
pub use storage::RecordStore;

// ============================================================================
// Hosted table entry point
// ============================================================================

/// Engine bound to the hosted table over HTTP.
pub type Ledger = ReconciliationEngine<HttpTableClient>;

impl Ledger {
    /// Connect to the hosted table and load every record
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bidbook::{Ledger, RemoteConfig};
    ///
    /// # async fn run() -> bidbook::Result<()> {
    /// let config = RemoteConfig::new("key", "app1gjuCkFPG0GFrC");
    /// let ledger = Ledger::connect(config).await?;
    /// println!("{} items", ledger.store().len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: RemoteConfig) -> Result<Self> {
        let client = HttpTableClient::new(config)?;
        let mut ledger = Self::new(client);
        ledger.refresh().await?;
        Ok(ledger)
    }
}
