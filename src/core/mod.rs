pub mod error;
pub mod item;

pub use error::{LedgerError, Result};
pub use item::{Item, ItemFields, ItemId, RawRecord, RecordFields, RecordUpdate};
