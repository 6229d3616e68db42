pub mod reconciler;

pub use reconciler::ReconciliationEngine;
