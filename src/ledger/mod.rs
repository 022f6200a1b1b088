//! Ledger store and the shared handle sessions hold it through.

pub mod store;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use store::LedgerStore;

/// Single-writer handle to a session's ledger. Holding the lock for the
/// whole of `apply_transfer` serialises concurrent submissions.
pub type SharedLedger = Arc<Mutex<LedgerStore>>;

pub fn shared(store: LedgerStore) -> SharedLedger {
    Arc::new(Mutex::new(store))
}
