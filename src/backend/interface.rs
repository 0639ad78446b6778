use crate::core::{Entry, LedgerResult};

/// Persistence for the full, ordered list of ledger entries.
pub trait LedgerStore {
    /// Reads every entry. A store that has never been written is empty.
    fn read(&self) -> LedgerResult<Vec<Entry>>;
    /// Replaces the stored entries with `entries`.
    fn save(&self, entries: &[Entry]) -> LedgerResult<()>;
}
