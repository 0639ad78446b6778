pub mod entry;
pub mod error;
pub mod ledger;

pub use entry::{Entry, EntryChanges, SearchCriteria, Amount};
pub use error::{ParseError, LedgerError, LedgerResult};
pub use ledger::{Ledger, Categories, Report};
