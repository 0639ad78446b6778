mod core;
pub mod backend;
pub mod config;
pub mod shell;

pub use crate::core::{Entry, EntryChanges, SearchCriteria, Ledger, Categories, Report};
pub use crate::core::{Amount, ParseError, LedgerError, LedgerResult};
pub use crate::core::{entry, error, ledger};
pub use crate::config::WalletConfig;
pub use crate::shell::Shell;
