mod text_store;
mod interface;

pub use interface::LedgerStore;
pub use text_store::TextStore;
