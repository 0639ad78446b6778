use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::backend::LedgerStore;
use crate::core::entry::{Entry, EntryChanges, SearchCriteria, Amount};
use crate::core::error::{LedgerError, LedgerResult};

/// The two category labels that count towards the balance.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Categories {
    pub income: String,
    pub expense: String
}

impl Default for Categories {
    fn default() -> Self {
        Categories { income: "Income".to_string(), expense: "Expense".to_string() }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Report {
    pub income: Amount,
    pub expense: Amount,
    pub balance: Amount
}

/// All ledger entries, held in memory in file order.
///
/// Every mutation is written through to the store before returning,
/// so the entries always mirror what the store last saved.
pub struct Ledger<S: LedgerStore> {
    store: S,
    entries: Vec<Entry>,
    categories: Categories
}

impl<S: LedgerStore> Ledger<S> {
    pub fn open(store: S, categories: Categories) -> LedgerResult<Ledger<S>> {
        let entries = store.read()?;
        debug!("opened ledger with {} entries", entries.len());
        return Ok(Ledger { store, entries, categories });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn get(&self, index: usize) -> LedgerResult<&Entry> {
        self.entries.get(index)
            .ok_or(LedgerError::IndexOutOfRange(index))
    }

    pub fn persist(&self) -> LedgerResult<()> {
        self.store.save(&self.entries)
    }

    /// Parses the fields into a new entry, appends it and saves.
    pub fn add(&mut self, date: &str, category: &str, amount: &str, description: &str) -> LedgerResult<&Entry> {
        let entry = Entry::from_fields(date, category, amount, description)?;
        self.push(entry)
    }

    fn push(&mut self, entry: Entry) -> LedgerResult<&Entry> {
        info!("adding entry {}", entry.to_line());
        self.entries.push(entry);
        self.persist()?;
        return Ok(&self.entries[self.entries.len() - 1]);
    }

    /// Applies `changes` to the entry at `index` and saves, even if there are no changes.
    ///
    /// An index past the end is ignored without saving and gives `None`.
    pub fn edit(&mut self, index: usize, changes: EntryChanges) -> LedgerResult<Option<&Entry>> {
        let entry = match self.entries.get_mut(index) {
            Some(entry) => entry,
            None => {
                debug!("ignoring edit of missing entry {}", index);
                return Ok(None);
            }
        };
        changes.apply(entry);
        info!("entry {} is now {}", index, entry.to_line());

        self.persist()?;
        return Ok(Some(&self.entries[index]));
    }

    /// Entries matching any of the set criteria, with their positions.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<(usize, &Entry)> {
        self.entries.iter().enumerate()
            .filter(|(_, entry)| criteria.matches(entry))
            .collect()
    }

    fn total(&self, category: &str) -> Option<Amount> {
        self.entries.iter()
            .filter(|entry| entry.category == category)
            .try_fold(0 as Amount, |sum, entry| sum.checked_add(entry.amount))
    }

    pub fn balance(&self) -> LedgerResult<Amount> {
        Ok(self.report()?.balance)
    }

    /// Income and expense totals and their difference.
    /// Fails rather than wrapping when a sum leaves the `Amount` range.
    pub fn report(&self) -> LedgerResult<Report> {
        let income = self.total(&self.categories.income)
            .ok_or(LedgerError::Overflow("income"))?;
        let expense = self.total(&self.categories.expense)
            .ok_or(LedgerError::Overflow("expense"))?;
        let balance = income.checked_sub(expense)
            .ok_or(LedgerError::Overflow("balance"))?;
        return Ok(Report { income, expense, balance });
    }
}
