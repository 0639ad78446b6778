use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{self, Context};
use colored::Colorize;

use crate::backend::LedgerStore;
use crate::core::{Ledger, LedgerError, ParseError, EntryChanges, SearchCriteria};
use crate::core::entry::parse_index;

/// Raised when input runs out in the middle of a prompt.
#[derive(Debug)]
struct EndOfInput;

impl fmt::Display for EndOfInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "end of input")
    }
}

impl std::error::Error for EndOfInput {}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Choice {
    Add,
    Edit,
    Search,
    Report,
    Exit
}

impl Choice {
    /// Menu lines, numbered from 1 in this order.
    const MENU: [(Choice, &'static str); 5] = [
        (Choice::Add, "Add entry"),
        (Choice::Edit, "Edit entry"),
        (Choice::Search, "Search entries"),
        (Choice::Report, "Print balance"),
        (Choice::Exit, "Exit"),
    ];

    fn parse(answer: &str) -> Option<Choice> {
        let number = answer.trim().parse::<usize>().ok()?;
        Choice::MENU.get(number.checked_sub(1)?)
            .map(|(choice, _)| *choice)
    }
}

/// Mistakes in what the user typed, or totals out of range. These are shown
/// and the menu comes back; anything else ends the session.
fn is_reported(err: &anyhow::Error) -> bool {
    err.is::<ParseError>() || matches!(err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Parse(_)) | Some(LedgerError::IndexOutOfRange(_)) | Some(LedgerError::Overflow(_)))
}

/// Text menu over a ledger, reading one line per prompt.
pub struct Shell<'a, S: LedgerStore, R: BufRead, W: Write> {
    ledger: &'a mut Ledger<S>,
    input: R,
    output: W
}

impl<'a, S: LedgerStore, R: BufRead, W: Write> Shell<'a, S, R, W> {
    pub fn new(ledger: &'a mut Ledger<S>, input: R, output: W) -> Self {
        Shell { ledger, input, output }
    }

    /// Runs until the user picks exit or input ends.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let outcome = match self.next_choice() {
                Ok(Some(Choice::Exit)) => return Ok(()),
                Ok(Some(Choice::Add)) => self.add(),
                Ok(Some(Choice::Edit)) => self.edit(),
                Ok(Some(Choice::Search)) => self.search(),
                Ok(Some(Choice::Report)) => self.report(),
                // unknown choices just show the menu again
                Ok(None) => continue,
                Err(err) => Err(err)
            };

            match outcome {
                Ok(()) => (),
                Err(err) if err.is::<EndOfInput>() => return Ok(()),
                Err(err) if is_reported(&err) => {
                    writeln!(self.output, "{} {}", "Error:".bright_red(), err)?;
                },
                Err(err) => return Err(err)
            }
        }
    }

    fn next_choice(&mut self) -> anyhow::Result<Option<Choice>> {
        for (number, (_, label)) in Choice::MENU.iter().enumerate() {
            writeln!(self.output, "{}. {}", number + 1, label)?;
        }
        let answer = self.prompt("Choose an option: ")?;
        return Ok(Choice::parse(&answer));
    }

    fn prompt(&mut self, question: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)
            .with_context(|| "failed to read input")?;
        if read == 0 {
            return Err(EndOfInput.into());
        }
        return Ok(line.trim_end_matches(&['\r', '\n'][..]).to_owned());
    }

    fn category_hint(&self) -> String {
        let categories = self.ledger.categories();
        format!("{}/{}", categories.income, categories.expense)
    }

    fn add(&mut self) -> anyhow::Result<()> {
        let hint = self.category_hint();
        let date = self.prompt("Enter date (YYYY-MM-DD): ")?;
        let category = self.prompt(&format!("Enter category ({}): ", hint))?;
        let amount = self.prompt("Enter amount: ")?;
        let description = self.prompt("Enter description: ")?;

        let entry = self.ledger.add(&date, &category, &amount, &description)?.to_owned();
        let index = self.ledger.len() - 1;
        writeln!(self.output, "Added [{}] {}", index, entry)?;
        return Ok(());
    }

    fn edit(&mut self) -> anyhow::Result<()> {
        let index = parse_index(&self.prompt("Enter entry index: ")?)?;
        let current = self.ledger.get(index)?.to_owned();
        writeln!(self.output, "Editing [{}] {}", index, current)?;

        let hint = self.category_hint();
        let date = self.prompt("Enter new date (YYYY-MM-DD) or leave blank: ")?;
        let category = self.prompt(&format!("Enter new category ({}) or leave blank: ", hint))?;
        let amount = self.prompt("Enter new amount or leave blank: ")?;
        let description = self.prompt("Enter new description or leave blank: ")?;

        let changes = EntryChanges::parse(Some(&date), Some(&category), Some(&amount), Some(&description))?;
        if let Some(entry) = self.ledger.edit(index, changes)? {
            let entry = entry.to_owned();
            writeln!(self.output, "Updated [{}] {}", index, entry)?;
        }
        return Ok(());
    }

    fn search(&mut self) -> anyhow::Result<()> {
        let hint = self.category_hint();
        let category = self.prompt(&format!("Enter category ({}) or leave blank: ", hint))?;
        let date = self.prompt("Enter date (YYYY-MM-DD) or leave blank: ")?;
        let amount = self.prompt("Enter amount or leave blank: ")?;

        let criteria = SearchCriteria::parse(Some(&category), Some(&date), Some(&amount))?;
        let found = self.ledger.search(&criteria);
        if found.is_empty() {
            writeln!(self.output, "No matching entries.")?;
        }
        for (index, entry) in found {
            writeln!(self.output, "[{}] {}", index, entry)?;
        }
        return Ok(());
    }

    fn report(&mut self) -> anyhow::Result<()> {
        let report = self.ledger.report()?;
        let balance = format!("{}", report.balance);
        let balance = if report.balance < 0 {
            balance.bright_red()
        } else if report.balance > 0 {
            balance.green()
        } else {
            balance.normal()
        };

        writeln!(self.output, "Current balance: {}", balance)?;
        writeln!(self.output, "Income: {}", report.income)?;
        writeln!(self.output, "Expense: {}", report.expense)?;
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use crate::core::{Categories, Ledger};
    use crate::core::ledger::tests::{MemoryStore, store_with};
    use crate::shell::{Choice, Shell};

    use std::io::Cursor;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        colored::control::set_override(false);
        store_with(&["2024-01-01,Income,1000,salary", "2024-01-05,Expense,200,food"])
    }

    /// Feeds `input` to a shell over `store` and returns everything it printed.
    fn session(store: &MemoryStore, input: &str) -> String {
        let mut ledger = Ledger::open(store.clone(), Categories::default()).unwrap();
        let mut output = Vec::new();
        Shell::new(&mut ledger, Cursor::new(input.as_bytes()), &mut output).run().unwrap();
        String::from_utf8(output).unwrap()
    }

    fn lines(store: &MemoryStore) -> Vec<String> {
        store.entries.borrow().iter().map(|entry| entry.to_line()).collect()
    }

    #[rstest]
    fn exit_right_away(store: MemoryStore) {
        let output = session(&store, "5\n");
        assert_eq!(output, "1. Add entry\n2. Edit entry\n3. Search entries\n4. Print balance\n5. Exit\nChoose an option: ");
        assert_eq!(store.saves.get(), 0);
    }

    #[rstest]
    fn end_of_input_exits(store: MemoryStore) {
        session(&store, "");
        session(&store, "1\n2024-03-01\n");
        assert_eq!(store.saves.get(), 0);
    }

    #[rstest]
    fn unknown_choice_shows_menu_again(store: MemoryStore) {
        let output = session(&store, "9\nhello\n5\n");
        assert_eq!(output.matches("Choose an option: ").count(), 3);
        assert!(!output.contains("Error"));
    }

    #[rstest]
    fn report_balance(store: MemoryStore) {
        let output = session(&store, "4\n5\n");
        assert!(output.contains("Current balance: 800\nIncome: 1000\nExpense: 200\n"));
    }

    #[test]
    fn balance_out_of_range_is_reported() {
        colored::control::set_override(false);
        let store = store_with(&["2024-01-01,Income,9223372036854775807,a", "2024-01-02,Income,1,b"]);

        let output = session(&store, "4\n5\n");

        assert!(output.contains("Error: income total is too large to compute\n"));
        assert!(!output.contains("Current balance"));
        assert_eq!(output.matches("Choose an option: ").count(), 2);
    }

    #[rstest]
    #[case("1", Some(Choice::Add))]
    #[case(" 4 ", Some(Choice::Report))]
    #[case("5", Some(Choice::Exit))]
    #[case("0", None)]
    #[case("6", None)]
    #[case("add", None)]
    fn menu_choices(#[case] answer: &str, #[case] expected: Option<Choice>) {
        assert_eq!(Choice::parse(answer), expected);
    }

    #[rstest]
    fn add_entry(store: MemoryStore) {
        let output = session(&store, "1\n2024-02-01\nIncome\n500\nbonus\n4\n5\n");

        assert!(output.contains("Added [2] Date: 2024-02-01, Category: Income, Amount: 500, Description: bonus\n"));
        assert!(output.contains("Current balance: 1300\n"));
        assert_eq!(lines(&store).last().unwrap(), "2024-02-01,Income,500,bonus");
    }

    #[rstest]
    fn bad_amount_is_reported(store: MemoryStore) {
        let output = session(&store, "1\n2024-02-01\nIncome\nfive hundred\nbonus\n5\n");

        assert!(output.contains("Error: invalid amount \"five hundred\", expected a whole number\n"));
        assert_eq!(store.saves.get(), 0);
        // the menu came back after the error
        assert_eq!(output.matches("Choose an option: ").count(), 2);
    }

    #[rstest]
    fn edit_entry(store: MemoryStore) {
        let output = session(&store, "2\n0\n\n\n1200\n\n4\n5\n");

        assert!(output.contains("Editing [0] Date: 2024-01-01, Category: Income, Amount: 1000, Description: salary\n"));
        assert!(output.contains("Updated [0] Date: 2024-01-01, Category: Income, Amount: 1200, Description: salary\n"));
        assert!(output.contains("Current balance: 1000\n"));
        assert_eq!(lines(&store), vec!["2024-01-01,Income,1200,salary", "2024-01-05,Expense,200,food"]);
    }

    #[rstest]
    fn edit_missing_index_is_reported(store: MemoryStore) {
        let output = session(&store, "2\n7\n5\n");

        assert!(output.contains("Error: no entry at index 7\n"));
        assert!(!output.contains("Enter new date"));
        assert_eq!(store.saves.get(), 0);
    }

    #[rstest]
    fn edit_bad_index_is_reported(store: MemoryStore) {
        let output = session(&store, "2\n-1\n5\n");
        assert!(output.contains("Error: invalid entry index \"-1\"\n"));
    }

    #[rstest]
    fn search_entries(store: MemoryStore) {
        let output = session(&store, "3\nExpense\n\n1000\n5\n");

        assert!(output.contains("[0] Date: 2024-01-01, Category: Income, Amount: 1000, Description: salary\n"));
        assert!(output.contains("[1] Date: 2024-01-05, Category: Expense, Amount: 200, Description: food\n"));
    }

    #[rstest]
    fn search_without_criteria(store: MemoryStore) {
        let output = session(&store, "3\n\n\n\n5\n");
        assert!(output.contains("No matching entries.\n"));
    }
}
