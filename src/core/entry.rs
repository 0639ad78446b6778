use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use colored::Colorize;

use crate::core::error::ParseError;

pub type Amount = i64;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
const DELIMITER: char = ',';

/// One line of the ledger.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Entry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Amount,
    pub description: String
}

impl Entry {
    /// Builds an entry from raw text fields.
    ///
    /// This is the only place text becomes an entry: lines read back from the
    /// ledger file and values typed at the prompt both go through here.
    pub fn from_fields(date: &str, category: &str, amount: &str, description: &str) -> Result<Entry, ParseError> {
        Ok(Entry {
            date: parse_date(date)?,
            category: parse_text("category", category)?,
            amount: parse_amount(amount)?,
            description: parse_text("description", description)?
        })
    }

    /// The entry as a ledger file line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}{sep}{}{sep}{}{sep}{}",
            self.date.format(DATE_FORMAT), self.category, self.amount, self.description,
            sep = DELIMITER)
    }
}

impl FromStr for Entry {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        match fields[..] {
            [date, category, amount, description] => Entry::from_fields(date, category, amount, description),
            _ => Err(ParseError::FieldCount(fields.len()))
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}, {}: {}, {}: {}, {}: {}",
            "Date".bold(), self.date.format(DATE_FORMAT),
            "Category".bold(), self.category,
            "Amount".bold(), self.amount,
            "Description".bold(), self.description)
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ParseError::Date(value.to_owned()))
}

pub fn parse_amount(value: &str) -> Result<Amount, ParseError> {
    value.trim().parse::<Amount>()
        .map_err(|_| ParseError::Amount(value.to_owned()))
}

pub fn parse_index(value: &str) -> Result<usize, ParseError> {
    value.trim().parse::<usize>()
        .map_err(|_| ParseError::Index(value.to_owned()))
}

fn parse_text(field: &'static str, value: &str) -> Result<String, ParseError> {
    if value.contains(|c: char| c == DELIMITER || c == '\n' || c == '\r') {
        return Err(ParseError::Delimiter { field });
    }
    return Ok(value.to_owned());
}

/// Treats an empty answer the same as no answer.
fn provided(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Field replacements for an existing entry. `None` keeps the current value.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct EntryChanges {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub amount: Option<Amount>,
    pub description: Option<String>
}

impl EntryChanges {
    /// Parses the given fields with the same rules as [`Entry::from_fields`].
    /// Empty strings count as not given.
    pub fn parse(date: Option<&str>, category: Option<&str>, amount: Option<&str>, description: Option<&str>) -> Result<EntryChanges, ParseError> {
        Ok(EntryChanges {
            date: provided(date).map(parse_date).transpose()?,
            category: provided(category).map(|v| parse_text("category", v)).transpose()?,
            amount: provided(amount).map(parse_amount).transpose()?,
            description: provided(description).map(|v| parse_text("description", v)).transpose()?
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == EntryChanges::default()
    }

    pub fn apply(self, entry: &mut Entry) {
        if let Some(date) = self.date {
            entry.date = date;
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(amount) = self.amount {
            entry.amount = amount;
        }
        if let Some(description) = self.description {
            entry.description = description;
        }
    }
}

/// Search terms. An entry matches when any one of the set terms matches it.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct SearchCriteria {
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Amount>
}

impl SearchCriteria {
    pub fn parse(category: Option<&str>, date: Option<&str>, amount: Option<&str>) -> Result<SearchCriteria, ParseError> {
        Ok(SearchCriteria {
            category: provided(category).map(str::to_owned),
            date: provided(date).map(parse_date).transpose()?,
            amount: provided(amount).map(parse_amount).transpose()?
        })
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        self.category.as_ref().map_or(false, |c| *c == entry.category)
            || self.date.map_or(false, |d| d == entry.date)
            || self.amount.map_or(false, |a| a == entry.amount)
    }
}
