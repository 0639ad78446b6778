use std::{fs, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};

use crate::core::Categories;

pub const DEFAULT_LEDGER_PATH: &str = "wallet.txt";

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalletConfig {
    pub ledger_path: PathBuf,
    pub categories: Categories
}

impl Default for WalletConfig {
    fn default() -> Self {
        WalletConfig {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            categories: Categories::default()
        }
    }
}

impl WalletConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        return WalletConfig::parse(&file_content);
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str(content)
            .with_context(|| "failed to parse config file")?;
        return Ok(config);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = WalletConfig::parse("").unwrap();
        assert_eq!(config, WalletConfig::default());
        assert_eq!(config.ledger_path, PathBuf::from("wallet.txt"));
        assert_eq!(config.categories.income, "Income");
        assert_eq!(config.categories.expense, "Expense");
    }

    #[test]
    fn full_config() {
        let config = WalletConfig::parse(r#"
            ledger_path = "/tmp/books/wallet.txt"

            [categories]
            income = "Доход"
            expense = "Расход"
        "#).unwrap();

        assert_eq!(config.ledger_path, PathBuf::from("/tmp/books/wallet.txt"));
        assert_eq!(config.categories.income, "Доход");
        assert_eq!(config.categories.expense, "Расход");
    }

    #[test]
    fn partial_categories_keep_other_default() {
        let config = WalletConfig::parse("[categories]\nincome = \"Salary\"\n").unwrap();
        assert_eq!(config.categories.income, "Salary");
        assert_eq!(config.categories.expense, "Expense");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WalletConfig::parse("ledger = \"wallet.txt\"").unwrap_err();
        assert_eq!(err.to_string(), "failed to parse config file");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = WalletConfig::read(dir.path().join("wallet.toml")).unwrap_err();
        assert_eq!(err.to_string(), "failed to read config file");
    }
}
