use wallet::{Ledger, Shell, WalletConfig, backend::TextStore};

use std::io;
use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to ledger file to operate on [default: wallet.txt]
    #[clap(value_parser)]
    path: Option<PathBuf>,

    /// TOML file with the ledger path and income/expense category names
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => WalletConfig::read(path)?,
        None => WalletConfig::default()
    };
    if let Some(path) = args.path {
        config.ledger_path = path;
    }

    info!("using ledger {}", config.ledger_path.display());
    let store = TextStore::new(&config.ledger_path);
    let mut ledger = Ledger::open(store, config.categories)
        .with_context(|| format!("failed to open ledger {}", config.ledger_path.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&mut ledger, stdin.lock(), stdout.lock()).run()
}
