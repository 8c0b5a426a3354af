use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use cute_teller::{
    bin_utils::{
        Teller,
        csv_printer::{AccountRow, print_accounts},
    },
    config::{RunMode, TellerConfig},
    store::{AccountStore, json_file::JsonFileStorage},
    transfer::TransferEngine,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // logs go to stderr, stdout belongs to the teller dialogue
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = TellerConfig::from_args_and_env(std::env::args().skip(1), |key| {
        std::env::var(key).ok()
    })
    .context("Invalid configuration")?;

    let mut store = AccountStore::new(JsonFileStorage::new(&config.snapshot_path));
    if let Err(err) = store.load() {
        eprintln!("Could not read accounts ({err}), starting with none");
    }

    if config.mode == RunMode::Report {
        let mut stdout = BufWriter::new(io::stdout().lock());
        return print_accounts(&mut stdout, store.accounts().map(AccountRow::from));
    }

    let teller = Teller {
        input: io::stdin().lock(),
        output: &mut io::stdout(),
        engine: TransferEngine::new(config.transfer_fee),
    };
    teller.run(&mut store)
}
