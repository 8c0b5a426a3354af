use std::path::PathBuf;

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::{account::parse_amount, transfer::DEFAULT_TRANSFER_FEE};

pub const DEFAULT_SNAPSHOT_PATH: &str = "accounts.json";
pub const SNAPSHOT_PATH_VAR: &str = "CUTE_TELLER_SNAPSHOT";
pub const TRANSFER_FEE_VAR: &str = "CUTE_TELLER_TRANSFER_FEE";
pub const REPORT_COMMAND: &str = "report";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CUTE_TELLER_TRANSFER_FEE must be a non-negative decimal, got `{value}`")]
    InvalidTransferFee { value: String },
    #[error("Unexpected argument `{arg}`, usage: cute-teller [SNAPSHOT [report]]")]
    UnexpectedArgument { arg: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive teller on stdin/stdout.
    #[default]
    Teller,
    /// Print all accounts as CSV and exit.
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TellerConfig {
    pub snapshot_path: PathBuf,
    pub transfer_fee: Decimal,
    pub mode: RunMode,
}

impl Default for TellerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            transfer_fee: DEFAULT_TRANSFER_FEE,
            mode: RunMode::Teller,
        }
    }
}

impl TellerConfig {
    /// Defaults, overridden by environment variables. `lookup` is usually
    /// `|key| std::env::var(key).ok()`.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = lookup(SNAPSHOT_PATH_VAR) {
            config.snapshot_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(TRANSFER_FEE_VAR) {
            config.transfer_fee = parse_amount(&value)
                .filter(|fee| *fee >= Decimal::zero())
                .ok_or(ConfigError::InvalidTransferFee { value })?;
        }
        Ok(config)
    }

    /// Command line on top of [`TellerConfig::from_env_with`]:
    /// `[SNAPSHOT [report]]`, program name already stripped. The snapshot
    /// argument wins over [`SNAPSHOT_PATH_VAR`].
    pub fn from_args_and_env(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::from_env_with(lookup)?;
        let mut args = args.into_iter();
        if let Some(path) = args.next() {
            config.snapshot_path = PathBuf::from(path);
        }
        match args.next() {
            None => {}
            Some(arg) if arg == REPORT_COMMAND => config.mode = RunMode::Report,
            Some(arg) => return Err(ConfigError::UnexpectedArgument { arg }),
        }
        if let Some(arg) = args.next() {
            return Err(ConfigError::UnexpectedArgument { arg });
        }
        Ok(config)
    }
}
