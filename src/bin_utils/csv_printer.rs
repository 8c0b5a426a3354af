use std::io::Write;

use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::Account;

/// One report line. Credentials are never printed.
#[derive(Debug, Serialize)]
pub struct AccountRow<'a> {
    pub account_number: &'a str,
    pub fullname: &'a str,
    pub balance: Decimal,
}

impl<'a> From<&'a Account> for AccountRow<'a> {
    fn from(acc: &'a Account) -> Self {
        Self {
            account_number: acc.number().as_str(),
            fullname: acc.full_name(),
            balance: acc.balance(),
        }
    }
}

pub fn print_accounts<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountRow<'a>>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for row in accounts {
        writer.serialize(row).context("Failed to write to CSV")?;
    }
    writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}
