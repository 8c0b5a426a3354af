//! Interactive teller front end. It only reads lines, prints text and calls
//! into [`Session`], [`AuthGuard`] and [`TransferEngine`]; no rules live here.

use std::{
    io::{BufRead, Write},
    ops::ControlFlow,
};

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::{
    account::parse_amount,
    auth::AuthGuard,
    session::Session,
    store::{AccountStore, SnapshotStorage},
    transfer::TransferEngine,
};

pub mod csv_printer;

pub struct Teller<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub engine: TransferEngine,
}

impl<'w, R, W> Teller<'w, R, W>
where
    R: BufRead,
    W: Write + 'w,
{
    /// Runs until the user exits or input ends.
    pub fn run<S>(mut self, store: &mut AccountStore<S>) -> Result<()>
    where
        S: SnapshotStorage,
    {
        let mut session = Session::default();
        writeln!(self.output, "Welcome to the teller!")?;
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "1. Log in")?;
            writeln!(self.output, "2. Register")?;
            writeln!(self.output, "3. Exit")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };
            match choice.as_str() {
                "1" => {
                    if self.login(store, &mut session)?.is_break() {
                        break;
                    }
                    if session.current().is_some()
                        && self.account_menu(store, &mut session)?.is_break()
                    {
                        break;
                    }
                }
                "2" => {
                    if self.register(store)?.is_break() {
                        break;
                    }
                }
                "3" => {
                    writeln!(self.output, "Goodbye!")?;
                    break;
                }
                _ => writeln!(self.output, "Invalid choice!")?,
            }
        }
        session.terminate();
        Ok(())
    }

    fn login<S>(
        &mut self,
        store: &AccountStore<S>,
        session: &mut Session,
    ) -> Result<ControlFlow<()>>
    where
        S: SnapshotStorage,
    {
        let Some(number) = self.prompt("Enter your 12-digit account number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        if store.find_by_number(&number).is_none() {
            writeln!(self.output, "Account not found!")?;
            return Ok(ControlFlow::Continue(()));
        }
        let Some(password) = self.prompt("Enter your password: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        match session.login(store, &number, &password) {
            Ok(acc) => writeln!(self.output, "Welcome, {}!", acc.full_name())?,
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn register<S>(&mut self, store: &mut AccountStore<S>) -> Result<ControlFlow<()>>
    where
        S: SnapshotStorage,
    {
        writeln!(self.output)?;
        writeln!(self.output, "Account registration")?;
        let Some(number) = self.prompt("Enter a 12-digit account number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(full_name) = self.prompt("Enter your full name: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(password) = self.prompt("Enter a password: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(balance) = self.prompt("Enter the opening balance: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        match AuthGuard.register(store, &number, &full_name, &password, &balance) {
            Ok(opening) => writeln!(
                self.output,
                "Account {number} created with opening balance {opening}."
            )?,
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn account_menu<S>(
        &mut self,
        store: &mut AccountStore<S>,
        session: &mut Session,
    ) -> Result<ControlFlow<()>>
    where
        S: SnapshotStorage,
    {
        while session.current().is_some() {
            writeln!(self.output)?;
            writeln!(self.output, "1. Check balance")?;
            writeln!(self.output, "2. Deposit")?;
            writeln!(self.output, "3. Withdraw")?;
            writeln!(self.output, "4. Transfer")?;
            writeln!(self.output, "5. Close account")?;
            writeln!(self.output, "6. Log out")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(ControlFlow::Break(()));
            };
            match choice.as_str() {
                "1" => match session.balance(store) {
                    Ok(balance) => writeln!(self.output, "Current balance: {balance}")?,
                    Err(err) => writeln!(self.output, "{err}")?,
                },
                "2" => {
                    let Some(amount) = self.prompt_amount("Enter amount: ")? else {
                        return Ok(ControlFlow::Break(()));
                    };
                    let Some(amount) = amount else { continue };
                    match session.deposit(store, amount) {
                        Ok(balance) => writeln!(
                            self.output,
                            "Deposited {amount}. Current balance: {balance}"
                        )?,
                        Err(err) => writeln!(self.output, "{err}")?,
                    }
                }
                "3" => {
                    let Some(amount) = self.prompt_amount("Enter amount: ")? else {
                        return Ok(ControlFlow::Break(()));
                    };
                    let Some(amount) = amount else { continue };
                    match session.withdraw(store, amount) {
                        Ok(balance) => writeln!(
                            self.output,
                            "Withdrew {amount}. Remaining balance: {balance}"
                        )?,
                        Err(err) => writeln!(self.output, "{err}")?,
                    }
                }
                "4" => {
                    if self.transfer(store, session)?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
                "5" => {
                    let Some(answer) = self.prompt("Close this account? (Y/n): ")? else {
                        return Ok(ControlFlow::Break(()));
                    };
                    let answer = answer.to_lowercase();
                    if answer.is_empty() || answer == "y" {
                        match session.close_account(store) {
                            Ok(()) => writeln!(self.output, "Account closed. Logging out...")?,
                            Err(err) => writeln!(self.output, "{err}")?,
                        }
                    }
                }
                "6" => {
                    session.logout()?;
                    writeln!(self.output, "You have logged out.")?;
                }
                _ => writeln!(self.output, "Invalid choice!")?,
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn transfer<S>(
        &mut self,
        store: &mut AccountStore<S>,
        session: &Session,
    ) -> Result<ControlFlow<()>>
    where
        S: SnapshotStorage,
    {
        let Some(destination) = self.prompt("Enter the recipient account number: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        if store.find_by_number(&destination).is_none() {
            writeln!(self.output, "Recipient account not found!")?;
            return Ok(ControlFlow::Continue(()));
        }
        let Some(amount) = self.prompt_amount("Enter the amount to transfer: ")? else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(amount) = amount else {
            return Ok(ControlFlow::Continue(()));
        };
        match session.transfer(store, &self.engine, &destination, amount) {
            Ok(receipt) => writeln!(
                self.output,
                "Transferred {} to {} (fee: {})",
                receipt.amount, receipt.destination, receipt.fee
            )?,
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// `None` once input is exhausted. Answers are trimmed.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    /// Outer `None` on end of input, inner `None` when the answer is not a
    /// number (already reported to the user).
    fn prompt_amount(&mut self, label: &str) -> Result<Option<Option<Decimal>>> {
        let Some(answer) = self.prompt(label)? else {
            return Ok(None);
        };
        match parse_amount(&answer) {
            Some(amount) => Ok(Some(Some(amount))),
            None => {
                writeln!(self.output, "Invalid amount!")?;
                Ok(Some(None))
            }
        }
    }
}
