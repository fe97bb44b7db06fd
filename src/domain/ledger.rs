//! Single-account ledger: cash balance, holdings and the transaction log.
//!
//! Every mutating operation validates all of its preconditions before touching
//! state, so a rejected call leaves the ledger exactly as it was.

use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::LedgerError;
use super::transaction::{format_amount, Transaction, TransactionRecord};
use crate::ports::price_port::PriceOracle;

pub struct Ledger {
    account_id: String,
    cash_balance: f64,
    holdings: BTreeMap<String, i64>,
    transactions: Vec<TransactionRecord>,
    oracle: Arc<dyn PriceOracle>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("account_id", &self.account_id)
            .field("cash_balance", &self.cash_balance)
            .field("holdings", &self.holdings)
            .field("transactions", &self.transactions.len())
            .finish()
    }
}

fn check_amount(amount: f64) -> Result<(), LedgerError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount { amount })
    }
}

fn check_quantity(quantity: i64) -> Result<(), LedgerError> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidQuantity { quantity })
    }
}

impl Ledger {
    /// Open an account. A positive `initial_deposit` is recorded as the first
    /// transaction; `0.0` opens an empty account with nothing recorded.
    pub fn new(
        account_id: impl Into<String>,
        initial_deposit: f64,
        oracle: Arc<dyn PriceOracle>,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Ledger {
            account_id: account_id.into(),
            cash_balance: 0.0,
            holdings: BTreeMap::new(),
            transactions: Vec::new(),
            oracle,
        };
        if initial_deposit != 0.0 {
            ledger.deposit(initial_deposit)?;
        }
        Ok(ledger)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    pub fn deposit(&mut self, amount: f64) -> Result<(), LedgerError> {
        check_amount(amount).inspect_err(|e| self.log_rejection("deposit", e))?;
        let new_balance = self.cash_balance + amount;
        if !new_balance.is_finite() {
            let err = LedgerError::InvalidAmount { amount };
            self.log_rejection("deposit", &err);
            return Err(err);
        }
        self.cash_balance = new_balance;
        self.append(Transaction::Deposit { amount });
        Ok(())
    }

    pub fn withdraw(&mut self, amount: f64) -> Result<(), LedgerError> {
        check_amount(amount).inspect_err(|e| self.log_rejection("withdraw", e))?;
        if self.cash_balance - amount < 0.0 {
            let err = LedgerError::InsufficientFunds {
                required: amount,
                available: self.cash_balance,
            };
            self.log_rejection("withdraw", &err);
            return Err(err);
        }
        self.cash_balance -= amount;
        self.append(Transaction::Withdrawal { amount });
        Ok(())
    }

    /// Buy at the oracle's current price, which is locked into the record.
    ///
    /// A symbol the oracle does not know prices at zero, so the purchase is free.
    pub fn buy_shares(&mut self, symbol: &str, quantity: i64) -> Result<(), LedgerError> {
        check_quantity(quantity).inspect_err(|e| self.log_rejection("buy", e))?;
        let held = self.holdings.get(symbol).copied().unwrap_or(0);
        let Some(new_held) = held.checked_add(quantity) else {
            let err = LedgerError::HoldingOverflow {
                symbol: symbol.to_string(),
                held,
                quantity,
            };
            self.log_rejection("buy", &err);
            return Err(err);
        };
        let unit_price = self.oracle.price_of(symbol);
        let cost = unit_price * quantity as f64;
        if cost > self.cash_balance {
            let err = LedgerError::InsufficientFunds {
                required: cost,
                available: self.cash_balance,
            };
            self.log_rejection("buy", &err);
            return Err(err);
        }
        if unit_price == 0.0 {
            warn!(
                account = %self.account_id,
                symbol,
                quantity,
                "no price for symbol, buying at zero cost"
            );
        }
        self.cash_balance -= cost;
        self.holdings.insert(symbol.to_string(), new_held);
        self.append(Transaction::Buy {
            symbol: symbol.to_string(),
            quantity,
            unit_price,
        });
        Ok(())
    }

    pub fn sell_shares(&mut self, symbol: &str, quantity: i64) -> Result<(), LedgerError> {
        check_quantity(quantity).inspect_err(|e| self.log_rejection("sell", e))?;
        let held = self.holdings.get(symbol).copied().unwrap_or(0);
        if held < quantity {
            let err = LedgerError::InsufficientHoldings {
                symbol: symbol.to_string(),
                requested: quantity,
                held,
            };
            self.log_rejection("sell", &err);
            return Err(err);
        }
        let unit_price = self.oracle.price_of(symbol);
        let proceeds = unit_price * quantity as f64;
        let new_balance = self.cash_balance + proceeds;
        if !new_balance.is_finite() {
            let err = LedgerError::InvalidAmount { amount: proceeds };
            self.log_rejection("sell", &err);
            return Err(err);
        }
        self.cash_balance = new_balance;
        if held == quantity {
            self.holdings.remove(symbol);
        } else {
            self.holdings.insert(symbol.to_string(), held - quantity);
        }
        self.append(Transaction::Sell {
            symbol: symbol.to_string(),
            quantity,
            unit_price,
        });
        Ok(())
    }

    /// Cash plus every holding marked at the oracle's live price.
    pub fn portfolio_value(&self) -> f64 {
        let holdings_value: f64 = self
            .holdings
            .iter()
            .map(|(symbol, &quantity)| self.oracle.price_of(symbol) * quantity as f64)
            .sum();
        self.cash_balance + holdings_value
    }

    /// The amount of the first log entry, taken as the opening deposit.
    ///
    /// Later deposits and withdrawals are not netted out, so they show up as
    /// profit or loss.
    pub fn baseline_deposit(&self) -> f64 {
        self.transactions
            .first()
            .and_then(|record| record.transaction.cash_amount())
            .unwrap_or(0.0)
    }

    pub fn profit_or_loss(&self) -> f64 {
        self.portfolio_value() - self.baseline_deposit()
    }

    pub fn profit_or_loss_report(&self) -> String {
        format!("Profit/Loss: {}", format_amount(self.profit_or_loss()))
    }

    pub fn holdings(&self) -> BTreeMap<String, i64> {
        self.holdings.clone()
    }

    pub fn transaction_history(&self) -> Vec<TransactionRecord> {
        self.transactions.clone()
    }

    pub fn transaction_descriptions(&self) -> Vec<String> {
        self.transactions.iter().map(|r| r.description()).collect()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    fn append(&mut self, transaction: Transaction) {
        debug!(
            account = %self.account_id,
            balance = self.cash_balance,
            "{}",
            transaction
        );
        self.transactions.push(TransactionRecord {
            sequence: self.transactions.len() as u64 + 1,
            recorded_at: Utc::now(),
            transaction,
        });
    }

    fn log_rejection(&self, operation: &str, err: &LedgerError) {
        warn!(account = %self.account_id, operation, "rejected: {}", err);
    }
}
