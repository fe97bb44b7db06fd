//! Immutable transaction records and their caller-facing descriptions.

use chrono::{DateTime, Utc};
use std::fmt;

/// Render an amount in shortest round-trip form, keeping a trailing `.0` on
/// integral values (`1000.0`, `0.30000000000000004`).
pub fn format_amount(amount: f64) -> String {
    format!("{amount:?}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    Deposit {
        amount: f64,
    },
    Withdrawal {
        amount: f64,
    },
    Buy {
        symbol: String,
        quantity: i64,
        unit_price: f64,
    },
    Sell {
        symbol: String,
        quantity: i64,
        unit_price: f64,
    },
}

impl Transaction {
    /// Signed effect of this transaction on the cash balance.
    pub fn cash_delta(&self) -> f64 {
        match self {
            Transaction::Deposit { amount } => *amount,
            Transaction::Withdrawal { amount } => -*amount,
            Transaction::Buy {
                quantity,
                unit_price,
                ..
            } => -(*quantity as f64 * unit_price),
            Transaction::Sell {
                quantity,
                unit_price,
                ..
            } => *quantity as f64 * unit_price,
        }
    }

    /// The recorded amount for cash moves; `None` for trades.
    pub fn cash_amount(&self) -> Option<f64> {
        match self {
            Transaction::Deposit { amount } | Transaction::Withdrawal { amount } => Some(*amount),
            Transaction::Buy { .. } | Transaction::Sell { .. } => None,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transaction::Deposit { amount } => write!(f, "Deposited: {}", format_amount(*amount)),
            Transaction::Withdrawal { amount } => write!(f, "Withdrew: {}", format_amount(*amount)),
            Transaction::Buy {
                symbol,
                quantity,
                unit_price,
            } => write!(
                f,
                "Bought {} shares of {} at {} each.",
                quantity,
                symbol,
                format_amount(*unit_price)
            ),
            Transaction::Sell {
                symbol,
                quantity,
                unit_price,
            } => write!(
                f,
                "Sold {} shares of {} at {} each.",
                quantity,
                symbol,
                format_amount(*unit_price)
            ),
        }
    }
}

/// One entry of a ledger's append-only log.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// 1-based position in the log.
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub transaction: Transaction,
}

impl TransactionRecord {
    pub fn description(&self) -> String {
        self.transaction.to_string()
    }
}
