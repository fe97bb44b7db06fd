//! Point-in-time account report.

use std::collections::BTreeMap;
use std::fmt;

use super::ledger::Ledger;
use super::transaction::format_amount;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountReport {
    pub account_id: String,
    pub cash_balance: f64,
    pub holdings: BTreeMap<String, i64>,
    pub portfolio_value: f64,
    pub profit_or_loss: f64,
    pub transactions: Vec<String>,
}

impl AccountReport {
    pub fn capture(ledger: &Ledger) -> Self {
        AccountReport {
            account_id: ledger.account_id().to_string(),
            cash_balance: ledger.cash_balance(),
            holdings: ledger.holdings(),
            portfolio_value: ledger.portfolio_value(),
            profit_or_loss: ledger.profit_or_loss(),
            transactions: ledger.transaction_descriptions(),
        }
    }
}

impl fmt::Display for AccountReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Account {} ===", self.account_id)?;
        writeln!(f, "Cash Balance:     {}", format_amount(self.cash_balance))?;
        writeln!(f, "Portfolio Value:  {}", format_amount(self.portfolio_value))?;
        writeln!(f, "Profit/Loss:      {}", format_amount(self.profit_or_loss))?;

        writeln!(f, "\n=== Holdings ===")?;
        if self.holdings.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (symbol, quantity) in &self.holdings {
            writeln!(f, "  {symbol}: {quantity}")?;
        }

        writeln!(f, "\n=== Transactions ===")?;
        if self.transactions.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (i, description) in self.transactions.iter().enumerate() {
            writeln!(f, "{:>4}. {}", i + 1, description)?;
        }
        Ok(())
    }
}
