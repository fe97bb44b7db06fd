//! Text command grammar shared by the interactive shell and replay scripts.
//!
//! ```text
//! deposit <amount>        withdraw <amount>
//! buy <symbol> <qty>      sell <symbol> <qty>
//! value | pnl | holdings | history
//! open <id> [deposit] | use <id> | accounts | quote <symbol> | help | quit
//! ```
//!
//! Amounts and quantities are parsed as signed numbers so that a non-positive
//! value reaches the ledger and is rejected there with the proper error kind.

use std::fmt;

use super::error::{LedgerError, ParseError};
use super::ledger::Ledger;
use super::transaction::format_amount;

/// An operation against a single ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Deposit(f64),
    Withdraw(f64),
    Buy { symbol: String, quantity: i64 },
    Sell { symbol: String, quantity: i64 },
    Value,
    ProfitLoss,
    Holdings,
    History,
}

/// Anything the shell understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ledger(LedgerCommand),
    Open { account_id: String, initial_deposit: f64 },
    Use { account_id: String },
    Accounts,
    Quote { symbol: String },
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  deposit <amount>          add cash
  withdraw <amount>         remove cash
  buy <symbol> <quantity>   buy shares at the current price
  sell <symbol> <quantity>  sell shares at the current price
  value                     total portfolio value
  pnl                       profit/loss against the opening deposit
  holdings                  current share holdings
  history                   transaction history
  open <id> [deposit]       open a new account
  use <id>                  switch to another account
  accounts                  list accounts
  quote <symbol>            current price for a symbol
  help                      this text
  quit                      exit";

impl LedgerCommand {
    /// Apply to `ledger` and render the response shown to the caller.
    pub fn apply(&self, ledger: &mut Ledger) -> Result<String, LedgerError> {
        match self {
            LedgerCommand::Deposit(amount) => {
                ledger.deposit(*amount)?;
                Ok(format!(
                    "Deposited: {}, New Balance: {}",
                    format_amount(*amount),
                    format_amount(ledger.cash_balance())
                ))
            }
            LedgerCommand::Withdraw(amount) => {
                ledger.withdraw(*amount)?;
                Ok(format!(
                    "Withdrew: {}, New Balance: {}",
                    format_amount(*amount),
                    format_amount(ledger.cash_balance())
                ))
            }
            LedgerCommand::Buy { symbol, quantity } => {
                ledger.buy_shares(symbol, *quantity)?;
                Ok(format!(
                    "Bought {} shares of {}, New Balance: {}",
                    quantity,
                    symbol,
                    format_amount(ledger.cash_balance())
                ))
            }
            LedgerCommand::Sell { symbol, quantity } => {
                ledger.sell_shares(symbol, *quantity)?;
                Ok(format!(
                    "Sold {} shares of {}, New Balance: {}",
                    quantity,
                    symbol,
                    format_amount(ledger.cash_balance())
                ))
            }
            LedgerCommand::Value => Ok(format!(
                "Total Portfolio Value: {}",
                format_amount(ledger.portfolio_value())
            )),
            LedgerCommand::ProfitLoss => Ok(ledger.profit_or_loss_report()),
            LedgerCommand::Holdings => {
                let holdings = ledger.holdings();
                if holdings.is_empty() {
                    return Ok("No holdings".to_string());
                }
                Ok(holdings
                    .iter()
                    .map(|(symbol, quantity)| format!("{symbol}: {quantity}"))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            LedgerCommand::History => {
                let descriptions = ledger.transaction_descriptions();
                if descriptions.is_empty() {
                    return Ok("No transactions".to_string());
                }
                Ok(descriptions
                    .iter()
                    .enumerate()
                    .map(|(i, d)| format!("{:>4}. {}", i + 1, d))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }
}

impl fmt::Display for LedgerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerCommand::Deposit(amount) => write!(f, "deposit {}", format_amount(*amount)),
            LedgerCommand::Withdraw(amount) => write!(f, "withdraw {}", format_amount(*amount)),
            LedgerCommand::Buy { symbol, quantity } => write!(f, "buy {symbol} {quantity}"),
            LedgerCommand::Sell { symbol, quantity } => write!(f, "sell {symbol} {quantity}"),
            LedgerCommand::Value => write!(f, "value"),
            LedgerCommand::ProfitLoss => write!(f, "pnl"),
            LedgerCommand::Holdings => write!(f, "holdings"),
            LedgerCommand::History => write!(f, "history"),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Next whitespace-delimited word and its starting offset.
    fn next_word(&mut self) -> Option<(&'a str, usize)> {
        self.skip_whitespace();
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some((&rest[..len], start))
    }

    fn expect_word(&mut self, what: &str) -> Result<(&'a str, usize), ParseError> {
        self.next_word().ok_or_else(|| ParseError {
            message: format!("expected {what}, found end of input"),
            position: self.pos,
        })
    }

    fn expect_amount(&mut self) -> Result<f64, ParseError> {
        let (word, position) = self.expect_word("amount")?;
        word.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid amount: {word}"),
            position,
        })
    }

    fn expect_quantity(&mut self) -> Result<i64, ParseError> {
        let (word, position) = self.expect_word("quantity")?;
        word.parse::<i64>().map_err(|_| ParseError {
            message: format!("invalid quantity (expected whole shares): {word}"),
            position,
        })
    }

    fn expect_symbol(&mut self) -> Result<String, ParseError> {
        let (word, position) = self.expect_word("symbol")?;
        if !word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(ParseError {
                message: format!("invalid symbol: {word}"),
                position,
            });
        }
        Ok(word.to_uppercase())
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.next_word() {
            None => Ok(()),
            Some((word, position)) => Err(ParseError {
                message: format!("unexpected trailing input: {word}"),
                position,
            }),
        }
    }
}

/// Parse one line of input.
pub fn parse(input: &str) -> Result<Command, ParseError> {
    let mut p = Parser::new(input);
    let (keyword, position) = p.expect_word("command")?;

    let command = match keyword.to_lowercase().as_str() {
        "deposit" => Command::Ledger(LedgerCommand::Deposit(p.expect_amount()?)),
        "withdraw" => Command::Ledger(LedgerCommand::Withdraw(p.expect_amount()?)),
        "buy" => {
            let symbol = p.expect_symbol()?;
            let quantity = p.expect_quantity()?;
            Command::Ledger(LedgerCommand::Buy { symbol, quantity })
        }
        "sell" => {
            let symbol = p.expect_symbol()?;
            let quantity = p.expect_quantity()?;
            Command::Ledger(LedgerCommand::Sell { symbol, quantity })
        }
        "value" => Command::Ledger(LedgerCommand::Value),
        "pnl" => Command::Ledger(LedgerCommand::ProfitLoss),
        "holdings" => Command::Ledger(LedgerCommand::Holdings),
        "history" => Command::Ledger(LedgerCommand::History),
        "open" => {
            let (account_id, _) = p.expect_word("account id")?;
            p.skip_whitespace();
            let initial_deposit = if p.pos < input.len() {
                p.expect_amount()?
            } else {
                0.0
            };
            Command::Open {
                account_id: account_id.to_string(),
                initial_deposit,
            }
        }
        "use" => {
            let (account_id, _) = p.expect_word("account id")?;
            Command::Use {
                account_id: account_id.to_string(),
            }
        }
        "accounts" => Command::Accounts,
        "quote" => Command::Quote {
            symbol: p.expect_symbol()?,
        },
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            return Err(ParseError {
                message: format!("unknown command: {keyword}"),
                position,
            });
        }
    };

    p.expect_end()?;
    Ok(command)
}

/// Parse a line that must be a ledger operation.
pub fn parse_ledger_command(input: &str) -> Result<LedgerCommand, ParseError> {
    match parse(input)? {
        Command::Ledger(cmd) => Ok(cmd),
        _ => Err(ParseError {
            message: "not a ledger operation".to_string(),
            position: input.len() - input.trim_start().len(),
        }),
    }
}
