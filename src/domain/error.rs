//! Domain error types.

/// A parse error with position information for command parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// A rejected ledger operation. The ledger is unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount {amount}: must be positive")]
    InvalidAmount { amount: f64 },

    #[error("invalid quantity {quantity}: must be positive")]
    InvalidQuantity { quantity: i64 },

    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient holdings of {symbol}: requested {requested}, held {held}")]
    InsufficientHoldings {
        symbol: String,
        requested: i64,
        held: i64,
    },

    #[error("holding of {symbol} would overflow: held {held}, buying {quantity}")]
    HoldingOverflow {
        symbol: String,
        held: i64,
        quantity: i64,
    },
}

/// Top-level error type for tradeledger.
#[derive(Debug, thiserror::Error)]
pub enum TradeLedgerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    CommandParse(#[from] ParseError),

    #[error("script error at line {line}: {reason}")]
    Script { line: usize, reason: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("no account with id {id}")]
    AccountNotFound { id: String },

    #[error("account {id} already exists")]
    AccountExists { id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradeLedgerError> for std::process::ExitCode {
    fn from(err: &TradeLedgerError) -> Self {
        let code: u8 = match err {
            TradeLedgerError::Io(_) => 1,
            TradeLedgerError::ConfigParse { .. }
            | TradeLedgerError::ConfigMissing { .. }
            | TradeLedgerError::ConfigInvalid { .. } => 2,
            TradeLedgerError::CommandParse(_) | TradeLedgerError::Script { .. } => 4,
            TradeLedgerError::AccountNotFound { .. } | TradeLedgerError::AccountExists { .. } => 5,
            TradeLedgerError::Ledger(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_context_points_at_position() {
        let err = ParseError {
            message: "expected a number".into(),
            position: 8,
        };
        let rendered = err.display_with_context("deposit abc");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "deposit abc");
        assert_eq!(lines[1], "        ^");
        assert_eq!(lines[2], "parse error at position 8: expected a number");
    }

    #[test]
    fn ledger_error_messages() {
        let err = LedgerError::InsufficientHoldings {
            symbol: "AAPL".into(),
            requested: 3,
            held: 2,
        };
        assert_eq!(
            err.to_string(),
            "insufficient holdings of AAPL: requested 3, held 2"
        );
        let err = LedgerError::InvalidQuantity { quantity: 0 };
        assert_eq!(err.to_string(), "invalid quantity 0: must be positive");
        let err = LedgerError::HoldingOverflow {
            symbol: "MSFT".into(),
            held: i64::MAX,
            quantity: 1,
        };
        assert_eq!(
            err.to_string(),
            "holding of MSFT would overflow: held 9223372036854775807, buying 1"
        );
    }

    #[test]
    fn ledger_error_converts_to_top_level() {
        let err: TradeLedgerError = LedgerError::InvalidAmount { amount: -1.0 }.into();
        assert!(matches!(
            err,
            TradeLedgerError::Ledger(LedgerError::InvalidAmount { .. })
        ));
        assert_eq!(err.to_string(), "invalid amount -1: must be positive");
    }
}
