//! Configuration validation.
//!
//! Validates the account and price table before any ledger is built.

use crate::domain::error::TradeLedgerError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_ACCOUNT_ID: &str = "user1";
pub const DEFAULT_INITIAL_DEPOSIT: f64 = 1000.0;

pub fn validate_account_config(config: &dyn ConfigPort) -> Result<(), TradeLedgerError> {
    validate_account_id(config)?;
    validate_initial_deposit(config)?;
    validate_prices(config)?;
    Ok(())
}

fn validate_account_id(config: &dyn ConfigPort) -> Result<(), TradeLedgerError> {
    if let Some(id) = config.get_string("account", "id") {
        if id.trim().is_empty() {
            return Err(TradeLedgerError::ConfigInvalid {
                section: "account".to_string(),
                key: "id".to_string(),
                reason: "id must not be empty".to_string(),
            });
        }
        if id.chars().any(char::is_whitespace) {
            return Err(TradeLedgerError::ConfigInvalid {
                section: "account".to_string(),
                key: "id".to_string(),
                reason: "id must not contain whitespace".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_initial_deposit(config: &dyn ConfigPort) -> Result<(), TradeLedgerError> {
    let Some(raw) = config.get_string("account", "initial_deposit") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(()),
        Ok(_) => Err(TradeLedgerError::ConfigInvalid {
            section: "account".to_string(),
            key: "initial_deposit".to_string(),
            reason: "initial_deposit must be a non-negative amount".to_string(),
        }),
        Err(_) => Err(TradeLedgerError::ConfigInvalid {
            section: "account".to_string(),
            key: "initial_deposit".to_string(),
            reason: format!("not a number: {raw}"),
        }),
    }
}

fn validate_prices(config: &dyn ConfigPort) -> Result<(), TradeLedgerError> {
    let Some(keys) = config.section_keys("prices") else {
        return Ok(());
    };
    for key in keys {
        configured_price(config, &key)?;
    }
    Ok(())
}

/// Parse the `[prices]` entry under `key` as a finite, non-negative price.
pub fn configured_price(config: &dyn ConfigPort, key: &str) -> Result<f64, TradeLedgerError> {
    let raw = config.get_string("prices", key).unwrap_or_default();
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
        .ok_or_else(|| TradeLedgerError::ConfigInvalid {
            section: "prices".to_string(),
            key: key.to_string(),
            reason: format!("price must be a non-negative number, got '{raw}'"),
        })
}

/// Account id from config, or the default.
pub fn account_id(config: &dyn ConfigPort) -> String {
    config
        .get_string("account", "id")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string())
}

/// Opening deposit from config, or [`DEFAULT_INITIAL_DEPOSIT`] when unset.
pub fn initial_deposit(config: &dyn ConfigPort) -> f64 {
    config.get_double("account", "initial_deposit", DEFAULT_INITIAL_DEPOSIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_config_passes() {
        let c = config(
            "[account]\nid = alice\ninitial_deposit = 1000.0\n\n[prices]\nAAPL = 150.0\nMSFT = 0\n",
        );
        assert!(validate_account_config(&c).is_ok());
        assert_eq!(account_id(&c), "alice");
        assert!((initial_deposit(&c) - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let c = config("");
        assert!(validate_account_config(&c).is_ok());
        assert_eq!(account_id(&c), DEFAULT_ACCOUNT_ID);
        assert!((initial_deposit(&c) - DEFAULT_INITIAL_DEPOSIT).abs() < f64::EPSILON);

        let c = config("[account]\ninitial_deposit = 0\n");
        assert!(initial_deposit(&c).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_deposit_rejected() {
        let c = config("[account]\ninitial_deposit = -5\n");
        let err = validate_account_config(&c).unwrap_err();
        assert!(
            matches!(err, TradeLedgerError::ConfigInvalid { key, .. } if key == "initial_deposit")
        );
    }

    #[test]
    fn non_numeric_deposit_rejected() {
        let c = config("[account]\ninitial_deposit = lots\n");
        let err = validate_account_config(&c).unwrap_err();
        assert!(err.to_string().contains("not a number: lots"));
    }

    #[test]
    fn id_with_whitespace_rejected() {
        let c = config("[account]\nid = two words\n");
        let err = validate_account_config(&c).unwrap_err();
        assert!(matches!(err, TradeLedgerError::ConfigInvalid { key, .. } if key == "id"));
    }

    #[test]
    fn bad_price_rejected() {
        let c = config("[prices]\nAAPL = -1\n");
        let err = validate_account_config(&c).unwrap_err();
        assert!(matches!(err, TradeLedgerError::ConfigInvalid { section, .. } if section == "prices"));

        let c = config("[prices]\nAAPL = cheap\n");
        assert!(validate_account_config(&c).is_err());
    }

    #[test]
    fn configured_price_parses_and_rejects() {
        let c = config("[prices]\nAAPL = 150.5\nTSLA = inf\n");
        assert!((configured_price(&c, "aapl").unwrap() - 150.5).abs() < f64::EPSILON);
        let err = configured_price(&c, "tsla").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config value [prices] tsla: price must be a non-negative number, got 'inf'"
        );
    }
}
