//! Process-wide registry of ledgers keyed by account id.
//!
//! Each ledger sits behind its own mutex, so check-then-act sequences on one
//! account are serialized while different accounts proceed independently.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::error::TradeLedgerError;
use super::ledger::Ledger;
use crate::ports::price_port::PriceOracle;

pub struct AccountRegistry {
    oracle: Arc<dyn PriceOracle>,
    accounts: RwLock<HashMap<String, Arc<Mutex<Ledger>>>>,
}

impl std::fmt::Debug for AccountRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRegistry").finish_non_exhaustive()
    }
}

impl AccountRegistry {
    pub fn new(oracle: Arc<dyn PriceOracle>) -> Self {
        AccountRegistry {
            oracle,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    pub fn oracle(&self) -> &Arc<dyn PriceOracle> {
        &self.oracle
    }

    /// Open a new account sharing the registry's price oracle.
    pub fn open(&self, account_id: &str, initial_deposit: f64) -> Result<(), TradeLedgerError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(account_id) {
            return Err(TradeLedgerError::AccountExists {
                id: account_id.to_string(),
            });
        }
        let ledger = Ledger::new(account_id, initial_deposit, Arc::clone(&self.oracle))?;
        accounts.insert(account_id.to_string(), Arc::new(Mutex::new(ledger)));
        info!(account = account_id, initial_deposit, "account opened");
        Ok(())
    }

    /// Run `f` with exclusive access to one account's ledger.
    pub fn with_account<T>(
        &self,
        account_id: &str,
        f: impl FnOnce(&mut Ledger) -> T,
    ) -> Result<T, TradeLedgerError> {
        let ledger = self
            .accounts
            .read()
            .get(account_id)
            .cloned()
            .ok_or_else(|| TradeLedgerError::AccountNotFound {
                id: account_id.to_string(),
            })?;
        let mut guard = ledger.lock();
        Ok(f(&mut guard))
    }

    pub fn contains(&self, account_id: &str) -> bool {
        self.accounts.read().contains_key(account_id)
    }

    /// Account ids in sorted order.
    pub fn account_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.accounts.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
