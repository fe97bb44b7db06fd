#![allow(dead_code)]

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tradeledger::domain::ledger::Ledger;
use tradeledger::ports::price_port::PriceOracle;

/// Price oracle whose quotes can be changed mid-test.
pub struct MockPriceOracle {
    prices: RwLock<HashMap<String, f64>>,
}

impl MockPriceOracle {
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_price(self, symbol: &str, price: f64) -> Self {
        self.set_price(symbol, price);
        self
    }

    pub fn set_price(&self, symbol: &str, price: f64) {
        self.prices.write().insert(symbol.to_string(), price);
    }
}

impl PriceOracle for MockPriceOracle {
    fn price_of(&self, symbol: &str) -> f64 {
        self.prices.read().get(symbol).copied().unwrap_or(0.0)
    }
}

/// AAPL 150, TSLA 800, GOOGL 2800.
pub fn standard_oracle() -> Arc<MockPriceOracle> {
    Arc::new(
        MockPriceOracle::new()
            .with_price("AAPL", 150.0)
            .with_price("TSLA", 800.0)
            .with_price("GOOGL", 2800.0),
    )
}

pub fn make_ledger(id: &str, initial_deposit: f64, oracle: &Arc<MockPriceOracle>) -> Ledger {
    Ledger::new(id, initial_deposit, oracle.clone()).unwrap()
}

pub fn assert_invariants(ledger: &Ledger) {
    assert!(
        ledger.cash_balance() >= 0.0,
        "negative balance: {}",
        ledger.cash_balance()
    );
    for (symbol, quantity) in ledger.holdings() {
        assert!(quantity > 0, "non-positive holding {symbol}: {quantity}");
    }
}
