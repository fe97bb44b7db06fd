//! Price lookup port trait.

/// Maps a ticker symbol to its current unit price.
///
/// Total function: unrecognized symbols price at `0.0`. Callers must treat a
/// zero price as "no market data", not as a quote.
pub trait PriceOracle: Send + Sync {
    fn price_of(&self, symbol: &str) -> f64;
}
