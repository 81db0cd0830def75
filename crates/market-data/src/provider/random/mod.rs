//! Seedable pseudo-random price source.
//!
//! Every draw lands in `[floor, ceil)` plus a symbol-specific offset in
//! `[0, 10)`, so repeated fetches of one symbol cluster around its own
//! baseline. The offset is derived from the md5 digest of the symbol text.

use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::MarketDataError;
use crate::models::SourceQuote;
use crate::provider::PriceSource;

pub const RANDOM_SOURCE_ID: &str = "mock-random";

/// Resolution of the uniform draw (6 fractional digits).
const DRAW_SCALE: u32 = 6;
const DRAW_STEPS: i64 = 1_000_000;

/// Offset buckets; each bucket adds 0.05.
const OFFSET_BUCKETS: u32 = 200;
const OFFSET_DIVISOR: i64 = 20;

/// Settings for [`RandomPriceSource`].
#[derive(Clone, Debug, PartialEq)]
pub struct RandomSourceConfig {
    pub floor: Decimal,
    pub ceil: Decimal,
    /// Fixed seed for reproducible sequences; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RandomSourceConfig {
    fn default() -> Self {
        Self {
            floor: Decimal::from(1200),
            ceil: Decimal::from(3200),
            seed: None,
        }
    }
}

pub struct RandomPriceSource {
    floor: Decimal,
    span: Decimal,
    rng: Mutex<StdRng>,
}

impl RandomPriceSource {
    pub fn new(config: RandomSourceConfig) -> Result<Self, MarketDataError> {
        if config.floor <= Decimal::ZERO || config.ceil <= Decimal::ZERO {
            return Err(MarketDataError::InvalidConfig(
                "price floor and ceiling must be positive".to_string(),
            ));
        }
        if config.ceil <= config.floor {
            return Err(MarketDataError::InvalidConfig(format!(
                "price ceiling {} must exceed floor {}",
                config.ceil, config.floor
            )));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            floor: config.floor,
            span: config.ceil - config.floor,
            rng: Mutex::new(rng),
        })
    }

    fn draw(&self) -> Result<Decimal, MarketDataError> {
        let mut rng = self.rng.lock().map_err(|_| MarketDataError::ProviderError {
            provider: RANDOM_SOURCE_ID.to_string(),
            message: "random generator lock poisoned".to_string(),
        })?;
        let steps: i64 = rng.gen_range(0..DRAW_STEPS);
        Ok(Decimal::new(steps, DRAW_SCALE))
    }
}

/// Symbol-derived additive perturbation in `[0, 10)`.
pub(crate) fn symbol_offset(symbol: &str) -> Decimal {
    let digest = md5::compute(symbol.as_bytes());
    let checksum = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    Decimal::from(checksum % OFFSET_BUCKETS) / Decimal::from(OFFSET_DIVISOR)
}

#[async_trait]
impl PriceSource for RandomPriceSource {
    fn id(&self) -> &'static str {
        RANDOM_SOURCE_ID
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<SourceQuote, MarketDataError> {
        if symbol.trim().is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        let fraction = self.draw()?;
        let price = (self.floor + fraction * self.span + symbol_offset(symbol))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        debug!("{} quoted {} at {}", RANDOM_SOURCE_ID, symbol, price);
        Ok(SourceQuote::new(symbol, price, RANDOM_SOURCE_ID))
    }
}
