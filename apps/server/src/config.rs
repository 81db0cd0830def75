use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use stocky_core::{Deadlines, FeeSchedule};
use stocky_market_data::RandomSourceConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub fees: FeeSchedule,
    pub job_interval: Duration,
    pub price_source: RandomSourceConfig,
    pub deadlines: Deadlines,
    pub shutdown_grace: Duration,
}

impl Config {
    /// Loads `.env` (if present), then reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    /// Unset or blank variables take their defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = parse_or(&var, "STOCKY_LISTEN_ADDR", "0.0.0.0:8080".parse()?)?;
        let db_path = var("STOCKY_DB_PATH").unwrap_or_else(|| "./db/stocky.db".into());
        let cors_allow = var("STOCKY_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or(&var, "STOCKY_REQUEST_TIMEOUT_MS", 30_000)?;

        let fees = FeeSchedule {
            brokerage_bps: parse_or(&var, "BROKERAGE_BPS", Decimal::from(40))?,
            tax_bps: parse_or(&var, "TAX_BPS", Decimal::from(35))?,
        };
        if fees.brokerage_bps < Decimal::ZERO || fees.tax_bps < Decimal::ZERO {
            bail!("BROKERAGE_BPS and TAX_BPS must not be negative");
        }

        let interval_secs: u64 = parse_or(&var, "PRICE_JOB_INTERVAL_SECS", 3_600)?;
        if interval_secs == 0 {
            bail!("PRICE_JOB_INTERVAL_SECS must be greater than zero");
        }

        let price_source = RandomSourceConfig {
            floor: parse_or(&var, "PRICE_RANDOM_FLOOR", Decimal::from(1200))?,
            ceil: parse_or(&var, "PRICE_RANDOM_CEIL", Decimal::from(3200))?,
            seed: var("PRICE_RANDOM_SEED")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("Invalid PRICE_RANDOM_SEED")?,
        };
        if price_source.floor <= Decimal::ZERO || price_source.ceil <= Decimal::ZERO {
            bail!("invalid random price bounds configured");
        }
        if price_source.ceil <= price_source.floor {
            bail!("PRICE_RANDOM_CEIL must be greater than PRICE_RANDOM_FLOOR");
        }

        let deadlines = Deadlines {
            fetch: Duration::from_millis(parse_or(&var, "PRICE_FETCH_TIMEOUT_MS", 5_000)?),
            storage: Duration::from_millis(parse_or(&var, "STORAGE_TIMEOUT_MS", 10_000)?),
        };
        let grace_secs: u64 = parse_or(&var, "SHUTDOWN_GRACE_SECS", 10)?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            fees,
            job_interval: Duration::from_secs(interval_secs),
            price_source,
            deadlines,
            shutdown_grace: Duration::from_secs(grace_secs),
        })
    }
}

fn parse_or<T, V>(var: &V, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
