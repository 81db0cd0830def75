use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use stocky_core::{
    portfolio::{OverviewService, OverviewServiceTrait, ValuationService, ValuationServiceTrait},
    quotes::{QuoteService, QuoteServiceTrait},
    rewards::{RewardService, RewardServiceTrait},
};
use stocky_market_data::{PriceSource, RandomPriceSource};
use stocky_storage_sqlite::{
    db, HoldingsRepository, PositionRepository, QuoteRepository, RewardRepository,
    StockRepository,
};

pub struct AppState {
    pub reward_service: Arc<dyn RewardServiceTrait>,
    pub overview_service: Arc<dyn OverviewServiceTrait>,
    pub valuation_service: Arc<dyn ValuationServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("STOCKY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&db::get_db_path(&config.db_path))?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let quote_repository = Arc::new(QuoteRepository::new(pool.clone(), writer.clone()));
    let stock_repository = Arc::new(StockRepository::new(pool.clone(), writer.clone()));
    let reward_repository = Arc::new(RewardRepository::new(pool.clone(), writer.clone()));
    let position_repository = Arc::new(PositionRepository::new(pool.clone()));
    let holdings_repository = Arc::new(HoldingsRepository::new(pool.clone(), writer.clone()));

    let price_source: Arc<dyn PriceSource> =
        Arc::new(RandomPriceSource::new(config.price_source.clone())?);
    tracing::info!(
        "Price source {} (floor {}, ceil {})",
        price_source.id(),
        config.price_source.floor,
        config.price_source.ceil
    );

    let quote_service: Arc<dyn QuoteServiceTrait> = Arc::new(QuoteService::new(
        quote_repository,
        stock_repository,
        Some(price_source),
        config.deadlines,
    ));

    let reward_service: Arc<dyn RewardServiceTrait> = Arc::new(RewardService::new(
        reward_repository.clone(),
        quote_service.clone(),
        config.fees,
        config.deadlines,
    ));

    let valuation_service: Arc<dyn ValuationServiceTrait> = Arc::new(ValuationService::new(
        quote_service.clone(),
        position_repository.clone(),
        holdings_repository.clone(),
        config.deadlines,
    ));

    let overview_service: Arc<dyn OverviewServiceTrait> = Arc::new(OverviewService::new(
        reward_repository,
        position_repository,
        holdings_repository,
        quote_service,
    ));

    Ok(Arc::new(AppState {
        reward_service,
        overview_service,
        valuation_service,
    }))
}
