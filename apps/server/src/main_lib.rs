use std::path::PathBuf;
use std::sync::Arc;

use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use argentum_core::valuation::{ValuationService, ValuationServiceTrait};
use argentum_market_data::{Fetcher, HttpFetcher, ProviderRegistry};

use crate::config::Config;

pub struct AppState {
    pub valuation_service: Arc<dyn ValuationServiceTrait + Send + Sync>,
    pub admin_token: Option<String>,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::with_timeout(config.fetch_timeout));
    let registry = ProviderRegistry::default_chains(
        fetcher,
        &config.local_currency,
        config.metal_price_api_key.as_deref(),
    );

    let valuation_service = ValuationService::from_registry(registry, config.valuation_settings())?;

    Ok(Arc::new(AppState {
        valuation_service: Arc::new(valuation_service),
        admin_token: config.admin_token.clone(),
    }))
}

/// Files under `static_dir`, with `index.html` for unknown paths.
pub fn static_service(static_dir: impl Into<PathBuf>) -> ServeDir<ServeFile> {
    let static_dir = static_dir.into();
    let index_file = static_dir.join("index.html");
    ServeDir::new(static_dir).fallback(ServeFile::new(index_file))
}
