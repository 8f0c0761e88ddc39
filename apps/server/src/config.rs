use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use argentum_core::{
    constants::{
        DEFAULT_LOCAL_CURRENCY, DEFAULT_SILVER_GRAMS, DEFAULT_SURCHARGE_RATE,
        GRAMS_PER_TROY_OUNCE, SOURCE_CURRENCY,
    },
    valuation::ValuationSettings,
};
use argentum_market_data::DEFAULT_FETCH_TIMEOUT;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub static_dir: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub fetch_timeout: Duration,
    pub silver_grams: f64,
    pub surcharge_rate: f64,
    pub local_currency: String,
    pub metal_price_api_key: Option<String>,
    pub admin_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: "public".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            silver_grams: DEFAULT_SILVER_GRAMS,
            surcharge_rate: DEFAULT_SURCHARGE_RATE,
            local_currency: DEFAULT_LOCAL_CURRENCY.to_string(),
            metal_price_api_key: None,
            admin_token: None,
        }
    }
}

impl Config {
    /// Read `AG_*` variables, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = parse_var("AG_LISTEN_ADDR", defaults.listen_addr)?;
        let static_dir = optional_var("AG_STATIC_DIR").unwrap_or(defaults.static_dir);
        let cors_allow = optional_var("AG_CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_allow);
        let request_timeout = parse_timeout("AG_REQUEST_TIMEOUT_MS", defaults.request_timeout)?;
        let fetch_timeout = parse_timeout("AG_FETCH_TIMEOUT_MS", defaults.fetch_timeout)?;

        Ok(Self {
            listen_addr,
            static_dir,
            cors_allow,
            request_timeout,
            fetch_timeout,
            silver_grams: parse_var("AG_SILVER_GRAMS", defaults.silver_grams)?,
            surcharge_rate: parse_var("AG_SURCHARGE_RATE", defaults.surcharge_rate)?,
            local_currency: optional_var("AG_LOCAL_CURRENCY")
                .map(|c| c.to_uppercase())
                .unwrap_or(defaults.local_currency),
            metal_price_api_key: optional_var("AG_METAL_PRICE_API_KEY"),
            admin_token: optional_var("AG_ADMIN_TOKEN"),
        })
    }

    pub fn valuation_settings(&self) -> ValuationSettings {
        ValuationSettings {
            grams: self.silver_grams,
            grams_per_troy_ounce: GRAMS_PER_TROY_OUNCE,
            surcharge_rate: self.surcharge_rate,
            source_currency: SOURCE_CURRENCY.to_string(),
            local_currency: self.local_currency.clone(),
        }
    }
}

/// Non-blank value of `key`, trimmed.
fn optional_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

/// Millisecond timeout from `key`; zero is rejected.
fn parse_timeout(key: &str, default: Duration) -> anyhow::Result<Duration> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    let ms: u64 = parse_var(key, default_ms)?;
    if ms == 0 {
        anyhow::bail!("Invalid {}: timeout must be greater than 0 ms", key);
    }
    Ok(Duration::from_millis(ms))
}
