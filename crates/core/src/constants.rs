/// Grams in one troy ounce
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1034768;

/// Default quantity of silver to value, in grams
pub const DEFAULT_SILVER_GRAMS: f64 = 9.6;

/// Default surcharge applied to the local value (IGV, 18%)
pub const DEFAULT_SURCHARGE_RATE: f64 = 0.18;

/// Currency the silver providers quote in
pub const SOURCE_CURRENCY: &str = "USD";

/// Default local currency
pub const DEFAULT_LOCAL_CURRENCY: &str = "PEN";
