//! Market data models
//!
//! - `quote` - Quote data structure and the quantity kind it belongs to

mod quote;

pub use quote::{Quote, QuoteKind};
