//! Normalization of provider values into canonical forms.
//!
//! Providers disagree on how numbers and times are written: decimal commas,
//! thousands separators, unix seconds versus milliseconds, ISO strings,
//! RFC 2822 dates and locale-formatted dates. Everything funnels through the
//! helpers here so each provider parser only has to find the right field.
//!
//! Unparseable input is reported as `None`, never as a sentinel value.

mod number;
mod timestamp;

pub use number::{number_from_value, parse_number};
pub use timestamp::{parse_timestamp, timestamp_from_unix, timestamp_from_value};
