use std::borrow::Cow;

use serde_json::Value;

/// Parse a number that may use `.` or `,` as separators.
///
/// When both separators are present, `,` groups thousands and is stripped.
/// When only `,` is present it is the decimal point. Several sources publish
/// European-style decimals, so `"1,234"` is 1.234, not 1234.
///
/// Returns `None` for anything unparseable or non-finite.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let has_comma = trimmed.contains(',');
    let has_dot = trimmed.contains('.');
    let candidate: Cow<'_, str> = match (has_comma, has_dot) {
        (true, true) => Cow::Owned(trimmed.replace(',', "")),
        (true, false) => Cow::Owned(trimmed.replace(',', ".")),
        _ => Cow::Borrowed(trimmed),
    };

    candidate.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a JSON value that may be a number or a numeric string.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}
