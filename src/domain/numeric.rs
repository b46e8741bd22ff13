//! Loose numeric parsing for values typed into grade forms.
//!
//! Marks and weightings arrive as whatever the form stored: numbers, numeric
//! strings, strings with trailing text ("75%"), or junk. [`parse_float`] reads
//! the longest leading decimal literal and ignores the rest, yielding `NaN`
//! when there is no numeric prefix at all.

use serde_json::Value;

/// Parses the leading decimal literal of `input`.
///
/// Leading whitespace is skipped, then an optional sign, then either
/// `Infinity` or digits with an optional fraction and exponent.
pub fn parse_float(input: &str) -> f64 {
    let trimmed = input.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if trimmed[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        // "5." is a complete literal, a lone "." is not
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Normalizes one raw form field into a tagged optional.
///
/// `null` and the empty string mean "not filled in" and become `None`.
/// Everything else is parsed, so unparsable text survives as `Some(NaN)`
/// and the aggregation policy decides what to do with it.
pub fn normalize_field(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(parse_float(s)),
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Some(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_float("42"), 42.0);
        assert_eq!(parse_float("0.25"), 0.25);
        assert_eq!(parse_float("-3.5"), -3.5);
        assert_eq!(parse_float("+7"), 7.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("2.5E-1"), 0.25);
    }

    #[test]
    fn test_parse_leading_prefix_only() {
        assert_eq!(parse_float("75%"), 75.0);
        assert_eq!(parse_float("  12.5 marks"), 12.5);
        assert_eq!(parse_float("3e"), 3.0);
        assert_eq!(parse_float("3e+"), 3.0);
        assert_eq!(parse_float("1.2.3"), 1.2);
        assert_eq!(parse_float("Infinity and beyond"), f64::INFINITY);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_without_prefix_is_nan() {
        assert!(parse_float("abc").is_nan());
        assert!(parse_float("").is_nan());
        assert!(parse_float("   ").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float("e5").is_nan());
    }

    #[test]
    fn test_normalize_field() {
        assert_eq!(normalize_field(&Value::Null), None);
        assert_eq!(normalize_field(&json!("")), None);
        assert_eq!(normalize_field(&json!("0.4")), Some(0.4));
        assert_eq!(normalize_field(&json!(80)), Some(80.0));
        assert!(normalize_field(&json!("  ")).unwrap().is_nan());
        assert!(normalize_field(&json!(true)).unwrap().is_nan());
    }
}
