//! Lenient numeric coercion for external input.
//!
//! Rates and part data arrive from form fields and report parsers, so a
//! value may be a JSON number, a numeric string, `null`, or garbage. None of
//! these is an error here: each helper maps the value onto the documented
//! default instead.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Read a value as a finite `f64`, accepting numbers and numeric strings.
fn as_finite(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        // Decimal comma is common in the source reports
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Non-negative amount: rates, cutting times, weights.
///
/// Missing, non-numeric, non-finite and negative values all become 0.
pub fn amount(value: &Value) -> f64 {
    as_finite(value).map(non_negative).unwrap_or(0.0)
}

/// [`amount`] for a value that is already a float.
pub fn non_negative(n: f64) -> f64 {
    if n.is_finite() && n >= 0.0 {
        n
    } else {
        0.0
    }
}

/// Piece count: anything that is not a number of at least 1 becomes 1.
///
/// Fractional counts are truncated, so `2.7` is two pieces.
pub fn quantity(value: &Value) -> u32 {
    match as_finite(value) {
        Some(n) if n >= 1.0 => n.min(u32::MAX as f64) as u32,
        _ => 1,
    }
}

/// Bending count as typed by the user; sign is kept so the calculator can
/// clamp it. Non-numeric input becomes 0.
pub fn bending_count(value: &Value) -> i64 {
    as_finite(value)
        .map(|n| n.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        .unwrap_or(0)
}

/// `deserialize_with` adapter for [`amount`].
pub fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(amount(&value))
}

/// `deserialize_with` adapter for [`quantity`].
pub fn de_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(quantity(&value))
}

/// `deserialize_with` adapter for [`bending_count`].
pub fn de_bending_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(bending_count(&value))
}

/// `deserialize_with` adapter that renders any scalar as a string.
///
/// Report headers sometimes come through as numbers (`"program_counts": 1`).
pub fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Like [`de_text`], but `null` stays `None`.
pub fn de_opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount() {
        assert_eq!(amount(&json!(4.5)), 4.5);
        assert_eq!(amount(&json!("6")), 6.0);
        assert_eq!(amount(&json!(" 2,5 ")), 2.5);
        assert_eq!(amount(&json!(null)), 0.0);
        assert_eq!(amount(&json!("abc")), 0.0);
        assert_eq!(amount(&json!(-3.0)), 0.0);
        assert_eq!(amount(&json!("NaN")), 0.0);
        assert_eq!(amount(&json!("inf")), 0.0);
        assert_eq!(amount(&json!([1, 2])), 0.0);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(2.5), 2.5);
        assert_eq!(non_negative(0.0), 0.0);
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        assert_eq!(quantity(&json!(3)), 3);
        assert_eq!(quantity(&json!("12")), 12);
        assert_eq!(quantity(&json!(2.7)), 2);
        assert_eq!(quantity(&json!(0)), 1);
        assert_eq!(quantity(&json!(-4)), 1);
        assert_eq!(quantity(&json!(null)), 1);
        assert_eq!(quantity(&json!("")), 1);
    }

    #[test]
    fn test_bending_count_keeps_sign() {
        assert_eq!(bending_count(&json!(4)), 4);
        assert_eq!(bending_count(&json!(-3)), -3);
        assert_eq!(bending_count(&json!("x")), 0);
    }

    #[test]
    fn test_deserialize_adapters() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "de_amount")]
            weight: f64,
            #[serde(deserialize_with = "de_quantity")]
            count: u32,
            #[serde(deserialize_with = "de_text")]
            label: String,
        }

        let row: Row = serde_json::from_str(r#"{"weight": "1.25", "count": null, "label": 7}"#).unwrap();
        assert_eq!(row.weight, 1.25);
        assert_eq!(row.count, 1);
        assert_eq!(row.label, "7");
    }

    #[test]
    fn test_optional_text() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "de_opt_text")]
            material: Option<String>,
        }

        let parse = |json: &str| serde_json::from_str::<Row>(json).unwrap().material;
        assert_eq!(parse(r#"{"material": 1.4301}"#).as_deref(), Some("1.4301"));
        assert_eq!(parse(r#"{"material": "ST37"}"#).as_deref(), Some("ST37"));
        assert_eq!(parse(r#"{"material": null}"#), None);
        assert_eq!(parse("{}"), None);
    }
}
