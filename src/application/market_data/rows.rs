//! Mapping of provider-native rows into [`Candle`].
//!
//! Rows missing any required field, or carrying a value that cannot be read
//! as a number or a representable timestamp, are dropped.

use crate::domain::market::Candle;
use crate::domain::ports::{PolygonAgg, ProviderRows, TwelveDataRow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Epoch values at or above this magnitude are milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn epoch_to_seconds(raw: f64) -> Option<i64> {
    if !raw.is_finite() {
        return None;
    }
    let seconds = if raw.abs() >= EPOCH_MILLIS_THRESHOLD {
        raw / 1000.0
    } else {
        raw
    };
    representable(seconds.floor() as i64)
}

/// Keeps `seconds` only if it is a valid UTC instant; `as` saturates huge floats.
fn representable(seconds: i64) -> Option<i64> {
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|_| seconds)
}

/// Unix seconds from an epoch number (seconds or milliseconds), a numeric
/// string, an RFC 3339 string, a naive UTC date-time or a bare date.
pub fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => epoch_to_seconds(n.as_f64()?),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<f64>() {
        return epoch_to_seconds(n);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// Finite float from a JSON number or numeric string.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

fn field(value: Option<&Value>) -> Option<f64> {
    value.and_then(coerce_f64)
}

fn from_binance(row: &[Value]) -> Option<Candle> {
    Some(Candle::new(
        parse_timestamp(row.first()?)?,
        field(row.get(1))?,
        field(row.get(2))?,
        field(row.get(3))?,
        field(row.get(4))?,
    ))
}

fn from_twelvedata(row: &TwelveDataRow) -> Option<Candle> {
    Some(Candle::new(
        parse_timestamp(row.datetime.as_ref()?)?,
        field(row.open.as_ref())?,
        field(row.high.as_ref())?,
        field(row.low.as_ref())?,
        field(row.close.as_ref())?,
    ))
}

fn from_polygon(row: &PolygonAgg) -> Option<Candle> {
    Some(Candle::new(
        parse_timestamp(row.t.as_ref()?)?,
        field(row.o.as_ref())?,
        field(row.h.as_ref())?,
        field(row.l.as_ref())?,
        field(row.c.as_ref())?,
    ))
}

/// Parsed candles (unsorted, possibly duplicated) and the number of rows dropped.
pub fn to_candles(rows: &ProviderRows) -> (Vec<Candle>, usize) {
    let candles: Vec<Candle> = match rows {
        ProviderRows::Binance(rows) => rows.iter().filter_map(|r| from_binance(r)).collect(),
        ProviderRows::TwelveData(rows) => rows.iter().filter_map(from_twelvedata).collect(),
        ProviderRows::Polygon(rows) => rows.iter().filter_map(from_polygon).collect(),
    };
    let dropped = rows.len() - candles.len();
    (candles, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_epoch_seconds_and_millis() {
        assert_eq!(parse_timestamp(&json!(1_704_067_200)), Some(1_704_067_200));
        assert_eq!(parse_timestamp(&json!(1_704_067_200_000i64)), Some(1_704_067_200));
        assert_eq!(parse_timestamp(&json!("1704067200000")), Some(1_704_067_200));
        assert_eq!(parse_timestamp(&json!(1_704_067_200.5)), Some(1_704_067_200));
    }

    #[test]
    fn test_iso_strings() {
        assert_eq!(
            parse_timestamp(&json!("2024-01-01T00:00:00Z")),
            Some(1_704_067_200)
        );
        assert_eq!(
            parse_timestamp(&json!("2024-01-01T02:00:00+02:00")),
            Some(1_704_067_200)
        );
        assert_eq!(
            parse_timestamp(&json!("2024-01-01 00:05:00")),
            Some(1_704_067_500)
        );
        assert_eq!(parse_timestamp(&json!("2024-01-01")), Some(1_704_067_200));
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce_f64(&json!("1.25")), Some(1.25));
        assert_eq!(coerce_f64(&json!(2)), Some(2.0));
        assert_eq!(coerce_f64(&json!("abc")), None);
        assert_eq!(coerce_f64(&json!("NaN")), None);
        assert_eq!(coerce_f64(&json!(true)), None);
    }

    #[test]
    fn test_binance_rows() {
        let rows = ProviderRows::Binance(vec![
            vec![
                json!(1_704_067_200_000i64),
                json!("42000.1"),
                json!("42100.0"),
                json!("41900.5"),
                json!("42050.0"),
                json!("12.5"),
            ],
            // Truncated row
            vec![json!(1_704_067_260_000i64), json!("1.0")],
        ]);

        let (candles, dropped) = to_candles(&rows);
        assert_eq!(dropped, 1);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].timestamp, 1_704_067_200);
        assert_eq!(candles[0].close, 42050.0);
    }

    #[test]
    fn test_twelvedata_rows_tolerate_missing_fields() {
        let rows: Vec<TwelveDataRow> = serde_json::from_value(json!([
            {"datetime": "2024-01-01 01:00:00", "open": "2050.1", "high": "2055", "low": "2049", "close": "2052.3"},
            {"datetime": "2024-01-01 00:00:00", "open": "2048", "high": "2051", "low": "2047"},
        ]))
        .unwrap();

        let (candles, dropped) = to_candles(&ProviderRows::TwelveData(rows));
        assert_eq!(dropped, 1);
        assert_eq!(candles[0].timestamp, 1_704_070_800);
        assert_eq!(candles[0].close, 2052.3);
    }

    #[test]
    fn test_polygon_rows() {
        let rows: Vec<PolygonAgg> = serde_json::from_value(json!([
            {"t": 1_704_067_200_000i64, "o": 1.1, "h": 1.2, "l": 1.0, "c": 1.15, "v": 10},
        ]))
        .unwrap();

        let (candles, dropped) = to_candles(&ProviderRows::Polygon(rows));
        assert_eq!(dropped, 0);
        assert_eq!(candles[0], Candle::new(1_704_067_200, 1.1, 1.2, 1.0, 1.15));
    }

    #[test]
    fn test_unrepresentable_timestamps_are_dropped() {
        assert_eq!(parse_timestamp(&json!(1e300)), None);
        assert_eq!(parse_timestamp(&json!(-1e300)), None);
        assert_eq!(parse_timestamp(&json!("9e30")), None);

        let rows: Vec<PolygonAgg> = serde_json::from_value(json!([
            {"t": -1e300, "o": 1.1, "h": 1.2, "l": 1.0, "c": 1.15},
            {"t": 1e300, "o": 1.1, "h": 1.2, "l": 1.0, "c": 1.15},
            {"t": 1_704_067_200_000i64, "o": 1.1, "h": 1.2, "l": 1.0, "c": 1.15},
        ]))
        .unwrap();
        let (candles, dropped) = to_candles(&ProviderRows::Polygon(rows));
        assert_eq!(dropped, 2);
        assert_eq!(candles[0].timestamp, 1_704_067_200);
    }
}
