//! Lenient field decoders for client payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

/// Epoch numbers above this magnitude are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 2e10;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Epoch(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWhole {
    Int(i64),
    Float(f64),
}

/// Optional timestamp given as RFC 3339, as an ISO date-time or date without
/// offset (read as UTC), or as Unix epoch seconds or milliseconds.
pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text).map(Some).map_err(de::Error::custom),
        Some(RawTimestamp::Epoch(value)) => from_epoch(value).map(Some).map_err(de::Error::custom),
    }
}

/// Integer that also accepts floats with no fractional part, such as `2.0`.
pub fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawWhole::deserialize(deserializer)? {
        RawWhole::Int(n) => Ok(n),
        RawWhole::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        RawWhole::Float(f) => Err(de::Error::custom(format!("expected a whole number, got {f}"))),
    }
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok()) {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)) {
        return Ok(Utc.from_utc_datetime(&midnight));
    }
    Err(format!("invalid timestamp `{text}`"))
}

fn from_epoch(value: f64) -> Result<DateTime<Utc>, String> {
    if !value.is_finite() {
        return Err(format!("invalid epoch timestamp {value}"));
    }
    let seconds = if value.abs() > EPOCH_MILLIS_THRESHOLD { value / 1000.0 } else { value };
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    Utc.timestamp_opt(whole as i64, nanos)
        .single()
        .ok_or_else(|| format!("epoch timestamp {value} out of range"))
}
