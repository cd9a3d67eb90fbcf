// Reading domain models
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A reading exactly as the data source sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawReading {
    #[serde(rename = "epochtime", alias = "time")]
    pub time: i64,
    #[serde(default)]
    pub value: ReadingValue,
    #[serde(rename = "statusId", alias = "status_id", default)]
    pub status_id: String,
}

impl RawReading {
    #[cfg(test)]
    pub fn new(time: i64, value: impl Into<ReadingValue>, status_id: impl Into<String>) -> Self {
        Self {
            time,
            value: value.into(),
            status_id: status_id.into(),
        }
    }
}

/// The upstream table stores values as strings, so both shapes show up on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ReadingValue {
    /// Returns the value as a finite number, or `None` if it cannot be plotted.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            ReadingValue::Number(n) => *n,
            ReadingValue::Text(s) => s.trim().parse::<f64>().ok()?,
            ReadingValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl Default for ReadingValue {
    fn default() -> Self {
        ReadingValue::Other(serde_json::Value::Null)
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        ReadingValue::Number(value)
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        ReadingValue::Text(value.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(value: String) -> Self {
        ReadingValue::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A display-ready point: millisecond time, finite value, resolved color.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotPoint {
    pub time_millis: i64,
    pub value: f64,
    pub color: RgbColor,
}

impl PlotPoint {
    pub fn new(time_millis: i64, value: f64, color: RgbColor) -> Self {
        Self {
            time_millis,
            value,
            color,
        }
    }
}
