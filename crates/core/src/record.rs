use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Label used for records without an entity identifier.
pub const UNKNOWN_ENTITY: &str = "<unknown>";

/// Read a nullable string, mapping `null` to empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The fixed set of numeric measurements carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Temperature,
    Humidity,
    Pressure,
    WindSpeed,
}

impl Measurement {
    /// All measurement columns, in wire order.
    pub const ALL: [Measurement; 4] = [
        Measurement::Temperature,
        Measurement::Humidity,
        Measurement::Pressure,
        Measurement::WindSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::Temperature => "temperature",
            Measurement::Humidity => "humidity",
            Measurement::Pressure => "pressure",
            Measurement::WindSpeed => "wind_speed",
        }
    }
}

impl std::fmt::Display for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observation for one entity (city).
///
/// Numeric fields may be individually absent; absence is a data-quality
/// finding, not a parse failure. A null or absent entity id reads as blank.
/// The timestamp is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "city", default, deserialize_with = "null_as_empty")]
    pub entity: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default, rename = "weather_condition")]
    pub condition: Option<String>,
}

impl Record {
    /// Create a record with every measurement missing.
    pub fn new(entity: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            entity: entity.into(),
            timestamp,
            temperature: None,
            humidity: None,
            pressure: None,
            wind_speed: None,
            condition: None,
        }
    }

    /// Value of a measurement column, `None` when missing or NaN.
    pub fn value(&self, measurement: Measurement) -> Option<f64> {
        let v = match measurement {
            Measurement::Temperature => self.temperature,
            Measurement::Humidity => self.humidity,
            Measurement::Pressure => self.pressure,
            Measurement::WindSpeed => self.wind_speed,
        };
        v.filter(|x| !x.is_nan())
    }

    pub fn set_value(&mut self, measurement: Measurement, value: Option<f64>) {
        let slot = match measurement {
            Measurement::Temperature => &mut self.temperature,
            Measurement::Humidity => &mut self.humidity,
            Measurement::Pressure => &mut self.pressure,
            Measurement::WindSpeed => &mut self.wind_speed,
        };
        *slot = value;
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, measurement: Measurement, value: f64) -> Self {
        self.set_value(measurement, Some(value));
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn has_entity(&self) -> bool {
        !self.entity.trim().is_empty()
    }

    /// Entity id for grouping and messages; [`UNKNOWN_ENTITY`] when blank.
    pub fn label(&self) -> &str {
        if self.has_entity() {
            &self.entity
        } else {
            UNKNOWN_ENTITY
        }
    }

    pub fn has_condition(&self) -> bool {
        self.condition
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }

    /// Number of measurement cells that are missing in this record.
    pub fn missing_measurements(&self) -> usize {
        Measurement::ALL
            .iter()
            .filter(|m| self.value(**m).is_none())
            .count()
    }
}
