//! Weather reading snapshot and the set of observable conditions.

use std::fmt;

/// Observable weather conditions that custom thresholds can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Temperature,
    WindSpeed,
    Humidity,
}

impl Condition {
    /// Every condition, in the order custom rules are evaluated.
    pub const ALL: [Condition; 3] = [
        Condition::Temperature,
        Condition::WindSpeed,
        Condition::Humidity,
    ];

    /// Canonical lower-case name, also the key used in the threshold store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Temperature => "temperature",
            Condition::WindSpeed => "wind_speed",
            Condition::Humidity => "humidity",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One snapshot of current weather values.
///
/// Every field is optional: a missing or non-numeric value from the source
/// is `None`, never a sentinel. Non-finite values are dropped on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeatherReading {
    temperature: Option<f64>,
    wind_speed: Option<f64>,
    humidity: Option<f64>,
}

impl WeatherReading {
    pub fn new(temperature: Option<f64>, wind_speed: Option<f64>, humidity: Option<f64>) -> Self {
        Self {
            temperature: temperature.filter(|v| v.is_finite()),
            wind_speed: wind_speed.filter(|v| v.is_finite()),
            humidity: humidity.filter(|v| v.is_finite()),
        }
    }

    /// The all-absent reading produced when a fetch fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn wind_speed(&self) -> Option<f64> {
        self.wind_speed
    }

    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// Value observed for `condition`, if any.
    pub fn value(&self, condition: Condition) -> Option<f64> {
        match condition {
            Condition::Temperature => self.temperature,
            Condition::WindSpeed => self.wind_speed,
            Condition::Humidity => self.humidity,
        }
    }

    pub fn is_empty(&self) -> bool {
        Condition::ALL.iter().all(|c| self.value(*c).is_none())
    }
}
