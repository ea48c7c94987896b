//! Alert rules and status summaries.
//!
//! Two rule families run against every reading:
//!
//! - the fixed extreme-temperature rule (`t > 30°C` or `t < 5°C`)
//! - custom per-condition rules from the [`ThresholdStore`] (`value > threshold`)
//!
//! Everything here is pure. Publishing belongs to the service.

use crate::reading::{Condition, WeatherReading};
use crate::thresholds::ThresholdStore;

/// Above this temperature (°C) the fixed rule fires.
pub const HOT_LIMIT_C: f64 = 30.0;

/// Below this temperature (°C) the fixed rule fires.
pub const COLD_LIMIT_C: f64 = 5.0;

/// Static text published for the fixed extreme-temperature rule.
pub const EXTREME_TEMPERATURE_MESSAGE: &str = "Extreme temperature alert! Take precautions.";

/// Summary published when the reading carries no temperature.
pub const NO_DATA_MESSAGE: &str = "Unable to fetch weather update at this time.";

/// A rule violation found in one reading.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Fixed rule: temperature outside the comfortable band.
    ExtremeTemperature { temperature: f64 },
    /// User rule: observed value strictly above the registered threshold.
    Custom {
        condition: Condition,
        threshold: f64,
        value: f64,
    },
}

impl Alert {
    /// Text published on the alerts channel.
    pub fn message(&self) -> String {
        match self {
            Alert::ExtremeTemperature { .. } => EXTREME_TEMPERATURE_MESSAGE.to_string(),
            Alert::Custom {
                condition,
                threshold,
                value,
            } => format!(
                "Custom alert: {} exceeds {:.2}! Current value: {:.2}",
                condition, threshold, value
            ),
        }
    }
}

/// Outcome of evaluating one reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Fixed alert first (if any), then custom alerts in condition order.
    pub alerts: Vec<Alert>,
}

impl Evaluation {
    pub fn triggered(&self) -> bool {
        !self.alerts.is_empty()
    }
}

/// Check the fixed extreme-temperature rule.
pub fn check_extreme_temperature(reading: &WeatherReading) -> Option<Alert> {
    let temperature = reading.temperature()?;
    (temperature > HOT_LIMIT_C || temperature < COLD_LIMIT_C)
        .then_some(Alert::ExtremeTemperature { temperature })
}

/// Check one custom rule. Equality with the threshold does not trigger.
pub fn check_custom(
    reading: &WeatherReading,
    condition: Condition,
    store: &ThresholdStore,
) -> Option<Alert> {
    let value = reading.value(condition)?;
    let threshold = store.get(condition.as_str())?;
    (value > threshold).then_some(Alert::Custom {
        condition,
        threshold,
        value,
    })
}

/// Run both rule families against `reading`.
pub fn evaluate(reading: &WeatherReading, store: &ThresholdStore) -> Evaluation {
    let alerts = check_extreme_temperature(reading)
        .into_iter()
        .chain(
            Condition::ALL
                .iter()
                .filter_map(|c| check_custom(reading, *c, store)),
        )
        .collect();
    Evaluation { alerts }
}

/// Human-readable status line for the updates channel. Never fails.
pub fn summarize(reading: &WeatherReading) -> String {
    let Some(temperature) = reading.temperature() else {
        return NO_DATA_MESSAGE.to_string();
    };

    let comment = if temperature > HOT_LIMIT_C {
        "You can wear a T-shirt today!"
    } else if temperature < COLD_LIMIT_C {
        "Don't forget your jacket!"
    } else {
        "Weather is moderate. Dress comfortably!"
    };

    // `{:?}` keeps the decimal point on whole numbers (32.0, not 32)
    format!("Current temperature: {:?}°C. {}", temperature, comment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp(t: f64) -> WeatherReading {
        WeatherReading::new(Some(t), None, None)
    }

    #[test]
    fn fixed_rule_boundaries() {
        let store = ThresholdStore::new();
        for (t, expected) in [
            (30.0, false),
            (30.01, true),
            (5.0, false),
            (4.99, true),
            (-10.0, true),
            (18.0, false),
        ] {
            assert_eq!(
                evaluate(&temp(t), &store).triggered(),
                expected,
                "temperature {}",
                t
            );
        }
    }

    #[test]
    fn absent_temperature_never_triggers() {
        let store = ThresholdStore::new();
        store.set("temperature", -100.0);
        let reading = WeatherReading::new(None, Some(3.0), None);
        assert_eq!(check_extreme_temperature(&reading), None);
        assert!(!evaluate(&reading, &store).triggered());
    }

    #[test]
    fn hot_reading_without_thresholds() {
        let store = ThresholdStore::new();
        let eval = evaluate(&temp(32.0), &store);
        assert!(eval.triggered());
        assert_eq!(
            eval.alerts,
            vec![Alert::ExtremeTemperature { temperature: 32.0 }]
        );
        assert_eq!(eval.alerts[0].message(), EXTREME_TEMPERATURE_MESSAGE);
    }

    #[test]
    fn wind_speed_over_custom_threshold() {
        let store = ThresholdStore::new();
        store.set("wind_speed", 10.0);
        let reading = WeatherReading::new(Some(20.0), Some(15.0), None);

        let eval = evaluate(&reading, &store);
        assert!(eval.triggered());
        assert_eq!(
            eval.alerts,
            vec![Alert::Custom {
                condition: Condition::WindSpeed,
                threshold: 10.0,
                value: 15.0,
            }]
        );
        assert_eq!(
            eval.alerts[0].message(),
            "Custom alert: wind_speed exceeds 10.00! Current value: 15.00"
        );
    }

    #[test]
    fn equality_does_not_trigger_custom_rule() {
        let store = ThresholdStore::new();
        store.set("humidity", 80.0);
        let reading = WeatherReading::new(None, None, Some(80.0));
        assert_eq!(check_custom(&reading, Condition::Humidity, &store), None);

        let reading = WeatherReading::new(None, None, Some(80.5));
        assert!(check_custom(&reading, Condition::Humidity, &store).is_some());
    }

    #[test]
    fn custom_rule_needs_value_and_threshold() {
        let store = ThresholdStore::new();
        let reading = WeatherReading::new(None, Some(50.0), None);
        assert_eq!(check_custom(&reading, Condition::WindSpeed, &store), None);

        store.set("humidity", 1.0);
        assert_eq!(check_custom(&reading, Condition::Humidity, &store), None);
    }

    #[test]
    fn threshold_registered_with_mixed_case() {
        let store = ThresholdStore::new();
        store.set("Wind_Speed", 10.0);
        let reading = WeatherReading::new(None, Some(11.0), None);
        assert!(evaluate(&reading, &store).triggered());
    }

    #[test]
    fn fixed_and_custom_alerts_together() {
        let store = ThresholdStore::new();
        store.set("temperature", 31.0);
        store.set("humidity", 50.0);
        let reading = WeatherReading::new(Some(35.0), Some(2.0), Some(60.0));

        let eval = evaluate(&reading, &store);
        assert_eq!(eval.alerts.len(), 3);
        assert!(matches!(eval.alerts[0], Alert::ExtremeTemperature { .. }));
        assert!(matches!(
            eval.alerts[1],
            Alert::Custom {
                condition: Condition::Temperature,
                ..
            }
        ));
        assert!(matches!(
            eval.alerts[2],
            Alert::Custom {
                condition: Condition::Humidity,
                ..
            }
        ));
    }

    #[test]
    fn empty_reading_yields_nothing() {
        let store = ThresholdStore::new();
        store.set("wind_speed", 0.0);
        let eval = evaluate(&WeatherReading::empty(), &store);
        assert!(!eval.triggered());
        assert!(eval.alerts.is_empty());
    }

    #[test]
    fn summary_tiers() {
        assert_eq!(
            summarize(&temp(32.0)),
            "Current temperature: 32.0°C. You can wear a T-shirt today!"
        );
        assert_eq!(
            summarize(&temp(2.5)),
            "Current temperature: 2.5°C. Don't forget your jacket!"
        );
        assert_eq!(
            summarize(&temp(30.0)),
            "Current temperature: 30.0°C. Weather is moderate. Dress comfortably!"
        );
        assert_eq!(
            summarize(&temp(5.0)),
            "Current temperature: 5.0°C. Weather is moderate. Dress comfortably!"
        );
    }

    #[test]
    fn summary_without_temperature() {
        assert_eq!(summarize(&WeatherReading::empty()), NO_DATA_MESSAGE);
        let reading = WeatherReading::new(None, Some(12.0), Some(40.0));
        assert!(!summarize(&reading).is_empty());
        assert_eq!(summarize(&reading), NO_DATA_MESSAGE);
    }
}
