//! User-defined alert thresholds, keyed by case-insensitive condition name.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

/// Thread-safe map from condition name to an upper-bound threshold.
///
/// Names are lower-cased on both write and lookup, so `"Wind_Speed"` and
/// `"wind_speed"` address the same entry. The store itself does not restrict
/// names to the conditions a reading carries.
#[derive(Debug, Default)]
pub struct ThresholdStore {
    inner: RwLock<HashMap<String, f64>>,
}

/// Canonical store key for a condition name.
pub(crate) fn normalize(condition: &str) -> String {
    condition.trim().to_lowercase()
}

impl ThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store seeded from configuration.
    pub fn from_map<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let store = Self::new();
        for (condition, threshold) in entries {
            store.set(condition, *threshold);
        }
        store
    }

    /// Store `threshold` for `condition`, overwriting any previous value.
    ///
    /// Non-finite thresholds and blank names are ignored; returns whether
    /// the value was stored.
    pub fn set(&self, condition: &str, threshold: f64) -> bool {
        let key = normalize(condition);
        if key.is_empty() || !threshold.is_finite() {
            log::warn!(
                "Ignoring invalid threshold '{}' = {}",
                condition,
                threshold
            );
            return false;
        }

        let mut map = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.clone(), threshold);
        log::info!("Threshold set: {} > {}", key, threshold);
        true
    }

    pub fn get(&self, condition: &str) -> Option<f64> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&normalize(condition)).copied()
    }

    /// Consistent, ordered copy of every registered threshold.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        let map = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        map.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn lookup_is_case_insensitive() {
        let store = ThresholdStore::new();
        assert!(store.set("Temperature", 25.0));
        assert_eq!(store.get("temperature"), Some(25.0));
        assert_eq!(store.get("TEMPERATURE"), Some(25.0));

        store.set("wind_speed", 10.0);
        assert_eq!(store.get("Wind_Speed"), Some(10.0));
    }

    #[test]
    fn last_write_wins() {
        let store = ThresholdStore::new();
        store.set("humidity", 80.0);
        store.set("HUMIDITY", 70.0);
        assert_eq!(store.get("humidity"), Some(70.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unset_condition_is_absent() {
        let store = ThresholdStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("wind_speed"), None);
    }

    #[test]
    fn invalid_input_is_ignored() {
        let store = ThresholdStore::new();
        assert!(!store.set("temperature", f64::NAN));
        assert!(!store.set("temperature", f64::INFINITY));
        assert!(!store.set("   ", 3.0));
        assert!(store.is_empty());
    }

    #[test]
    fn negative_and_unknown_names_are_accepted() {
        let store = ThresholdStore::new();
        assert!(store.set("pressure", -12.5));
        assert_eq!(store.get("Pressure"), Some(-12.5));
    }

    #[test]
    fn seeded_from_map() {
        let mut entries = HashMap::new();
        entries.insert("Wind_Speed".to_string(), 10.0);
        entries.insert("humidity".to_string(), 90.0);
        let store = ThresholdStore::from_map(&entries);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("wind_speed"), Some(&10.0));
        assert_eq!(snapshot.get("humidity"), Some(&90.0));
    }

    #[test]
    fn concurrent_writes_and_reads() {
        let store = Arc::new(ThresholdStore::new());
        let writers: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for n in 0..100 {
                        store.set("temperature", (i * 100 + n) as f64);
                    }
                })
            })
            .collect();

        for _ in 0..100 {
            if let Some(v) = store.get("temperature") {
                assert!(v >= 0.0 && v < 400.0);
            }
        }
        for handle in writers {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 1);
    }
}
