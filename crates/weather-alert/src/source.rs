//! Weather data sources.
//!
//! [`OpenMeteoClient`] polls the Open-Meteo forecast API; [`FileSource`]
//! replays a local JSON file with the same shape for offline runs.
//! Both parse the body with [`parse_reading`].

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use crate::reading::WeatherReading;

// ── Constants ───────────────────────────────────────────────────────

/// Default Open-Meteo endpoint (Berlin, current conditions only).
pub const DEFAULT_ENDPOINT: &str =
    "https://api.open-meteo.com/v1/forecast?latitude=52.52&longitude=13.41&current_weather=true";

/// Object in the response body holding the current conditions.
const CURRENT_WEATHER_KEY: &str = "current_weather";

const TEMPERATURE_KEYS: &[&str] = &["temperature", "temperature_2m"];
const WIND_SPEED_KEYS: &[&str] = &["wind_speed", "windspeed", "wind_speed_10m"];
const HUMIDITY_KEYS: &[&str] = &["humidity", "relative_humidity_2m"];

// ── Errors ──────────────────────────────────────────────────────────

/// Errors from fetching a reading. The service recovers all of them as an
/// empty reading.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {0})")]
    Status(u16),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

// ── Source trait ────────────────────────────────────────────────────

/// Anything that can produce the current weather on demand.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch(&self) -> Result<WeatherReading, FetchError>;
}

/// Parse a weather JSON body into a reading.
///
/// Missing `current_weather`, missing fields and non-numeric fields all map
/// to absent values. Only a body that is not JSON at all is an error.
pub fn parse_reading(body: &str) -> Result<WeatherReading, FetchError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let Some(current) = json.get(CURRENT_WEATHER_KEY) else {
        log::warn!("No '{}' data found in response", CURRENT_WEATHER_KEY);
        return Ok(WeatherReading::empty());
    };

    Ok(WeatherReading::new(
        number_field(current, TEMPERATURE_KEYS),
        number_field(current, WIND_SPEED_KEYS),
        number_field(current, HUMIDITY_KEYS),
    ))
}

/// First numeric value found under any of `keys`.
fn number_field(object: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| object.get(*key).and_then(Value::as_f64))
}

// ── Open-Meteo client ───────────────────────────────────────────────

/// HTTP source backed by a reqwest client with a request timeout.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenMeteoClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    async fn fetch(&self) -> Result<WeatherReading, FetchError> {
        log::debug!("Fetching weather data from {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_reading(&body)
    }
}

// ── Mock file source ────────────────────────────────────────────────

/// Reads the API response shape from a local file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WeatherSource for FileSource {
    async fn fetch(&self) -> Result<WeatherReading, FetchError> {
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_reading(&body)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_meteo_body() {
        let body = r#"{
            "latitude": 52.52,
            "longitude": 13.419998,
            "current_weather": {
                "time": "2024-07-01T12:00",
                "temperature": 21.4,
                "windspeed": 11.2,
                "winddirection": 250,
                "weathercode": 3
            }
        }"#;
        let reading = parse_reading(body).unwrap();
        assert_eq!(reading.temperature(), Some(21.4));
        assert_eq!(reading.wind_speed(), Some(11.2));
        assert_eq!(reading.humidity(), None);
    }

    #[test]
    fn parses_spelled_out_field_names() {
        let body = r#"{"current_weather": {"temperature": -3, "wind_speed": 4.5, "humidity": 88}}"#;
        let reading = parse_reading(body).unwrap();
        assert_eq!(reading.temperature(), Some(-3.0));
        assert_eq!(reading.wind_speed(), Some(4.5));
        assert_eq!(reading.humidity(), Some(88.0));
    }

    #[test]
    fn missing_current_weather_is_empty() {
        assert!(parse_reading("{}").unwrap().is_empty());
        assert!(parse_reading(r#"{"error": true}"#).unwrap().is_empty());
        assert!(parse_reading("[]").unwrap().is_empty());
    }

    #[test]
    fn non_numeric_fields_are_absent() {
        let body = r#"{"current_weather": {"temperature": "hot", "windspeed": null, "humidity": 40}}"#;
        let reading = parse_reading(body).unwrap();
        assert_eq!(reading.temperature(), None);
        assert_eq!(reading.wind_speed(), None);
        assert_eq!(reading.humidity(), Some(40.0));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        match parse_reading("{not json") {
            Err(FetchError::Parse(_)) => {}
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn file_source_reads_mock_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mock_weather_data.json");
        std::fs::write(&path, r#"{"current_weather": {"temperature": 33.0}}"#).unwrap();

        let source = FileSource::new(&path);
        let reading = source.fetch().await.unwrap();
        assert_eq!(reading.temperature(), Some(33.0));
    }

    #[tokio::test]
    async fn file_source_missing_file_is_io_error() {
        let source = FileSource::new("/nonexistent/mock_weather_data.json");
        assert!(matches!(source.fetch().await, Err(FetchError::Io(_))));
    }
}
