//! Weather alert node.
//!
//! Polls a weather source on two independent schedules and publishes over
//! Zenoh:
//! - `weather_alerts`: one message per triggered alert (fixed extreme
//!   temperature rule plus user thresholds)
//! - `weather_updates`: one status line per tick
//!
//! Thresholds can be seeded from config and changed at runtime through the
//! `weather_thresholds` queryable.

pub mod config;
pub mod control;
pub mod evaluator;
pub mod publisher;
pub mod reading;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod thresholds;

pub use config::{Config, ConfigError};
pub use evaluator::{evaluate, summarize, Alert, Evaluation};
pub use publisher::{Channel, PublishError, Publisher, ZenohPublisher};
pub use reading::{Condition, WeatherReading};
pub use scheduler::{AlertService, Schedule, ScheduleError, ServiceHandle};
pub use source::{FetchError, FileSource, OpenMeteoClient, WeatherSource};
pub use thresholds::ThresholdStore;
