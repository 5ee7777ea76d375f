use std::time::Duration;

use schema::{QueueError, Speed};

const PROCESSING_DELAY_VAR: &str = "ATC_PROCESSING_DELAY_MS";
const BOOT_DELAY_VAR: &str = "ATC_BOOT_DELAY_MS";
const FAST_FORWARD_VAR: &str = "ATC_FAST_FORWARD";
const SLOW_MOTION_VAR: &str = "ATC_SLOW_MOTION";
const AIRCRAFT_CSV_VAR: &str = "ATC_AIRCRAFT_CSV";

/// Runtime settings for the boot & queue services
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Simulated time taken to process each enqueue/dequeue request
    pub processing_delay: Duration,
    /// Simulated time taken to boot the system
    pub boot_delay: Duration,
    pub speed: Speed,
    /// Sample aircraft loaded by the demo binary
    pub aircraft_csv_path: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(100),
            boot_delay: Duration::from_millis(50),
            speed: Speed::RealTime,
            aircraft_csv_path: schema::SAMPLE_AIRCRAFT_CSV_PATH.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Read settings from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, QueueError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the raw value of a variable if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QueueError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = lookup(PROCESSING_DELAY_VAR) {
            config.processing_delay = Duration::from_millis(parse_u64(PROCESSING_DELAY_VAR, &ms)?);
        }

        if let Some(ms) = lookup(BOOT_DELAY_VAR) {
            config.boot_delay = Duration::from_millis(parse_u64(BOOT_DELAY_VAR, &ms)?);
        }

        config.speed = match (lookup(FAST_FORWARD_VAR), lookup(SLOW_MOTION_VAR)) {
            (Some(_), Some(_)) => {
                return Err(QueueError::Parse(format!(
                    "{FAST_FORWARD_VAR} and {SLOW_MOTION_VAR} cannot both be set"
                )))
            }
            (Some(rate), None) => parse_rate(FAST_FORWARD_VAR, &rate, Speed::fast_forward)?,
            (None, Some(rate)) => parse_rate(SLOW_MOTION_VAR, &rate, Speed::slow_motion)?,
            (None, None) => Speed::RealTime,
        };

        if let Some(path) = lookup(AIRCRAFT_CSV_VAR) {
            config.aircraft_csv_path = path;
        }

        Ok(config)
    }

    /// Processing delay after applying `speed`
    pub fn adjusted_processing_delay(&self) -> Duration {
        self.speed.adjust_duration(self.processing_delay)
    }

    /// Boot delay after applying `speed`
    pub fn adjusted_boot_delay(&self) -> Duration {
        self.speed.adjust_duration(self.boot_delay)
    }
}

fn parse_rate(key: &str, value: &str, speed: fn(u8) -> Option<Speed>) -> Result<Speed, QueueError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(speed)
        .ok_or_else(|| QueueError::Parse(format!("{key} must be 1-255, got {value:?}")))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, QueueError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| QueueError::Parse(format!("{key}={value:?}: {e}")))
}
