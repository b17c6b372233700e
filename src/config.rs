//! Application-level configuration constants and launch options.

use crate::modes::ModeKey;
use log::LevelFilter;

// Timekeeping
pub const POLL_INTERVAL_MS: u32 = 250;

// Alarm tone
pub const ALARM_REPEAT_MS: u32 = 1_000;
pub const ALARM_TONE_MS: u32 = 400;
pub const ALARM_TONE_HZ: f32 = 880.0;
pub const ALARM_GAIN: f32 = 0.2;

// Offline cache
pub const SERVICE_WORKER_SCRIPT: &str = "./sw.js";

// Duration limits
pub const MAX_HOURS: u8 = 23;
pub const MAX_MINUTES: u8 = 59;
pub const MAX_SECONDS: u8 = 59;

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Options read from the page URL query, e.g. `?mode=triple&mute=1&log=debug`.
///
/// Unknown keys and unparseable values are ignored; the app always starts.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub mode: Option<ModeKey>,
    pub muted: bool,
    pub log_level: LevelFilter,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            mode: None,
            muted: false,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl LaunchOptions {
    /// Parse a query string with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let mut options = Self::default();
        let query = query.trim_start_matches('?');

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "mode" => options.mode = value.parse().ok(),
                "mute" => options.muted = matches!(value, "" | "1" | "true" | "yes"),
                "log" => {
                    if let Ok(level) = value.parse::<LevelFilter>() {
                        options.log_level = level;
                    }
                }
                _ => {}
            }
        }
        options
    }
}
