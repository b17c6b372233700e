use crate::config::{MAX_HOURS, MAX_MINUTES, MAX_SECONDS};
use crate::timer::Hms;
use once_cell::sync::Lazy;
use regex::Regex;

// Compiled regexes for duration parsing
static CLOCK_HMS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2}):(\d{1,2})$").unwrap());
static CLOCK_MS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})$").unwrap());
static UNITS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?\s*(?:(\d+)\s*s)?$").unwrap()
});

/// Duration parsing error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    EmptyInput,
    InvalidFormat(String),
    InvalidMinutes(u32),
    InvalidSeconds(u32),
    TooLong(u32),
}

impl std::fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationParseError::EmptyInput => write!(f, "Duration cannot be empty"),
            DurationParseError::InvalidFormat(hint) => {
                write!(f, "Invalid duration format. {}", hint)
            }
            DurationParseError::InvalidMinutes(m) => {
                write!(f, "Invalid minutes: {} (must be 0-59)", m)
            }
            DurationParseError::InvalidSeconds(s) => {
                write!(f, "Invalid seconds: {} (must be 0-59)", s)
            }
            DurationParseError::TooLong(secs) => write!(
                f,
                "Duration of {} seconds is longer than {:02}:{:02}:{:02}",
                secs, MAX_HOURS, MAX_MINUTES, MAX_SECONDS
            ),
        }
    }
}

impl std::error::Error for DurationParseError {}

const FORMAT_HINT: &str = "Use: 1:30:00, 25:00, 1h30m, 45m, 90s, or 90";

/// Parse a typed duration into hours/minutes/seconds.
///
/// Supported formats:
/// - Clock with hours: "1:30:00"
/// - Clock without hours: "25:00" (minutes:seconds)
/// - Unit suffixes: "1h30m", "45m", "2m 30s", "90s"
/// - Bare number: "90" (seconds)
///
/// Unit-suffixed and bare values are normalized, so "90s" becomes 00:01:30.
/// Clock forms must use in-range minutes and seconds. The result may not
/// exceed 23:59:59.
pub fn parse_duration(input: &str) -> Result<Hms, DurationParseError> {
    let trimmed = input.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return Err(DurationParseError::EmptyInput);
    }

    if let Ok(secs) = trimmed.parse::<u32>() {
        return hms_from_secs(secs);
    }

    if let Some(captures) = CLOCK_HMS_REGEX.captures(&trimmed) {
        let h = number(&captures[1])?;
        let m = number(&captures[2])?;
        let s = number(&captures[3])?;
        return clock_parts(h, m, s);
    }

    if let Some(captures) = CLOCK_MS_REGEX.captures(&trimmed) {
        let m = number(&captures[1])?;
        let s = number(&captures[2])?;
        return clock_parts(0, m, s);
    }

    if let Some(captures) = UNITS_REGEX.captures(&trimmed) {
        let part = |i: usize| -> Result<u32, DurationParseError> {
            captures.get(i).map(|m| number(m.as_str())).unwrap_or(Ok(0))
        };
        let total = part(1)?
            .saturating_mul(3600)
            .saturating_add(part(2)?.saturating_mul(60))
            .saturating_add(part(3)?);
        return hms_from_secs(total);
    }

    Err(DurationParseError::InvalidFormat(FORMAT_HINT.to_string()))
}

fn number(digits: &str) -> Result<u32, DurationParseError> {
    digits
        .parse::<u32>()
        .map_err(|_| DurationParseError::InvalidFormat(FORMAT_HINT.to_string()))
}

fn clock_parts(h: u32, m: u32, s: u32) -> Result<Hms, DurationParseError> {
    if m > MAX_MINUTES as u32 {
        return Err(DurationParseError::InvalidMinutes(m));
    }
    if s > MAX_SECONDS as u32 {
        return Err(DurationParseError::InvalidSeconds(s));
    }
    hms_from_secs(h * 3600 + m * 60 + s)
}

fn hms_from_secs(total: u32) -> Result<Hms, DurationParseError> {
    if total > Hms::new(MAX_HOURS, MAX_MINUTES, MAX_SECONDS).total_secs() {
        return Err(DurationParseError::TooLong(total));
    }
    Ok(Hms::new(
        (total / 3600) as u8,
        ((total % 3600) / 60) as u8,
        (total % 60) as u8,
    ))
}

/// Compact unit form of a duration, the same shape [`parse_duration`] accepts:
/// 5400 -> "1h30m", 90 -> "1m30s", 0 -> "0s".
pub fn format_hms(total_secs: u32) -> String {
    let (h, m, s) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{}h", h));
    }
    if m > 0 {
        out.push_str(&format!("{}m", m));
    }
    if s > 0 || out.is_empty() {
        out.push_str(&format!("{}s", s));
    }
    out
}
