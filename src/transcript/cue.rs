use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

// @module: Timed caption cue and timestamp helpers

/// One timed caption entry, as read from the raw caption stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionCue {
    /// Offset of the cue start from the beginning of the video
    pub start_time: Duration,

    /// Offset of the cue end; equals `start_time` when the source had none
    pub end_time: Duration,

    /// Plain text with markup stripped and whitespace normalized
    pub text: String,
}

impl CaptionCue {
    /// Creates a cue without validation - used by tests and callers that already hold clean data
    pub fn new(start_time: Duration, end_time: Duration, text: impl Into<String>) -> Self {
        CaptionCue {
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Creates a cue whose source had no end time
    pub fn instant(start_time: Duration, text: impl Into<String>) -> Self {
        Self::new(start_time, start_time, text)
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(start_time: Duration, end_time: Duration, text: &str) -> Result<Self> {
        if end_time < start_time {
            return Err(anyhow!(
                "Invalid time range: end {} before start {}",
                format_timestamp(end_time),
                format_timestamp(start_time)
            ));
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("Empty cue text at {}", format_timestamp(start_time)));
        }

        Ok(Self::new(start_time, end_time, trimmed))
    }

    /// Duration the cue stays on screen
    pub fn duration(&self) -> Duration {
        self.end_time.saturating_sub(self.start_time)
    }
}

impl fmt::Display for CaptionCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{} --> {}] {}",
            format_timestamp(self.start_time),
            format_timestamp(self.end_time),
            self.text
        )
    }
}

/// Parse a caption timestamp into an offset.
///
/// Accepts `HH:MM:SS.mmm`, `HH:MM:SS,mmm`, `MM:SS.mmm`, `HH:MM:SS` and
/// `MM:SS`. Fractions shorter than three digits are scaled (`.5` is 500ms).
pub fn parse_timestamp(timestamp: &str) -> Result<Duration> {
    let timestamp = timestamp.trim();
    let (clock, fraction) = match timestamp.find(|c| c == '.' || c == ',') {
        Some(pos) => (&timestamp[..pos], Some(&timestamp[pos + 1..])),
        None => (timestamp, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => ("0", *m, *s),
        _ => return Err(anyhow!("Invalid timestamp format: {}", timestamp)),
    };

    let hours: u64 = hours.parse().context("Failed to parse hours")?;
    let minutes: u64 = minutes.parse().context("Failed to parse minutes")?;
    let seconds: u64 = seconds.parse().context("Failed to parse seconds")?;

    let millis: u64 = match fraction {
        Some(digits) if !digits.is_empty() && digits.len() <= 3 && digits.bytes().all(|b| b.is_ascii_digit()) => {
            let value: u64 = digits.parse().context("Failed to parse milliseconds")?;
            value * 10u64.pow(3 - digits.len() as u32)
        }
        Some(_) => return Err(anyhow!("Invalid fraction in timestamp: {}", timestamp)),
        None => 0,
    };

    // Two-part stamps count minutes freely (e.g. 75:10 in a long transcript)
    if (parts.len() == 3 && minutes >= 60) || seconds >= 60 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    let total = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes.checked_mul(60_000)?))
        .and_then(|ms| ms.checked_add(seconds * 1_000 + millis))
        .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))?;

    Ok(Duration::from_millis(total))
}

/// Format an offset as `HH:MM:SS.mmm`
pub fn format_timestamp(offset: Duration) -> String {
    let ms = offset.as_millis() as u64;
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}
