//! Human-readable duration formatting
//!
//! Timer displays use the clock-style [`format_clock`]; log viewers use
//! [`format_duration_ms`] for measured operation durations.

use std::time::Duration;

/// Format whole seconds as a stopwatch display.
///
/// Values under an hour render as `m:ss`, longer ones as `h:mm:ss`.
///
/// # Examples
///
/// ```
/// use gymtrack_common::time::format_clock;
///
/// assert_eq!(format_clock(0), "0:00");
/// assert_eq!(format_clock(90), "1:30");
/// assert_eq!(format_clock(3725), "1:02:05");
/// ```
#[must_use]
pub fn format_clock(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a measured duration with millisecond precision.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use gymtrack_common::time::format_duration_ms;
///
/// assert_eq!(format_duration_ms(Duration::from_millis(1500)), "1s 500ms");
/// assert_eq!(format_duration_ms(Duration::from_millis(42)), "42ms");
/// assert_eq!(format_duration_ms(Duration::from_secs(61)), "1m 1s");
/// ```
#[must_use]
pub fn format_duration_ms(duration: Duration) -> String {
    let total_millis = duration.as_millis();
    let millis = total_millis % 1000;
    let total_secs = duration.as_secs();

    if total_secs == 0 {
        return format!("{millis}ms");
    }

    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    let mut parts = Vec::with_capacity(3);
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 {
        parts.push(format!("{seconds}s"));
    }
    if millis > 0 {
        parts.push(format!("{millis}ms"));
    }
    parts.join(" ")
}
