//! Display formatting for sizes, download progress, and remaining time.

use std::time::Duration;

const SIZE_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Render a byte count with a binary (1024-based) prefix and two decimals.
pub fn format_size(bytes: f64) -> String {
    if bytes <= 0.0 {
        return "0 B".to_string();
    }

    let exponent = (bytes.ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = bytes / 1024f64.powi(exponent as i32);

    format!("{:.2} {}", value, SIZE_UNITS[exponent])
}

/// Download completion percentage, rounded to two decimals.
///
/// Defined as 0 when `size` is zero so an empty grab never reads as complete.
pub fn progress(size: f64, sizeleft: f64) -> f64 {
    if size <= 0.0 {
        return 0.0;
    }
    let percent = ((size - sizeleft) / size) * 100.0;
    (percent * 100.0).round() / 100.0
}

/// Parse a textual `HH:MM:SS` field into a duration.
///
/// The hour part may exceed 23; anything not matching three numeric
/// colon-separated components yields `None`.
pub fn parse_clock(text: &str) -> Option<Duration> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || minutes > 59 || seconds > 59 {
        return None;
    }
    Some(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}
