//! Time formatting for countdown and summary displays

const SECS_PER_MINUTE: f64 = 60.0;
const SECS_PER_HOUR: f64 = 3600.0;

/// Format a count of seconds as `SS`, `MM:SS` or `HH:MM:SS`.
///
/// The shortest form that fits is chosen: below one minute only the
/// seconds are shown, below one hour minutes and seconds. Every field is
/// zero-padded to two digits. Fractional seconds are floored.
///
/// The hour field is taken modulo 3600, not 24, so it does not wrap at a
/// day boundary (`90000.0` formats as `25:00:00`). Negative and NaN input
/// is clamped to zero.
///
/// ```
/// use pomo_core::seconds_to_time;
///
/// assert_eq!(seconds_to_time(5.0), "05");
/// assert_eq!(seconds_to_time(1500.0), "25:00");
/// assert_eq!(seconds_to_time(3725.0), "01:02:05");
/// ```
pub fn seconds_to_time(seconds: f64) -> String {
    let seconds = clamp(seconds);

    let hours = pad((seconds / SECS_PER_HOUR) % SECS_PER_HOUR);
    let minutes = pad((seconds / SECS_PER_MINUTE) % SECS_PER_MINUTE);
    let secs = pad(seconds % SECS_PER_MINUTE);

    if seconds >= SECS_PER_HOUR {
        format!("{}:{}:{}", hours, minutes, secs)
    } else if seconds >= SECS_PER_MINUTE {
        format!("{}:{}", minutes, secs)
    } else {
        secs
    }
}

fn clamp(seconds: f64) -> f64 {
    if seconds.is_nan() || seconds < 0.0 {
        0.0
    } else {
        seconds
    }
}

fn pad(value: f64) -> String {
    format!("{:02}", value.floor() as u64)
}
