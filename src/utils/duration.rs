//! Conversion between `HH:MM:SS` strings and whole seconds

/// Format a number of seconds as zero-padded `HH:MM:SS`.
///
/// Negative input is clamped to zero. Hours grow past two digits for
/// durations of 100 hours or more.
pub fn format_hms(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Parse `S`, `M:S` or `H:M:S` into seconds.
///
/// A lone field is a plain seconds count and may exceed 59. With two or
/// three fields, minutes and seconds must lie in `0..60`. Returns 0 for
/// anything that is not a valid duration: non-numeric or negative fields,
/// out-of-range minutes or seconds, or a field count other than one to
/// three. Callers treat 0 as "reject the edit".
pub fn parse_hms(text: &str) -> u64 {
    let mut fields = Vec::with_capacity(3);
    for part in text.trim().split(':') {
        match part.trim().parse::<u64>() {
            Ok(value) => fields.push(value),
            Err(_) => return 0,
        }
    }

    let (hours, minutes, seconds) = match fields.as_slice() {
        [s] => return *s,
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return 0,
    };

    if minutes >= 60 || seconds >= 60 {
        return 0;
    }

    hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .unwrap_or(0)
}

/// Countdown label shown to the user, e.g. `Next: 00:01:00`
pub fn label(seconds: u64) -> String {
    format!("Next: {}", format_hms(i64::try_from(seconds).unwrap_or(i64::MAX)))
}
