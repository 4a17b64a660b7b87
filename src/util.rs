//! Timing and number formatting for the command-line tools.

use std::time::Instant;

/// RAII timer that logs elapsed time on drop.
///
/// ```ignore
/// let _t = Timed::info(format!("cover to depth {}", depth));
/// cover.run();
/// // logs "cover to depth 8: 12.3ms" when _t is dropped
/// ```
pub struct Timed {
    label: String,
    start: Instant,
    level: log::Level,
}

impl Timed {
    pub fn info(label: impl Into<String>) -> Self {
        Self::start(label.into(), log::Level::Info)
    }

    pub fn debug(label: impl Into<String>) -> Self {
        Self::start(label.into(), log::Level::Debug)
    }

    fn start(label: String, level: log::Level) -> Self {
        log::trace!("{}...", label);
        Self {
            label,
            start: Instant::now(),
            level,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        log::log!(self.level, "{}: {:.1}ms", self.label, self.elapsed_ms());
    }
}

/// Parse counts like `500`, `10k` or `1.5m`.
pub fn parse_count(s: &str) -> Result<usize, String> {
    let s = s.to_lowercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('m') {
        (n, 1_000_000.0)
    } else if let Some(n) = s.strip_suffix('k') {
        (n, 1_000.0)
    } else {
        (s.as_str(), 1.0)
    };

    num_str
        .parse::<f64>()
        .map(|n| (n * multiplier) as usize)
        .map_err(|e| format!("Invalid number '{}': {}", s, e))
}

/// Throughput of `count` items over `ms` milliseconds.
pub fn format_rate(count: usize, ms: f64) -> String {
    if ms <= 0.0 {
        return "N/A".to_string();
    }
    let per_sec = count as f64 / (ms / 1000.0);
    if per_sec >= 1_000_000.0 {
        format!("{:.2}M/s", per_sec / 1_000_000.0)
    } else if per_sec >= 1_000.0 {
        format!("{:.1}k/s", per_sec / 1000.0)
    } else {
        format!("{:.0}/s", per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("500"), Ok(500));
        assert_eq!(parse_count("10k"), Ok(10_000));
        assert_eq!(parse_count("1.5M"), Ok(1_500_000));
        assert!(parse_count("lots").is_err());
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(10, 0.0), "N/A");
        assert_eq!(format_rate(500, 1000.0), "500/s");
        assert_eq!(format_rate(2_000, 1000.0), "2.0k/s");
        assert_eq!(format_rate(3_000_000, 1000.0), "3.00M/s");
    }
}
