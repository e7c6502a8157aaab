//! Exporter configuration.

use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name written inside the metrics directory in file mode.
pub const METRICS_FILE_NAME: &str = "docker_metrics.prom";

/// How the gauge vector is published. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublishMode {
    /// Serve `/metrics` over HTTP
    Http { host: String, port: u16 },
    /// Overwrite `<dir>/docker_metrics.prom` after every cycle
    File { dir: PathBuf },
}

impl PublishMode {
    /// Select the publish mode from the raw CLI values.
    ///
    /// A non-empty metrics directory always wins and disables the HTTP endpoint.
    /// The directory is used exactly as given, whitespace included.
    pub fn select(host: impl Into<String>, port: u16, metrics_dir: Option<&str>) -> Self {
        match metrics_dir.filter(|dir| !dir.is_empty()) {
            Some(dir) => Self::File {
                dir: PathBuf::from(dir),
            },
            None => Self::Http {
                host: host.into(),
                port,
            },
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

impl Default for PublishMode {
    fn default() -> Self {
        Self::Http {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
        }
    }
}

/// Configuration for a single exporter process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Where metrics are published
    pub mode: PublishMode,
    /// Delay between collection cycles
    pub interval: Duration,
    /// Raise log verbosity
    pub debug: bool,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            mode: PublishMode::default(),
            interval: crate::DEFAULT_INTERVAL,
            debug: false,
        }
    }
}

impl ExporterConfig {
    /// Create a configuration with the given publish mode.
    pub fn new(mode: PublishMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set the collection interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enable or disable debug logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Full path of the metrics file, if running in file mode.
    pub fn metrics_file_path(&self) -> Option<PathBuf> {
        match &self.mode {
            PublishMode::File { dir } => Some(metrics_file_in(dir)),
            PublishMode::Http { .. } => None,
        }
    }

    /// Reject values the driver loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(ExporterError::config_error("interval must be greater than zero"));
        }
        if let PublishMode::Http { port: 0, .. } = self.mode {
            return Err(ExporterError::config_error("port must be greater than zero"));
        }
        Ok(())
    }
}

/// Path of the metrics file inside `dir`.
pub fn metrics_file_in(dir: &Path) -> PathBuf {
    dir.join(METRICS_FILE_NAME)
}

/// Whether debug logging is requested by flag or by the `DEBUG` environment variable.
pub fn debug_enabled(flag: bool) -> bool {
    flag || env_flag(std::env::var("DEBUG").ok().as_deref())
}

fn env_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
}

/// Parse an interval given as a bare number of seconds or as a sequence of
/// decimal numbers with units, such as `10s`, `1.5s`, `1m30s` or `250ms`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
pub fn parse_interval(input: &str) -> Result<Duration> {
    let input = input.trim();
    let invalid = || ExporterError::config_error(format!("invalid interval: {input:?}"));

    if input.is_empty() {
        return Err(invalid());
    }

    let nanos = if input.bytes().all(|b| b.is_ascii_digit()) {
        let secs: u128 = input.parse().map_err(|_| invalid())?;
        secs.checked_mul(NANOS_PER_SEC).ok_or_else(invalid)?
    } else {
        let mut total: u128 = 0;
        let mut rest = input;
        while !rest.is_empty() {
            let number_end = rest
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .unwrap_or(rest.len());
            let (number, tail) = rest.split_at(number_end);
            let unit_end = tail
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(tail.len());
            let (unit, tail) = tail.split_at(unit_end);

            let scale = unit_nanos(unit).ok_or_else(|| {
                ExporterError::config_error(format!("unknown interval unit {unit:?} in {input:?}"))
            })?;
            let part = scaled_nanos(number, scale).ok_or_else(invalid)?;
            total = total.checked_add(part).ok_or_else(invalid)?;
            rest = tail;
        }
        total
    };

    if nanos == 0 {
        return Err(ExporterError::config_error("interval must be greater than zero"));
    }

    let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| invalid())?;
    Ok(Duration::new(secs, (nanos % NANOS_PER_SEC) as u32))
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// `number` (digits with an optional fraction) times `scale` nanoseconds.
/// Fraction digits beyond nanosecond precision are dropped.
fn scaled_nanos(number: &str, scale: u128) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.contains('.') {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole.checked_mul(scale)?;

    let fraction = &fraction[..fraction.len().min(9)];
    if !fraction.is_empty() {
        let digits: u128 = fraction.parse().ok()?;
        let divisor = 10u128.pow(fraction.len() as u32);
        nanos = nanos.checked_add(digits * scale / divisor)?;
    }

    Some(nanos)
}
