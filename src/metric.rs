//! The number a measurement boils down to, and how it gets printed.

use crate::{options::Pattern, sampler::Sample};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Metric {
    /// Sequential scans report bytes per second.
    Throughput { bytes: u64, elapsed: Duration },
    /// Random sampling reports the mean number of seconds per seek.
    SeekLatency { seeks: u64, elapsed: Duration },
}

impl From<&Sample> for Metric {
    fn from(sample: &Sample) -> Self {
        match sample.pattern {
            Pattern::Sequential => Metric::Throughput {
                bytes: sample.completed.saturating_mul(sample.block_size),
                elapsed: sample.elapsed,
            },
            Pattern::Random => Metric::SeekLatency {
                seeks: sample.completed,
                elapsed: sample.elapsed,
            },
        }
    }
}

impl Metric {
    pub(crate) fn value(&self) -> f64 {
        match *self {
            Metric::Throughput { bytes, elapsed } => bytes as f64 / elapsed.as_secs_f64(),
            Metric::SeekLatency { seeks, elapsed } => elapsed.as_secs_f64() / seeks as f64,
        }
    }

    /// The line printed on stdout for this metric.
    pub(crate) fn render(&self, verbose: bool) -> String {
        let value = general(self.value());
        if !verbose {
            return value;
        }
        match *self {
            Metric::Throughput { bytes, elapsed } => format!(
                "{bytes} bytes read in {:.6} seconds: {value} bytes/seconds",
                elapsed.as_secs_f64()
            ),
            Metric::SeekLatency { seeks, elapsed } => format!(
                "{seeks} seeks in {:.6} seconds: {value} seconds/seeks",
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Formats like C's `%g`: six significant digits, scientific notation for
/// very small or large magnitudes, no trailing zeros.
fn general(x: f64) -> String {
    const PRECISION: i32 = 6;
    if x == 0.0 || !x.is_finite() {
        return format!("{x}");
    }
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, x);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return sci;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
