//! Measured channels: a metric family on a frequency band.

use crate::acoustics;
use crate::constants::{L90_PERCENTILE, OCTAVE_BANDS};
use crate::table::ColumnKey;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Statistical metric family reported by a sound level meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Metric {
    /// Equivalent continuous level.
    Leq,
    /// Maximum level.
    Lmax,
    /// Level exceeded 90% of the time.
    L90,
}

impl Metric {
    /// All metrics in column order.
    pub const ALL: [Self; 3] = [Self::Leq, Self::Lmax, Self::L90];

    /// Column label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Leq => "Leq",
            Self::Lmax => "Lmax",
            Self::L90 => "L90",
        }
    }

    /// Combine several readings of this metric into one.
    ///
    /// Leq is energy averaged, Lmax takes the maximum and L90 takes the
    /// 10th percentile. A single reading is returned unchanged.
    pub fn combine(self, levels: &[f64]) -> Option<f64> {
        match self {
            Self::Leq => acoustics::energy_average(levels),
            Self::Lmax => acoustics::maximum(levels),
            Self::L90 => acoustics::percentile(levels, L90_PERCENTILE),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "leq" | "laeq" => Ok(Self::Leq),
            "lmax" | "lamax" => Ok(Self::Lmax),
            "l90" | "la90" => Ok(Self::L90),
            other => Err(format!("unknown metric: {other} (expected Leq, Lmax or L90)")),
        }
    }
}

/// Frequency band of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Band {
    /// A-weighted broadband level.
    A,
    /// Octave band with the given centre frequency in Hz.
    Octave(u32),
}

impl Band {
    /// Broadband followed by every octave band, in column order.
    pub fn all() -> impl Iterator<Item = Self> {
        std::iter::once(Self::A).chain(OCTAVE_BANDS.iter().map(|&hz| Self::Octave(hz)))
    }

    /// Whether this is the broadband level.
    pub const fn is_broadband(self) -> bool {
        matches!(self, Self::A)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Octave(hz) => write!(f, "{hz}"),
        }
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "a" || lower == "dba" {
            return Ok(Self::A);
        }
        let digits = lower.strip_suffix("hz").unwrap_or(&lower).trim();
        match digits.parse::<u32>() {
            Ok(hz) if OCTAVE_BANDS.contains(&hz) => Ok(Self::Octave(hz)),
            _ => Err(format!("unknown band: {s}")),
        }
    }
}

/// A metric measured on a band, e.g. `Leq A` or `Lmax 125`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Channel {
    /// Metric family.
    pub metric: Metric,
    /// Frequency band.
    pub band: Band,
}

impl Channel {
    /// Create a channel.
    pub const fn new(metric: Metric, band: Band) -> Self {
        Self { metric, band }
    }

    /// Broadband channel of a metric.
    pub const fn broadband(metric: Metric) -> Self {
        Self::new(metric, Band::A)
    }

    /// Two-level table header (`metric`, `band`).
    pub fn column_key(self) -> ColumnKey {
        ColumnKey::new([self.metric.label().to_string(), self.band.to_string()])
    }

    /// Channels every log must carry.
    pub const REQUIRED: [Self; 3] = [
        Self::broadband(Metric::Leq),
        Self::broadband(Metric::Lmax),
        Self::broadband(Metric::L90),
    ];

    /// Every channel of the full template, in column order: the broadband
    /// levels first, then each metric's octave bands.
    pub fn template() -> impl Iterator<Item = Self> {
        Self::REQUIRED.into_iter().chain(Metric::ALL.into_iter().flat_map(|metric| {
            OCTAVE_BANDS
                .iter()
                .map(move |&hz| Self::new(metric, Band::Octave(hz)))
        }))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.metric, self.band)
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(metric), Some(band), None) => Ok(Self::new(metric.parse()?, band.parse()?)),
            _ => Err(format!("not a channel header: {s}")),
        }
    }
}
