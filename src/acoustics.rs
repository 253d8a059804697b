//! Decibel arithmetic shared by resampling and survey aggregations.
//!
//! Sound levels are logarithmic, so averaging them means converting to
//! energy (`10^(L/10)`), averaging, and converting back.

use std::collections::BTreeMap;

/// Convert a level in dB to relative energy.
#[inline]
pub fn db_to_energy(level: f64) -> f64 {
    10f64.powf(level / 10.0)
}

/// Convert relative energy back to a level in dB.
#[inline]
pub fn energy_to_db(energy: f64) -> f64 {
    10.0 * energy.log10()
}

/// Energy average (`10·log10(Σ10^(L/10) / n)`) of a set of levels.
///
/// A single value is returned unchanged so that re-averaging an already
/// averaged series is exact. Returns `None` for an empty slice.
pub fn energy_average(levels: &[f64]) -> Option<f64> {
    match levels {
        [] => None,
        [single] => Some(*single),
        _ => {
            let total: f64 = levels.iter().map(|&l| db_to_energy(l)).sum();
            #[allow(clippy::cast_precision_loss)]
            let mean = total / levels.len() as f64;
            Some(energy_to_db(mean))
        }
    }
}

/// Weighted energy average of `(level, weight)` pairs.
///
/// Used to combine logs with different native intervals: each sample is
/// weighted by the time it represents. Pairs with non-positive weight are
/// ignored.
pub fn energy_average_weighted<I>(samples: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut energy = 0.0;
    let mut weight = 0.0;
    for (level, w) in samples {
        if w > 0.0 {
            energy += db_to_energy(level) * w;
            weight += w;
        }
    }
    (weight > 0.0).then(|| energy_to_db(energy / weight))
}

/// Maximum of a set of levels.
pub fn maximum(levels: &[f64]) -> Option<f64> {
    levels.iter().copied().reduce(f64::max)
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is in percent (0-100). Returns `None` for an empty slice.
pub fn percentile(levels: &[f64], p: f64) -> Option<f64> {
    match levels {
        [] => None,
        [single] => Some(*single),
        _ => {
            let mut sorted = levels.to_vec();
            sorted.sort_by(f64::total_cmp);

            #[allow(clippy::cast_precision_loss)]
            let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(sorted.len() - 1);
            let fraction = rank - rank.floor();
            Some((sorted[upper] - sorted[lower]).mul_add(fraction, sorted[lower]))
        }
    }
}

/// Round a level to the nearest whole decibel.
#[allow(clippy::cast_possible_truncation)]
pub fn round_db(level: f64) -> i64 {
    level.round() as i64
}

/// Occurrence count of each whole-decibel level, ascending by level.
pub fn value_counts(levels: &[f64]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &level in levels {
        *counts.entry(round_db(level)).or_insert(0) += 1;
    }
    counts
}

/// Most frequent whole-decibel level; ties resolve to the lowest level.
pub fn modal_level(levels: &[f64]) -> Option<i64> {
    let mut best: Option<(i64, usize)> = None;
    for (level, count) in value_counts(levels) {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((level, count));
        }
    }
    best.map(|(level, _)| level)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_average_equal_levels() {
        let avg = energy_average(&[60.0, 60.0, 60.0]).unwrap_or_default();
        assert!((avg - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_energy_average_dominated_by_louder_level() {
        // 10*log10((1e7 + 1e6) / 2) = 67.40
        let avg = energy_average(&[70.0, 60.0]).unwrap_or_default();
        assert!((avg - 67.4036).abs() < 1e-3);
    }

    #[test]
    fn test_energy_average_single_value_is_exact() {
        assert_eq!(energy_average(&[63.7]), Some(63.7));
        assert_eq!(energy_average(&[]), None);
    }

    #[test]
    fn test_weighted_average_matches_unweighted_for_equal_weights() {
        let plain = energy_average(&[55.0, 65.0]).unwrap_or_default();
        let weighted = energy_average_weighted([(55.0, 60.0), (65.0, 60.0)]).unwrap_or_default();
        assert!((plain - weighted).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_favours_longer_samples() {
        let weighted = energy_average_weighted([(50.0, 1.0), (70.0, 9.0)]).unwrap_or_default();
        let even = energy_average(&[50.0, 70.0]).unwrap_or_default();
        assert!(weighted > even);
        assert_eq!(energy_average_weighted([(50.0, 0.0)]), None);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [40.0, 42.0, 44.0, 46.0, 48.0];
        assert_eq!(percentile(&values, 0.0), Some(40.0));
        assert_eq!(percentile(&values, 100.0), Some(48.0));
        assert_eq!(percentile(&values, 50.0), Some(44.0));
        let p10 = percentile(&values, 10.0).unwrap_or_default();
        assert!((p10 - 40.8).abs() < 1e-9);
    }

    #[test]
    fn test_modal_level_tie_picks_lowest() {
        assert_eq!(modal_level(&[41.2, 40.9, 43.0, 42.8]), Some(41));
        assert_eq!(modal_level(&[45.0, 44.0]), Some(44));
        assert_eq!(modal_level(&[]), None);
    }

    #[test]
    fn test_value_counts_rounds_to_whole_db() {
        let counts = value_counts(&[39.6, 40.4, 41.0]);
        assert_eq!(counts.get(&40), Some(&2));
        assert_eq!(counts.get(&41), Some(&1));
    }

    #[test]
    fn test_maximum() {
        assert_eq!(maximum(&[70.0, 75.5, 68.0]), Some(75.5));
        assert_eq!(maximum(&[]), None);
    }
}
