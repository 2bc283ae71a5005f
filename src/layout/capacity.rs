use super::error::{InvalidInput, LayoutError};
use super::{LayoutConfig, MAX_LAYOUT_ROWS};

/// Largest scaled weight we accept. Keeps every unit exactly representable
/// as an f64 so capacities convert back without drift.
const MAX_UNITS: u64 = 1 << 53;

/// Power-of-ten factor turning weights into integer search units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightScale {
    factor: u64,
}

impl WeightScale {
    pub const UNIT: WeightScale = WeightScale { factor: 1 };

    /// Smallest `10^k` (k <= `precision`) that makes every weight integral.
    /// Falls back to `10^precision` when the weights are finer than that.
    pub fn for_weights(weights: &[f64], precision: u32) -> Self {
        let precision = precision.min(15);
        let mut factor = 1u64;
        for _ in 0..precision {
            if weights.iter().all(|&w| is_integral(w * factor as f64)) {
                return WeightScale { factor };
            }
            factor *= 10;
        }
        WeightScale { factor }
    }

    pub fn factor(self) -> u64 {
        self.factor
    }

    /// Scale a weight into search units, rounding up anything finer than
    /// the scale so unit-feasible packings stay feasible in real weights.
    pub fn to_units(self, weight: f64) -> Option<u64> {
        if !weight.is_finite() || weight <= 0.0 {
            return None;
        }
        let scaled = weight * self.factor as f64;
        let units = if is_integral(scaled) {
            scaled.round()
        } else {
            scaled.ceil()
        };
        if units < 1.0 || units > MAX_UNITS as f64 {
            return None;
        }
        Some(units as u64)
    }

    pub fn to_weight(self, units: u64) -> f64 {
        units as f64 / self.factor as f64
    }
}

fn is_integral(x: f64) -> bool {
    (x - x.round()).abs() <= 1e-9 * x.abs().max(1.0)
}

/// Uniform per-row weight budget, held in integer search units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub units: u64,
    pub scale: WeightScale,
}

impl Capacity {
    /// Sentinel used when there is nothing to lay out.
    pub const ZERO: Capacity = Capacity {
        units: 0,
        scale: WeightScale::UNIT,
    };

    /// Capacity in the caller's weight units.
    pub fn value(&self) -> f64 {
        self.scale.to_weight(self.units)
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }
}

/// Convert weights to search units, validating each one.
pub fn scale_weights(weights: &[f64], scale: WeightScale) -> Result<Vec<u64>, InvalidInput> {
    weights
        .iter()
        .enumerate()
        .map(|(index, &weight)| {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(InvalidInput::NonPositiveWeight { index, weight });
            }
            scale
                .to_units(weight)
                .ok_or(InvalidInput::WeightOutOfRange { index, weight })
        })
        .collect()
}

/// First-fit feasibility check: `rows` rooms of size `capacity`, weights
/// placed in the given order into the first room with enough space left.
pub fn fits(units: &[u64], rows: usize, capacity: u64) -> bool {
    first_fit(units, rows, capacity).is_none()
}

/// Runs one first-fit trial. Returns `None` when every weight is placed,
/// otherwise the smallest `load + weight` that was turned away.
///
/// Every capacity below that sum makes the same placement decisions, so
/// none of them can succeed either.
fn first_fit(units: &[u64], rows: usize, capacity: u64) -> Option<u64> {
    // Rows past the item count never receive anything.
    let mut loads = vec![0u64; rows.min(units.len())];
    let mut next = u64::MAX;
    'items: for &w in units {
        for load in loads.iter_mut() {
            let filled = load.saturating_add(w);
            if filled <= capacity {
                *load = filled;
                continue 'items;
            }
            next = next.min(filled);
        }
        return Some(next);
    }
    None
}

/// Minimal capacity for which `fits` succeeds, scanning upward from the
/// largest weight. `units` must already be in packing order.
///
/// A failed trial jumps straight to the smallest rejected sum, which is the
/// next capacity where any placement decision can change.
pub fn solve_units(units: &[u64], rows: usize, max_steps: u64) -> Result<u64, LayoutError> {
    if rows == 0 {
        return Err(InvalidInput::ZeroRows.into());
    }
    let Some(&start) = units.iter().max() else {
        return Err(InvalidInput::NoItems.into());
    };

    // A single row holding everything always fits, so this bounds the scan.
    let upper = units
        .iter()
        .try_fold(0u64, |acc, &w| acc.checked_add(w))
        .filter(|&sum| sum <= MAX_UNITS)
        .ok_or(InvalidInput::TotalOutOfRange)?;

    let mut trial = start;
    let mut steps = 0u64;
    loop {
        steps += 1;
        let next = match first_fit(units, rows, trial) {
            None => {
                tracing::trace!("capacity {} feasible after {} trials", trial, steps);
                return Ok(trial);
            }
            Some(next) => next,
        };
        if trial >= upper || steps >= max_steps {
            return Err(LayoutError::SearchExhausted {
                steps,
                last_trial: trial as f64,
            });
        }
        trial = next.clamp(trial + 1, upper);
    }
}

/// Minimal uniform row capacity for `weights` in their given order.
///
/// The caller passes weights in the order it will pack them (descending for
/// the row packer); the solver itself never reorders.
pub fn solve(weights: &[f64], rows: usize, config: &LayoutConfig) -> Result<Capacity, LayoutError> {
    if rows == 0 {
        return Err(InvalidInput::ZeroRows.into());
    }
    if rows > MAX_LAYOUT_ROWS {
        return Err(InvalidInput::TooManyRows {
            rows,
            max: MAX_LAYOUT_ROWS,
        }
        .into());
    }
    if weights.is_empty() {
        return Err(InvalidInput::NoItems.into());
    }

    let scale = WeightScale::for_weights(weights, config.weight_precision);
    let units = scale_weights(weights, scale)?;
    let found = solve_units(&units, rows, config.max_search_steps).map_err(|e| match e {
        LayoutError::SearchExhausted { steps, last_trial } => LayoutError::SearchExhausted {
            steps,
            last_trial: last_trial / scale.factor() as f64,
        },
        other => other,
    })?;

    tracing::debug!(
        "Solved capacity {} for {} weights in {} rows (scale x{})",
        scale.to_weight(found),
        weights.len(),
        rows,
        scale.factor()
    );

    Ok(Capacity {
        units: found,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_default(weights: &[f64], rows: usize) -> f64 {
        solve(weights, rows, &LayoutConfig::default()).unwrap().value()
    }

    #[test]
    fn single_item_single_row_is_its_weight() {
        assert_eq!(solve_default(&[5.0], 1), 5.0);
    }

    #[test]
    fn one_row_takes_the_sum() {
        assert_eq!(solve_default(&[6.0, 3.0, 3.0, 3.0, 2.0], 1), 17.0);
    }

    #[test]
    fn demo_weights_in_three_rows() {
        assert_eq!(solve_default(&[6.0, 3.0, 3.0, 3.0, 2.0], 3), 6.0);
    }

    #[test]
    fn identical_weights_fill_rows_evenly() {
        let weights = [4.0; 7];
        // ceil(7 / 3) * 4
        assert_eq!(solve_default(&weights, 3), 12.0);
        assert_eq!(solve_default(&weights, 10), 4.0);
    }

    #[test]
    fn never_below_largest_weight() {
        assert_eq!(solve_default(&[9.0, 1.0], 4), 9.0);
    }

    #[test]
    fn fractional_weights_are_rescaled() {
        let capacity = solve(&[0.5, 0.25, 0.25], 2, &LayoutConfig::default()).unwrap();
        assert_eq!(capacity.scale.factor(), 100);
        assert_eq!(capacity.value(), 0.5);
    }

    #[test]
    fn weights_finer_than_precision_round_up() {
        let config = LayoutConfig {
            weight_precision: 1,
            ..LayoutConfig::default()
        };
        let capacity = solve(&[0.123, 0.1], 1, &config).unwrap();
        // 0.123 -> 2 units of 0.1, 0.1 -> 1 unit
        assert_eq!(capacity.units, 3);
        assert!(capacity.value() >= 0.223);
    }

    #[test]
    fn rejects_zero_rows() {
        let err = solve(&[1.0], 0, &LayoutConfig::default()).unwrap_err();
        assert_eq!(err, LayoutError::InvalidInput(InvalidInput::ZeroRows));
    }

    #[test]
    fn rejects_empty_weights() {
        let err = solve(&[], 2, &LayoutConfig::default()).unwrap_err();
        assert_eq!(err, LayoutError::InvalidInput(InvalidInput::NoItems));
    }

    #[test]
    fn rejects_non_positive_weight() {
        let err = solve(&[2.0, 0.0], 2, &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidInput(InvalidInput::NonPositiveWeight {
                index: 1,
                weight: 0.0
            })
        );
        assert!(solve(&[-1.0], 1, &LayoutConfig::default()).is_err());
        assert!(solve(&[f64::NAN], 1, &LayoutConfig::default()).is_err());
    }

    #[test]
    fn step_cap_stops_the_search() {
        // 1 row: 100 is rejected, the next candidate would be 200.
        let err = solve_units(&[100, 100], 1, 1).unwrap_err();
        assert!(matches!(err, LayoutError::SearchExhausted { steps: 1, .. }));
        assert_eq!(solve_units(&[100, 100], 1, 2), Ok(200));
    }

    #[test]
    fn large_single_row_reaches_the_sum() {
        assert_eq!(solve_default(&[1_000_000.0; 3], 1), 3_000_000.0);
        assert_eq!(solve_units(&[1 << 40; 4], 1, 4), Ok(1 << 42));
    }

    #[test]
    fn finely_scaled_weights_reach_the_sum() {
        let capacity = solve(&[999.999; 3], 1, &LayoutConfig::default()).unwrap();
        assert_eq!(capacity.scale.factor(), 1000);
        assert_eq!(capacity.units, 2_999_997);
        assert!((capacity.value() - 2999.997).abs() < 1e-9);
    }

    #[test]
    fn skipping_trials_matches_unit_scan() {
        let cases = [
            (&[6u64, 3, 3, 3, 2][..], 3),
            (&[9u64, 8, 7, 6, 5, 4, 3, 2, 1][..], 3),
            (&[10u64, 7, 7, 5, 5, 4, 1][..], 2),
            (&[13u64, 11, 6, 6, 5, 2, 2, 1][..], 4),
            (&[5u64, 5, 5, 5, 5, 5, 5][..], 3),
        ];
        for (units, rows) in cases {
            let max = *units.iter().max().unwrap();
            let sum: u64 = units.iter().sum();
            let scanned = (max..=sum).find(|&c| fits(units, rows, c)).unwrap();
            assert_eq!(solve_units(units, rows, 1_000_000), Ok(scanned), "{units:?} in {rows}");
        }
    }

    #[test]
    fn huge_row_counts_are_rejected() {
        let err = solve(&[1.0], usize::MAX, &LayoutConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidInput(InvalidInput::TooManyRows { .. })
        ));
        // The feasibility check only needs as many rooms as items.
        assert!(fits(&[1, 1], usize::MAX, 1));
        assert_eq!(solve_units(&[3, 2], usize::MAX, 10), Ok(3));
    }

    #[test]
    fn fits_uses_first_room_with_space() {
        assert!(fits(&[6, 3, 3, 3, 2], 3, 6));
        assert!(!fits(&[6, 3, 3, 3, 2], 3, 5));
        assert!(fits(&[], 1, 0));
    }
}
