//! Gap filling for a single (group, field) series on the daily grid.
//!
//! The order is fixed: interpolate interior gaps, then pad forward, then
//! zero whatever is left at the leading edge. Swapping the first two steps
//! changes results, so `resolve` is the only public entry point.

use crate::domain::{Fill, Interpolation};

/// A fully resolved series: no unknown entries remain.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSeries {
    pub values: Vec<f64>,
    pub fills: Vec<Fill>,
}

/// Resolve every unknown entry of `raw` (indexed by day offset).
pub fn resolve(raw: &[Option<f64>], interpolation: Interpolation) -> ResolvedSeries {
    let mut values: Vec<Option<f64>> = raw.to_vec();
    let mut fills: Vec<Fill> = raw
        .iter()
        .map(|v| if v.is_some() { Fill::Observed } else { Fill::Zero })
        .collect();

    interpolate_inside(&mut values, &mut fills, interpolation);
    pad_forward(&mut values, &mut fills);

    ResolvedSeries {
        values: values.into_iter().map(|v| v.unwrap_or(0.0)).collect(),
        fills,
    }
}

/// Fill unknowns strictly between two known entries; never extrapolate.
fn interpolate_inside(values: &mut [Option<f64>], fills: &mut [Fill], mode: Interpolation) {
    let mut prev: Option<(usize, f64)> = None;
    for j in 0..values.len() {
        let Some(yj) = values[j] else { continue };
        if let Some((i, yi)) = prev {
            for k in (i + 1)..j {
                let Some(v) = interpolate(mode, (i, yi), (j, yj), k) else { return };
                values[k] = Some(v);
                fills[k] = Fill::Interpolated;
            }
        }
        prev = Some((j, yj));
    }
}

/// `None` when `mode` does not interpolate.
fn interpolate(mode: Interpolation, a: (usize, f64), b: (usize, f64), k: usize) -> Option<f64> {
    let (x0, y0) = (a.0 as f64, a.1);
    let (x1, y1) = (b.0 as f64, b.1);
    let x = k as f64;
    match mode {
        Interpolation::Linear => {
            let v = y0 + (y1 - y0) * (x - x0) / (x1 - x0);
            if v.is_finite() {
                Some(v)
            } else {
                // `y1 - y0` overflowed; blend instead.
                let t = (x - x0) / (x1 - x0);
                Some(y0 * (1.0 - t) + y1 * t)
            }
        }
        Interpolation::Nearest => Some(if x - x0 <= x1 - x { y0 } else { y1 }),
        Interpolation::None => None,
    }
}

/// Carry the most recent known entry forward over unknown ones.
fn pad_forward(values: &mut [Option<f64>], fills: &mut [Fill]) {
    let mut last: Option<f64> = None;
    for (v, fill) in values.iter_mut().zip(fills.iter_mut()) {
        match *v {
            Some(x) => last = Some(x),
            None => {
                if let Some(x) = last {
                    *v = Some(x);
                    *fill = Fill::Padded;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fills_interior_gap_with_average() {
        let r = resolve(&[Some(10.0), None, Some(20.0)], Interpolation::Linear);
        assert_eq!(r.values, vec![10.0, 15.0, 20.0]);
        assert_eq!(r.fills, vec![Fill::Observed, Fill::Interpolated, Fill::Observed]);
    }

    #[test]
    fn linear_weights_by_elapsed_days() {
        let r = resolve(&[Some(0.0), None, None, Some(30.0)], Interpolation::Linear);
        assert_eq!(r.values, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn no_interpolation_pads_interior_gap() {
        let r = resolve(&[Some(10.0), None, Some(20.0)], Interpolation::None);
        assert_eq!(r.values, vec![10.0, 10.0, 20.0]);
        assert_eq!(r.fills[1], Fill::Padded);
    }

    #[test]
    fn nearest_takes_earlier_neighbour_on_midpoint() {
        let r = resolve(&[Some(1.0), None, Some(3.0)], Interpolation::Nearest);
        assert_eq!(r.values, vec![1.0, 1.0, 3.0]);

        let r = resolve(&[Some(1.0), None, None, None, Some(5.0)], Interpolation::Nearest);
        assert_eq!(r.values, vec![1.0, 1.0, 1.0, 5.0, 5.0]);
    }

    #[test]
    fn huge_neighbours_stay_finite() {
        let r = resolve(&[Some(1e308), None, Some(-1e308)], Interpolation::Linear);
        assert_eq!(r.values, vec![1e308, 0.0, -1e308]);
    }

    #[test]
    fn leading_unknowns_become_zero_and_tail_is_padded() {
        let r = resolve(&[None, None, Some(5.0), None, None], Interpolation::Linear);
        assert_eq!(r.values, vec![0.0, 0.0, 5.0, 5.0, 5.0]);
        assert_eq!(
            r.fills,
            vec![Fill::Zero, Fill::Zero, Fill::Observed, Fill::Padded, Fill::Padded]
        );
    }

    #[test]
    fn empty_series_is_all_zero() {
        let r = resolve(&[None, None, None], Interpolation::Linear);
        assert_eq!(r.values, vec![0.0; 3]);
        assert!(r.fills.iter().all(|f| *f == Fill::Zero));
    }

    #[test]
    fn multi_gap_sequence_interpolates_then_pads() {
        let raw = [None, Some(2.0), None, Some(4.0), None, None, Some(10.0), None];
        let r = resolve(&raw, Interpolation::Linear);
        assert_eq!(r.values, vec![0.0, 2.0, 3.0, 4.0, 6.0, 8.0, 10.0, 10.0]);
    }
}
