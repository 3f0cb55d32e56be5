//! Numeric helpers shared by CPT construction and validation.

use crate::constants::{P_MIN, ROW_SUM_TOLERANCE};

/// Replace NaN and infinities with 0.
pub fn sanitize(p: f64) -> f64 {
    if p.is_finite() {
        p
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        sanitize(numerator / denominator)
    }
}

/// Round toward negative infinity, keeping `decimals` decimal places.
pub fn round_floor(p: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (p * scale).floor() / scale
}

/// Sanitize, round toward -inf and clamp in one step.
pub fn to_cell(p: f64, decimals: u32) -> f64 {
    to_cell_within(p, decimals, P_MIN)
}

/// `to_cell` with an explicit floor: the result lies in `[floor, 1 - floor]`.
pub fn to_cell_within(p: f64, decimals: u32, floor: f64) -> f64 {
    round_floor(sanitize(p), decimals).clamp(floor, 1.0 - floor)
}

/// Smallest cell a row of `outcomes` cells may hold: `P_MIN`, lowered for
/// rows so wide that `P_MIN` on every cell would not fit in a distribution.
/// The floors of a row never add up to more than one half.
pub fn cell_floor(outcomes: usize) -> f64 {
    if outcomes == 0 {
        return P_MIN;
    }
    P_MIN.min(0.5 / outcomes as f64)
}

/// Make `row` a distribution whose cells are all at least `floor`.
///
/// Cells below `floor` are raised to it. The remaining error lands on the
/// largest cell when that keeps it above `floor`; otherwise every cell gives
/// up a share proportional to its mass above `floor`. Requires
/// `floor * row.len() < 1`, which `cell_floor` guarantees.
pub fn fit_row(row: &mut [f64], floor: f64) {
    if row.len() == 1 {
        row[0] = 1.0;
    }
    if row.len() < 2 {
        return;
    }
    for cell in row.iter_mut() {
        *cell = sanitize(*cell).max(floor);
    }
    let diff: f64 = row.iter().sum::<f64>() - 1.0;
    let mut max_idx = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[max_idx] {
            max_idx = i;
        }
    }
    if row[max_idx] - diff > floor {
        row[max_idx] -= diff;
        return;
    }
    let slack: f64 = row.iter().map(|&c| c - floor).sum();
    let scale = diff / slack;
    for cell in row.iter_mut() {
        *cell -= (*cell - floor) * scale;
    }
}

/// Normalize `weights` into a distribution whose cells are all in
/// `[P_MIN, P_MAX]` (or within `cell_floor` of 0 and 1 for very wide rows).
/// A row of zeros becomes uniform.
pub fn clamped_distribution(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().copied().map(sanitize).sum();
    let mut row: Vec<f64> = if total <= 0.0 {
        vec![1.0 / weights.len() as f64; weights.len()]
    } else {
        weights.iter().map(|&w| sanitize(w) / total).collect()
    };
    if row.len() > 1 {
        let floor = cell_floor(row.len());
        for cell in row.iter_mut() {
            *cell = cell.clamp(floor, 1.0 - floor);
        }
        fit_row(&mut row, floor);
    }
    row
}

/// Whether `row` sums to 1 within `ROW_SUM_TOLERANCE`.
pub fn sums_to_one(row: &[f64]) -> bool {
    (row.iter().sum::<f64>() - 1.0).abs() <= ROW_SUM_TOLERANCE
}

/// Whether every cell lies strictly inside (0, 1).
pub fn strictly_inside_unit(row: &[f64]) -> bool {
    row.iter().all(|&p| p > 0.0 && p < 1.0)
}
