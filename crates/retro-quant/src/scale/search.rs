//! Run-length extraction and the coarse/fine scale search.

/// Sweep resolution: each search interval is split into this many steps.
const STEPS: u32 = 128;

/// Half-width of the refinement window and padding of the coarse window.
const MARGIN: f64 = 0.75;

/// Reduce an RGBA sample to a 15-bit key (5 bits per channel) so that
/// compression noise in the low bits does not break runs.
pub(crate) fn quantize_key(rgba: &[u8]) -> u16 {
    ((rgba[0] as u16 >> 3) << 10) | ((rgba[1] as u16 >> 3) << 5) | (rgba[2] as u16 >> 3)
}

/// Lengths of maximal column groups in which every row keeps the same key.
///
/// A run spanning the whole width carries no scale information and is
/// dropped.
pub(crate) fn column_runs(keys: &[u16], width: usize, height: usize) -> Vec<u32> {
    let same = |x: usize| (0..height).all(|y| keys[y * width + x] == keys[y * width + x - 1]);
    collect_runs(width, same)
}

/// Lengths of maximal row groups in which every column keeps the same key.
pub(crate) fn row_runs(keys: &[u16], width: usize, height: usize) -> Vec<u32> {
    let same = |y: usize| keys[y * width..(y + 1) * width] == keys[(y - 1) * width..y * width];
    collect_runs(height, same)
}

fn collect_runs(len: usize, continues: impl Fn(usize) -> bool) -> Vec<u32> {
    if len == 0 {
        return Vec::new();
    }
    let mut runs = Vec::new();
    let mut current = 1u32;
    for i in 1..len {
        if continues(i) {
            current += 1;
        } else {
            runs.push(current);
            current = 1;
        }
    }
    runs.push(current);
    runs.retain(|&r| r as usize != len);
    runs
}

/// Squared deviation of every run from its nearest whole multiple of
/// `scale`, weighted by run length. Infinite when any run would shrink below
/// half a cell.
pub(crate) fn cost(runs: &[u32], scale: f64) -> f64 {
    let mut total = 0.0;
    for &run in runs {
        let ratio = run as f64 / scale;
        if ratio < 0.5 {
            return f64::INFINITY;
        }
        let multiple = ratio.round().max(1.0);
        let deviation = ratio - multiple;
        total += run as f64 * deviation * deviation;
    }
    total
}

/// Lowest-cost scale in `[lo, hi]`, evaluated at `STEPS + 1` evenly spaced
/// points. The first point wins ties.
fn sweep(runs: &[u32], lo: f64, hi: f64) -> f64 {
    let step = (hi - lo) / STEPS as f64;
    let mut best = lo;
    let mut best_cost = f64::INFINITY;
    for i in 0..=STEPS {
        let candidate = lo + step * i as f64;
        let c = cost(runs, candidate);
        if c < best_cost {
            best_cost = c;
            best = candidate;
        }
    }
    best
}

/// Most likely per-axis scale for a run population, or `None` when there are
/// no informative runs.
pub(crate) fn estimate_scale(runs: &[u32]) -> Option<f64> {
    let (&min, &max) = (runs.iter().min()?, runs.iter().max()?);
    if min == max {
        return Some(min as f64);
    }

    let lo = (min as f64 - MARGIN).max(1.0);
    let hi = max as f64 + MARGIN;
    let coarse = sweep(runs, lo, hi);

    let lo = (coarse - MARGIN).max(1.0);
    let hi = coarse + MARGIN;
    Some(sweep(runs, lo, hi))
}
