use serde::Serialize;

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using standard linear
/// interpolation (the same algorithm used by NumPy's `percentile` function).
///
/// Returns `0.0` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let len = sorted_data.len();
    if len == 1 {
        return sorted_data[0];
    }
    let rank = (p / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted_data[lo];
    }
    let frac = rank - lo as f64;
    sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo])
}

// ── Describe ──────────────────────────────────────────────────────────────────

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Describe `values`, or `None` when there are no values.
pub fn describe(values: &[f64]) -> Option<Describe> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        Some((ss / (count as f64 - 1.0)).sqrt())
    } else {
        None
    };

    Some(Describe {
        count,
        mean,
        std,
        min: sorted[0],
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        max: sorted[count - 1],
    })
}
