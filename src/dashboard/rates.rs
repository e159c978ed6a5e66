/// Share of `count` in `total`, as a percentage. A zero total yields 0.0
/// rather than a division error.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Percent change of `current` against `previous`. A zero previous value
/// yields 0.0 even when `current` is nonzero; results are unclamped, so
/// values below -100 or above 100 are normal.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}
