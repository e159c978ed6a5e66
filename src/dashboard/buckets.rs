use crate::error::{DashboardError, Result};

/// One UTC calendar day in epoch milliseconds.
pub const DAY_MS: i64 = 86_400_000;

/// Truncate an epoch-millisecond timestamp to UTC midnight.
pub fn day_floor(ts: i64) -> i64 {
    ts - ts.rem_euclid(DAY_MS)
}

/// Dense, ascending bucket starts covering every UTC calendar day that
/// overlaps `[start, end]`, inclusive of both endpoints' days. Empty when
/// `start > end`.
pub fn day_buckets(start: i64, end: i64) -> Vec<i64> {
    if start > end {
        return Vec::new();
    }
    let first = day_floor(start);
    let last = day_floor(end);
    let mut buckets = Vec::with_capacity(((last - first) / DAY_MS + 1) as usize);
    let mut cursor = first;
    while cursor <= last {
        buckets.push(cursor);
        cursor += DAY_MS;
    }
    buckets
}

/// Index of the bucket whose `[start, start + 1 day)` window contains `ts`.
/// Buckets are contiguous, so this is pure arithmetic off the first bucket.
pub fn bucket_index(ts: i64, buckets: &[i64]) -> Result<usize> {
    let (first, end) = match (buckets.first(), buckets.last()) {
        (Some(first), Some(last)) => (*first, *last + DAY_MS),
        _ => return Err(DashboardError::OutOfRange { ts, start: 0, end: 0 }),
    };
    if ts < first || ts >= end {
        return Err(DashboardError::OutOfRange { ts, start: first, end });
    }
    Ok(((day_floor(ts) - first) / DAY_MS) as usize)
}
