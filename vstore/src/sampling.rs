//! Sequence reduction for time-ordered alarm rows.

use chrono::{NaiveDateTime, TimeDelta};

/// Keeps an item only if it is at least `min_gap` after the last kept item.
pub fn thin_by_gap<T>(
    items: Vec<T>,
    min_gap: TimeDelta,
    time_of: impl Fn(&T) -> NaiveDateTime,
) -> Vec<T> {
    let mut kept = Vec::with_capacity(items.len());
    let mut last: Option<NaiveDateTime> = None;
    for item in items {
        let time = time_of(&item);
        if last.is_none_or(|last| time - last >= min_gap) {
            last = Some(time);
            kept.push(item);
        }
    }
    kept
}

/// Truncates at the first consecutive gap larger than `max_gap`.
pub fn leading_burst<T>(
    items: Vec<T>,
    max_gap: TimeDelta,
    time_of: impl Fn(&T) -> NaiveDateTime,
) -> Vec<T> {
    let mut burst = Vec::with_capacity(items.len());
    let mut last: Option<NaiveDateTime> = None;
    for item in items {
        let time = time_of(&item);
        if last.is_some_and(|last| time - last > max_gap) {
            break;
        }
        last = Some(time);
        burst.push(item);
    }
    burst
}

/// Picks the items at `0, n/4, n/2, 3n/4, n-1` when there are more than five.
///
/// Indices are de-duplicated keeping first occurrence, so the result stays in order.
///
/// ```rust
/// use vstore::five_point_sample;
///
/// let sampled = five_point_sample((0..9).collect());
/// assert_eq!(sampled, vec![0, 2, 4, 6, 8]);
///
/// assert_eq!(five_point_sample(vec![1, 2, 3]), vec![1, 2, 3]);
/// ```
pub fn five_point_sample<T>(items: Vec<T>) -> Vec<T> {
    let n = items.len();
    if n <= 5 {
        return items;
    }

    let mut indices = vec![0, n / 4, n / 2, (3 * n) / 4, n - 1];
    indices.dedup();

    let mut selected = Vec::with_capacity(indices.len());
    let mut wanted = indices.into_iter().peekable();
    for (index, item) in items.into_iter().enumerate() {
        if wanted.peek() == Some(&index) {
            selected.push(item);
            wanted.next();
        }
    }
    selected
}
