use rand::{
    seq::{index, SliceRandom},
    Rng,
};

use crate::error::{Result, TableError};

/// Draw `amount` distinct offsets from `0..length` and return them ascending.
pub fn sample_sorted<R: Rng + ?Sized>(rng: &mut R, length: u64, amount: usize) -> Result<Vec<u64>> {
    if amount as u64 > length {
        return Err(TableError::DomainTooSmall {
            rows: amount,
            domain: length,
        });
    }
    let mut offsets: Vec<u64> = index::sample(rng, length as usize, amount)
        .into_iter()
        .map(|i| i as u64)
        .collect();
    offsets.sort_unstable();
    Ok(offsets)
}

/// Draw `amount` distinct values from `min..max` and return them ascending.
pub fn sample_range_sorted<R: Rng + ?Sized>(
    rng: &mut R,
    min: i64,
    max: i64,
    amount: usize,
) -> Result<Vec<i64>> {
    let length = max.saturating_sub(min).max(0) as u64;
    Ok(sample_sorted(rng, length, amount)?
        .into_iter()
        .map(|offset| min + offset as i64)
        .collect())
}

/// Pick a random window inside `min..max` whose width lies in
/// `min_width..=max_width`. Returns `(start, end)`, end exclusive.
pub fn local_range<R: Rng + ?Sized>(
    rng: &mut R,
    min: i64,
    max: i64,
    min_width: i64,
    max_width: i64,
) -> (i64, i64) {
    let max_width = max_width.min(max - min);
    let min_width = min_width.min(max_width);
    let width = rng.random_range(min_width..=max_width);
    let start = rng.random_range(min..=max - width);
    (start, start + width)
}

/// Take `count` items from a shuffled cycle of `items`, so nothing repeats
/// until every item has been taken once.
pub fn take_random_cycle<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T], count: usize) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled.into_iter().cycle().take(count).collect()
}

/// Round half away from zero.
pub fn round_div(numerator: usize, denominator: usize) -> usize {
    (2 * numerator + denominator) / (2 * denominator)
}
