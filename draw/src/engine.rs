use std::{cmp, fmt, slice};

use hashbrown::HashSet;
use serde::Serialize;
use smallvec::SmallVec;

use crate::{
    ensure_count,
    sampler::{sample_gaussian, sample_in_draw_order},
    Error, FrequencyPool, NumberRange, Result, Source,
};

/// Distinct numbers in ascending order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    numbers: SmallVec<[i32; 8]>,
}

impl DrawResult {
    fn from_unsorted(values: impl IntoIterator<Item = i32>) -> Self {
        let mut numbers: SmallVec<[i32; 8]> = values.into_iter().collect();
        numbers.sort_unstable();
        Self { numbers }
    }

    pub fn numbers(&self) -> &[i32] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, n: i32) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }

    pub fn iter(&self) -> slice::Iter<'_, i32> {
        self.numbers.iter()
    }
}

impl<'a> IntoIterator for &'a DrawResult {
    type Item = &'a i32;

    type IntoIter = slice::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.numbers.iter()
    }
}

impl fmt::Display for DrawResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut numbers = self.numbers.iter();

        if let Some(n) = numbers.next() {
            write!(f, "{:02}", n)?;
        }

        for n in numbers {
            write!(f, " {:02}", n)?;
        }

        Ok(())
    }
}

/// Pool size used when a weighted or custom draw does not name one: twice the draw, grown to
/// hold the seed numbers and capped at the size of the range.
pub fn default_pool_size(count: usize, seeded: usize, range: NumberRange) -> usize {
    cmp::min(cmp::max(count.saturating_mul(2), seeded), range.size())
}

/// Draws `count` numbers from `range` with no bias at all.
pub fn draw_random<S: Source + ?Sized>(
    source: &mut S,
    count: usize,
    range: NumberRange,
) -> Result<DrawResult> {
    ensure_count(count)?;
    let numbers = sample_in_draw_order(source, range, count, &HashSet::new())?;
    Ok(DrawResult::from_unsorted(numbers))
}

/// Draws `final_count` numbers from a pool of `pool_size` candidates.
///
/// Every member of `frequency_pool` is guaranteed a place in the pool; the remainder is uniform
/// filler. Final numbers are picked by pool position with a bell curve centered on the middle of
/// the pool, and the frequency numbers sit in the middle. That placement is the whole of the
/// weighting.
pub fn draw_weighted<S: Source + ?Sized>(
    source: &mut S,
    pool_size: usize,
    final_count: usize,
    range: NumberRange,
    frequency_pool: &FrequencyPool,
) -> Result<DrawResult> {
    ensure_count(final_count)?;
    frequency_pool.validate(range)?;

    if frequency_pool.len() > pool_size {
        return Err(Error::Configuration(format!(
            "frequency pool holds {} numbers but the pool size is {}",
            frequency_pool.len(),
            pool_size
        )));
    }

    let pool = build_pool(source, pool_size, range, frequency_pool)?;
    select_from_pool(source, &pool, final_count)
}

/// The weighted pipeline, seeded with numbers chosen by the user.
pub fn draw_custom<S: Source + ?Sized>(
    source: &mut S,
    final_count: usize,
    range: NumberRange,
    user_numbers: &FrequencyPool,
    pool_size: Option<usize>,
) -> Result<DrawResult> {
    if user_numbers.is_empty() {
        return Err(Error::InvalidInput(
            "a custom draw needs at least one number".into(),
        ));
    }

    user_numbers.validate(range)?;

    let pool_size = pool_size
        .unwrap_or_else(|| default_pool_size(final_count, user_numbers.len(), range));
    draw_weighted(source, pool_size, final_count, range, user_numbers)
}

fn build_pool<S: Source + ?Sized>(
    source: &mut S,
    pool_size: usize,
    range: NumberRange,
    frequency_pool: &FrequencyPool,
) -> Result<Vec<i32>> {
    let seeded = frequency_pool.sorted();
    let mut filler = sample_in_draw_order(
        source,
        range,
        pool_size - seeded.len(),
        frequency_pool.as_set(),
    )?;

    // Seed numbers go in the middle of the pool, where index selection is densest.
    let tail = filler.split_off(filler.len() / 2);
    let mut pool = filler;
    pool.extend(seeded);
    pool.extend(tail);

    log::debug!("pool of {}: {:?}", pool.len(), pool);
    Ok(pool)
}

fn select_from_pool<S: Source + ?Sized>(
    source: &mut S,
    pool: &[i32],
    count: usize,
) -> Result<DrawResult> {
    if count > pool.len() {
        return Err(Error::InsufficientRange {
            requested: count,
            eligible: pool.len(),
        });
    }

    let size = i32::try_from(pool.len())
        .map_err(|_| Error::Configuration(format!("pool of {} is too large", pool.len())))?;
    let positions = NumberRange::new(1, size)?;
    let mean = f64::from(size) / 2.0;
    let deviation = (f64::from(size) / 4.0).max(1.0);

    let indices = sample_gaussian(source, positions, count, mean, deviation)?;
    log::debug!("selected pool positions {:?}", {
        let mut sorted: Vec<_> = indices.iter().collect();
        sorted.sort_unstable();
        sorted
    });

    Ok(DrawResult::from_unsorted(
        indices.into_iter().map(|idx| pool[idx as usize - 1]),
    ))
}
