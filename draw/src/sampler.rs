use hashbrown::HashSet;

use crate::{Error, NumberRange, Result, Source};

/// Draws allowed per requested value before a rejection sampler gives up.
pub const ATTEMPTS_PER_VALUE: usize = 4096;

/// Draws `count` distinct values from `range`, never returning a member of `excluding`.
pub fn sample<S: Source + ?Sized>(
    source: &mut S,
    range: NumberRange,
    count: usize,
    excluding: &HashSet<i32>,
) -> Result<HashSet<i32>> {
    sample_in_draw_order(source, range, count, excluding).map(|values| values.into_iter().collect())
}

/// As `sample`, with the values in ascending order.
pub fn sample_sorted<S: Source + ?Sized>(
    source: &mut S,
    range: NumberRange,
    count: usize,
    excluding: &HashSet<i32>,
) -> Result<Vec<i32>> {
    let mut values = sample_in_draw_order(source, range, count, excluding)?;
    values.sort_unstable();
    Ok(values)
}

pub(crate) fn sample_in_draw_order<S: Source + ?Sized>(
    source: &mut S,
    range: NumberRange,
    count: usize,
    excluding: &HashSet<i32>,
) -> Result<Vec<i32>> {
    let excluded = excluding.iter().filter(|&&n| range.contains(n)).count();
    let eligible = range.size() - excluded;

    if eligible < count {
        return Err(Error::InsufficientRange {
            requested: count,
            eligible,
        });
    }

    let limit = count.saturating_mul(ATTEMPTS_PER_VALUE);
    let mut chosen = HashSet::with_capacity(count);
    let mut values = Vec::with_capacity(count);

    for _ in 0..limit {
        if values.len() == count {
            break;
        }

        let value = source.uniform(range.low(), range.high());
        if range.contains(value) && !excluding.contains(&value) && chosen.insert(value) {
            values.push(value);
        }
    }

    if values.len() < count {
        log::warn!(
            "gave up after {} draws with {} of {} values from {}",
            limit,
            values.len(),
            count,
            range
        );
        return Err(Error::InsufficientRange {
            requested: count,
            eligible,
        });
    }

    Ok(values)
}

/// Draws `count` distinct values from `range` by rounding samples of a normal distribution.
///
/// Samples landing outside `range` are thrown away and drawn again rather than clamped, so the
/// boundary values are not overrepresented.
pub fn sample_gaussian<S: Source + ?Sized>(
    source: &mut S,
    range: NumberRange,
    count: usize,
    mean: f64,
    deviation: f64,
) -> Result<HashSet<i32>> {
    if !deviation.is_finite() || deviation <= 0.0 {
        return Err(Error::Distribution(format!(
            "deviation must be positive and finite, got {}",
            deviation
        )));
    }

    if !mean.is_finite() {
        return Err(Error::Distribution(format!(
            "mean must be finite, got {}",
            mean
        )));
    }

    if count > range.size() {
        return Err(Error::InsufficientRange {
            requested: count,
            eligible: range.size(),
        });
    }

    let limit = count.saturating_mul(ATTEMPTS_PER_VALUE);
    let low = f64::from(range.low());
    let high = f64::from(range.high());
    let mut chosen = HashSet::with_capacity(count);

    for _ in 0..limit {
        if chosen.len() == count {
            return Ok(chosen);
        }

        let value = source.gaussian(mean, deviation).round();
        if value.is_finite() && low <= value && value <= high {
            chosen.insert(value as i32);
        }
    }

    if chosen.len() == count {
        return Ok(chosen);
    }

    Err(Error::Distribution(format!(
        "found {} of {} values in {} after {} draws (mean {}, deviation {})",
        chosen.len(),
        count,
        range,
        limit,
        mean,
        deviation
    )))
}
