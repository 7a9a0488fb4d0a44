use std::{fmt, ops::RangeInclusive, str::FromStr};

mod engine;
mod error;
mod sampler;

pub use engine::{default_pool_size, draw_custom, draw_random, draw_weighted, DrawResult};
pub use error::Error;
pub use sampler::{sample, sample_gaussian, sample_sorted, ATTEMPTS_PER_VALUE};

use hashbrown::HashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A source of randomness for the samplers.
///
/// Every draw borrows its source mutably, so a source is never shared between concurrent draws
/// unless the caller wraps it in a lock.
pub trait Source {
    /// Returns a value uniformly distributed over `low..=high`.
    fn uniform(&mut self, low: i32, high: i32) -> i32;

    /// Returns a value drawn from a normal distribution. Callers guarantee that `deviation` is
    /// finite and positive.
    fn gaussian(&mut self, mean: f64, deviation: f64) -> f64;
}

/// An inclusive range of lottery numbers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct NumberRange {
    low: i32,
    high: i32,
}

impl NumberRange {
    pub fn new(low: i32, high: i32) -> Result<Self> {
        if low > high {
            return Err(Error::Configuration(format!(
                "range {}-{} is empty; low bound exceeds high bound",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    #[inline]
    pub fn low(&self) -> i32 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> i32 {
        self.high
    }

    /// Number of values in the range.
    pub fn size(&self) -> usize {
        (i64::from(self.high) - i64::from(self.low) + 1) as usize
    }

    #[inline]
    pub fn contains(&self, n: i32) -> bool {
        self.low <= n && n <= self.high
    }

    pub fn iter(&self) -> RangeInclusive<i32> {
        self.low..=self.high
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

static RANGE_PARSER: Lazy<RangeParser> = Lazy::new(RangeParser::new);

struct RangeParser {
    pattern: Regex,
}

impl RangeParser {
    fn new() -> Self {
        RangeParser {
            pattern: Regex::new(r#"^\s*(-?\d+)\s*(?:-|\.\.=?|:)\s*(-?\d+)\s*$"#).unwrap(),
        }
    }

    fn parse(&self, s: &str) -> Result<NumberRange> {
        let captures = self
            .pattern
            .captures(s)
            .ok_or_else(|| Error::Configuration(format!("bad range: {}", s)))?;

        let bound = |idx: usize| -> Result<i32> {
            let text = &captures[idx];
            text.parse()
                .map_err(|e| Error::Configuration(format!("bad range bound {}: {}", text, e)))
        };

        NumberRange::new(bound(1)?, bound(2)?)
    }
}

impl FromStr for NumberRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RANGE_PARSER.parse(s)
    }
}

#[derive(Deserialize)]
struct RawRange {
    low: i32,
    high: i32,
}

impl TryFrom<RawRange> for NumberRange {
    type Error = Error;

    fn try_from(raw: RawRange) -> Result<Self> {
        NumberRange::new(raw.low, raw.high)
    }
}

/// Numbers to be favored by a weighted or custom draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i32>", into = "Vec<i32>")]
pub struct FrequencyPool(HashSet<i32>);

impl FrequencyPool {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, n: i32) -> bool {
        self.0.contains(&n)
    }

    pub fn as_set(&self) -> &HashSet<i32> {
        &self.0
    }

    /// Pool members in ascending order.
    pub fn sorted(&self) -> Vec<i32> {
        let mut numbers: Vec<_> = self.0.iter().copied().collect();
        numbers.sort_unstable();
        numbers
    }

    /// Fails with the smallest member lying outside `range`, if any.
    pub fn validate(&self, range: NumberRange) -> Result<()> {
        match self.0.iter().filter(|&&n| !range.contains(n)).min() {
            Some(n) => Err(Error::InvalidInput(format!(
                "{} lies outside the range {}",
                n, range
            ))),
            None => Ok(()),
        }
    }
}

impl FromIterator<i32> for FrequencyPool {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        FrequencyPool(iter.into_iter().collect())
    }
}

impl From<Vec<i32>> for FrequencyPool {
    fn from(numbers: Vec<i32>) -> Self {
        numbers.into_iter().collect()
    }
}

impl From<FrequencyPool> for Vec<i32> {
    fn from(pool: FrequencyPool) -> Self {
        pool.sorted()
    }
}

impl FromStr for FrequencyPool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|u: char| u == ',' || u.is_whitespace())
            .filter(|text| !text.is_empty())
            .map(|text| {
                text.parse()
                    .map_err(|e| Error::InvalidInput(format!("bad number {}: {}", text, e)))
            })
            .collect()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Random,
    #[serde(alias = "lucky")]
    Weighted,
    Custom,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Weighted
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Random => "random",
            Mode::Weighted => "weighted",
            Mode::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.trim().to_ascii_lowercase() {
            "random" => Ok(Mode::Random),
            "weighted" | "lucky" => Ok(Mode::Weighted),
            "custom" => Ok(Mode::Custom),
            _ => Err(Error::InvalidInput(format!("unknown mode: {}", s))),
        }
    }
}

/// Everything needed to perform one draw.
#[derive(Clone, Debug)]
pub struct DrawRequest {
    pub mode: Mode,
    pub count: usize,
    pub range: NumberRange,
    pub pool: FrequencyPool,
    pub pool_size: Option<usize>,
    pub seed: Option<u64>,
}

impl DrawRequest {
    pub fn new(mode: Mode, count: usize, range: NumberRange) -> Self {
        Self {
            mode,
            count,
            range,
            pool: FrequencyPool::new(),
            pool_size: None,
            seed: None,
        }
    }

    pub fn with_pool(mut self, pool: FrequencyPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_pool_size(mut self, pool_size: Option<usize>) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn effective_pool_size(&self) -> usize {
        self.pool_size
            .unwrap_or_else(|| default_pool_size(self.count, self.pool.len(), self.range))
    }
}

/// Performs the draw described by `request`, taking randomness from `source`.
///
/// The request's seed is ignored here; the caller owns the source.
pub fn generate_with<S: Source + ?Sized>(source: &mut S, request: &DrawRequest) -> Result<DrawResult> {
    log::debug!(
        "{} draw of {} from {}",
        request.mode,
        request.count,
        request.range
    );

    match request.mode {
        Mode::Random => {
            if !request.pool.is_empty() {
                log::warn!(
                    "ignoring {} pool numbers for a random draw",
                    request.pool.len()
                );
            }
            draw_random(source, request.count, request.range)
        }
        Mode::Weighted => draw_weighted(
            source,
            request.effective_pool_size(),
            request.count,
            request.range,
            &request.pool,
        ),
        Mode::Custom => draw_custom(
            source,
            request.count,
            request.range,
            &request.pool,
            request.pool_size,
        ),
    }
}

pub(crate) fn ensure_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidInput("count must be at least 1".into()));
    }
    Ok(())
}
