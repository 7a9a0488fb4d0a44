pub use draw::Source;
use draw::{DrawRequest, DrawResult, Result};
use hashbrown::HashMap;
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};
use rand_distr::StandardNormal;

/// Performs a draw with a fresh source: seeded from `request.seed` when present, from system
/// entropy otherwise.
pub fn generate(request: &DrawRequest) -> Result<DrawResult> {
    let mut source = RandomSource::from_seed(request.seed);
    draw::generate_with(&mut source, request)
}

/// A `Source` backed by a `rand` generator.
///
/// The source owns its generator. Callers drawing from several threads should give each thread
/// its own source.
#[derive(Debug)]
pub struct RandomSource<R> {
    rng: R,
    providers: HashMap<(i32, i32), Uniform<i32>>,
}

impl<R: Rng> RandomSource<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            providers: HashMap::new(),
        }
    }

    pub fn with_logging(&mut self) -> LogWrapper<Self> {
        LogWrapper {
            source: self,
            tally: Tally::default(),
        }
    }
}

impl RandomSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Source for RandomSource<R> {
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        self.providers
            .entry((low, high))
            .or_insert_with(|| Uniform::from(low..=high))
            .sample(&mut self.rng)
    }

    fn gaussian(&mut self, mean: f64, deviation: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + deviation * z
    }
}

/// Counts of raw draws taken from a source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub uniform: usize,
    pub gaussian: usize,
}

impl Tally {
    pub fn total(&self) -> usize {
        self.uniform + self.gaussian
    }
}

/// Traces every raw draw and keeps a tally of them.
pub struct LogWrapper<'s, S> {
    source: &'s mut S,
    tally: Tally,
}

impl<'s, S: Source> LogWrapper<'s, S> {
    pub fn new(source: &'s mut S) -> Self {
        Self {
            source,
            tally: Tally::default(),
        }
    }
}

impl<S> LogWrapper<'_, S> {
    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn finalize(self) -> Tally {
        self.tally
    }
}

impl<'s, S: Source> Source for LogWrapper<'s, S> {
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        let result = self.source.uniform(low, high);
        self.tally.uniform += 1;
        log::trace!("uniform {}..={} -> {}", low, high, result);
        result
    }

    fn gaussian(&mut self, mean: f64, deviation: f64) -> f64 {
        let result = self.source.gaussian(mean, deviation);
        self.tally.gaussian += 1;
        log::trace!("gaussian ({}, {}) -> {:.3}", mean, deviation, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use draw::{
        generate_with, sample, DrawRequest, DrawResult, Error, FrequencyPool, Mode, NumberRange,
    };
    use hashbrown::HashSet;

    use crate::{generate, LogWrapper, RandomSource, Source};

    #[test_log::test]
    fn random_draws_are_valid() {
        for seed in 0..500 {
            let request = DrawRequest::new(Mode::Random, 6, range(1, 70)).with_seed(Some(seed));
            assert_valid(&generate(&request).unwrap(), 6, range(1, 70));
        }
    }

    #[test_log::test]
    fn weighted_draws_are_valid() {
        for seed in 0..500 {
            let request = DrawRequest::new(Mode::Weighted, 6, range(1, 70))
                .with_pool(lucky_pool())
                .with_pool_size(Some(47))
                .with_seed(Some(seed));
            assert_valid(&generate(&request).unwrap(), 6, range(1, 70));
        }
    }

    #[test_log::test]
    fn custom_draws_are_valid() {
        let user: FrequencyPool = vec![5, 10, 15, 20, 25, 30].into();
        for seed in 0..500 {
            let request = DrawRequest::new(Mode::Custom, 6, range(1, 70))
                .with_pool(user.clone())
                .with_seed(Some(seed));
            assert_valid(&generate(&request).unwrap(), 6, range(1, 70));
        }
    }

    #[test_log::test]
    fn unseeded_draws_are_valid() {
        let request = DrawRequest::new(Mode::Weighted, 5, range(1, 70)).with_pool(lucky_pool());
        for _ in 0..100 {
            assert_valid(&generate(&request).unwrap(), 5, range(1, 70));
        }
    }

    #[test_log::test]
    fn whole_range_draw() {
        let request = DrawRequest::new(Mode::Random, 70, range(1, 70)).with_seed(Some(7));
        let result = generate(&request).unwrap();
        assert_eq!(range(1, 70).iter().collect::<Vec<_>>(), result.numbers());
    }

    #[test_log::test]
    fn seeded_draws_repeat() {
        for mode in [Mode::Random, Mode::Weighted, Mode::Custom] {
            let request = DrawRequest::new(mode, 6, range(1, 70))
                .with_pool(lucky_pool())
                .with_pool_size(Some(47))
                .with_seed(Some(0xfeed));
            assert_eq!(generate(&request).unwrap(), generate(&request).unwrap());
        }
    }

    #[test_log::test]
    fn seeded_source_repeats_across_tickets() {
        let request = DrawRequest::new(Mode::Weighted, 5, range(1, 70)).with_pool(lucky_pool());
        let tickets = |seed| {
            let mut source = RandomSource::seeded(seed);
            (0..10)
                .map(|_| generate_with(&mut source, &request).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(tickets(42), tickets(42));
    }

    #[test_log::test]
    fn sample_whole_small_range() {
        let mut source = RandomSource::seeded(1);
        let actual = sample(&mut source, range(1, 5), 5, &HashSet::new()).unwrap();
        assert_eq!((1..=5).collect::<HashSet<_>>(), actual);
    }

    #[test_log::test]
    fn sample_beyond_small_range() {
        let mut source = RandomSource::seeded(1);
        let actual = sample(&mut source, range(1, 5), 6, &HashSet::new());
        assert_eq!(
            Err(Error::InsufficientRange {
                requested: 6,
                eligible: 5
            }),
            actual
        );
    }

    #[test_log::test]
    fn oversized_frequency_pool() {
        let request = DrawRequest::new(Mode::Weighted, 6, range(1, 70))
            .with_pool((1..=6).collect())
            .with_pool_size(Some(5))
            .with_seed(Some(3));
        assert!(matches!(generate(&request), Err(Error::Configuration(_))));
    }

    #[test_log::test]
    fn frequency_pool_is_favored() {
        const TRIALS: u64 = 2000;

        let pool = lucky_pool();
        let mut hits = 0;
        for seed in 0..TRIALS {
            let request = DrawRequest::new(Mode::Weighted, 6, range(1, 70))
                .with_pool(pool.clone())
                .with_pool_size(Some(47))
                .with_seed(Some(seed));
            let result = generate(&request).unwrap();
            hits += result.iter().filter(|&&n| pool.contains(n)).count();
        }

        // Six numbers out of seventy would appear at a rate of 6/70 by chance alone.
        let rate = hits as f64 / (TRIALS as f64 * 6.0);
        assert!(rate > 1.5 * 6.0 / 70.0, "rate was {}", rate);
    }

    #[test_log::test]
    fn uniform_stays_in_bounds() {
        let mut source = RandomSource::seeded(9);
        for _ in 0..10_000 {
            let value = source.uniform(-3, 3);
            assert!((-3..=3).contains(&value));
        }
    }

    #[test_log::test]
    fn gaussian_is_centered() {
        let mut source = RandomSource::seeded(11);
        let mean = (0..10_000).map(|_| source.gaussian(20.0, 5.0)).sum::<f64>() / 10_000.0;
        assert!((mean - 20.0).abs() < 0.5, "mean was {}", mean);
    }

    #[test_log::test]
    fn log_wrapper_counts_draws() {
        let mut source = RandomSource::seeded(5);
        let mut wrapper = source.with_logging();
        assert_eq!(0, wrapper.tally().total());

        let request = DrawRequest::new(Mode::Weighted, 6, range(1, 70)).with_pool(lucky_pool());
        generate_with(&mut wrapper, &request).unwrap();

        let midway = wrapper.tally();
        let tally = wrapper.finalize();
        assert_eq!(midway, tally);
        assert!(tally.uniform >= 6);
        assert!(tally.gaussian >= 6);
        assert_eq!(tally.uniform + tally.gaussian, tally.total());
    }

    #[test_log::test]
    fn log_wrapper_is_transparent() {
        let request = DrawRequest::new(Mode::Custom, 6, range(1, 70)).with_pool(lucky_pool());

        let mut plain = RandomSource::seeded(13);
        let expected = generate_with(&mut plain, &request).unwrap();

        let mut logged = RandomSource::seeded(13);
        let mut wrapper = LogWrapper::new(&mut logged);
        let actual = generate_with(&mut wrapper, &request).unwrap();

        assert_eq!(expected, actual);
    }

    fn assert_valid(result: &DrawResult, count: usize, range: NumberRange) {
        assert_eq!(count, result.len());
        assert!(result.numbers().windows(2).all(|w| w[0] < w[1]));
        assert!(result.iter().all(|&n| range.contains(n)));
    }

    fn lucky_pool() -> FrequencyPool {
        vec![3, 7, 15, 22, 38, 44].into()
    }

    fn range(low: i32, high: i32) -> NumberRange {
        NumberRange::new(low, high).unwrap()
    }
}
