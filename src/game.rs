use draw::{DrawRequest, DrawResult, FrequencyPool, Mode, NumberRange, Source};
use serde::{Deserialize, Serialize};

pub static DEFAULT_GAME: &str = "default";

/// Lucky numbers used by the built-in game.
static DEFAULT_POOL: [i32; 6] = [3, 7, 15, 22, 38, 44];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Game {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub mode: Mode,
    pub count: usize,
    pub range: NumberRange,
    #[serde(default, skip_serializing_if = "FrequencyPool::is_empty")]
    pub pool: FrequencyPool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<Bonus>,
}

/// A separately drawn set of bonus balls, e.g. a Mega Ball or Powerball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bonus {
    pub range: NumberRange,
    pub count: usize,
}

/// Values given on the command line, which take precedence over stored values.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub mode: Option<Mode>,
    pub count: Option<usize>,
    pub range: Option<NumberRange>,
    pub pool: Option<FrequencyPool>,
    pub pool_size: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Ticket {
    pub main: DrawResult,
    pub bonus: Option<DrawResult>,
}

impl Game {
    /// Five weighted numbers from 1-70 plus one bonus ball from 1-25.
    pub fn builtin() -> draw::Result<Self> {
        Ok(Game {
            comment: None,
            mode: Mode::Weighted,
            count: 5,
            range: NumberRange::new(1, 70)?,
            pool: DEFAULT_POOL.iter().copied().collect(),
            pool_size: None,
            bonus: Some(Bonus {
                range: NumberRange::new(1, 25)?,
                count: 1,
            }),
        })
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(count) = overrides.count {
            self.count = count;
        }
        if let Some(range) = overrides.range {
            self.range = range;
        }
        if let Some(pool) = &overrides.pool {
            self.pool = pool.clone();
        }
        if overrides.pool_size.is_some() {
            self.pool_size = overrides.pool_size;
        }
        self
    }

    pub fn request(&self) -> DrawRequest {
        DrawRequest::new(self.mode, self.count, self.range)
            .with_pool(self.pool.clone())
            .with_pool_size(self.pool_size)
    }

    /// Numbers worth highlighting in a ticket for this game.
    pub fn highlights(&self) -> Option<&FrequencyPool> {
        match self.mode {
            Mode::Random => None,
            Mode::Weighted | Mode::Custom => Some(&self.pool),
        }
    }

    pub fn draw<S: Source + ?Sized>(&self, source: &mut S) -> draw::Result<Ticket> {
        let main = draw::generate_with(source, &self.request())?;
        let bonus = match self.bonus {
            Some(bonus) => Some(draw::draw_random(source, bonus.count, bonus.range)?),
            None => None,
        };
        Ok(Ticket { main, bonus })
    }

    /// One-line description for listings.
    pub fn summary(&self) -> String {
        let mut summary = format!("{} {} from {}", self.mode, self.count, self.range);
        if !self.pool.is_empty() {
            let pool: Vec<_> = self.pool.sorted().iter().map(i32::to_string).collect();
            summary += &format!(" favoring {}", pool.join(","));
        }
        if let Some(size) = self.pool_size {
            summary += &format!(" (pool of {})", size);
        }
        if let Some(bonus) = self.bonus {
            summary += &format!(" + {} from {}", bonus.count, bonus.range);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use draw::{Mode, NumberRange};
    use drawrng::RandomSource;

    use super::{Game, Overrides};

    #[test]
    fn builtin_draws_main_and_bonus() {
        let game = Game::builtin().unwrap();
        let mut source = RandomSource::seeded(1);
        let ticket = game.draw(&mut source).unwrap();

        assert_eq!(5, ticket.main.len());
        assert!(ticket.main.iter().all(|&n| (1..=70).contains(&n)));

        let bonus = ticket.bonus.unwrap();
        assert_eq!(1, bonus.len());
        assert!(bonus.iter().all(|&n| (1..=25).contains(&n)));
    }

    #[test]
    fn overrides_replace_stored_values() {
        let overrides = Overrides {
            mode: Some(Mode::Custom),
            range: Some(NumberRange::new(1, 49).unwrap()),
            pool: Some(vec![5, 10].into()),
            ..Default::default()
        };
        let game = Game::builtin().unwrap().with_overrides(&overrides);

        assert_eq!(Mode::Custom, game.mode);
        assert_eq!(5, game.count);
        assert_eq!(NumberRange::new(1, 49).unwrap(), game.range);
        assert_eq!(vec![5, 10], game.pool.sorted());
    }

    #[test]
    fn random_games_highlight_nothing() {
        let overrides = Overrides {
            mode: Some(Mode::Random),
            ..Default::default()
        };
        let game = Game::builtin().unwrap().with_overrides(&overrides);
        assert!(game.highlights().is_none());
    }

    #[test]
    fn summary() {
        let game = Game::builtin().unwrap();
        assert_eq!(
            "weighted 5 from 1-70 favoring 3,7,15,22,38,44 + 1 from 1-25",
            game.summary()
        );
    }

    #[test]
    fn seeded_games_repeat() {
        let game = Game::builtin().unwrap();
        let draw = |seed| {
            let mut source = RandomSource::seeded(seed);
            let ticket = game.draw(&mut source).unwrap();
            (ticket.main, ticket.bonus)
        };
        assert_eq!(draw(99), draw(99));
    }
}
