use std::{borrow::Cow, io, iter, path::PathBuf};

use clap::Parser;
use directories::BaseDirs;
use draw::{FrequencyPool, Mode, NumberRange};
use either::Either;

use crate::{
    game::{Bonus, Game, Overrides, DEFAULT_GAME},
    Result,
};

#[derive(Clone, Debug, Parser)]
#[clap(author, about, version)]
pub struct Args {
    /// games to draw
    ///
    /// Names of games stored with `lucky add`. Append *N or xN to draw N tickets for a game (e.g.
    /// mega*3). With no game named, the default game is drawn: five numbers from 1-70 weighted
    /// toward a pool of lucky numbers, plus one bonus ball from 1-25.
    games: Vec<String>,

    /// selection mode: random, weighted (or lucky), custom
    #[clap(short, long)]
    mode: Option<Mode>,

    /// how many numbers to draw
    #[clap(short = 'n', long)]
    count: Option<usize>,

    /// legal numbers, e.g. 1-70
    #[clap(short, long)]
    range: Option<NumberRange>,

    /// numbers to favor, e.g. 5,10,15
    ///
    /// In weighted mode these replace the game's lucky numbers; in custom mode they are your
    /// picks.
    #[clap(short, long)]
    pool: Option<FrequencyPool>,

    /// size of the candidate pool for weighted and custom draws
    #[clap(long)]
    pool_size: Option<usize>,

    /// seed for reproducible draws
    #[clap(short, long)]
    seed: Option<u64>,

    /// tickets to draw per game
    #[clap(short, long, default_value = "1")]
    pub tickets: usize,

    /// config profile
    ///
    /// Games are stored in ~/.lucky; pass a profile name to use ~/.lucky.<profile> instead.
    #[clap(short, long)]
    config: Option<String>,

    #[clap(subcommand)]
    subcmd: Option<SubCommand>,

    /// log debug output
    ///
    /// Engine logging goes to stderr. RUST_LOG overrides this setting.
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn games(&self) -> impl Iterator<Item = &str> {
        if self.games.is_empty() {
            Either::Left(iter::once(DEFAULT_GAME))
        } else {
            Either::Right(self.games.iter().map(AsRef::as_ref))
        }
    }

    pub fn command(&self) -> Command {
        match self.subcmd {
            None => Command::Draw,
            Some(SubCommand::Add(ref add)) => Command::Add(add),
            Some(SubCommand::Rem(ref rem)) => Command::Rem(&rem.name),
            Some(SubCommand::List) => Command::List,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            mode: self.mode,
            count: self.count,
            range: self.range,
            pool: self.pool.clone(),
            pool_size: self.pool_size,
        }
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        static CONFIG_BASE: &str = ".lucky";

        let dirs = BaseDirs::new()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No home directory"))?;

        let config = self
            .config
            .as_ref()
            .map(|profile| {
                let filename = CONFIG_BASE.to_string()
                    + "."
                    + &profile
                        .trim_matches(|c: char| !c.is_ascii_alphanumeric())
                        .to_ascii_lowercase();
                Cow::from(filename)
            })
            .unwrap_or_else(|| Cow::from(CONFIG_BASE));

        Ok(dirs.home_dir().join(config.as_ref()))
    }
}

#[derive(Clone, Debug, Parser)]
enum SubCommand {
    #[clap(name = "add")]
    Add(AddGame),
    #[clap(name = "rm")]
    Rem(RemGame),
    #[clap(name = "list")]
    List,
}

/// Store a game for easy reuse.
#[derive(Clone, Debug, Parser)]
pub struct AddGame {
    /// An easily-remembered name for the game
    pub name: String,
    /// A comment shown above the game's tickets
    #[clap(short, long)]
    pub comment: Option<String>,
    /// Selection mode: random, weighted (or lucky), custom
    #[clap(short, long, default_value = "weighted")]
    pub mode: Mode,
    /// How many numbers to draw
    #[clap(short = 'n', long, default_value = "5")]
    pub count: usize,
    /// Legal numbers
    #[clap(short, long, default_value = "1-70")]
    pub range: NumberRange,
    /// Numbers to favor
    #[clap(short, long)]
    pub pool: Option<FrequencyPool>,
    /// Size of the candidate pool
    #[clap(long)]
    pub pool_size: Option<usize>,
    /// Legal bonus numbers; no bonus is drawn without this
    #[clap(long)]
    pub bonus_range: Option<NumberRange>,
    /// How many bonus numbers to draw
    #[clap(long, default_value = "1")]
    pub bonus_count: usize,
}

impl AddGame {
    pub fn game(&self) -> Game {
        Game {
            comment: self.comment.clone(),
            mode: self.mode,
            count: self.count,
            range: self.range,
            pool: self.pool.clone().unwrap_or_default(),
            pool_size: self.pool_size,
            bonus: self.bonus_range.map(|range| Bonus {
                range,
                count: self.bonus_count,
            }),
        }
    }
}

/// Remove a stored game.
#[derive(Clone, Debug, Parser)]
struct RemGame {
    /// Game to be removed
    name: String,
}

#[derive(Copy, Clone, Debug)]
pub enum Command<'a> {
    Draw,
    Add(&'a AddGame),
    Rem(&'a str),
    List,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use draw::{Mode, NumberRange};

    use super::{Args, Command};

    #[test]
    fn default_game() {
        let args = parse(&["lucky"]);
        assert_eq!(vec!["default"], args.games().collect::<Vec<_>>());
        assert!(matches!(args.command(), Command::Draw));
    }

    #[test]
    fn draw_overrides() {
        let args = parse(&["lucky", "-m", "custom", "-p", "5,10", "-n", "2", "-r", "1-49"]);
        let overrides = args.overrides();
        assert_eq!(Some(Mode::Custom), overrides.mode);
        assert_eq!(Some(2), overrides.count);
        assert_eq!(Some(NumberRange::new(1, 49).unwrap()), overrides.range);
        assert_eq!(vec![5, 10], overrides.pool.unwrap().sorted());
    }

    #[test]
    fn bad_range_is_rejected() {
        assert!(Args::try_parse_from(["lucky", "-r", "70-1"]).is_err());
    }

    #[test]
    fn add_game() {
        let args = parse(&[
            "lucky", "add", "mega", "-p", "3,7", "--bonus-range", "1-25", "-c", "Tuesdays",
        ]);

        match args.command() {
            Command::Add(add) => {
                let game = add.game();
                assert_eq!("mega", add.name);
                assert_eq!(Mode::Weighted, game.mode);
                assert_eq!(5, game.count);
                assert_eq!(1, game.bonus.unwrap().count);
                assert_eq!(Some("Tuesdays"), game.comment.as_deref());
            }
            command => panic!("unexpected command: {:?}", command),
        }
    }

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }
}
