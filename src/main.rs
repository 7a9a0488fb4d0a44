mod args;
mod config;
mod game;

use std::{fmt::Display, fs::File, io, path::Path, process};

use args::{AddGame, Args, Command};
use config::{Colors, Config, UpgradeConfig};
use draw::FrequencyPool;
use drawrng::RandomSource;
use game::{Game, Ticket, DEFAULT_GAME};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Draw(#[from] draw::Error),
    #[error("Unknown game: {0}")]
    UnknownGame(String),
    #[error("Bad ticket count: {0}")]
    TicketCount(String),
    #[error(transparent)]
    IO(#[from] io::Error),
    #[error("Bad config: {0}")]
    Json(#[from] serde_json::Error),
}

struct TicketFormatter<'a> {
    ticket: &'a Ticket,
    highlights: Option<&'a FrequencyPool>,
    colors: Colors,
}

impl<'a> TicketFormatter<'a> {
    fn new(ticket: &'a Ticket, highlights: Option<&'a FrequencyPool>, colors: Colors) -> Self {
        Self {
            ticket,
            highlights,
            colors,
        }
    }
}

impl<'a> Display for TicketFormatter<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Print main numbers, highlighting favored ones
        let mut numbers = self.ticket.main.iter();

        if let Some(&n) = numbers.next() {
            self.write_number(f, n)?;
        }

        for &n in numbers {
            f.write_str("  ")?;
            self.write_number(f, n)?;
        }

        // Print bonus numbers
        if let Some(bonus) = &self.ticket.bonus {
            for n in bonus {
                let text = format!("{:02}", n);
                write!(f, "  +  {}", self.colors.bonus(&text))?;
            }
        }

        Ok(())
    }
}

impl TicketFormatter<'_> {
    fn write_number(&self, f: &mut std::fmt::Formatter<'_>, n: i32) -> std::fmt::Result {
        let text = format!("{:02}", n);
        match self.highlights {
            Some(pool) if pool.contains(n) => write!(f, "{}", self.colors.lucky(&text)),
            _ => f.write_str(&text),
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> Result<()> {
    let config_path = args.config_path()?;
    log::debug!("config: {}", config_path.display());

    match args.command() {
        Command::Draw => draw_games(args, &config_path),
        Command::Add(add) => add_game(add, &config_path),
        Command::Rem(name) => rem_game(name, &config_path),
        Command::List => list(&config_path),
    }
}

/// Splits a ticket count from a game name
///
/// A game of the form mega*3 (or megax3 / megaX3 on shells where * is awkward) asks for three
/// tickets of the game mega. Names without a numeric suffix draw one ticket, and a stored game
/// whose name happens to end in a count (say lux5) is taken as written.
fn counted_game<'a>(config: &Config, candidate: &'a str) -> Result<(&'a str, usize)> {
    if candidate == DEFAULT_GAME || config.game(candidate).is_some() {
        return Ok((candidate, 1));
    }

    let counted = candidate
        .rsplit_once(|u: char| u == '*' || u == 'x' || u == 'X')
        .and_then(|(name, count)| count.parse::<usize>().ok().map(|count| (name, count)));

    match counted {
        Some((_, 0)) => Err(Error::TicketCount(format!(
            "{} asks for no tickets",
            candidate
        ))),
        Some(counted) => Ok(counted),
        None => Ok((candidate, 1)),
    }
}

fn ticket_count(per_game: usize, per_run: usize) -> Result<usize> {
    if per_run == 0 {
        return Err(Error::TicketCount("--tickets must be at least 1".into()));
    }

    per_game.checked_mul(per_run).ok_or_else(|| {
        Error::TicketCount(format!("{} x {} tickets is too many", per_game, per_run))
    })
}

fn resolve_game(config: &Config, name: &str) -> Result<Game> {
    match config.game(name) {
        Some(game) => Ok(game.clone()),
        None if name == DEFAULT_GAME => Ok(Game::builtin()?),
        None => Err(Error::UnknownGame(name.into())),
    }
}

fn draw_games(args: &Args, config: &Path) -> Result<()> {
    let config = read_config(config)?;
    let colors = config.colors();
    let overrides = args.overrides();

    let mut source = RandomSource::from_seed(args.seed());
    let mut source = source.with_logging();

    println!();

    for candidate in args.games() {
        let (name, tickets) = counted_game(&config, candidate)?;
        let tickets = ticket_count(tickets, args.tickets)?;
        let game = resolve_game(&config, name)?.with_overrides(&overrides);
        log::debug!("{}: {}", name, game.summary());

        println!("# {}", name);
        if let Some(comment) = &game.comment {
            println!("# {}", comment);
        }

        for _ in 0..tickets {
            let ticket = game.draw(&mut source)?;
            println!(
                "  {}",
                TicketFormatter::new(&ticket, game.highlights(), colors)
            );
        }
    }

    println!();

    let tally = source.finalize();
    log::debug!(
        "{} draws ({} uniform, {} gaussian)",
        tally.total(),
        tally.uniform,
        tally.gaussian
    );
    Ok(())
}

fn add_game(add: &AddGame, config: &Path) -> Result<()> {
    let game = add.game();

    // Check the game can actually be drawn before storing it.
    let mut source = RandomSource::from_entropy();
    game.draw(&mut source)?;

    let mut games = read_config(config)?;
    if games.set_game(add.name.clone(), game).is_some() {
        log::info!("replaced game {}", add.name);
    }
    write_config(config, &games)?;
    Ok(())
}

fn rem_game(name: &str, config: &Path) -> Result<()> {
    let mut games = read_config(config)?;
    if games.remove(name).is_none() {
        return Err(Error::UnknownGame(name.into()));
    }
    write_config(config, &games)?;
    Ok(())
}

fn list(config: &Path) -> Result<()> {
    let config = read_config(config)?;
    for (name, game) in config.games() {
        println!("# {}", name);
        if let Some(comment) = &game.comment {
            println!("# {}", comment);
        }
        println!("  {}", game.summary());
    }
    Ok(())
}

fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Default::default());
    }

    let config: UpgradeConfig = serde_json::from_reader(File::open(path)?)?;
    if config.is_legacy() {
        log::info!(
            "{} uses a legacy format; it will be upgraded on the next write",
            path.display()
        );
    }
    Ok(config.into())
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    serde_json::to_writer_pretty(File::create(path)?, config)?;
    Ok(())
}
