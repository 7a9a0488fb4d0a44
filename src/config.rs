use std::fmt;

use hashbrown::HashMap;
use owo_colors::{AnsiColors, FgDynColorDisplay, OwoColorize};
use serde::{Deserialize, Serialize};

use crate::game::Game;

// Early config files were nothing but a map of games. Those still load: we deserialize as
// UpgradeConfig and convert to Config, and the next write stores the current shape.

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UpgradeConfig {
    Current(Config),
    Old(HashMap<String, Game>),
}

impl UpgradeConfig {
    pub fn is_legacy(&self) -> bool {
        match self {
            UpgradeConfig::Current(_) => false,
            UpgradeConfig::Old(_) => true,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    colors: Option<Colors>,
    games: HashMap<String, Game>,
}

impl Config {
    #[inline]
    pub fn game(&self, name: &str) -> Option<&Game> {
        self.games.get(name)
    }

    #[inline]
    pub fn set_game(&mut self, name: String, game: Game) -> Option<Game> {
        self.games.insert(name, game)
    }

    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<Game> {
        self.games.remove(name)
    }

    /// Stored games, ordered by name.
    pub fn games(&self) -> Vec<(&String, &Game)> {
        let mut games: Vec<_> = self.games.iter().collect();
        games.sort_by(|a, b| a.0.cmp(b.0));
        games
    }

    pub fn colors(&self) -> Colors {
        self.colors.unwrap_or_default()
    }
}

impl From<UpgradeConfig> for Config {
    fn from(config: UpgradeConfig) -> Self {
        match config {
            UpgradeConfig::Current(current) => current,
            UpgradeConfig::Old(games) => Config {
                games,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct Colors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lucky: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bonus: Option<Color>,
}

impl Colors {
    pub fn lucky<'a, T: fmt::Display>(&self, item: &'a T) -> FgDynColorDisplay<'a, AnsiColors, T> {
        item.color(self.lucky.map_or(AnsiColors::BrightGreen, |color| color.0))
    }

    pub fn bonus<'a, T: fmt::Display>(&self, item: &'a T) -> FgDynColorDisplay<'a, AnsiColors, T> {
        item.color(self.bonus.map_or(AnsiColors::BrightYellow, |color| color.0))
    }
}

static COLORS: [(&str, AnsiColors); 17] = [
    ("Black", AnsiColors::Black),
    ("Red", AnsiColors::Red),
    ("Green", AnsiColors::Green),
    ("Yellow", AnsiColors::Yellow),
    ("Blue", AnsiColors::Blue),
    ("Magenta", AnsiColors::Magenta),
    ("Cyan", AnsiColors::Cyan),
    ("White", AnsiColors::White),
    ("Default", AnsiColors::Default),
    ("BrightBlack", AnsiColors::BrightBlack),
    ("BrightRed", AnsiColors::BrightRed),
    ("BrightGreen", AnsiColors::BrightGreen),
    ("BrightYellow", AnsiColors::BrightYellow),
    ("BrightBlue", AnsiColors::BrightBlue),
    ("BrightMagenta", AnsiColors::BrightMagenta),
    ("BrightCyan", AnsiColors::BrightCyan),
    ("BrightWhite", AnsiColors::BrightWhite),
];

/// A highlight color, named case-insensitively in the config file.
#[derive(Clone, Copy, Debug)]
pub struct Color(AnsiColors);

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = String::deserialize(deserializer)?;
        COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&data))
            .map(|&(_, color)| Color(color))
            .ok_or_else(|| serde::de::Error::custom(format!("unknown color: {}", data)))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Variant names match the table.
        serializer.serialize_str(&format!("{:?}", self.0))
    }
}
