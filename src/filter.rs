use crate::{bet::Bet, game::GameType};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GameFilter {
    #[default]
    All,
    Only(GameType),
}

impl GameFilter {
    pub fn matches(self, bet: &Bet) -> bool {
        match self {
            GameFilter::All => true,
            GameFilter::Only(game) => bet.game() == game,
        }
    }

    /// All -> Lotomania -> Lotofácil -> All
    pub fn next(self) -> Self {
        match self {
            GameFilter::All => GameFilter::Only(GameType::Lotomania),
            GameFilter::Only(GameType::Lotomania) => GameFilter::Only(GameType::Lotofacil),
            GameFilter::Only(GameType::Lotofacil) => GameFilter::All,
        }
    }
}

pub fn filter(history: &[Bet], by: GameFilter) -> Vec<&Bet> {
    history.iter().filter(|b| by.matches(b)).collect()
}

impl fmt::Display for GameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameFilter::All => write!(f, "Todos"),
            GameFilter::Only(game) => write!(f, "{game}"),
        }
    }
}

impl FromStr for GameFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todos") {
            return Ok(GameFilter::All);
        }
        s.parse().map(GameFilter::Only)
    }
}
