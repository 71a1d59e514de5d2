use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Lotomania,
    Lotofacil,
}

/// How many numbers a bet holds and the inclusive range they are drawn from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GameRules {
    pub count: usize,
    pub min: u8,
    pub max: u8,
}

impl GameRules {
    pub fn contains(&self, number: u8) -> bool {
        (self.min..=self.max).contains(&number)
    }

    /// True when `numbers` is a valid bet: exact length, strictly ascending, in range.
    pub fn accepts(&self, numbers: &[u8]) -> bool {
        numbers.len() == self.count
            && numbers.iter().all(|n| self.contains(*n))
            && numbers.windows(2).all(|w| w[0] < w[1])
    }
}

impl GameType {
    pub fn rules(self) -> GameRules {
        match self {
            GameType::Lotomania => GameRules {
                count: 50,
                min: 0,
                max: 99,
            },
            GameType::Lotofacil => GameRules {
                count: 15,
                min: 1,
                max: 25,
            },
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            GameType::Lotomania => "lotomania",
            GameType::Lotofacil => "lotofacil",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameType::Lotomania => "Lotomania",
            GameType::Lotofacil => "Lotofácil",
        };
        write!(f, "{name}")
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lotomania" => Ok(GameType::Lotomania),
            "lotofacil" | "lotofácil" => Ok(GameType::Lotofacil),
            other => Err(format!("unknown game '{other}'")),
        }
    }
}
