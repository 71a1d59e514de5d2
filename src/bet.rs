use crate::game::GameType;
use serde::{Deserialize, Serialize};

pub type BetId = u64;

/// One generated set of numbers. Fields are private so a bet cannot change
/// after it has been created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    #[serde(default)]
    id: BetId,
    #[serde(rename = "tipo")]
    game: GameType,
    #[serde(rename = "numeros")]
    numbers: Vec<u8>,
    #[serde(rename = "data")]
    created_at: String,
}

impl Bet {
    pub fn new(id: BetId, game: GameType, numbers: Vec<u8>, created_at: impl Into<String>) -> Self {
        Self {
            id,
            game,
            numbers,
            created_at: created_at.into(),
        }
    }

    pub fn id(&self) -> BetId {
        self.id
    }

    pub fn game(&self) -> GameType {
        self.game
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    pub fn is_valid(&self) -> bool {
        self.game.rules().accepts(&self.numbers)
    }

    pub(crate) fn with_id(mut self, id: BetId) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_browser_record_without_id() {
        let json = r#"{"tipo":"lotofacil","numeros":[1,2,3,4,5,6,7,8,9,10,11,12,13,14,15],"data":"10/10/2024 12:00:00"}"#;
        let bet: Bet = serde_json::from_str(json).unwrap();
        assert_eq!(bet.id(), 0);
        assert_eq!(bet.game(), GameType::Lotofacil);
        assert_eq!(bet.created_at(), "10/10/2024 12:00:00");
        assert!(bet.is_valid());
    }

    #[test]
    fn writes_storage_field_names() {
        let bet = Bet::new(3, GameType::Lotomania, vec![1, 2], "agora");
        let value = serde_json::to_value(&bet).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["tipo"], "lotomania");
        assert_eq!(value["numeros"], serde_json::json!([1, 2]));
        assert_eq!(value["data"], "agora");
    }

    #[test]
    fn contains_uses_sorted_numbers() {
        let bet = Bet::new(1, GameType::Lotofacil, (1..=15).collect(), "");
        assert!(bet.contains(15));
        assert!(!bet.contains(16));
    }
}
