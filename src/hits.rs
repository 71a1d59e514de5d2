use crate::{
    bet::{Bet, BetId},
    error::{LotteryError, Result},
};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HitMark {
    Unmarked,
    Marked,
}

/// Numbers the user flagged as matched, per bet. Session-only.
#[derive(Clone, Debug, Default)]
pub struct HitTracker {
    hits: HashMap<BetId, BTreeSet<u8>>,
}

impl HitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the mark of `number` on `bet` and returns the new mark.
    pub fn toggle(&mut self, bet: &Bet, number: u8) -> Result<HitMark> {
        if !bet.contains(number) {
            return Err(LotteryError::ForeignNumber {
                bet: bet.id(),
                number,
            });
        }
        let set = self.hits.entry(bet.id()).or_default();
        if set.remove(&number) {
            Ok(HitMark::Unmarked)
        } else {
            set.insert(number);
            Ok(HitMark::Marked)
        }
    }

    pub fn count(&self, bet: BetId) -> usize {
        self.hits.get(&bet).map_or(0, BTreeSet::len)
    }

    pub fn is_marked(&self, bet: BetId, number: u8) -> bool {
        self.hits.get(&bet).is_some_and(|set| set.contains(&number))
    }

    pub fn marked(&self, bet: BetId) -> Vec<u8> {
        self.hits
            .get(&bet)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}
