use crate::{
    error::{LotteryError, Result},
    game::GameType,
};
use rand::Rng;
use std::{collections::BTreeSet, ops::RangeInclusive};

/// Draws `count` distinct numbers from `min..=max`, sorted ascending.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min: u8,
    max: u8,
) -> Result<Vec<u8>> {
    sample_from_draws(count, min, max, |range| rng.random_range(range))
}

pub fn sample_game<R: Rng + ?Sized>(rng: &mut R, game: GameType) -> Result<Vec<u8>> {
    let rules = game.rules();
    sample(rng, rules.count, rules.min, rules.max)
}

/// Rejection sampling over an arbitrary draw function. Duplicate draws are
/// discarded until `count` distinct values have been seen.
pub fn sample_from_draws<F>(count: usize, min: u8, max: u8, mut draw: F) -> Result<Vec<u8>>
where
    F: FnMut(RangeInclusive<u8>) -> u8,
{
    if min > max || (max - min) as usize + 1 < count {
        return Err(LotteryError::InvalidRange { count, min, max });
    }
    let mut picked = BTreeSet::new();
    while picked.len() < count {
        let n = draw(min..=max);
        if (min..=max).contains(&n) {
            picked.insert(n);
        }
    }
    Ok(picked.into_iter().collect())
}
