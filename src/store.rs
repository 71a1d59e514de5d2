use crate::{
    bet::{Bet, BetId},
    error::{LotteryError, Result},
    game::GameType,
    storage::KeyValueStore,
};
use itertools::Itertools;
use tracing::{debug, info, warn};

/// Key of the canonical history snapshot.
pub const HISTORY_KEY: &str = "apostas";
/// Key of the older Lotomania-only history. Read for imports, never written.
pub const LEGACY_HISTORY_KEY: &str = "lotomania_apostas";

/// Append-only bet history mirrored into a [`KeyValueStore`].
#[derive(Debug)]
pub struct BetRecordStore<S> {
    storage: S,
    history: Vec<Bet>,
}

impl<S: KeyValueStore> BetRecordStore<S> {
    /// Opens the store and rehydrates history from the stored snapshot.
    pub fn open(storage: S) -> Self {
        let history = load_all(&storage);
        info!(bets = history.len(), "loaded bet history");
        Self { storage, history }
    }

    pub fn history(&self) -> &[Bet] {
        &self.history
    }

    pub fn get(&self, id: BetId) -> Option<&Bet> {
        self.history.iter().find(|b| b.id() == id)
    }

    pub fn latest(&self) -> Option<&Bet> {
        self.history.last()
    }

    pub fn next_id(&self) -> BetId {
        self.history.iter().map(Bet::id).max().unwrap_or(0) + 1
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Adds `bet` to the end of history and rewrites the whole snapshot.
    ///
    /// The bet stays in memory even when the write fails; the error is
    /// returned so the caller can report it.
    pub fn append(&mut self, bet: Bet) -> Result<()> {
        debug!(id = bet.id(), game = bet.game().tag(), "appending bet");
        self.history.push(bet);
        self.persist()
    }

    pub fn load_legacy(&self) -> Result<Vec<Vec<u8>>> {
        let raw = self
            .storage
            .get(LEGACY_HISTORY_KEY)
            .map_err(|e| read_error(LEGACY_HISTORY_KEY, e))?;
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| LotteryError::StorageRead {
            key: LEGACY_HISTORY_KEY.to_string(),
            reason: e.to_string(),
        })
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.history).map_err(|e| {
            LotteryError::StorageWrite {
                key: HISTORY_KEY.to_string(),
                reason: e.to_string(),
            }
        })?;
        self.storage.set(HISTORY_KEY, &json).map_err(|e| {
            let err = LotteryError::StorageWrite {
                key: HISTORY_KEY.to_string(),
                reason: e.chain().map(|c| c.to_string()).join(": "),
            };
            warn!(%err, "history kept in memory only");
            err
        })
    }
}

/// Reads the history snapshot. Anything unreadable yields an empty history.
pub fn load_all<S: KeyValueStore>(storage: &S) -> Vec<Bet> {
    match try_load_all(storage) {
        Ok(history) => history,
        Err(err) => {
            warn!(%err, "ignoring stored history");
            Vec::new()
        }
    }
}

fn try_load_all<S: KeyValueStore>(storage: &S) -> Result<Vec<Bet>> {
    let raw = storage
        .get(HISTORY_KEY)
        .map_err(|e| read_error(HISTORY_KEY, e))?;
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let records: Vec<Bet> =
        serde_json::from_str(&raw).map_err(|e| LotteryError::StorageRead {
            key: HISTORY_KEY.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(bad) = records.iter().position(|b| !b.is_valid()) {
        return Err(LotteryError::StorageRead {
            key: HISTORY_KEY.to_string(),
            reason: format!("record {} does not follow the game rules", bad + 1),
        });
    }

    // Records from the browser format carry no id; number them by position.
    if records.iter().any(|b| b.id() == 0) {
        return Ok(records
            .into_iter()
            .enumerate()
            .map(|(i, b)| b.with_id(i as BetId + 1))
            .collect());
    }
    if !records.iter().map(Bet::id).all_unique() {
        return Err(LotteryError::StorageRead {
            key: HISTORY_KEY.to_string(),
            reason: "duplicate bet ids".to_string(),
        });
    }
    Ok(records)
}

/// Keeps the legacy sequences that are valid Lotomania bets.
pub fn valid_legacy_bets(legacy: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    let rules = GameType::Lotomania.rules();
    legacy
        .into_iter()
        .enumerate()
        .filter_map(|(i, numbers)| {
            if rules.accepts(&numbers) {
                Some(numbers)
            } else {
                warn!(index = i, "skipping invalid legacy bet");
                None
            }
        })
        .collect()
}

fn read_error(key: &str, e: color_eyre::eyre::Report) -> LotteryError {
    LotteryError::StorageRead {
        key: key.to_string(),
        reason: e.chain().map(|c| c.to_string()).join(": "),
    }
}
