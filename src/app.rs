use crate::{
    bet::{Bet, BetId},
    error::{LotteryError, Result},
    filter::{GameFilter, filter},
    game::GameType,
    hits::{HitMark, HitTracker},
    sampler,
    storage::KeyValueStore,
    store::{BetRecordStore, valid_legacy_bets},
};
use chrono::{Local, SecondsFormat};
use rand::{Rng, rngs::ThreadRng};
use tracing::{error, info};

const MAX_ERRORS: usize = 50;
const LEGACY_TIMESTAMP: &str = "importado";

/// Every way the application state can change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    GenerateBet(GameType),
    ToggleHit { bet: BetId, number: u8 },
    SetFilter(GameFilter),
    ImportLegacy,
}

#[derive(Clone, Debug)]
pub struct BetRow {
    pub bet: Bet,
    pub hits: usize,
    pub marked: Vec<u8>,
}

/// Owned view of the state, handed to the renderer.
#[derive(Clone, Debug)]
pub struct AppSnapshot {
    pub filter: GameFilter,
    pub latest: Option<Bet>,
    pub rows: Vec<BetRow>,
    pub total_bets: usize,
    pub lotomania_bets: usize,
    pub lotofacil_bets: usize,
    pub status: String,
    pub errors: Vec<String>,
}

pub struct AppState<S, R = ThreadRng> {
    store: BetRecordStore<S>,
    hits: HitTracker,
    filter: GameFilter,
    latest: Option<BetId>,
    rng: R,
    status: String,
    errors: Vec<String>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(storage: S) -> Self {
        Self::with_rng(storage, rand::rng())
    }
}

impl<S: KeyValueStore, R: Rng> AppState<S, R> {
    pub fn with_rng(storage: S, rng: R) -> Self {
        Self {
            store: BetRecordStore::open(storage),
            hits: HitTracker::new(),
            filter: GameFilter::All,
            latest: None,
            rng,
            status: String::from("Ready"),
            errors: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Bet] {
        self.store.history()
    }

    pub fn hits(&self) -> &HitTracker {
        &self.hits
    }

    pub fn filter(&self) -> GameFilter {
        self.filter
    }

    pub fn latest(&self) -> Option<&Bet> {
        self.latest.and_then(|id| self.store.get(id))
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn store(&self) -> &BetRecordStore<S> {
        &self.store
    }

    /// Runs one transition. Failures are also recorded in the error log so
    /// the UI can show them; state is left as it was before the call.
    pub fn apply(&mut self, action: Action) -> Result<()> {
        let res = match action {
            Action::GenerateBet(game) => self.generate(game),
            Action::ToggleHit { bet, number } => self.toggle_hit(bet, number),
            Action::SetFilter(f) => {
                self.filter = f;
                self.status = format!("Filter: {f}");
                Ok(())
            }
            Action::ImportLegacy => self.import_legacy(),
        };
        if let Err(err) = &res {
            self.push_errors(vec![err.to_string()]);
        }
        res
    }

    fn generate(&mut self, game: GameType) -> Result<()> {
        let numbers = sampler::sample_game(&mut self.rng, game)?;
        let id = self.store.next_id();
        let created_at = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        let bet = Bet::new(id, game, numbers, created_at);
        self.latest = Some(id);
        self.status = format!("Generated {game} bet #{id}");
        info!(id, game = game.tag(), "generated bet");
        // A failed write leaves the bet in memory for this session.
        self.store.append(bet)
    }

    fn toggle_hit(&mut self, id: BetId, number: u8) -> Result<()> {
        let bet = self.store.get(id).ok_or(LotteryError::UnknownBet(id))?;
        let mark = self.hits.toggle(bet, number)?;
        let verb = match mark {
            HitMark::Marked => "Marked",
            HitMark::Unmarked => "Unmarked",
        };
        self.status = format!(
            "{verb} {number:02} on bet #{id} ({} hits)",
            self.hits.count(id)
        );
        Ok(())
    }

    fn import_legacy(&mut self) -> Result<()> {
        let legacy = valid_legacy_bets(self.store.load_legacy()?);
        let mut imported = 0usize;
        let mut write_err = None;
        for numbers in legacy {
            let id = self.store.next_id();
            let bet = Bet::new(id, GameType::Lotomania, numbers, LEGACY_TIMESTAMP);
            if let Err(err) = self.store.append(bet) {
                write_err = Some(err);
            }
            imported += 1;
        }
        info!(imported, "imported legacy history");
        self.status = format!("Imported {imported} legacy Lotomania bets");
        match write_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let history = self.store.history();
        let rows = filter(history, self.filter)
            .into_iter()
            .map(|bet| BetRow {
                bet: bet.clone(),
                hits: self.hits.count(bet.id()),
                marked: self.hits.marked(bet.id()),
            })
            .collect();
        let count_of =
            |game: GameType| history.iter().filter(|b| b.game() == game).count();
        AppSnapshot {
            filter: self.filter,
            latest: self.latest().cloned(),
            rows,
            total_bets: history.len(),
            lotomania_bets: count_of(GameType::Lotomania),
            lotofacil_bets: count_of(GameType::Lotofacil),
            status: self.status.clone(),
            errors: self.errors.clone(),
        }
    }

    pub fn push_errors(&mut self, mut items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        for item in &items {
            error!("{}", item);
        }
        self.errors.append(&mut items);
        if self.errors.len() > MAX_ERRORS {
            let drain = self.errors.len() - MAX_ERRORS;
            self.errors.drain(0..drain);
        }
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use rand::{SeedableRng, rngs::StdRng};

    fn state() -> AppState<InMemoryStore, StdRng> {
        AppState::with_rng(InMemoryStore::new(), StdRng::seed_from_u64(42))
    }

    #[test]
    fn generate_assigns_increasing_ids_and_sets_latest() {
        let mut app = state();
        app.apply(Action::GenerateBet(GameType::Lotomania)).unwrap();
        app.apply(Action::GenerateBet(GameType::Lotofacil)).unwrap();
        let ids: Vec<BetId> = app.history().iter().map(Bet::id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(app.latest().map(Bet::game), Some(GameType::Lotofacil));
        assert!(app.history().iter().all(Bet::is_valid));
    }

    #[test]
    fn toggle_on_unknown_bet_is_logged() {
        let mut app = state();
        let err = app
            .apply(Action::ToggleHit { bet: 9, number: 1 })
            .unwrap_err();
        assert!(matches!(err, LotteryError::UnknownBet(9)));
        assert_eq!(app.errors().len(), 1);
    }

    #[test]
    fn set_filter_does_not_touch_history() {
        let mut app = state();
        app.apply(Action::GenerateBet(GameType::Lotomania)).unwrap();
        app.apply(Action::GenerateBet(GameType::Lotofacil)).unwrap();
        app.apply(Action::SetFilter(GameFilter::Only(GameType::Lotofacil)))
            .unwrap();
        let snap = app.snapshot();
        assert_eq!(snap.rows.len(), 1);
        assert_eq!(snap.total_bets, 2);
        assert_eq!(app.history().len(), 2);
    }

    #[test]
    fn error_log_is_bounded() {
        let mut app = state();
        for i in 0..(MAX_ERRORS + 10) {
            app.push_errors(vec![format!("e{i}")]);
        }
        assert_eq!(app.errors().len(), MAX_ERRORS);
        assert_eq!(app.errors()[0], "e10");
    }
}
