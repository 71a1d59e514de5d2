use lottery_picker::{
    Action, AppState, Bet, BetId, GameFilter, GameType, LotteryError,
    storage::{FileStore, InMemoryStore},
    store::{HISTORY_KEY, LEGACY_HISTORY_KEY, load_all},
};
use rand::{SeedableRng, rngs::StdRng};
use tempdir::TempDir;

fn app(storage: InMemoryStore) -> AppState<InMemoryStore, StdRng> {
    AppState::with_rng(storage, StdRng::seed_from_u64(2024))
}

fn ids(app: &AppState<InMemoryStore, StdRng>) -> Vec<BetId> {
    app.history().iter().map(Bet::id).collect()
}

#[test]
fn toggling_hits_on_second_bet_counts_marks() {
    let mut app = app(InMemoryStore::new());
    for game in [GameType::Lotomania, GameType::Lotofacil, GameType::Lotomania] {
        app.apply(Action::GenerateBet(game)).unwrap();
    }
    let second = app.history()[1].clone();
    let picks: Vec<u8> = second.numbers()[..3].to_vec();
    for n in &picks {
        app.apply(Action::ToggleHit {
            bet: second.id(),
            number: *n,
        })
        .unwrap();
    }
    app.apply(Action::ToggleHit {
        bet: second.id(),
        number: picks[1],
    })
    .unwrap();

    assert_eq!(app.hits().count(second.id()), 2);
    assert_eq!(app.hits().count(app.history()[0].id()), 0);
    let row = app
        .snapshot()
        .rows
        .into_iter()
        .find(|r| r.bet.id() == second.id())
        .unwrap();
    assert_eq!(row.hits, 2);
    assert_eq!(row.marked, vec![picks[0], picks[2]]);
}

#[test]
fn foreign_number_toggle_changes_nothing() {
    let mut app = app(InMemoryStore::new());
    app.apply(Action::GenerateBet(GameType::Lotofacil)).unwrap();
    let bet = app.history()[0].clone();
    let foreign = (1..=25u8).find(|n| !bet.contains(*n)).unwrap();

    let err = app
        .apply(Action::ToggleHit {
            bet: bet.id(),
            number: foreign,
        })
        .unwrap_err();
    assert!(matches!(err, LotteryError::ForeignNumber { .. }));
    assert_eq!(app.hits().count(bet.id()), 0);
    assert_eq!(app.errors().len(), 1);
}

#[test]
fn history_survives_restart_in_order() {
    let storage = InMemoryStore::new();
    let mut first = app(storage.clone());
    first.apply(Action::GenerateBet(GameType::Lotofacil)).unwrap();
    first.apply(Action::GenerateBet(GameType::Lotomania)).unwrap();
    let before = first.history().to_vec();

    assert_eq!(load_all(&storage), before);

    let second = app(storage);
    assert_eq!(second.history(), before.as_slice());
    assert!(second.latest().is_none());
    assert_eq!(second.hits().count(before[0].id()), 0);
}

#[test]
fn filter_view_keeps_relative_order() {
    let mut app = app(InMemoryStore::new());
    for game in [
        GameType::Lotofacil,
        GameType::Lotomania,
        GameType::Lotofacil,
        GameType::Lotomania,
    ] {
        app.apply(Action::GenerateBet(game)).unwrap();
    }

    app.apply(Action::SetFilter(GameFilter::Only(GameType::Lotomania)))
        .unwrap();
    let mania: Vec<BetId> = app.snapshot().rows.iter().map(|r| r.bet.id()).collect();
    assert_eq!(mania, vec![2, 4]);

    app.apply(Action::SetFilter(GameFilter::All)).unwrap();
    let all: Vec<BetId> = app.snapshot().rows.iter().map(|r| r.bet.id()).collect();
    assert_eq!(all, ids(&app));
}

#[test]
fn corrupt_snapshot_starts_empty_and_is_replaced() {
    let storage = InMemoryStore::with_entry(HISTORY_KEY, "{ definitely not a history");
    let mut app = app(storage.clone());
    assert!(app.history().is_empty());

    app.apply(Action::GenerateBet(GameType::Lotomania)).unwrap();
    assert_eq!(load_all(&storage).len(), 1);
}

#[test]
fn legacy_import_is_explicit() {
    let valid: Vec<u8> = (0..100).step_by(2).collect();
    let invalid: Vec<u8> = (0..50).rev().collect();
    let raw = serde_json::to_string(&vec![valid.clone(), invalid]).unwrap();
    let storage = InMemoryStore::with_entry(LEGACY_HISTORY_KEY, &raw);

    let mut app = app(storage.clone());
    assert!(app.history().is_empty());
    app.apply(Action::GenerateBet(GameType::Lotofacil)).unwrap();

    app.apply(Action::ImportLegacy).unwrap();
    assert_eq!(ids(&app), vec![1, 2]);
    let imported = &app.history()[1];
    assert_eq!(imported.game(), GameType::Lotomania);
    assert_eq!(imported.numbers(), valid.as_slice());
    assert_eq!(load_all(&storage).len(), 2);
}

#[test]
fn file_store_keeps_browser_compatible_format() {
    let dir = TempDir::new("apostas").unwrap();
    let mut app = AppState::with_rng(
        FileStore::open(dir.path()).unwrap(),
        StdRng::seed_from_u64(5),
    );
    app.apply(Action::GenerateBet(GameType::Lotofacil)).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("apostas.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];
    assert_eq!(record["tipo"], "lotofacil");
    assert_eq!(record["numeros"].as_array().unwrap().len(), 15);
    assert!(record["data"].is_string());
    assert_eq!(record["id"], 1);

    let reopened = AppState::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.history(), app.history());
}
