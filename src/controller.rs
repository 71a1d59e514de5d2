use crate::ui;
use color_eyre::eyre::{Result, WrapErr};
use lottery_picker::{
    Action, AppSnapshot, AppState, GameFilter, storage::FileStore,
};
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "~/.lottery-picker";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub filter: GameFilter,
    pub import_legacy: bool,
}

pub struct AppController {
    state: AppState<FileStore>,
}

impl AppController {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let storage = FileStore::open(&config.data_dir)?;
        tracing::info!(dir = %storage.root().display(), "opened bet storage");
        let mut state = AppState::new(storage);
        if config.filter != GameFilter::All {
            let _ = state.apply(Action::SetFilter(config.filter));
        }
        if config.import_legacy {
            let _ = state.apply(Action::ImportLegacy);
        }
        Ok(Self { state })
    }

    pub fn snapshot(&self) -> AppSnapshot {
        self.state.snapshot()
    }

    /// Applies the transition behind `ev`. Failures end up in the error panel.
    pub fn handle(&mut self, ev: ui::UserEvent) {
        if let ui::UserEvent::ClearErrors = ev {
            self.state.clear_errors();
            return;
        }
        if let Some(action) = action_for(ev, self.state.filter()) {
            let _ = self.state.apply(action);
        }
    }
}

pub fn action_for(ev: ui::UserEvent, current: GameFilter) -> Option<Action> {
    match ev {
        ui::UserEvent::Generate(game) => Some(Action::GenerateBet(game)),
        ui::UserEvent::CycleFilter => Some(Action::SetFilter(current.next())),
        ui::UserEvent::ToggleHit { bet, number } => Some(Action::ToggleHit { bet, number }),
        ui::UserEvent::Quit | ui::UserEvent::ClearErrors | ui::UserEvent::Redraw => None,
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut controller = AppController::new(&config)?;
    let mut ui_state = ui::UiState::default();

    tracing::info!("Starting UI");
    ui::terminal_enter(&mut ui_state).wrap_err("failed to enter terminal UI")?;
    let res = run_loop(&mut controller, &mut ui_state).await;
    ui::terminal_exit()?;
    tracing::info!("UI closed");
    res
}

async fn run_loop(controller: &mut AppController, ui_state: &mut ui::UiState) -> Result<()> {
    let mut snapshot = controller.snapshot();
    ui::draw(ui_state, &snapshot)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            ev = ui::next_event(ui_state) => {
                match ev? {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {
                        // UI-only update; state is unchanged
                        ui::draw(ui_state, &snapshot)?;
                        continue;
                    }
                    ev => controller.handle(ev),
                }
                snapshot = controller.snapshot();
                ui::draw(ui_state, &snapshot)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_picker::GameType;

    #[test]
    fn cycle_filter_moves_to_next_filter() {
        assert_eq!(
            action_for(ui::UserEvent::CycleFilter, GameFilter::All),
            Some(Action::SetFilter(GameFilter::Only(GameType::Lotomania)))
        );
    }

    #[test]
    fn ui_only_events_have_no_action() {
        assert_eq!(action_for(ui::UserEvent::Redraw, GameFilter::All), None);
        assert_eq!(action_for(ui::UserEvent::Quit, GameFilter::All), None);
    }

    #[test]
    fn controller_persists_into_data_dir() {
        let dir = tempdir::TempDir::new("controller").unwrap();
        let config = AppConfig {
            data_dir: dir.path().join("data"),
            log_dir: dir.path().join("logs"),
            filter: GameFilter::Only(GameType::Lotofacil),
            import_legacy: false,
        };
        let mut controller = AppController::new(&config).unwrap();
        controller.handle(ui::UserEvent::Generate(GameType::Lotofacil));
        controller.handle(ui::UserEvent::Generate(GameType::Lotomania));
        let snap = controller.snapshot();
        assert_eq!(snap.total_bets, 2);
        assert_eq!(snap.rows.len(), 1);
        assert!(dir.path().join("data").join("apostas.json").exists());

        let reopened = AppController::new(&config).unwrap();
        assert_eq!(reopened.snapshot().total_bets, 2);
    }
}
