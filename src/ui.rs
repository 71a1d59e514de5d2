use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use itertools::Itertools;
use lottery_picker::{AppSnapshot, Bet, BetId, BetRow, GameType};
use ratatui::{prelude::*, widgets::*};
use std::io::stdout;

const NUMBERS_PER_LINE: usize = 10;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UserEvent {
    Quit,
    Generate(GameType),
    CycleFilter,
    ToggleHit { bet: BetId, number: u8 },
    ClearErrors,
    Redraw,
}

#[derive(Debug, Default)]
pub struct UiState {
    mode: Mode,
    rows: Vec<BetRow>,
    known_total: usize,
    selected: usize,
    cursor: usize,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

impl UiState {
    /// Replaces the cached rows and keeps selection and cursor in bounds.
    fn sync_rows(&mut self, rows: &[BetRow], total_bets: usize) {
        if total_bets > self.known_total {
            // follow the newest bet
            self.selected = rows.len().saturating_sub(1);
            self.cursor = 0;
        }
        self.known_total = total_bets;
        self.rows = rows.to_vec();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        let len = self.selected_bet().map_or(0, |b| b.numbers().len());
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    fn selected_bet(&self) -> Option<&Bet> {
        self.rows.get(self.selected).map(|r| &r.bet)
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.cursor = 0;
    }

    /// Maps one key press to an event, updating selection state on the way.
    fn handle_key(&mut self, k: KeyEvent) -> Option<UserEvent> {
        if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(UserEvent::Quit);
        }
        if self.mode == Mode::QuitModal {
            return match k.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    Some(UserEvent::Redraw)
                }
                _ => None,
            };
        }
        match k.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.mode = Mode::QuitModal;
                Some(UserEvent::Redraw)
            }
            KeyCode::Char('m') => Some(UserEvent::Generate(GameType::Lotomania)),
            KeyCode::Char('f') => Some(UserEvent::Generate(GameType::Lotofacil)),
            KeyCode::Tab => {
                self.reset_selection();
                Some(UserEvent::CycleFilter)
            }
            KeyCode::Char('x') => Some(UserEvent::ClearErrors),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.cursor = 0;
                }
                Some(UserEvent::Redraw)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                    self.cursor = 0;
                }
                Some(UserEvent::Redraw)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor = self.cursor.saturating_sub(1);
                Some(UserEvent::Redraw)
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let len = self.selected_bet().map_or(0, |b| b.numbers().len());
                self.cursor = (self.cursor + 1).min(len.saturating_sub(1));
                Some(UserEvent::Redraw)
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let bet = self.selected_bet()?;
                let number = *bet.numbers().get(self.cursor)?;
                Some(UserEvent::ToggleHit {
                    bet: bet.id(),
                    number,
                })
            }
            _ => None,
        }
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    state.sync_rows(&snap.rows, snap.total_bets);
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

pub async fn next_event(state: &mut UiState) -> Result<UserEvent> {
    loop {
        let ev = tokio::task::spawn_blocking(event::read)
            .await
            .wrap_err("terminal input task failed")??;
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if let Some(user_event) = state.handle_key(k) {
                    return Ok(user_event);
                }
            }
            Event::Resize(..) => return Ok(UserEvent::Redraw),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    f.render_widget(Clear, f.area());
    let latest_height = snap
        .latest
        .as_ref()
        .map_or(3, |b| grid_height(b.numbers().len()) + 2);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // overview
            Constraint::Length(latest_height), // latest bet
            Constraint::Min(6),                // history
            Constraint::Length(4),             // status/errors
            Constraint::Length(3),             // help
        ])
        .split(f.area());

    draw_overview(f, chunks[0], snap);
    draw_latest(f, chunks[1], snap);
    draw_history(f, state, chunks[2], snap);
    draw_status(f, chunks[3], snap);
    draw_help(f, chunks[4]);
    if state.mode == Mode::QuitModal {
        draw_quit_modal(f);
    }
}

fn draw_overview(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let text = format!(
        "Apostas: {} | Lotomania: {} | Lotofácil: {} | Filtro: {}",
        snap.total_bets, snap.lotomania_bets, snap.lotofacil_bets, snap.filter
    );
    let widget = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Gerador de Números"),
    );
    f.render_widget(widget, area);
}

fn draw_latest(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let (title, lines) = match &snap.latest {
        Some(bet) => (
            format!("Última aposta: {} #{}", bet.game(), bet.id()),
            number_lines(bet, &[], None),
        ),
        None => (
            String::from("Última aposta"),
            vec![Line::styled(
                "Press m (Lotomania) or f (Lotofácil) to generate",
                Style::default().fg(Color::DarkGray),
            )],
        ),
    };
    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

fn draw_history(f: &mut Frame, state: &UiState, area: Rect, snap: &AppSnapshot) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!("Histórico de Apostas ({})", snap.filter));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    if state.rows.is_empty() {
        let empty = Paragraph::new(Line::styled("None", Style::default().fg(Color::DarkGray)));
        f.render_widget(empty, inner);
        return;
    }

    let heights: Vec<u16> = state
        .rows
        .iter()
        .map(|r| grid_height(r.bet.numbers().len()) + 2)
        .collect();
    let start = first_visible(&heights, state.selected, inner.height);
    let mut y = inner.y;
    for (i, row) in state.rows.iter().enumerate().skip(start) {
        let h = heights[i];
        if y + h > inner.y + inner.height {
            break;
        }
        let rect = Rect::new(inner.x, y, inner.width, h);
        let selected = i == state.selected;
        let cursor = selected.then_some(state.cursor);
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let title = Line::from(vec![
            Span::raw(format!("Aposta {} - {} - ", row.bet.id(), row.bet.game())),
            Span::styled(
                format!("Acertos: {}", row.hits),
                Style::default().fg(Color::Green),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title)
            .title_bottom(Line::from(row.bet.created_at().to_string()).right_aligned());
        let body = Paragraph::new(number_lines(&row.bet, &row.marked, cursor)).block(block);
        f.render_widget(body, rect);
        y += h;
    }
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let widget = if snap.errors.is_empty() {
        let status = if snap.status.trim().is_empty() {
            "Ready"
        } else {
            snap.status.as_str()
        };
        Paragraph::new(status)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .style(Style::default().fg(Color::Green))
    } else {
        // newest errors first
        let lines: Vec<Line> = snap
            .errors
            .iter()
            .rev()
            .map(|e| Line::from(e.clone()))
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Errors"))
            .style(Style::default().fg(Color::Red))
    };
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "m Lotomania | f Lotofácil | Tab filter | ↑/↓ bet | ←/→ number | Space mark hit | x clear errors | q/Esc quit",
    )
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_quit_modal(f: &mut Frame) {
    let area = centered_rect(40, 20, f.area());
    f.render_widget(Clear, area);
    let widget = Paragraph::new("Quit? (y/n)")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    f.render_widget(widget, area);
}

fn number_lines(bet: &Bet, marked: &[u8], cursor: Option<usize>) -> Vec<Line<'static>> {
    bet.numbers()
        .chunks(NUMBERS_PER_LINE)
        .enumerate()
        .map(|(line, chunk)| {
            let spans = chunk.iter().enumerate().map(|(col, n)| {
                let mut style = Style::default();
                if marked.contains(n) {
                    style = style.bg(Color::Green).fg(Color::White);
                }
                if cursor == Some(line * NUMBERS_PER_LINE + col) {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                Span::styled(format!("{n:02}"), style)
            });
            Line::from(Itertools::intersperse(spans, Span::raw(" ")).collect::<Vec<_>>())
        })
        .collect()
}

fn grid_height(count: usize) -> u16 {
    count.div_ceil(NUMBERS_PER_LINE).max(1) as u16
}

/// Index of the first row to render so that `selected` fits in `avail` lines.
fn first_visible(heights: &[u16], selected: usize, avail: u16) -> usize {
    let mut start = selected.min(heights.len().saturating_sub(1));
    let mut used = heights.get(start).copied().unwrap_or(0);
    while start > 0 && used + heights[start - 1] <= avail {
        start -= 1;
        used += heights[start];
    }
    start
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1])[1]
}
