pub mod input;
pub mod render;
pub mod state;

use crate::engine::posts::PostView;
use crate::model::{Keyword, ScrapeDuration};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use input::{KeyAction, UiState};
use ratatui::prelude::*;
use state::AppState;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Commands the TUI sends to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TuiCommand {
    Quit,
    Start,
    Stop,
    SetDuration(ScrapeDuration),
    ToggleInstaExplore,
    ToggleTwitterHome,
    AddKeyword(Keyword),
    RemoveKeyword(Keyword),
    CyclePlatformFilter,
    RefreshDashboard,
    SetPostView(PostView),
    SetSearch(String),
    SetMinLikes(Option<u64>),
    NextPage,
    PrevPage,
    RefreshPosts,
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    let mut ui = UiState::default();
    let mut events = EventStream::new();
    // Redraw at least this often so the uptime clock moves.
    let mut redraw = tokio::time::interval(Duration::from_millis(250));

    loop {
        {
            let state = state_rx.borrow_and_update().clone();
            ui.clamp_selection(state.keywords.len());
            terminal.draw(|f| render::draw(f, &state, &ui))?;
        }

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else { return Ok(()) };
                if let Event::Key(key) = event? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let action = {
                        let state = state_rx.borrow();
                        input::handle_key(&mut ui, &state, key)
                    };
                    if let KeyAction::Command(cmd) = action {
                        let quit = cmd == TuiCommand::Quit;
                        if cmd_tx.send(cmd).await.is_err() || quit {
                            return Ok(());
                        }
                    }
                }
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = redraw.tick() => {}
        }
    }
}
