//! Key handling. Pure: maps a key press plus the current UI/app state to an
//! optional engine command, mutating only TUI-local state.

use super::state::AppState;
use super::TuiCommand;
use crate::model::{Keyword, Platform, ScrapeDuration};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    Control,
    Posts,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::Control, Page::Posts];

    pub fn label(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Control => "Scraper Control",
            Page::Posts => "Posts Viewer",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Which field the edit buffer is feeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Duration,
    Keyword,
    Search,
    MinLikes,
}

impl InputMode {
    pub fn prompt(self) -> &'static str {
        match self {
            InputMode::Duration => "Duration (H:M:S or minutes)",
            InputMode::Keyword => "Keyword (tw:/ig: prefix, default Twitter)",
            InputMode::Search => "Search by username",
            InputMode::MinLikes => "Min. likes",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub page: Page,
    pub input: Option<InputMode>,
    pub buffer: String,
    pub selected_keyword: usize,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    None,
    Command(TuiCommand),
}

impl UiState {
    fn begin_input(&mut self, mode: InputMode, initial: String) {
        self.input = Some(mode);
        self.buffer = initial;
        self.status = None;
    }

    /// Keep the keyword cursor inside the list.
    pub fn clamp_selection(&mut self, keyword_count: usize) {
        if keyword_count == 0 {
            self.selected_keyword = 0;
        } else if self.selected_keyword >= keyword_count {
            self.selected_keyword = keyword_count - 1;
        }
    }
}

pub fn handle_key(ui: &mut UiState, app: &AppState, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Command(TuiCommand::Quit);
    }
    if let Some(mode) = ui.input {
        return handle_input_key(ui, mode, key);
    }

    match key.code {
        KeyCode::Char('q') => return KeyAction::Command(TuiCommand::Quit),
        KeyCode::Char('1') => ui.page = Page::Dashboard,
        KeyCode::Char('2') => ui.page = Page::Control,
        KeyCode::Char('3') => ui.page = Page::Posts,
        KeyCode::Tab => ui.page = ui.page.next(),
        KeyCode::Char('s') if !app.is_running && !app.control_busy => {
            return KeyAction::Command(TuiCommand::Start)
        }
        KeyCode::Char('x') if app.is_running && !app.control_busy => {
            return KeyAction::Command(TuiCommand::Stop)
        }
        _ => {
            return match ui.page {
                Page::Dashboard => dashboard_key(key),
                Page::Control => control_key(ui, app, key),
                Page::Posts => posts_key(ui, app, key),
            }
        }
    }
    KeyAction::None
}

fn dashboard_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('p') => KeyAction::Command(TuiCommand::CyclePlatformFilter),
        KeyCode::Char('r') => KeyAction::Command(TuiCommand::RefreshDashboard),
        _ => KeyAction::None,
    }
}

fn control_key(ui: &mut UiState, app: &AppState, key: KeyEvent) -> KeyAction {
    ui.clamp_selection(app.keywords.len());
    if app.is_running {
        // settings are read-only while running
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Char('d') => {
            ui.begin_input(InputMode::Duration, String::new());
            KeyAction::None
        }
        KeyCode::Char('a') | KeyCode::Char('+') => {
            ui.begin_input(InputMode::Keyword, String::new());
            KeyAction::None
        }
        KeyCode::Char('i') => KeyAction::Command(TuiCommand::ToggleInstaExplore),
        KeyCode::Char('w') => KeyAction::Command(TuiCommand::ToggleTwitterHome),
        KeyCode::Down | KeyCode::Char('j') => {
            if ui.selected_keyword + 1 < app.keywords.len() {
                ui.selected_keyword += 1;
            }
            KeyAction::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ui.selected_keyword = ui.selected_keyword.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Backspace | KeyCode::Delete => match app.keywords.get(ui.selected_keyword) {
            Some(k) => KeyAction::Command(TuiCommand::RemoveKeyword(k.clone())),
            None => KeyAction::None,
        },
        _ => KeyAction::None,
    }
}

fn posts_key(ui: &mut UiState, app: &AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('v') => {
            KeyAction::Command(TuiCommand::SetPostView(app.posts_query.view.next()))
        }
        KeyCode::Char('/') => {
            ui.begin_input(InputMode::Search, app.posts_query.search.clone());
            KeyAction::None
        }
        KeyCode::Char('m') => {
            let current = app
                .posts_query
                .min_likes
                .map(|m| m.to_string())
                .unwrap_or_default();
            ui.begin_input(InputMode::MinLikes, current);
            KeyAction::None
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
            KeyAction::Command(TuiCommand::NextPage)
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
            KeyAction::Command(TuiCommand::PrevPage)
        }
        KeyCode::Char('r') => KeyAction::Command(TuiCommand::RefreshPosts),
        _ => KeyAction::None,
    }
}

fn handle_input_key(ui: &mut UiState, mode: InputMode, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => {
            ui.input = None;
            ui.buffer.clear();
            KeyAction::None
        }
        KeyCode::Backspace => {
            ui.buffer.pop();
            KeyAction::None
        }
        KeyCode::Char(c) => {
            if mode != InputMode::MinLikes || c.is_ascii_digit() {
                ui.buffer.push(c);
            }
            KeyAction::None
        }
        KeyCode::Enter => {
            let text = std::mem::take(&mut ui.buffer);
            ui.input = None;
            submit(ui, mode, text.trim())
        }
        _ => KeyAction::None,
    }
}

fn submit(ui: &mut UiState, mode: InputMode, text: &str) -> KeyAction {
    match mode {
        InputMode::Duration => match ScrapeDuration::parse(text) {
            Some(d) if d.total_seconds() > 0 => KeyAction::Command(TuiCommand::SetDuration(d)),
            _ => {
                ui.status = Some(format!("invalid duration: {:?}", text));
                KeyAction::None
            }
        },
        InputMode::Keyword => {
            let keyword = Keyword::parse(text, Platform::Twitter);
            if keyword.value.is_empty() {
                KeyAction::None
            } else {
                KeyAction::Command(TuiCommand::AddKeyword(keyword))
            }
        }
        InputMode::Search => KeyAction::Command(TuiCommand::SetSearch(text.to_string())),
        InputMode::MinLikes if text.is_empty() => KeyAction::Command(TuiCommand::SetMinLikes(None)),
        InputMode::MinLikes => match text.parse::<u64>() {
            Ok(min) => KeyAction::Command(TuiCommand::SetMinLikes(Some(min))),
            Err(_) => {
                ui.status = Some(format!("invalid min. likes: {:?}", text));
                KeyAction::None
            }
        },
    }
}
