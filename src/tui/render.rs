use std::borrow::Cow;

use super::input::{Page, UiState};
use super::state::AppState;
use crate::engine::posts::{cell_value, format_count, ColumnKey};
use crate::engine::session::format_elapsed;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Gauge, Paragraph, Row, Sparkline, Table, Tabs},
    Frame,
};

const CHART_COLORS: [Color; 5] = [Color::Blue, Color::Green, Color::Yellow, Color::Magenta, Color::Red];

pub fn draw(f: &mut Frame, state: &AppState, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, chunks[0]);
    draw_tabs(f, ui, chunks[1]);
    match ui.page {
        Page::Dashboard => draw_dashboard(f, state, chunks[2]),
        Page::Control => draw_control(f, state, ui, chunks[2]),
        Page::Posts => draw_posts(f, state, chunks[2]),
    }
    draw_logs(f, state, chunks[3]);
    draw_footer(f, ui, chunks[4]);
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect) {
    let status = if state.control_busy {
        Span::styled("\u{25cc} Working", Style::default().fg(Color::Yellow))
    } else if state.is_running {
        Span::styled(
            "\u{25cf} Running",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("\u{25cb} Idle", Style::default().fg(Color::DarkGray))
    };

    let line = Line::from(vec![
        Span::raw(" "),
        status,
        Span::raw(format!(
            " | Scraped: {} | Elapsed: {} | Up: {}",
            format_count(state.session.posts_scraped),
            format_elapsed(state.session.elapsed_secs),
            state.uptime()
        )),
    ]);

    let title = format!(" Social Media Scraper [{}] ", state.backend);
    let block = Block::default().title(title).borders(Borders::ALL);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_tabs(f: &mut Frame, ui: &UiState, area: Rect) {
    let titles: Vec<String> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", i + 1, p.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(ui.page.index())
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

// ── Dashboard ─────────────────────────────────────────────────────────

fn draw_dashboard(f: &mut Frame, state: &AppState, area: Rect) {
    let title = format!(" Dashboard [{}] ", state.dashboard_filter.label());

    let Some(stats) = &state.dashboard else {
        let (text, color) = match &state.dashboard_error {
            Some(err) => (err.as_str(), Color::Red),
            None => ("Loading dashboard...", Color::DarkGray),
        };
        let para = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, Style::default().fg(color)))])
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(para, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);
    let card_values = [
        ("Total Posts", stats.total_posts),
        ("Unique Users", stats.unique_users),
        ("Total Links", stats.total_links),
        ("Average Likes", stats.average_likes),
    ];
    for ((label, value), rect) in card_values.iter().zip(cards.iter()) {
        draw_stat_card(f, label, &format_count(*value), *rect);
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let series: Vec<u64> = stats.posts_over_time.iter().map(|p| p.posts).collect();
    let days: Vec<&str> = stats.posts_over_time.iter().map(|p| p.date.as_str()).collect();
    f.render_widget(
        Sparkline::default()
            .block(
                Block::default()
                    .title(format!(" Posts Over Time ({}) ", days.join(" ")))
                    .borders(Borders::ALL),
            )
            .data(&series)
            .style(Style::default().fg(CHART_COLORS[0])),
        charts[0],
    );

    let bars: Vec<Bar> = stats
        .likes_distribution
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.count)
                .label(Line::from(b.range.clone()))
                .style(Style::default().fg(CHART_COLORS[0]))
        })
        .collect();
    f.render_widget(
        BarChart::default()
            .block(Block::default().title(" Likes Distribution ").borders(Borders::ALL))
            .data(BarGroup::default().bars(&bars))
            .bar_width(6)
            .bar_gap(1),
        charts[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(rows[2]);
    draw_top_users(f, state, bottom[0]);
    draw_recent_posts(f, state, bottom[1]);
}

fn draw_stat_card(f: &mut Frame, label: &str, value: &str, area: Rect) {
    let para = Paragraph::new(Line::from(Span::styled(
        value.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().title(format!(" {} ", label)).borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_top_users(f: &mut Frame, state: &AppState, area: Rect) {
    let Some(stats) = &state.dashboard else { return };
    let rows: Vec<Row> = stats
        .top_users
        .iter()
        .enumerate()
        .map(|(i, u)| {
            Row::new(vec![
                Cell::from("\u{25a0}").style(Style::default().fg(CHART_COLORS[i % CHART_COLORS.len()])),
                Cell::from(u.name.clone()),
                Cell::from(format!("{} posts", u.posts)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Length(2), Constraint::Min(10), Constraint::Length(10)],
    )
    .block(Block::default().title(" Top Users ").borders(Borders::ALL));
    f.render_widget(table, area);
}

fn draw_recent_posts(f: &mut Frame, state: &AppState, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    // Platform=10 Username=15 Likes=8 Comments=9 Date=11
    let fixed = 10 + 15 + 8 + 9 + 11;
    let caption_w = inner_width.saturating_sub(fixed).max(8);

    let header = Row::new(vec!["Platform", "Username", "Caption", "Likes", "Comments", "Date"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = state
        .recent_posts
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.platform.label()).style(platform_style(p.platform)),
                Cell::from(p.username.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(truncate_with_ellipsis(&p.text, caption_w).into_owned()),
                Cell::from(format_count(p.likes)),
                Cell::from(p.comments.to_string()),
                Cell::from(p.scraped_at.format("%Y-%m-%d").to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(15),
            Constraint::Length(caption_w as u16),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .block(Block::default().title(" Recent Posts ").borders(Borders::ALL));
    f.render_widget(table, area);
}

fn platform_style(platform: crate::model::Platform) -> Style {
    match platform {
        crate::model::Platform::Twitter => Style::default().fg(Color::Blue),
        crate::model::Platform::Instagram => Style::default().fg(Color::Magenta),
    }
}

// ── Scraper control ───────────────────────────────────────────────────

fn draw_control(f: &mut Frame, state: &AppState, ui: &UiState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(7)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(rows[0]);

    draw_status_card(f, state, top[0]);
    draw_controls(f, state, ui, top[1]);
    draw_session_stats(f, state, rows[1]);
}

fn draw_status_card(f: &mut Frame, state: &AppState, area: Rect) {
    let (label, color) = if state.is_running {
        ("Running", Color::Green)
    } else {
        ("Stopped", Color::Red)
    };
    let started = state
        .session
        .started_at
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "\u{2014}".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            format!("\u{25cf} {}", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(" Started at     {}", started)),
        Line::from(format!(" Duration       {}", state.duration)),
        Line::from(format!(" Posts scraped  {}", format_count(state.session.posts_scraped))),
        Line::from(format!(" Active tasks   {}", state.session.active_tasks)),
    ];
    lines.push(match &state.backend_status {
        Some(status) if status.is_running => Line::from(vec![
            Span::raw(" Backend        "),
            Span::styled(
                format!("running ({} posts)", format_count(status.posts_scraped)),
                Style::default().fg(Color::Green),
            ),
        ]),
        Some(_) => Line::from(" Backend        idle"),
        None => Line::from(Span::styled(" Backend        unknown", Style::default().fg(Color::DarkGray))),
    });
    let para = Paragraph::new(lines).block(Block::default().title(" Scraper Status ").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn toggle_span(enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled("[x]", Style::default().fg(Color::Green))
    } else {
        Span::styled("[ ]", Style::default().fg(Color::DarkGray))
    }
}

fn draw_controls(f: &mut Frame, state: &AppState, ui: &UiState, area: Rect) {
    let locked = state.is_running;
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(format!(" Duration: {}", state.duration)),
        Line::from(vec![
            Span::raw(" "),
            toggle_span(state.run_insta_explore),
            Span::raw(" Instagram Explore   "),
            toggle_span(state.run_twitter_home),
            Span::raw(" Twitter Home"),
        ]),
        Line::from(" Keywords:"),
    ];

    if state.keywords.is_empty() {
        lines.push(Line::from(Span::styled("   No keywords added", dim)));
    } else {
        for (i, k) in state.keywords.iter().enumerate() {
            let selected = !locked && i == ui.selected_keyword;
            let marker = if selected { " > " } else { "   " };
            let style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{} ", k.value), style),
                Span::styled(format!("[{}]", k.platform.label()), platform_style(k.platform)),
            ]));
        }
    }

    if let Some(err) = &state.control_error {
        lines.push(Line::from(Span::styled(format!(" {}", err), Style::default().fg(Color::Red))));
    }

    let title = if locked {
        " Controls [locked while running] "
    } else {
        " Controls "
    };
    let para = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_session_stats(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().title(" Session Stats ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let line = Line::from(vec![
        Span::styled(" Posts/min ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{:<8}", state.session.posts_per_minute)),
        Span::styled(" Time Elapsed ", Style::default().fg(Color::Cyan)),
        Span::raw(format!("{:<10}", format_elapsed(state.session.elapsed_secs))),
        Span::styled(" Total Scraped ", Style::default().fg(Color::Green)),
        Span::raw(format_count(state.session.posts_scraped)),
    ]);
    f.render_widget(Paragraph::new(line), parts[0]);

    let ratio = (state.progress_percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("Progress {}%", state.progress_percent.round() as u64));
    f.render_widget(gauge, parts[1]);
}

// ── Posts viewer ──────────────────────────────────────────────────────

fn draw_posts(f: &mut Frame, state: &AppState, area: Rect) {
    let has_error = state.posts_error.is_some();
    let mut constraints = vec![Constraint::Length(3)];
    if has_error {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(4));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let query = &state.posts_query;
    let filters = Line::from(vec![
        Span::styled(" View: ", Style::default().fg(Color::DarkGray)),
        Span::raw(query.view.label()),
        Span::styled("  Search: ", Style::default().fg(Color::DarkGray)),
        Span::raw(if query.search.is_empty() { "\u{2014}".to_string() } else { query.search.clone() }),
        Span::styled("  Min. Likes: ", Style::default().fg(Color::DarkGray)),
        Span::raw(query.min_likes.map(format_count).unwrap_or_else(|| "0".to_string())),
    ]);
    let title = format!(" Posts Viewer ({} results) ", state.posts.len());
    f.render_widget(
        Paragraph::new(filters).block(Block::default().title(title).borders(Borders::ALL)),
        chunks[0],
    );

    let mut idx = 1;
    if let Some(err) = &state.posts_error {
        f.render_widget(
            Paragraph::new(Span::styled(err.as_str(), Style::default().fg(Color::Red)))
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red))),
            chunks[idx],
        );
        idx += 1;
    }

    draw_posts_table(f, state, chunks[idx]);

    let total_pages = state.total_pages();
    if total_pages > 1 {
        let line = Line::from(Span::styled(
            format!("  Page {} of {}", state.paginator.page(), total_pages),
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(Paragraph::new(line), chunks[idx + 1]);
    }
}

fn column_width(key: ColumnKey) -> Option<u16> {
    match key {
        ColumnKey::Platform => Some(10),
        ColumnKey::Source => Some(8),
        ColumnKey::Keyword => Some(10),
        ColumnKey::User | ColumnKey::Username | ColumnKey::Handle => Some(15),
        ColumnKey::Name => Some(18),
        ColumnKey::Likes | ColumnKey::Reposts | ColumnKey::Replies => Some(8),
        ColumnKey::Views => Some(9),
        ColumnKey::Date => Some(11),
        ColumnKey::Time => Some(6),
        // text columns take the remaining width
        ColumnKey::Content | ColumnKey::Caption | ColumnKey::Tweet => None,
    }
}

fn draw_posts_table(f: &mut Frame, state: &AppState, area: Rect) {
    let columns = state.posts_query.view.columns();
    let inner_width = area.width.saturating_sub(2) as usize;
    let fixed: usize = columns
        .iter()
        .filter_map(|c| column_width(c.key))
        .map(|w| w as usize + 1)
        .sum();
    let text_w = inner_width.saturating_sub(fixed).max(8);

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|c| Constraint::Length(column_width(c.key).unwrap_or(text_w as u16)))
        .collect();

    let header = Row::new(columns.iter().map(|c| {
        if c.align_right {
            Cell::from(Line::from(c.label).alignment(Alignment::Right))
        } else {
            Cell::from(c.label)
        }
    }))
    .style(Style::default().add_modifier(Modifier::BOLD));

    let placeholder = if state.posts_loading {
        Some("Loading...")
    } else if state.posts.is_empty() {
        Some(if state.posts_error.is_some() { "No data available." } else { "No posts found." })
    } else {
        None
    };

    let block = Block::default().borders(Borders::ALL);
    if let Some(text) = placeholder {
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let rows: Vec<Row> = state
        .page_posts()
        .iter()
        .map(|post| {
            Row::new(columns.iter().map(|c| {
                let value = cell_value(post, c.key);
                match c.key {
                    ColumnKey::Platform => Cell::from(value).style(platform_style(post.platform)),
                    ColumnKey::Content | ColumnKey::Caption | ColumnKey::Tweet => {
                        Cell::from(truncate_with_ellipsis(&value, text_w).into_owned())
                    }
                    ColumnKey::User | ColumnKey::Username | ColumnKey::Handle => {
                        Cell::from(value).style(Style::default().fg(Color::Cyan))
                    }
                    _ if c.align_right => Cell::from(Line::from(value).alignment(Alignment::Right)),
                    _ => Cell::from(value),
                }
            }))
        })
        .collect();

    let table = Table::new(rows, constraints).header(header).block(block);
    f.render_widget(table, area);
}

// ── Log + footer ──────────────────────────────────────────────────────

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize;
    let visible_lines = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.len());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let block = Block::default().title(" Event Log ").borders(Borders::ALL);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn footer_hints(page: Page) -> &'static [(&'static str, &'static str)] {
    match page {
        Page::Dashboard => &[("[1-3]", " pages  "), ("[p]", " platform  "), ("[r]", " refresh  "), ("[s/x]", " start/stop  "), ("[q]", " quit")],
        Page::Control => &[
            ("[s]", " start  "),
            ("[x]", " stop  "),
            ("[d]", " duration  "),
            ("[i/w]", " feeds  "),
            ("[a]", " add kw  "),
            ("[j/k]", " select  "),
            ("[Del]", " remove  "),
            ("[q]", " quit"),
        ],
        Page::Posts => &[
            ("[v]", " view  "),
            ("[/]", " search  "),
            ("[m]", " min likes  "),
            ("[\u{2190}/\u{2192}]", " page  "),
            ("[r]", " refresh  "),
            ("[q]", " quit"),
        ],
    }
}

fn draw_footer(f: &mut Frame, ui: &UiState, area: Rect) {
    let line = if let Some(mode) = ui.input {
        Line::from(vec![
            Span::styled(format!("  {}: ", mode.prompt()), Style::default().fg(Color::Yellow)),
            Span::raw(ui.buffer.clone()),
            Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
            Span::styled("  [Enter] ok  [Esc] cancel", Style::default().fg(Color::DarkGray)),
        ])
    } else if let Some(status) = &ui.status {
        Line::from(Span::styled(format!("  {}", status), Style::default().fg(Color::Red)))
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in footer_hints(ui.page) {
            spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::MockBackend;
    use crate::backend::ScraperBackend;
    use crate::engine::posts::PostView;
    use crate::engine::stats::DashboardStats;
    use crate::model::PlatformFilter;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_tiny_widths() {
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
        assert_eq!(truncate_with_ellipsis("hello", 2), "..");
        assert_eq!(truncate_with_ellipsis("hello", 3), "...");
        assert_eq!(truncate_with_ellipsis("hello", 4), "h...");
    }

    #[test]
    fn test_truncate_multibyte_chars() {
        // the rocket is 4 bytes; truncation must land on a char boundary
        let caption = "Exploring new frameworks for 2025 \u{1f680} and more";
        let result = truncate_with_ellipsis(caption, 37);
        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), 37);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn render(state: &AppState, ui: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| draw(f, state, ui)).unwrap();
        buffer_text(&terminal)
    }

    #[tokio::test]
    async fn test_every_page_renders() {
        let backend = MockBackend::seeded(5, std::time::Duration::ZERO);
        let mut state = AppState::new("mock", 10);
        state.dashboard = Some(DashboardStats::from_posts(backend.all_posts(), PlatformFilter::All));
        state.recent_posts = backend.all_posts()[..8].to_vec();
        state.posts = backend
            .posts(&crate::engine::posts::PostQuery { view: PostView::TwitterHome, ..Default::default() })
            .await
            .unwrap();
        state.posts_query.view = PostView::TwitterHome;

        let mut ui = UiState::default();
        let text = render(&state, &ui);
        assert!(text.contains("Total Posts"));
        assert!(text.contains("Likes Distribution"));

        ui.page = Page::Control;
        let text = render(&state, &ui);
        assert!(text.contains("Stopped"));
        assert!(text.contains("No keywords added"));

        ui.page = Page::Posts;
        let text = render(&state, &ui);
        assert!(text.contains("Twitter Home"));
        assert!(text.contains("Reposts"));
        assert!(text.contains("Page 1 of 2"));
    }

    #[test]
    fn test_posts_error_banner() {
        let mut state = AppState::new("rest", 10);
        state.posts_error = Some(crate::backend::POSTS_UNAVAILABLE.to_string());
        let ui = UiState { page: Page::Posts, ..Default::default() };
        let text = render(&state, &ui);
        assert!(text.contains("Failed to load posts"));
        assert!(text.contains("No data available."));
    }

    #[test]
    fn test_control_page_shows_backend_status() {
        let mut state = AppState::new("rest", 10);
        let ui = UiState { page: Page::Control, ..Default::default() };
        assert!(render(&state, &ui).contains("Backend        unknown"));

        state.backend_status = Some(crate::model::ScraperStatus {
            is_running: true,
            posts_scraped: 1_250,
            ..Default::default()
        });
        assert!(render(&state, &ui).contains("running (1,250 posts)"));
    }

    #[test]
    fn test_dashboard_loading_placeholder() {
        let state = AppState::new("mock", 10);
        let text = render(&state, &UiState::default());
        assert!(text.contains("Loading dashboard..."));
    }
}
