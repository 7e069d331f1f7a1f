// UI module for rendering the TUI.
// Contains the header, search input, user list, repository panel and help overlay.

mod list;
mod search;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Focus};
use crate::state::LoadingState;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search input
            Constraint::Length(1), // Alert line
            Constraint::Min(1),    // Users and repositories
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);
    search::draw_search_input(
        frame,
        &app.search.draft,
        app.focus == Focus::Input,
        chunks[1],
    );
    draw_alert(frame, app, chunks[2]);
    draw_content(frame, app, chunks[3]);
    draw_status_bar(frame, app, chunks[4]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// User list on top; the selected user's repositories below once there are users.
fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::List;
    let user_count = u16::try_from(app.search.users.items().len()).unwrap_or(u16::MAX);
    if user_count == 0 {
        list::render_users(frame, &mut app.search, area, focused);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(user_count.saturating_add(2).min(area.height / 2)),
            Constraint::Min(3),
        ])
        .split(area);

    list::render_users(frame, &mut app.search, chunks[0], focused);
    list::render_repos(frame, &mut app.search, chunks[1]);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("GitHub repositories explorer")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(title, area);
}

/// Search progress or failure, directly under the input.
fn draw_alert(frame: &mut Frame, app: &App, area: Rect) {
    let line = match (&app.search.users.data, &app.search.submitted) {
        (LoadingState::Loading, _) => Line::styled(
            " ⏳ Searching...",
            Style::default().fg(Color::Yellow),
        ),
        (LoadingState::Error(e), _) => {
            Line::styled(format!(" ❌ {}", e), Style::default().fg(Color::Red))
        }
        (LoadingState::Loaded(_), Some(query)) => Line::from(vec![
            Span::styled(" Showing users for ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("\"{}\"", query), Style::default().fg(Color::White)),
        ]),
        _ => Line::default(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the status bar: key hints on the left, fetch age and auth mode on the right.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Input => vec![
            Span::raw(" ↵ "),
            Span::styled("Search", Style::default().fg(Color::DarkGray)),
            Span::raw("  Esc "),
            Span::styled("Results", Style::default().fg(Color::DarkGray)),
            Span::raw("  Ctrl-C "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ],
        Focus::List => vec![
            Span::raw(" ↑↓ "),
            Span::styled("Move", Style::default().fg(Color::DarkGray)),
            Span::raw(" ↵ "),
            Span::styled("Expand", Style::default().fg(Color::DarkGray)),
            Span::raw(" m "),
            Span::styled("More", Style::default().fg(Color::DarkGray)),
            Span::raw(" l "),
            Span::styled("Less", Style::default().fg(Color::DarkGray)),
            Span::raw(" J/K "),
            Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
            Span::raw(" ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
        ],
    };

    let mut info = Vec::new();
    if let Some(fetched_at) = &app.search.fetched_at {
        info.push(Span::styled(
            format!("Fetched {} · ", list::format_relative_time(fetched_at)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let (auth_label, auth_color) = if app.authenticated {
        ("token ", Color::Green)
    } else {
        ("anonymous ", Color::Yellow)
    };
    info.push(Span::styled(auth_label, Style::default().fg(auth_color)));
    let info = Line::from(info);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(u16::try_from(info.width()).unwrap_or(u16::MAX)),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(hints)), chunks[0]);
    frame.render_widget(Paragraph::new(info).alignment(Alignment::Right), chunks[1]);
}

/// Draw the help overlay popup.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width);
    let popup_height = 19.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let key = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        key("  / or i        ", "Edit search"),
        key("  Enter         ", "Search (in input)"),
        key("  Esc           ", "Leave input"),
        key("  ↑/↓ or j/k    ", "Select user"),
        key("  Enter/Space   ", "Expand / collapse user"),
        key("  J/K, PgDn/PgUp", " Scroll repositories"),
        key("  m             ", "Load more repositories"),
        key("  l             ", "Show less"),
        key("  r             ", "Refresh stale repositories"),
        key("  ?             ", "Show/hide this help"),
        key("  q             ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
