// User list and repository panel rendering.
// Builds owned lines so widgets can borrow the selection and scroll state mutably.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::github::{Repository, User};
use crate::state::{LoadingState, RepoPager, SearchState};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the user list, one row per user.
pub fn render_users(frame: &mut Frame, search: &mut SearchState, area: Rect, focused: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Showing users ");

    match &search.users.data {
        LoadingState::Idle => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_empty(frame, inner, "Type a login fragment and press Enter");
        }
        LoadingState::Loading => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_loading(frame, inner, "Searching users");
        }
        // The alert line above shows the message.
        LoadingState::Error(_) => frame.render_widget(block, area),
        LoadingState::Loaded(users) if users.is_empty() => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_empty(frame, inner, "No users found.");
        }
        LoadingState::Loaded(users) => {
            let items: Vec<ListItem> = users
                .iter()
                .map(|user| user_item(user, search.pager(&user.login)))
                .collect();

            let list_widget = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                .highlight_symbol("> ");

            frame.render_stateful_widget(list_widget, area, &mut search.users.list_state);
        }
    }
}

pub fn user_item(user: &User, pager: Option<&RepoPager>) -> ListItem<'static> {
    ListItem::new(user_row_line(user, pager))
}

/// One user row with its expand marker.
pub fn user_row_line(user: &User, pager: Option<&RepoPager>) -> Line<'static> {
    let expanded = pager.filter(|p| p.is_expanded());
    let marker = if expanded.is_some() { "▾ " } else { "▸ " };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(Color::DarkGray)),
        Span::styled(user.login.clone(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  #{}", user.id),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(pager) = expanded.filter(|p| p.fetched_pages() > 0) {
        spans.push(Span::styled(
            format!("  {} repos shown", pager.visible_repos().len()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Render the selected user's repositories with the paging controls on the last row.
pub fn render_repos(frame: &mut Frame, search: &mut SearchState, area: Rect) {
    let Some(login) = search.users.selected_item().map(|u| u.login.clone()) else {
        return;
    };

    let Some(pager) = search.pager(&login).filter(|p| p.is_expanded()) else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Repositories ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "Press Enter to show this user's repositories");
        return;
    };

    let body = repo_body_lines(pager);
    let controls = repo_controls_line(pager);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Repositories for \"{}\" ", login));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let max_scroll = u16::try_from(body.len())
        .unwrap_or(u16::MAX)
        .saturating_sub(chunks[0].height);
    search.repo_scroll = search.repo_scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(body).scroll((search.repo_scroll, 0)),
        chunks[0],
    );
    frame.render_widget(Paragraph::new(controls), chunks[1]);
}

/// Scrollable content of an expanded user's repository panel.
pub fn repo_body_lines(pager: &RepoPager) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if pager.is_loading_first_page() {
        lines.push(Line::styled(
            "Loading repos...",
            Style::default().fg(Color::Yellow),
        ));
        return lines;
    }

    if let Some(error) = pager.error() {
        lines.push(Line::styled(
            format!("❌ {}", error),
            Style::default().fg(Color::Red),
        ));
        if pager.fetched_pages() == 0 {
            return lines;
        }
    }

    let repos = pager.visible_repos();
    if repos.is_empty() {
        lines.push(Line::styled(
            "No repositories available.",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        for repo in repos {
            lines.extend(repo_card_lines(repo));
        }
    }

    lines
}

/// Load More / Show Less controls, pinned under the repository cards.
pub fn repo_controls_line(pager: &RepoPager) -> Line<'static> {
    if pager.fetched_pages() == 0 {
        return Line::default();
    }

    let mut spans = Vec::new();
    if pager.has_more() {
        if pager.is_loading_more() {
            spans.push(Span::styled(
                "[ Loading... ]  ",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled("[ Load More ]", Style::default().fg(Color::Green)));
            spans.push(Span::styled(" m  ", Style::default().fg(Color::DarkGray)));
        }
    }
    if pager.revealed_pages() > 1 {
        spans.push(Span::styled("[ Show Less ]", Style::default().fg(Color::Magenta)));
        spans.push(Span::styled(" l  ", Style::default().fg(Color::DarkGray)));
    }
    spans.push(Span::styled(
        format!("{} shown", pager.visible_repos().len()),
        Style::default().fg(Color::DarkGray),
    ));

    Line::from(spans)
}

/// Card for one repository: name and stars, description, link.
pub fn repo_card_lines(repo: &Repository) -> Vec<Line<'static>> {
    let border = Style::default().fg(Color::DarkGray);
    let description = repo
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("No description");

    vec![
        Line::from(vec![
            Span::styled("┌ ", border),
            Span::styled(
                repo.name.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ★ {}", repo.stargazers_count),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(description.to_string(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(vec![
            Span::styled("└ ", border),
            Span::styled(
                repo.html_url.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ]
}
