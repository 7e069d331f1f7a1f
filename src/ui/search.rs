// Search input box.
// Single-line editor with a block cursor while focused.

use ratatui::{prelude::*, widgets::*};

/// Draw the search input with its draft text or placeholder.
pub fn draw_search_input(frame: &mut Frame, draft: &str, focused: bool, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Search GitHub user ");

    let input = Paragraph::new(input_line(draft, focused)).block(block);
    frame.render_widget(input, area);
}

/// Content of the input line.
pub fn input_line(draft: &str, focused: bool) -> Line<'_> {
    let mut spans = vec![Span::styled("User: ", Style::default().fg(Color::DarkGray))];

    if draft.is_empty() && !focused {
        spans.push(Span::styled(
            "e.g. facebook",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        spans.push(Span::raw(draft));
    }

    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        if draft.is_empty() {
            spans.push(Span::styled(
                " e.g. facebook",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    Line::from(spans)
}
