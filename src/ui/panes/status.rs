//! Status bar rendering with keybindings and state indicators

use crate::tabs::TabStatus;
use crate::theme::ThemeMode;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar shows
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub status: TabStatus,
    /// Text being typed into the rename prompt, if it is open
    pub rename_buffer: Option<&'a str>,
    pub theme_mode: ThemeMode,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData, theme: &Theme) {
    // Split status bar into left and right
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let (badge, badge_bg) = match data.status {
        TabStatus::Idle => (" IDLE ", theme.primary),
        TabStatus::Compiling => (" RUNNING ", theme.secondary),
        TabStatus::Success => (" OK ", theme.success),
        TabStatus::Error => (" ERROR ", theme.error),
    };

    let message = match data.rename_buffer {
        Some(buffer) => format!(" Rename tab: {}▏ (↵ save, esc cancel) ", buffer),
        None => format!(" {} ", data.message),
    };

    let left_spans = vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_bg)
                .fg(theme.badge_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default().bg(theme.current_line_bg).fg(theme.comment),
        ),
        Span::styled(
            message,
            Style::default()
                .bg(theme.current_line_bg)
                .fg(if data.status == TabStatus::Error {
                    theme.error
                } else {
                    theme.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(theme.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(theme.comment).fg(theme.badge_fg);
    let desc_style = Style::default().bg(theme.current_line_bg).fg(theme.fg);
    let sep_style = Style::default().bg(theme.current_line_bg).fg(theme.comment);

    let bindings: [(&str, &str); 9] = [
        ("^R", "run"),
        ("^N", "new"),
        ("^W", "close"),
        ("F2", "rename"),
        ("F6", "stdin"),
        ("^E", "sample"),
        ("^S", "save"),
        ("^T", data.theme_mode.toggled().as_str()),
        ("^Q", "quit"),
    ];

    let mut right_spans = Vec::with_capacity(bindings.len() * 4);
    for (index, (key, desc)) in bindings.iter().enumerate() {
        if index > 0 {
            right_spans.push(Span::styled("│", sep_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(theme.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
