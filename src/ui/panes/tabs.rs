//! Tab bar across the top of the screen

use crate::tabs::{Tab, TabId, TabStatus};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Marker shown after a tab's name for its compile status
fn status_marker(status: TabStatus) -> &'static str {
    match status {
        TabStatus::Idle => "",
        TabStatus::Compiling => " ⟳",
        TabStatus::Success => " ✓",
        TabStatus::Error => " ✗",
    }
}

pub fn render_tab_bar(frame: &mut Frame, area: Rect, tabs: &[Tab], active: TabId, theme: &Theme) {
    let sep_style = Style::default().bg(theme.current_line_bg).fg(theme.comment);
    let mut spans = Vec::with_capacity(tabs.len() * 2);

    for (index, tab) in tabs.iter().enumerate() {
        let label = format!(" {}:{}{} ", index + 1, tab.name(), status_marker(tab.status()));
        let style = if tab.id() == active {
            Style::default()
                .bg(theme.primary)
                .fg(theme.badge_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            let fg = match tab.status() {
                TabStatus::Error => theme.error,
                TabStatus::Success => theme.success,
                TabStatus::Compiling => theme.secondary,
                TabStatus::Idle => theme.fg,
            };
            Style::default().bg(theme.current_line_bg).fg(fg)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::styled("│", sep_style));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(theme.current_line_bg));
    frame.render_widget(paragraph, area);
}
