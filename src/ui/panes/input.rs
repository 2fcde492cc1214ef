//! Standard input pane: text sent to the program as stdin

use crate::ui::theme::Theme;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_input_pane(frame: &mut Frame, area: Rect, input: &str, is_focused: bool, theme: &Theme) {
    let border_style = if is_focused {
        Style::default()
            .fg(theme.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border_normal)
    };

    let block = Block::default()
        .title(" Input (stdin) ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = input.split('\n').collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    // Keep the last line (where typing happens) in view
    let skip = lines.len().saturating_sub(visible_height);

    if input.is_empty() && !is_focused {
        let paragraph = Paragraph::new("(F6 to type program input)")
            .block(block)
            .style(Style::default().fg(theme.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let text = lines[skip..].join("\n");
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(theme.fg));
    frame.render_widget(paragraph, area);

    if is_focused {
        let last = lines.last().map_or(0, |l| l.chars().count());
        let col = u16::try_from(last).unwrap_or(u16::MAX);
        let row = u16::try_from(lines.len() - 1 - skip).unwrap_or(0);
        let max_x = area.right().saturating_sub(2);
        frame.set_cursor_position(Position::new(
            (area.x + 1).saturating_add(col).min(max_x),
            area.y + 1 + row,
        ));
    }
}
