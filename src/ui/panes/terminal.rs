//! Program output pane rendering

use crate::tabs::{Tab, TabStatus};
use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the output pane for a tab: the error (if any) above the program output
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    tab: &Tab,
    scroll_offset: &mut usize,
    theme: &Theme,
) {
    let (title, title_style) = match tab.status() {
        TabStatus::Idle => (" Output ", Style::default().fg(theme.border_normal)),
        TabStatus::Compiling => (" Output · compiling… ", Style::default().fg(theme.secondary)),
        TabStatus::Success => (" Output · success ", Style::default().fg(theme.success)),
        TabStatus::Error => (" Output · error ", Style::default().fg(theme.error)),
    };

    let block = Block::default()
        .title(title)
        .title_style(title_style.add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_normal));

    if tab.status() == TabStatus::Compiling {
        let paragraph = Paragraph::new("Compiling...")
            .block(block)
            .style(Style::default().fg(theme.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut all_items: Vec<ListItem> = Vec::new();
    if !tab.error().is_empty() {
        all_items.push(
            ListItem::new("Error:").style(
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            ),
        );
        all_items.extend(
            tab.error()
                .lines()
                .map(|line| ListItem::new(line.to_string()).style(Style::default().fg(theme.error))),
        );
        if !tab.output().is_empty() {
            all_items.push(ListItem::new(""));
        }
    }
    all_items.extend(
        tab.output()
            .lines()
            .map(|line| ListItem::new(line.to_string()).style(Style::default().fg(theme.fg))),
    );

    if all_items.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(theme.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));

    // Calculate visible range for scrolling
    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
