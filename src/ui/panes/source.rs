//! Source editor pane with syntax highlighting
//!
//! Renders the active tab's live [`EditorBuffer`] with line numbers, a
//! highlighted cursor line and basic C++ syntax colouring, and places the
//! terminal cursor when the pane has focus.
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer.

use crate::editor::EditorBuffer;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Line numbers are padded to at least this many digits
const MIN_LINE_NUMBER_DIGITS: usize = 4;

/// Digits needed for the largest line number
fn line_number_digits(line_count: usize) -> usize {
    line_count.max(1).to_string().len().max(MIN_LINE_NUMBER_DIGITS)
}

/// Drop the first `skip` chars of a highlighted line, keeping span styles
fn skip_columns(line: Line<'static>, skip: usize) -> Line<'static> {
    if skip == 0 {
        return line;
    }
    let mut remaining = skip;
    let mut spans = Vec::with_capacity(line.spans.len());
    for span in line.spans {
        if remaining == 0 {
            spans.push(span);
            continue;
        }
        let len = span.content.chars().count();
        if len <= remaining {
            remaining -= len;
            continue;
        }
        let rest: String = span.content.chars().skip(remaining).collect();
        remaining = 0;
        spans.push(Span::styled(rest, span.style));
    }
    Line::from(spans)
}

/// Simple syntax highlighting for C++ code
fn highlight_source_code(line: &str, theme: &Theme) -> Line<'static> {
    if line.trim_start().starts_with('#') {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(theme.preprocessor),
        ));
    }

    let mut spans = Vec::new();
    let mut current_word = String::new();

    // Simple tokenizer over (byte offset, char) pairs so slicing stays on
    // char boundaries
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];

        // Handle comments
        if c == '/' && chars.get(i + 1).is_some_and(|&(_, next)| next == '/') {
            flush_word(&mut spans, &mut current_word, false, theme);
            spans.push(Span::styled(
                line[start..].to_string(),
                Style::default().fg(theme.comment),
            ));
            break;
        }

        // Handle string and char literals
        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false, theme);
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                if chars[end].1 == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            let end = if end < chars.len() { end + 1 } else { chars.len() };
            let end_byte = chars.get(end).map_or(line.len(), |&(b, _)| b);
            spans.push(Span::styled(
                line[start..end_byte].to_string(),
                Style::default().fg(theme.string),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut spans, &mut current_word, c == '(', theme);

            // Color some operators/delimiters
            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(theme.primary), // Brackets
                ';' | ',' | '.' | ':' => Style::default().fg(theme.fg),
                '+' | '-' | '*' | '/' | '=' | '&' | '|' | '!' | '<' | '>' | '%' => {
                    Style::default().fg(theme.fg)
                } // Operators
                _ => Style::default(),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false, theme);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_function: bool, theme: &Theme) {
    if word.is_empty() {
        return;
    }
    let style = get_keyword_style(word, is_function, theme);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn get_keyword_style(word: &str, is_function: bool, theme: &Theme) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "float" | "double" | "long" | "short" | "unsigned"
        | "signed" | "auto" | "size_t" | "string" | "vector" | "map" | "set" | "pair" => {
            Style::default().fg(theme.type_name) // Types
        }
        "struct" | "class" | "enum" | "return" | "if" | "else" | "while" | "for" | "do"
        | "switch" | "case" | "default" | "break" | "continue" | "goto" | "sizeof" | "const"
        | "static" | "namespace" | "using" | "template" | "typename" | "public" | "private"
        | "protected" | "new" | "delete" | "try" | "catch" | "throw" | "constexpr" => {
            Style::default()
                .fg(theme.keyword)
                .add_modifier(Modifier::BOLD) // Keywords
        }
        "NULL" | "nullptr" | "true" | "false" => Style::default().fg(theme.number), // Constants
        w if w.starts_with(|c: char| c.is_ascii_digit()) => Style::default().fg(theme.number),
        _ => {
            if is_function {
                Style::default().fg(theme.function)
            } else {
                Style::default().fg(theme.fg) // Variables/Identifiers
            }
        }
    }
}

/// Render the source editor pane
///
/// Returns the number of text rows visible inside the borders, which the app
/// uses as the page size for PageUp/PageDown.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    buffer: &mut EditorBuffer,
    is_focused: bool,
    theme: &Theme,
) -> usize {
    let border_style = if is_focused {
        Style::default()
            .fg(theme.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1
    let digits = line_number_digits(buffer.lines().len());
    let gutter_width = digits + 1;
    let text_width = (area.width.saturating_sub(2) as usize)
        .saturating_sub(gutter_width)
        .max(1);
    let scroll = buffer.scroll_into_view(visible_height);
    let col_scroll = buffer.scroll_columns_into_view(text_width);
    let (cursor_row, cursor_col) = buffer.cursor();

    let visible_lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_current = idx == cursor_row;
            let line_num_str = format!("{:>width$} ", idx + 1, width = digits);

            let num_style = if is_current {
                Style::default()
                    .fg(theme.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.comment) // Line numbers
            };

            let mut content_line = skip_columns(highlight_source_code(line, theme), col_scroll);

            // Apply background if current line
            if is_current {
                let current_bg = Style::default().bg(theme.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current_bg);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);

    if is_focused {
        let col = u16::try_from(gutter_width + cursor_col - col_scroll).unwrap_or(u16::MAX);
        let x = (area.x + 1).saturating_add(col);
        let y = area.y + 1 + (cursor_row - scroll) as u16;
        let max_x = area.right().saturating_sub(2);
        frame.set_cursor_position(Position::new(x.min(max_x), y));
    }

    visible_height
}
