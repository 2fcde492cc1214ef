//! Editor binding layer
//!
//! Each tab's live editing buffer ([`EditorBuffer`]) is owned here, keyed by
//! [`TabId`]. Only the active tab has a mounted buffer; switching tabs drops it
//! and seeds a new one from the tab's stored code.
//!
//! The buffer is the source of truth while mounted. Every change that alters
//! the text is mirrored into [`Tab::code`](crate::tabs::Tab::code) before
//! [`EditorBindings::edit`] returns, so the stored code is a synchronous
//! projection of the buffer. [`EditorBindings::reconcile`] is still run before
//! each compile.

use crate::tabs::{Tab, TabField, TabId, TabRegistry};
use rustc_hash::FxHashMap;

/// Default indentation width for [`EditAction::Indent`]
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// A single editing or navigation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Indent,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp(usize),
    PageDown(usize),
}

/// Line-based text buffer with a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorBuffer {
    lines: Vec<String>,
    row: usize,
    /// Cursor column in chars, not bytes
    col: usize,
    scroll: usize,
    /// First visible char column
    col_scroll: usize,
    tab_width: usize,
}

impl EditorBuffer {
    pub fn new(text: &str, tab_width: usize) -> Self {
        EditorBuffer {
            lines: split_lines(text),
            row: 0,
            col: 0,
            scroll: 0,
            col_scroll: 0,
            tab_width: tab_width.max(1),
        }
    }

    /// The full buffer contents
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Replace all contents, keeping the cursor as close as possible
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        self.row = self.row.min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    /// Cursor position as (row, char column)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Adjust the scroll offset so the cursor row sits inside a viewport of
    /// `height` rows, and return the new offset
    pub fn scroll_into_view(&mut self, height: usize) -> usize {
        let height = height.max(1);
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }
        self.scroll
    }

    pub fn col_scroll(&self) -> usize {
        self.col_scroll
    }

    /// Same as [`scroll_into_view`](Self::scroll_into_view) for columns: keep
    /// the cursor inside a viewport `width` chars wide
    pub fn scroll_columns_into_view(&mut self, width: usize) -> usize {
        let width = width.max(1);
        if self.col < self.col_scroll {
            self.col_scroll = self.col;
        } else if self.col >= self.col_scroll + width {
            self.col_scroll = self.col + 1 - width;
        }
        self.col_scroll
    }

    /// Apply an action. Returns true if the text changed.
    pub fn apply(&mut self, action: EditAction) -> bool {
        match action {
            EditAction::Insert('\n') => self.newline(),
            EditAction::Insert('\t') => self.indent(),
            EditAction::Insert(c) => {
                let at = byte_index(&self.lines[self.row], self.col);
                self.lines[self.row].insert(at, c);
                self.col += 1;
                true
            }
            EditAction::Newline => self.newline(),
            EditAction::Indent => self.indent(),
            EditAction::Backspace => self.backspace(),
            EditAction::Delete => self.delete(),
            EditAction::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
                false
            }
            EditAction::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                false
            }
            EditAction::Up => {
                self.move_to_row(self.row.saturating_sub(1));
                false
            }
            EditAction::Down => {
                self.move_to_row(self.row + 1);
                false
            }
            EditAction::PageUp(n) => {
                self.move_to_row(self.row.saturating_sub(n));
                false
            }
            EditAction::PageDown(n) => {
                self.move_to_row(self.row.saturating_add(n));
                false
            }
            EditAction::Home => {
                self.col = 0;
                false
            }
            EditAction::End => {
                self.col = self.line_len(self.row);
                false
            }
        }
    }

    fn newline(&mut self) -> bool {
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
        self.col = indent.chars().count();
        self.row += 1;
        self.lines.insert(self.row, indent + &rest);
        true
    }

    fn indent(&mut self) -> bool {
        let spaces = self.tab_width - (self.col % self.tab_width);
        let at = byte_index(&self.lines[self.row], self.col);
        self.lines[self.row].insert_str(at, &" ".repeat(spaces));
        self.col += spaces;
        true
    }

    fn backspace(&mut self) -> bool {
        if self.col > 0 {
            let at = byte_index(&self.lines[self.row], self.col - 1);
            self.lines[self.row].remove(at);
            self.col -= 1;
            true
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        if self.col < self.line_len(self.row) {
            let at = byte_index(&self.lines[self.row], self.col);
            self.lines[self.row].remove(at);
            true
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            true
        } else {
            false
        }
    }

    fn move_to_row(&mut self, row: usize) {
        self.row = row.min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }
}

fn split_lines(text: &str) -> Vec<String> {
    // `split` always yields at least one item, so the buffer is never empty
    text.split('\n').map(str::to_string).collect()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// Owner of all live editor buffers, keyed by tab id
#[derive(Debug, Default)]
pub struct EditorBindings {
    widgets: FxHashMap<TabId, EditorBuffer>,
    tab_width: usize,
}

impl EditorBindings {
    pub fn new(tab_width: usize) -> Self {
        EditorBindings {
            widgets: FxHashMap::default(),
            tab_width,
        }
    }

    /// Instantiate the buffer for `tab`, discarding every other buffer.
    ///
    /// Re-mounting the tab that is already mounted keeps its buffer and cursor.
    pub fn mount(&mut self, tab: &Tab) -> &mut EditorBuffer {
        let id = tab.id();
        self.widgets.retain(|widget_id, _| *widget_id == id);
        let tab_width = self.tab_width;
        self.widgets
            .entry(id)
            .or_insert_with(|| EditorBuffer::new(tab.code(), tab_width))
    }

    pub fn is_mounted(&self, id: TabId) -> bool {
        self.widgets.contains_key(&id)
    }

    pub fn widget(&self, id: TabId) -> Option<&EditorBuffer> {
        self.widgets.get(&id)
    }

    pub fn widget_mut(&mut self, id: TabId) -> Option<&mut EditorBuffer> {
        self.widgets.get_mut(&id)
    }

    /// Apply an edit to the tab's live buffer and mirror the result into the
    /// registry. Returns true if the text changed.
    pub fn edit(&mut self, registry: &mut TabRegistry, id: TabId, action: EditAction) -> bool {
        let Some(widget) = self.widgets.get_mut(&id) else {
            return false;
        };
        if !widget.apply(action) {
            return false;
        }
        registry.update_tab_field(id, TabField::Code, widget.text());
        true
    }

    /// Refresh the tab's stored code from its live buffer, if one is mounted
    pub fn reconcile(&self, registry: &mut TabRegistry, id: TabId) -> bool {
        match self.widgets.get(&id) {
            Some(widget) => registry.update_tab_field(id, TabField::Code, widget.text()),
            None => false,
        }
    }

    /// Programmatically replace a tab's contents in both the registry and the
    /// live buffer
    pub fn replace_content(&mut self, registry: &mut TabRegistry, id: TabId, text: &str) -> bool {
        if !registry.update_tab_field(id, TabField::Code, text) {
            return false;
        }
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.set_text(text);
        }
        true
    }

    /// Drop the buffer for a closed tab
    pub fn release(&mut self, id: TabId) {
        if self.widgets.remove(&id).is_some() {
            log::debug!("Released editor buffer for tab {}", id);
        }
    }

    pub fn mounted_count(&self) -> usize {
        self.widgets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(buffer: &mut EditorBuffer, text: &str) {
        for c in text.chars() {
            buffer.apply(EditAction::Insert(c));
        }
    }

    #[test]
    fn test_text_round_trips_trailing_newline() {
        let buffer = EditorBuffer::new("a\nb\n", 4);
        assert_eq!(buffer.lines().len(), 3);
        assert_eq!(buffer.text(), "a\nb\n");
    }

    #[test]
    fn test_newline_carries_indentation() {
        let mut buffer = EditorBuffer::new("    int x;", 4);
        buffer.apply(EditAction::End);
        buffer.apply(EditAction::Newline);
        typed(&mut buffer, "x++;");
        assert_eq!(buffer.text(), "    int x;\n    x++;");
        assert_eq!(buffer.cursor(), (1, 8));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = EditorBuffer::new("ab\ncd", 4);
        buffer.apply(EditAction::Down);
        assert!(buffer.apply(EditAction::Backspace));
        assert_eq!(buffer.text(), "abcd");
        assert_eq!(buffer.cursor(), (0, 2));
        buffer.apply(EditAction::Home);
        assert!(!buffer.apply(EditAction::Backspace));
    }

    #[test]
    fn test_delete_at_end_joins_next_line() {
        let mut buffer = EditorBuffer::new("ab\ncd", 4);
        buffer.apply(EditAction::End);
        assert!(buffer.apply(EditAction::Delete));
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut buffer = EditorBuffer::new("héllo", 4);
        buffer.apply(EditAction::Right);
        buffer.apply(EditAction::Right);
        assert!(buffer.apply(EditAction::Backspace));
        assert_eq!(buffer.text(), "hllo");
    }

    #[test]
    fn test_indent_to_next_tab_stop() {
        let mut buffer = EditorBuffer::new("x", 4);
        buffer.apply(EditAction::End);
        buffer.apply(EditAction::Insert('\t'));
        assert_eq!(buffer.text(), "x   ");
        assert_eq!(buffer.cursor(), (0, 4));
    }

    #[test]
    fn test_set_text_clamps_cursor() {
        let mut buffer = EditorBuffer::new("one\ntwo\nthree", 4);
        buffer.apply(EditAction::PageDown(10));
        buffer.apply(EditAction::End);
        buffer.set_text("a");
        assert_eq!(buffer.cursor(), (0, 1));
    }

    #[test]
    fn test_scroll_into_view() {
        let mut buffer = EditorBuffer::new(&"x\n".repeat(50), 4);
        buffer.apply(EditAction::PageDown(20));
        assert_eq!(buffer.scroll_into_view(10), 11);
        buffer.apply(EditAction::PageUp(15));
        assert_eq!(buffer.scroll_into_view(10), 5);
    }

    #[test]
    fn test_scroll_columns_into_view() {
        let mut buffer = EditorBuffer::new(&"x".repeat(100), 4);
        assert_eq!(buffer.scroll_columns_into_view(20), 0);
        buffer.apply(EditAction::End);
        assert_eq!(buffer.scroll_columns_into_view(20), 81);
        buffer.apply(EditAction::Home);
        assert_eq!(buffer.scroll_columns_into_view(20), 0);
    }

    #[test]
    fn test_mount_keeps_only_one_buffer() {
        let mut registry = TabRegistry::new();
        let first = registry.active_id();
        let second = registry.create_tab();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);

        bindings.mount(registry.get(first).unwrap());
        bindings.mount(registry.get(second).unwrap());
        assert!(!bindings.is_mounted(first));
        assert!(bindings.is_mounted(second));
        assert_eq!(bindings.mounted_count(), 1);
    }

    #[test]
    fn test_edit_mirrors_into_registry() {
        let mut registry = TabRegistry::new();
        let id = registry.active_id();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);
        bindings.mount(registry.get(id).unwrap());
        bindings.replace_content(&mut registry, id, "");

        for c in "std::cin".chars() {
            bindings.edit(&mut registry, id, EditAction::Insert(c));
        }
        let tab = registry.get(id).unwrap();
        assert_eq!(tab.code(), "std::cin");
        assert!(tab.show_input());
    }

    #[test]
    fn test_movement_does_not_touch_registry() {
        let mut registry = TabRegistry::new();
        let id = registry.active_id();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);
        bindings.mount(registry.get(id).unwrap());
        assert!(!bindings.edit(&mut registry, id, EditAction::Down));
    }

    #[test]
    fn test_replace_content_updates_both_sides() {
        let mut registry = TabRegistry::new();
        let id = registry.active_id();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);
        bindings.mount(registry.get(id).unwrap());

        assert!(bindings.replace_content(&mut registry, id, "int main() {}"));
        assert_eq!(registry.get(id).unwrap().code(), "int main() {}");
        assert_eq!(bindings.widget(id).unwrap().text(), "int main() {}");
    }

    #[test]
    fn test_replace_content_without_widget_updates_registry() {
        let mut registry = TabRegistry::new();
        let id = registry.active_id();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);

        assert!(bindings.replace_content(&mut registry, id, "// empty"));
        assert_eq!(registry.get(id).unwrap().code(), "// empty");
        assert!(!bindings.is_mounted(id));
    }

    #[test]
    fn test_reconcile_picks_up_unmirrored_changes() {
        let mut registry = TabRegistry::new();
        let id = registry.active_id();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);
        bindings.mount(registry.get(id).unwrap());

        // Edit the widget directly, bypassing the change notification
        bindings.widget_mut(id).unwrap().set_text("late edit");
        assert_ne!(registry.get(id).unwrap().code(), "late edit");
        assert!(bindings.reconcile(&mut registry, id));
        assert_eq!(registry.get(id).unwrap().code(), "late edit");
    }

    #[test]
    fn test_release_drops_buffer() {
        let mut registry = TabRegistry::new();
        let id = registry.active_id();
        let mut bindings = EditorBindings::new(DEFAULT_TAB_WIDTH);
        bindings.mount(registry.get(id).unwrap());
        bindings.release(id);
        assert!(!bindings.is_mounted(id));
        assert!(!bindings.reconcile(&mut registry, id));
    }
}
