//! Main TUI application state and logic

use crate::compile::{self, CompileClient};
use crate::editor::{EditAction, EditorBindings};
use crate::export;
use crate::samples::{self, SAMPLES};
use crate::tabs::{TabField, TabRegistry, TabStatus};
use crate::theme::ThemeStore;
use crate::ui::panes::{
    render_input_pane, render_source_pane, render_status_bar, render_tab_bar,
    render_terminal_pane, StatusRenderData,
};
use crate::ui::theme::palette;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Which pane receives typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Editor,
    Input,
}

/// Whether keys go to the panes or to the rename prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Renaming { buffer: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TabDirection {
    Next,
    Previous,
}

/// The main application state
pub struct App {
    /// All open edit sessions
    pub registry: TabRegistry,

    /// Live editor buffer for the active tab
    pub bindings: EditorBindings,

    /// Outstanding compile requests and their results
    pub client: CompileClient,

    /// Light/dark preference
    pub theme: ThemeStore,

    /// Where Ctrl-S writes exported sources
    pub export_dir: PathBuf,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub mode: Mode,

    /// Scroll offset of the output pane
    pub output_scroll: usize,

    /// Last sample loaded with Ctrl-E
    pub sample_index: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Rows visible in the editor at the last render, used as the page size
    editor_page: usize,
}

impl App {
    pub fn new(
        registry: TabRegistry,
        bindings: EditorBindings,
        client: CompileClient,
        theme: ThemeStore,
        export_dir: PathBuf,
    ) -> Self {
        let mut app = App {
            registry,
            bindings,
            client,
            theme,
            export_dir,
            focused_pane: FocusedPane::Editor,
            mode: Mode::Editing,
            output_scroll: 0,
            sample_index: None,
            should_quit: false,
            status_message: String::from("Ready! Ctrl-R to compile and run"),
            editor_page: 20,
        };
        app.mount_active();
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.poll_compile_results();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Poll with a timeout so compile results are picked up while idle
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Apply any compile results that have arrived
    pub fn poll_compile_results(&mut self) {
        let active = self.registry.active_id();
        let was_pending = self.client.is_pending(active);
        if self.client.poll(&mut self.registry) == 0 {
            return;
        }

        if was_pending && !self.client.is_pending(active) {
            self.output_scroll = 0;
            self.status_message = match self.registry.active().status() {
                TabStatus::Success => "Run finished".to_string(),
                TabStatus::Error => "Run failed".to_string(),
                other => format!("Status: {}", other.label()),
            };
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let theme = palette(self.theme.mode());
        let size = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
            size,
        );

        // Tab bar, panes, status bar
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        render_tab_bar(
            frame,
            rows[0],
            self.registry.tabs(),
            self.registry.active_id(),
            theme,
        );

        // Editor on the left, stdin/output on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let editing = self.mode == Mode::Editing;
        let tab = self.registry.active();

        if let Some(buffer) = self.bindings.widget_mut(tab.id()) {
            self.editor_page = render_source_pane(
                frame,
                columns[0],
                tab.name(),
                buffer,
                editing && self.focused_pane == FocusedPane::Editor,
                theme,
            );
        }

        let output_area = if tab.show_input() {
            let right_rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(columns[1]);
            render_input_pane(
                frame,
                right_rows[0],
                tab.input(),
                editing && self.focused_pane == FocusedPane::Input,
                theme,
            );
            right_rows[1]
        } else {
            columns[1]
        };

        render_terminal_pane(frame, output_area, tab, &mut self.output_scroll, theme);

        let rename_buffer = match &self.mode {
            Mode::Renaming { buffer } => Some(buffer.as_str()),
            Mode::Editing => None,
        };
        render_status_bar(
            frame,
            rows[2],
            &StatusRenderData {
                message: &self.status_message,
                status: tab.status(),
                rename_buffer,
                theme_mode: self.theme.mode(),
            },
            theme,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        if let Mode::Renaming { buffer } = &mut self.mode {
            match key.code {
                KeyCode::Enter => {
                    let name = buffer.clone();
                    self.mode = Mode::Editing;
                    self.finish_rename(&name);
                }
                KeyCode::Esc => {
                    self.mode = Mode::Editing;
                    self.status_message = "Rename cancelled".to_string();
                }
                KeyCode::Backspace => {
                    buffer.pop();
                }
                KeyCode::Char(c) if !ctrl && !alt => buffer.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.compile_active(),
            KeyCode::Char('n') if ctrl => self.new_tab(),
            KeyCode::Char('w') if ctrl => self.close_active_tab(),
            KeyCode::Char('t') if ctrl => self.toggle_theme(),
            KeyCode::Char('l') if ctrl => self.clear_active_output(),
            KeyCode::Char('e') if ctrl => self.load_next_sample(),
            KeyCode::Char('s') if ctrl => self.export_active(),
            KeyCode::PageDown if ctrl => self.switch_tab(TabDirection::Next),
            KeyCode::PageUp if ctrl => self.switch_tab(TabDirection::Previous),
            KeyCode::Right if alt => self.switch_tab(TabDirection::Next),
            KeyCode::Left if alt => self.switch_tab(TabDirection::Previous),
            KeyCode::Char(c @ '1'..='9') if alt => {
                let index = c as usize - '1' as usize;
                self.select_tab_index(index);
            }
            KeyCode::F(2) => self.begin_rename(),
            KeyCode::F(6) => self.toggle_focus(),
            KeyCode::Up if shift => self.output_scroll = self.output_scroll.saturating_sub(1),
            KeyCode::Down if shift => self.output_scroll = self.output_scroll.saturating_add(1),
            _ => match self.focused_pane {
                FocusedPane::Editor => self.handle_editor_key(key),
                FocusedPane::Input => self.handle_input_key(key),
            },
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let action = match key.code {
            KeyCode::Char(c) if plain => EditAction::Insert(c),
            KeyCode::Enter => EditAction::Newline,
            KeyCode::Backspace => EditAction::Backspace,
            KeyCode::Delete => EditAction::Delete,
            KeyCode::Tab => EditAction::Indent,
            KeyCode::Left => EditAction::Left,
            KeyCode::Right => EditAction::Right,
            KeyCode::Up => EditAction::Up,
            KeyCode::Down => EditAction::Down,
            KeyCode::Home => EditAction::Home,
            KeyCode::End => EditAction::End,
            KeyCode::PageUp => EditAction::PageUp(self.editor_page),
            KeyCode::PageDown => EditAction::PageDown(self.editor_page),
            _ => return,
        };

        let id = self.registry.active_id();
        self.bindings.edit(&mut self.registry, id, action);
        if !self.registry.active().show_input() {
            self.focused_pane = FocusedPane::Editor;
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let mut input = self.registry.active().input().to_string();
        match key.code {
            KeyCode::Char(c) if plain => input.push(c),
            KeyCode::Enter => input.push('\n'),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Esc => {
                self.focused_pane = FocusedPane::Editor;
                return;
            }
            _ => return,
        }
        let id = self.registry.active_id();
        self.registry.update_tab_field(id, TabField::Input, input);
    }

    /// Mount the active tab's editor buffer and reset per-tab view state
    fn mount_active(&mut self) {
        let tab = self.registry.active();
        self.bindings.mount(tab);
        if !tab.show_input() {
            self.focused_pane = FocusedPane::Editor;
        }
        self.output_scroll = 0;
    }

    /// Compile and run the active tab
    fn compile_active(&mut self) {
        let id = self.registry.active_id();
        if self.client.is_pending(id) {
            self.status_message = "Already compiling this tab".to_string();
            return;
        }
        if !self.bindings.is_mounted(id) {
            self.status_message = "Editor is not ready".to_string();
            return;
        }

        match self.client.compile(&mut self.registry, &self.bindings, id) {
            Ok(()) => {
                self.output_scroll = 0;
                self.status_message = format!("Compiling {}...", self.registry.active().name());
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    fn new_tab(&mut self) {
        self.registry.create_tab();
        self.mount_active();
        self.status_message = format!("Opened {}", self.registry.active().name());
    }

    fn close_active_tab(&mut self) {
        let id = self.registry.active_id();
        // Closing the last tab is silently refused
        if self.registry.close_tab(id).is_ok() {
            self.bindings.release(id);
            self.client.forget(id);
            self.mount_active();
            self.status_message = "Tab closed".to_string();
        }
    }

    fn switch_tab(&mut self, direction: TabDirection) {
        match direction {
            TabDirection::Next => self.registry.next_tab(),
            TabDirection::Previous => self.registry.previous_tab(),
        };
        self.mount_active();
    }

    fn select_tab_index(&mut self, index: usize) {
        let Some(id) = self.registry.tabs().get(index).map(|tab| tab.id()) else {
            return;
        };
        if self.registry.set_active_tab(id).is_ok() {
            self.mount_active();
        }
    }

    fn begin_rename(&mut self) {
        self.mode = Mode::Renaming {
            buffer: self.registry.active().name().to_string(),
        };
    }

    fn finish_rename(&mut self, name: &str) {
        let id = self.registry.active_id();
        if self.registry.rename_tab(id, name) {
            self.status_message = format!("Renamed to {}", self.registry.active().name());
        }
    }

    fn toggle_focus(&mut self) {
        self.focused_pane = match self.focused_pane {
            FocusedPane::Editor if self.registry.active().show_input() => FocusedPane::Input,
            FocusedPane::Editor => {
                self.status_message = "This program does not read stdin".to_string();
                FocusedPane::Editor
            }
            FocusedPane::Input => FocusedPane::Editor,
        };
    }

    fn toggle_theme(&mut self) {
        let mode = self.theme.toggle();
        self.status_message = format!("Theme: {}", mode);
    }

    fn clear_active_output(&mut self) {
        let id = self.registry.active_id();
        if compile::clear_output(&mut self.registry, id) {
            self.output_scroll = 0;
            self.status_message = "Output cleared".to_string();
        }
    }

    fn load_next_sample(&mut self) {
        let index = samples::next_index(self.sample_index);
        let sample = SAMPLES[index];
        let id = self.registry.active_id();
        if self.bindings.replace_content(&mut self.registry, id, sample.code) {
            self.sample_index = Some(index);
            self.status_message = format!("Loaded sample: {}", sample.name);
        }
    }

    fn export_active(&mut self) {
        let id = self.registry.active_id();
        self.bindings.reconcile(&mut self.registry, id);
        self.status_message = match export::export_tab(self.registry.active(), &self.export_dir) {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => {
                log::error!("{}", e);
                format!("Export failed: {}", e)
            }
        };
    }
}
