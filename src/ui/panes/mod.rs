//! TUI pane rendering modules
//!
//! Each pane module exports a primary `render_*` function that draws one region
//! of the screen from borrowed state plus the active [`Theme`] palette.
//!
//! # Pane Modules
//!
//! - [`tabs`]: Tab bar with names and per-tab compile status
//! - [`source`]: Editor for the active tab with syntax highlighting and cursor
//! - [`input`]: Standard input text, shown when the code appears to read stdin
//! - [`terminal`]: Program output and error messages
//! - [`status`]: Status bar with keybindings and compile state
//!
//! [`Theme`]: crate::ui::theme::Theme

pub mod input;
pub mod source;
pub mod status;
pub mod tabs;
pub mod terminal;

// Re-export render functions for convenience
pub use input::render_input_pane;
pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use tabs::render_tab_bar;
pub use terminal::render_terminal_pane;
