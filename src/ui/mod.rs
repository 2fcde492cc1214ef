//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, rename prompt
//! - **[`panes`]**: render functions for each visible pane (tab bar, editor,
//!   stdin, output, status bar)
//! - **[`theme`]**: light and dark colour palettes used by all panes
//!
//! The entry point for consumers is [`App`]: construct it from the tab registry,
//! compile client and theme store, then call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
