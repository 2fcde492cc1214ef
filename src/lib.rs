//! # Introduction
//!
//! cppad is a terminal playground for small C++ programs. Each program lives in
//! its own tab; the active tab's code and standard input are sent to a remote
//! compile service and the program's output (or compiler errors) is shown next
//! to the editor. The UI is built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Request pipeline
//!
//! ```text
//! Keystroke → EditorBuffer → Tab::code → CompileRequest → worker thread → CompileEvent → Tab
//! ```
//!
//! 1. [`tabs`]: the ordered tab registry and the per-tab compile status.
//! 2. [`editor`]: live editing buffers, one mounted per active tab, mirrored
//!    into the registry on every edit.
//! 3. [`compile`]: request/response wire types, the HTTP backend and the client
//!    that applies results by tab id.
//! 4. [`theme`]: the persisted light/dark preference.
//! 5. [`export`], [`samples`], [`config`], [`debug`]: saving sources, built-in
//!    programs, user configuration and file logging.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod compile;
pub mod config;
pub mod debug;
pub mod editor;
pub mod export;
pub mod samples;
pub mod tabs;
pub mod theme;
pub mod ui;
