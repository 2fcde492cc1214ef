//! Tab registry: the ordered set of independent edit sessions
//!
//! A [`TabRegistry`] always holds at least one [`Tab`] and always has exactly
//! one active tab. Ids are handed out monotonically and never reused, so a
//! compile response that arrives after its tab was closed can be recognised
//! and dropped.
//!
//! Tab status is not writable through [`TabRegistry::update_tab_field`];
//! it only moves through the compile lifecycle in [`crate::compile`].

use std::fmt;
use thiserror::Error;

/// Source loaded into every freshly created tab
pub const STARTER_CODE: &str = "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, World!\" << std::endl;\n    return 0;\n}\n";

/// Identifiers that usually mean the program reads standard input
const INPUT_TOKENS: &[&str] = &[
    "cin", "scanf", "sscanf", "fscanf", "getline", "getchar", "fgets", "gets", "fread",
];

/// Unique tab identifier within a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Compile status of a single tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabStatus {
    #[default]
    Idle,
    Compiling,
    Success,
    Error,
}

impl TabStatus {
    pub fn label(self) -> &'static str {
        match self {
            TabStatus::Idle => "idle",
            TabStatus::Compiling => "compiling",
            TabStatus::Success => "success",
            TabStatus::Error => "error",
        }
    }
}

/// Fields that can be point-updated through [`TabRegistry::update_tab_field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabField {
    Name,
    Code,
    Input,
    Output,
    Error,
}

/// Errors from registry operations. The UI treats all of them as silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabError {
    #[error("cannot close the last remaining tab")]
    LastTab,
    #[error("no tab with id {0}")]
    NotFound(TabId),
}

/// One edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    id: TabId,
    name: String,
    code: String,
    input: String,
    output: String,
    error: String,
    status: TabStatus,
    show_input: bool,
}

impl Tab {
    fn new(id: TabId, name: String, code: String) -> Self {
        let show_input = detect_input_usage(&code);
        Tab {
            id,
            name,
            code,
            input: String::new(),
            output: String::new(),
            error: String::new(),
            status: TabStatus::Idle,
            show_input,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn status(&self) -> TabStatus {
        self.status
    }

    /// Whether the stdin panel should be shown for this tab's code
    pub fn show_input(&self) -> bool {
        self.show_input
    }

    pub(crate) fn set_code(&mut self, code: String) {
        self.show_input = detect_input_usage(&code);
        self.code = code;
    }

    /// Enter `Compiling`, wiping the previous result
    pub(crate) fn begin_compile(&mut self) {
        self.status = TabStatus::Compiling;
        self.output.clear();
        self.error.clear();
    }

    pub(crate) fn finish_compile(&mut self, status: TabStatus, output: String, error: String) {
        self.status = status;
        self.output = output;
        self.error = error;
    }

    /// Back to `Idle`; ignored while a compile is outstanding
    pub(crate) fn clear_result(&mut self) -> bool {
        if self.status == TabStatus::Compiling {
            return false;
        }
        self.status = TabStatus::Idle;
        self.output.clear();
        self.error.clear();
        true
    }
}

/// Ordered collection of tabs with a single active pointer
#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active: TabId,
    next_id: u32,
}

impl TabRegistry {
    /// A registry holding one default tab
    pub fn new() -> Self {
        let first = Tab::new(TabId(1), default_name(TabId(1)), STARTER_CODE.to_string());
        TabRegistry {
            active: first.id,
            tabs: vec![first],
            next_id: 2,
        }
    }

    /// Open a fresh tab with the starter program and make it active
    pub fn create_tab(&mut self) -> TabId {
        let id = self.allocate_id();
        self.push_active(Tab::new(id, default_name(id), STARTER_CODE.to_string()))
    }

    /// Open a tab with explicit name and contents and make it active
    pub fn create_tab_with(&mut self, name: impl Into<String>, code: impl Into<String>) -> TabId {
        let id = self.allocate_id();
        let mut name = name.into();
        if name.trim().is_empty() {
            name = default_name(id);
        }
        self.push_active(Tab::new(id, name, code.into()))
    }

    fn allocate_id(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_active(&mut self, tab: Tab) -> TabId {
        let id = tab.id;
        log::debug!("Created tab {} ({:?})", id, tab.name);
        self.tabs.push(tab);
        self.active = id;
        id
    }

    /// Remove a tab. Fails for the last remaining tab.
    ///
    /// If the removed tab was active, the first remaining tab becomes active.
    pub fn close_tab(&mut self, id: TabId) -> Result<(), TabError> {
        let index = self.position(id).ok_or(TabError::NotFound(id))?;
        if self.tabs.len() == 1 {
            return Err(TabError::LastTab);
        }

        self.tabs.remove(index);
        if self.active == id {
            self.active = self.tabs[0].id;
        }
        log::debug!("Closed tab {}, active is now {}", id, self.active);
        Ok(())
    }

    /// Rename a tab. Blank names are rejected and leave the tab untouched.
    pub fn rename_tab(&mut self, id: TabId, new_name: &str) -> bool {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(tab) => {
                log::debug!("Renamed tab {} to {:?}", id, trimmed);
                tab.name = trimmed.to_string();
                true
            }
            None => false,
        }
    }

    /// Point-update a single field of one tab.
    ///
    /// `Name` follows the same rules as [`rename_tab`](Self::rename_tab).
    pub fn update_tab_field(&mut self, id: TabId, field: TabField, value: impl Into<String>) -> bool {
        let value = value.into();
        if field == TabField::Name {
            return self.rename_tab(id, &value);
        }
        let Some(tab) = self.get_mut(id) else {
            return false;
        };
        match field {
            TabField::Code => tab.set_code(value),
            TabField::Input => tab.input = value,
            TabField::Output => tab.output = value,
            TabField::Error => tab.error = value,
            TabField::Name => return false,
        }
        true
    }

    pub fn set_active_tab(&mut self, id: TabId) -> Result<(), TabError> {
        if self.position(id).is_none() {
            return Err(TabError::NotFound(id));
        }
        self.active = id;
        Ok(())
    }

    /// Activate the tab to the right of the active one, wrapping around
    pub fn next_tab(&mut self) -> TabId {
        let index = self.active_index();
        self.active = self.tabs[(index + 1) % self.tabs.len()].id;
        self.active
    }

    /// Activate the tab to the left of the active one, wrapping around
    pub fn previous_tab(&mut self) -> TabId {
        let index = self.active_index();
        let len = self.tabs.len();
        self.active = self.tabs[(index + len - 1) % len].id;
        self.active
    }

    pub fn active_id(&self) -> TabId {
        self.active
    }

    pub fn active(&self) -> &Tab {
        &self.tabs[self.active_index()]
    }

    pub fn active_mut(&mut self) -> &mut Tab {
        let index = self.active_index();
        &mut self.tabs[index]
    }

    fn active_index(&self) -> usize {
        // The active id always refers to a live tab
        self.position(self.active).unwrap_or(0)
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.position(id).is_some()
    }

    /// Tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Always false: the last tab cannot be closed
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_name(id: TabId) -> String {
    format!("Tab {}", id.0)
}

/// Best-effort guess at whether `code` reads standard input.
///
/// Scans identifier tokens, so `std::cin` and `scanf(` match but `principal`
/// does not. Tokens inside comments and string literals still count.
pub fn detect_input_usage(code: &str) -> bool {
    code.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| INPUT_TOKENS.contains(&token))
}
