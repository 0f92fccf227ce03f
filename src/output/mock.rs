//! In-memory outputter for tests
//!
//! Records every call instead of spawning a process. Collaborators that
//! take `&dyn Outputter` can be tested against it without a desktop.

use super::Outputter;
use crate::error::OutputError;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    clipboard: Vec<String>,
    typed: Vec<String>,
    clipboard_error: Option<OutputError>,
    type_error: Option<OutputError>,
}

/// Recording test double
#[derive(Debug)]
pub struct MockOutputter {
    clipboard_tool: String,
    type_tool: String,
    state: Mutex<MockState>,
}

impl Default for MockOutputter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockOutputter {
    pub fn new() -> Self {
        Self::with_tool_names("mock", "mock")
    }

    /// Report custom names from `tool_names`
    pub fn with_tool_names(clipboard: &str, typer: &str) -> Self {
        Self {
            clipboard_tool: clipboard.to_string(),
            type_tool: typer.to_string(),
            state: Mutex::new(MockState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the history from others
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every `copy_to_clipboard` fail with `error` (None clears it)
    pub fn fail_clipboard_with(&self, error: Option<OutputError>) {
        self.state().clipboard_error = error;
    }

    /// Make every `type_to_active_window` fail with `error` (None clears it)
    pub fn fail_type_with(&self, error: Option<OutputError>) {
        self.state().type_error = error;
    }

    pub fn clipboard_calls(&self) -> usize {
        self.state().clipboard.len()
    }

    pub fn type_calls(&self) -> usize {
        self.state().typed.len()
    }

    pub fn clipboard_history(&self) -> Vec<String> {
        self.state().clipboard.clone()
    }

    pub fn typed_history(&self) -> Vec<String> {
        self.state().typed.clone()
    }

    pub fn last_clipboard_text(&self) -> Option<String> {
        self.state().clipboard.last().cloned()
    }

    pub fn last_typed_text(&self) -> Option<String> {
        self.state().typed.last().cloned()
    }

    /// True if any copied text contains `needle`
    pub fn clipboard_contains(&self, needle: &str) -> bool {
        self.state().clipboard.iter().any(|t| t.contains(needle))
    }

    /// True if any typed text contains `needle`
    pub fn typed_contains(&self, needle: &str) -> bool {
        self.state().typed.iter().any(|t| t.contains(needle))
    }

    /// Clear history and injected errors
    pub fn reset(&self) {
        *self.state() = MockState::default();
    }
}

#[async_trait::async_trait]
impl Outputter for MockOutputter {
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), OutputError> {
        let mut state = self.state();
        state.clipboard.push(text.to_string());
        match &state.clipboard_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn type_to_active_window(&self, text: &str) -> Result<(), OutputError> {
        let mut state = self.state();
        state.typed.push(text.to_string());
        match &state.type_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn tool_names(&self) -> (&str, &str) {
        (self.clipboard_tool.as_str(), self.type_tool.as_str())
    }
}
