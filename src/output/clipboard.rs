//! Clipboard-based text output
//!
//! Pipes text into wl-copy (Wayland) or xsel (X11). Both tools fork a
//! server that owns the selection, so the spawned process exits promptly.
//!
//! Requires: wl-clipboard or xsel installed

use super::process::{self, Capture, Invocation};
use super::resolve::BoundTool;
use super::{OutputContext, Outputter, WL_COPY, XSEL};
use crate::error::{OutputError, TYPE_NOT_SUPPORTED};
use crate::security::{sanitize_arguments, sanitize_text};
use tracing::Instrument;

/// Fixed argument templates; the text always goes through stdin
const CLIPBOARD_TEMPLATES: &[(&str, &[&str])] = &[
    (XSEL, &["--clipboard", "--input"]),
    (WL_COPY, &[]),
];

fn clipboard_args(tool: &str) -> Result<&'static [&'static str], OutputError> {
    CLIPBOARD_TEMPLATES
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, args)| *args)
        .ok_or_else(|| OutputError::UnsupportedTool(tool.to_string()))
}

/// Clipboard-only outputter
pub struct ClipboardOutputter {
    tool: BoundTool,
    ctx: OutputContext,
    span: tracing::Span,
}

impl ClipboardOutputter {
    /// Bind `tool`, which must resolve on the search path
    pub fn new(tool: &str, ctx: &OutputContext) -> Result<Self, OutputError> {
        let tool = ctx.resolver.bind(tool)?;
        let span = tracing::debug_span!("clipboard", tool = %tool.name);
        Ok(Self {
            tool,
            ctx: ctx.clone(),
            span,
        })
    }

    /// Log under `span` instead of the default per-tool span
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn tool(&self) -> &str {
        &self.tool.name
    }

    async fn copy(&self, text: &str) -> Result<(), OutputError> {
        let name = self.tool.name.as_str();

        // Policy may have been reloaded since construction
        if !self.ctx.policy.is_command_allowed(name) {
            return Err(OutputError::ToolNotAllowed(name.to_string()));
        }

        let args = clipboard_args(name)?;

        // An empty write would clear the selection
        let payload = sanitize_text(text);
        if payload.is_empty() {
            tracing::debug!("Nothing to copy");
            return Ok(());
        }
        let chars = payload.chars().count();

        process::run(Invocation {
            tool: name,
            program: self.tool.path(),
            args: sanitize_arguments(args),
            stdin: Some(payload),
            capture: Capture::Spool,
            timeout: self.ctx.timeout,
        })
        .await?;

        tracing::info!("Text copied to clipboard via {} ({} chars)", name, chars);
        Ok(())
    }
}

#[async_trait::async_trait]
impl Outputter for ClipboardOutputter {
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), OutputError> {
        self.copy(text).instrument(self.span.clone()).await
    }

    async fn type_to_active_window(&self, _text: &str) -> Result<(), OutputError> {
        Err(OutputError::UnsupportedOperation(TYPE_NOT_SUPPORTED.to_string()))
    }

    fn tool_names(&self) -> (&str, &str) {
        (self.tool.name.as_str(), "")
    }
}
