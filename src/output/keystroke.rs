//! Keystroke-based text output
//!
//! Simulates typing in the focused window with xdotool (X11), wtype
//! (Wayland virtual-keyboard protocol) or ydotool (uinput, any compositor).
//!
//! Two rules sit around the invocation:
//! - ydotool maps characters through a US keymap, so non-ASCII text on
//!   Wayland is refused up front with `EncodingUnsupported`.
//! - wtype fails on compositors without the virtual-keyboard protocol
//!   (GNOME). When it fails at runtime and ydotool is allowed and
//!   installed, the text is retried once through ydotool.

use super::process::{self, Capture, Invocation};
use super::resolve::BoundTool;
use super::{OutputContext, Outputter, WTYPE, XDOTOOL, YDOTOOL};
use crate::env::DisplayServer;
use crate::error::{OutputError, CLIPBOARD_NOT_SUPPORTED};
use crate::security::{sanitize_arguments, sanitize_text};
use tracing::Instrument;

/// Arguments placed before the text; `--` stops option parsing so text
/// starting with `-` is typed literally
const TYPE_TEMPLATES: &[(&str, &[&str])] = &[
    (XDOTOOL, &["type", "--clearmodifiers", "--"]),
    (WTYPE, &["--"]),
    (YDOTOOL, &["type", "--"]),
];

fn type_args(tool: &str, text: &str) -> Result<Vec<String>, OutputError> {
    let (_, prefix) = TYPE_TEMPLATES
        .iter()
        .find(|(name, _)| *name == tool)
        .ok_or_else(|| OutputError::UnsupportedTool(tool.to_string()))?;

    let mut args: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
    args.push(text.to_string());
    Ok(args)
}

/// Keystroke-only outputter
pub struct TypeOutputter {
    tool: BoundTool,
    display_server: DisplayServer,
    ctx: OutputContext,
    span: tracing::Span,
}

impl TypeOutputter {
    /// Bind `tool`, which must resolve on the search path
    pub fn new(
        tool: &str,
        display_server: DisplayServer,
        ctx: &OutputContext,
    ) -> Result<Self, OutputError> {
        let tool = ctx.resolver.bind(tool)?;
        let span = tracing::debug_span!("type", tool = %tool.name);
        Ok(Self {
            tool,
            display_server,
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

    async fn type_text(&self, text: &str) -> Result<(), OutputError> {
        match self.invoke(&self.tool, text).await {
            Ok(()) => Ok(()),
            Err(primary) if self.tool.name == WTYPE && is_runtime_failure(&primary) => {
                self.retry_with_ydotool(text, primary).await
            }
            Err(e) => Err(e),
        }
    }

    /// Single wtype -> ydotool retry
    async fn retry_with_ydotool(&self, text: &str, primary: OutputError) -> Result<(), OutputError> {
        if !self.ctx.policy.is_command_allowed(YDOTOOL) {
            tracing::debug!("wtype failed and ydotool is not allowed, not retrying");
            return Err(primary);
        }
        let Some(ydotool) = self.ctx.resolver.resolve(YDOTOOL) else {
            tracing::debug!("wtype failed and ydotool is not installed, not retrying");
            return Err(primary);
        };

        tracing::warn!("{}, retrying with ydotool", primary);
        let fallback = BoundTool {
            name: YDOTOOL.to_string(),
            path: ydotool,
        };

        match self.invoke(&fallback, text).await {
            Ok(()) => {
                tracing::info!("Text typed via ydotool after wtype failed");
                Ok(())
            }
            Err(fallback) => Err(OutputError::FallbackFailed {
                primary: Box::new(primary),
                fallback: Box::new(fallback),
            }),
        }
    }

    async fn invoke(&self, tool: &BoundTool, text: &str) -> Result<(), OutputError> {
        let name = tool.name.as_str();

        // Policy may have been reloaded since construction
        if !self.ctx.policy.is_command_allowed(name) {
            return Err(OutputError::ToolNotAllowed(name.to_string()));
        }

        let payload = sanitize_text(text);
        let args = type_args(name, &payload)?;

        if self.display_server == DisplayServer::Wayland && name == YDOTOOL && !payload.is_ascii() {
            return Err(OutputError::EncodingUnsupported(name.to_string()));
        }

        if payload.is_empty() {
            tracing::debug!("Nothing to type");
            return Ok(());
        }

        process::run(Invocation {
            tool: name,
            program: tool.path(),
            args: sanitize_arguments(&args),
            stdin: None,
            capture: Capture::Pipe,
            timeout: self.ctx.timeout,
        })
        .await?;

        tracing::debug!("Typed {} chars via {}", payload.chars().count(), name);
        Ok(())
    }
}

/// Failures that happened after the tool was actually started
fn is_runtime_failure(error: &OutputError) -> bool {
    matches!(
        error,
        OutputError::ExecutionFailed { .. } | OutputError::Timeout { .. }
    )
}

#[async_trait::async_trait]
impl Outputter for TypeOutputter {
    async fn copy_to_clipboard(&self, _text: &str) -> Result<(), OutputError> {
        Err(OutputError::UnsupportedOperation(
            CLIPBOARD_NOT_SUPPORTED.to_string(),
        ))
    }

    async fn type_to_active_window(&self, text: &str) -> Result<(), OutputError> {
        self.type_text(text).instrument(self.span.clone()).await
    }

    fn tool_names(&self) -> (&str, &str) {
        ("", self.tool.name.as_str())
    }
}
