//! Text output module
//!
//! Delivers text via the clipboard or by simulating keystrokes in the
//! focused window, always through an external tool:
//!
//! | Tool    | Purpose   | Arguments                           |
//! |---------|-----------|-------------------------------------|
//! | xsel    | clipboard | `--clipboard --input` (text on stdin) |
//! | wl-copy | clipboard | none (text on stdin)                |
//! | xdotool | type      | `type --clearmodifiers -- <text>`   |
//! | wtype   | type      | `-- <text>`                         |
//! | ydotool | type      | `type -- <text>`                    |
//!
//! Before every spawn an outputter re-checks the allowlist and sanitizes its
//! arguments. Clipboard and type outputters have disjoint capabilities; the
//! combined outputter owns one of each.

pub mod clipboard;
pub mod combined;
pub mod keystroke;
pub mod mock;
pub(crate) mod process;
pub mod resolve;
pub mod select;

pub use clipboard::ClipboardOutputter;
pub use combined::CombinedOutputter;
pub use keystroke::TypeOutputter;
pub use mock::MockOutputter;
pub use resolve::{BoundTool, ToolResolver};

use crate::config::{OutputConfig, OutputMode};
use crate::env::Environment;
use crate::error::OutputError;
use crate::security::PolicyHandle;
use std::time::Duration;

pub const XSEL: &str = "xsel";
pub const WL_COPY: &str = "wl-copy";
pub const XDOTOOL: &str = "xdotool";
pub const WTYPE: &str = "wtype";
pub const YDOTOOL: &str = "ydotool";

/// Every tool typeout knows how to drive
pub const KNOWN_TOOLS: &[&str] = &[WL_COPY, XSEL, WTYPE, YDOTOOL, XDOTOOL];

/// Trait for text output implementations
#[async_trait::async_trait]
pub trait Outputter: Send + Sync {
    /// Put text on the system clipboard
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), OutputError>;

    /// Type text into the focused window
    async fn type_to_active_window(&self, text: &str) -> Result<(), OutputError>;

    /// Bound (clipboard, type) tool names, "" for a slot this variant lacks.
    /// For diagnostics only.
    fn tool_names(&self) -> (&str, &str);
}

/// Everything an outputter needs besides its tool name
#[derive(Debug, Clone, Default)]
pub struct OutputContext {
    pub policy: PolicyHandle,
    pub resolver: ToolResolver,
    pub timeout: Option<Duration>,
}

impl OutputContext {
    pub fn new(policy: PolicyHandle) -> Self {
        Self {
            policy,
            resolver: ToolResolver::system(),
            timeout: None,
        }
    }

    pub fn with_resolver(mut self, resolver: ToolResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Bound each invocation; 0 disables the limit
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        self
    }
}

/// What the caller needs the outputter to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Clipboard,
    Type,
    Both,
}

impl Capability {
    /// Capability required to serve `mode`
    pub fn for_mode(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Clipboard => Capability::Clipboard,
            OutputMode::ActiveWindow => Capability::Type,
        }
    }
}

/// Select tools for the environment and build the matching outputter
pub fn create_outputter(
    capability: Capability,
    config: &OutputConfig,
    env: &Environment,
    ctx: &OutputContext,
) -> Result<Box<dyn Outputter>, OutputError> {
    let clipboard_tool = || select::select_clipboard_tool(env, config);
    let type_tool = || select::select_type_tool(env, config, |tool| ctx.resolver.is_available(tool));

    let outputter: Box<dyn Outputter> = match capability {
        Capability::Clipboard => Box::new(ClipboardOutputter::new(&clipboard_tool(), ctx)?),
        Capability::Type => Box::new(TypeOutputter::new(
            &type_tool(),
            env.display_server,
            ctx,
        )?),
        Capability::Both => Box::new(CombinedOutputter::new(
            &clipboard_tool(),
            &type_tool(),
            env.display_server,
            ctx,
        )?),
    };

    let (clipboard, typer) = outputter.tool_names();
    tracing::info!(
        "Output ready on {} (clipboard: {}, type: {})",
        env.display_server,
        or_none(clipboard),
        or_none(typer)
    );
    Ok(outputter)
}

/// Deliver text the way `mode` asks
pub async fn deliver(
    outputter: &dyn Outputter,
    mode: OutputMode,
    text: &str,
) -> Result<(), OutputError> {
    match mode {
        OutputMode::Clipboard => outputter.copy_to_clipboard(text).await,
        OutputMode::ActiveWindow => outputter.type_to_active_window(text).await,
    }
}

fn or_none(name: &str) -> &str {
    if name.is_empty() {
        "none"
    } else {
        name
    }
}
