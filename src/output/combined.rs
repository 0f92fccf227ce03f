//! Clipboard + keystroke outputter
//!
//! Owns one outputter of each kind and forwards each operation to the
//! matching one.

use super::{ClipboardOutputter, OutputContext, Outputter, TypeOutputter};
use crate::env::DisplayServer;
use crate::error::OutputError;

pub struct CombinedOutputter {
    clipboard: ClipboardOutputter,
    typer: TypeOutputter,
}

impl CombinedOutputter {
    /// Build both halves; fails if either tool does not resolve
    pub fn new(
        clipboard_tool: &str,
        type_tool: &str,
        display_server: DisplayServer,
        ctx: &OutputContext,
    ) -> Result<Self, OutputError> {
        Ok(Self {
            clipboard: ClipboardOutputter::new(clipboard_tool, ctx)?,
            typer: TypeOutputter::new(type_tool, display_server, ctx)?,
        })
    }
}

#[async_trait::async_trait]
impl Outputter for CombinedOutputter {
    async fn copy_to_clipboard(&self, text: &str) -> Result<(), OutputError> {
        self.clipboard.copy_to_clipboard(text).await
    }

    async fn type_to_active_window(&self, text: &str) -> Result<(), OutputError> {
        self.typer.type_to_active_window(text).await
    }

    fn tool_names(&self) -> (&str, &str) {
        (self.clipboard.tool(), self.typer.tool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::resolve::testing::FakeBin;
    use crate::security::SecurityPolicy;

    fn context(bin: &FakeBin) -> OutputContext {
        OutputContext::new(SecurityPolicy::new(["xsel", "xdotool"]).into())
            .with_resolver(bin.resolver())
    }

    #[tokio::test]
    async fn test_delegates_to_matching_tool() {
        let bin = FakeBin::new();
        bin.recorder("xsel");
        bin.recorder("xdotool");
        let output =
            CombinedOutputter::new("xsel", "xdotool", DisplayServer::X11, &context(&bin)).unwrap();

        assert_eq!(output.tool_names(), ("xsel", "xdotool"));

        output.copy_to_clipboard("to clipboard").await.unwrap();
        assert_eq!(bin.read_log("xsel", "stdin").unwrap(), "to clipboard");
        assert!(bin.read_log("xdotool", "args").is_none());

        output.type_to_active_window("to window").await.unwrap();
        assert_eq!(
            bin.read_log("xdotool", "args").unwrap(),
            "type\n--clearmodifiers\n--\nto window\n"
        );
    }

    #[test]
    fn test_fails_if_either_half_missing() {
        let bin = FakeBin::new();
        bin.recorder("xsel");

        let err = CombinedOutputter::new("xsel", "xdotool", DisplayServer::X11, &context(&bin))
            .err()
            .unwrap();
        assert_eq!(err, OutputError::ToolNotFound("xdotool".to_string()));
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let bin = FakeBin::new();
        bin.recorder("wl-copy");
        bin.recorder("xdotool");
        let output =
            CombinedOutputter::new("wl-copy", "xdotool", DisplayServer::X11, &context(&bin))
                .unwrap();

        // wl-copy is not on this allowlist
        let err = output.copy_to_clipboard("hello").await.unwrap_err();
        assert_eq!(err, OutputError::ToolNotAllowed("wl-copy".to_string()));
    }
}
