//! Error types for typeout
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.

use thiserror::Error;

/// Top-level error type for the typeout application
#[derive(Error, Debug)]
pub enum TypeoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to text output
///
/// Every variant is returned to the caller. The only automatic retry is the
/// wtype -> ydotool fallback, whose combined failure is `FallbackFailed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    #[error("{0} not found in PATH. Install it via your package manager.")]
    ToolNotFound(String),

    #[error("{0} is not in the allowed command list.\n  Add it to [security] allowed_commands in your config.")]
    ToolNotAllowed(String),

    #[error("Unsupported tool: '{0}'")]
    UnsupportedTool(String),

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("{tool} failed: {detail}{}", format_output(.output))]
    ExecutionFailed {
        tool: String,
        detail: String,
        output: String,
    },

    #[error("{0} cannot type non-ASCII text on Wayland. Use clipboard mode instead.")]
    EncodingUnsupported(String),

    #[error("{tool} timed out after {timeout_ms} ms")]
    Timeout { tool: String, timeout_ms: u64 },

    #[error("{primary}; fallback also failed: {fallback}")]
    FallbackFailed {
        primary: Box<OutputError>,
        fallback: Box<OutputError>,
    },
}

fn format_output(output: &str) -> String {
    let output = output.trim();
    if output.is_empty() {
        String::new()
    } else {
        format!(" (output: {})", output)
    }
}

/// Message used when a clipboard-only outputter is asked to type
pub const TYPE_NOT_SUPPORTED: &str = "typing is not supported by a clipboard outputter";

/// Message used when a type-only outputter is asked to copy
pub const CLIPBOARD_NOT_SUPPORTED: &str = "clipboard is not supported by a type outputter";

/// Result type alias using TypeoutError
pub type Result<T> = std::result::Result<T, TypeoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_failed_includes_output() {
        let err = OutputError::ExecutionFailed {
            tool: "xsel".to_string(),
            detail: "exit status: 1".to_string(),
            output: "Can't open display\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "xsel failed: exit status: 1 (output: Can't open display)"
        );
    }

    #[test]
    fn test_execution_failed_without_output() {
        let err = OutputError::ExecutionFailed {
            tool: "wtype".to_string(),
            detail: "exit status: 1".to_string(),
            output: String::new(),
        };
        assert_eq!(err.to_string(), "wtype failed: exit status: 1");
    }

    #[test]
    fn test_fallback_failed_describes_both() {
        let err = OutputError::FallbackFailed {
            primary: Box::new(OutputError::ExecutionFailed {
                tool: "wtype".to_string(),
                detail: "exit status: 1".to_string(),
                output: String::new(),
            }),
            fallback: Box::new(OutputError::ToolNotFound("ydotool".to_string())),
        };
        let msg = err.to_string();
        assert!(msg.contains("wtype failed"));
        assert!(msg.contains("ydotool not found"));
    }
}
