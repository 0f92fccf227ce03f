//! typeout: platform-adaptive text output for Linux
//!
//! This library delivers recognized text to the user, either by copying it
//! to the clipboard or by simulating keystrokes in the focused window. It
//! provides:
//! - Detecting the display server (X11/Wayland) and desktop environment
//! - Selecting a tool per environment from data-driven priority tables
//! - Allowlisting executables and sanitizing their arguments
//! - Clipboard, keystroke and combined outputters, plus an in-memory mock
//!
//! # Architecture
//!
//! ```text
//!          ┌──────────────┐         ┌──────────────┐
//!          │ Environment  │         │    Config    │
//!          │  (env vars)  │         │   (TOML)     │
//!          └──────────────┘         └──────────────┘
//!                   │                        │
//!                   └───────────┬────────────┘
//!                               ▼
//!                      ┌──────────────┐
//!                      │Tool Selector │ probes PATH
//!                      └──────────────┘
//!                               │ tool names
//!                               ▼
//!          ┌─────────────────────────────────────────────┐
//!          │                 Outputter                   │
//!          │  clipboard │ keystroke │ combined │ mock    │
//!          └─────────────────────────────────────────────┘
//!                               │
//!                               ▼ allowlist + sanitize
//!                      ┌──────────────┐
//!                      │   wl-copy /  │
//!                      │ xsel / wtype │
//!                      │ydotool/xdotool│
//!                      └──────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod output;
pub mod security;
pub mod status;

pub use cli::{Cli, Commands};
pub use config::{Config, OutputConfig, OutputMode};
pub use env::{DisplayServer, Environment};
pub use error::{OutputError, Result, TypeoutError};
pub use output::{
    create_outputter, deliver, Capability, ClipboardOutputter, CombinedOutputter, MockOutputter,
    OutputContext, Outputter, TypeOutputter,
};
pub use security::{PolicyHandle, SecurityPolicy};
