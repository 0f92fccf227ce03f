// Command-line interface definitions for typeout
//
// This module is separate so it can be used by both the binary (main.rs)
// and build.rs for generating man pages.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "typeout")]
#[command(author, version, about = "Deliver text via clipboard or simulated typing on Linux")]
#[command(long_about = "
typeout delivers text to the user on X11 or Wayland, either by copying it to
the clipboard or by typing it into the focused window. It picks the right
external tool for the session (wl-copy, xsel, wtype, ydotool, xdotool) and
only runs tools listed in [security] allowed_commands.

SETUP:
  1. Install wl-clipboard or xsel for clipboard output
  2. Install wtype (Wayland), ydotool (GNOME/any) or xdotool (X11) for typing
  3. Run: typeout config --init (writes a config with the default allowlist)
  4. Run: typeout status (to check which tools will be used)

USAGE:
  echo 'hello' | typeout send
  typeout copy 'hello'
  typeout type 'hello'
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Override clipboard tool (auto, wl-copy, xsel)
    #[arg(long, value_name = "TOOL")]
    pub clipboard_tool: Option<String>,

    /// Override typing tool (auto, wtype, ydotool, xdotool)
    #[arg(long, value_name = "TOOL")]
    pub type_tool: Option<String>,

    /// Kill the tool after this many milliseconds (0 = never)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deliver text using the configured default mode (default command)
    Send {
        /// Text to deliver (read from stdin when omitted)
        text: Option<String>,
    },

    /// Copy text to the clipboard
    Copy {
        /// Text to copy (read from stdin when omitted)
        text: Option<String>,
    },

    /// Type text into the focused window
    Type {
        /// Text to type (read from stdin when omitted)
        text: Option<String>,
    },

    /// Show the detected environment and which tools will be used
    Status {
        /// Skip the session bus query for a tray watcher
        #[arg(long)]
        no_tray: bool,
    },

    /// Show current configuration
    Config {
        /// Write the default config file if none exists
        #[arg(long)]
        init: bool,
    },
}
