//! Tool selection
//!
//! Picks the clipboard and typing executables for the detected environment.
//! An explicit tool in the config always wins. Otherwise typing tools come
//! from a per-environment priority table, evaluated top-down with an
//! availability probe; the table's default is returned when nothing probes,
//! so the caller always gets a candidate.
//!
//! | Environment    | Priority                    | Default   |
//! |----------------|-----------------------------|-----------|
//! | X11            | xdotool                     | xdotool   |
//! | GNOME Wayland  | ydotool, wtype, xdotool     | xdotool   |
//! | Wayland        | wtype, ydotool, xdotool     | xdotool   |
//! | Unknown        | xdotool, wtype, ydotool     | xdotool   |
//!
//! GNOME's compositor lacks the virtual-keyboard protocol wtype relies on,
//! hence ydotool (uinput) first there. xdotool on Wayland only reaches
//! XWayland windows.

use super::{WL_COPY, WTYPE, XDOTOOL, XSEL, YDOTOOL};
use crate::config::{is_auto, OutputConfig};
use crate::env::{DisplayServer, Environment};

/// Ordered candidates plus the name returned when none is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolChain {
    pub priority: &'static [&'static str],
    pub default: &'static str,
}

pub const X11_TYPE_CHAIN: ToolChain = ToolChain {
    priority: &[XDOTOOL],
    default: XDOTOOL,
};

pub const GNOME_WAYLAND_TYPE_CHAIN: ToolChain = ToolChain {
    priority: &[YDOTOOL, WTYPE, XDOTOOL],
    default: XDOTOOL,
};

pub const WAYLAND_TYPE_CHAIN: ToolChain = ToolChain {
    priority: &[WTYPE, YDOTOOL, XDOTOOL],
    default: XDOTOOL,
};

pub const UNKNOWN_TYPE_CHAIN: ToolChain = ToolChain {
    priority: &[XDOTOOL, WTYPE, YDOTOOL],
    default: XDOTOOL,
};

impl ToolChain {
    /// First candidate the probe accepts, else the default
    pub fn pick<F>(&self, probe: F) -> &'static str
    where
        F: Fn(&str) -> bool,
    {
        self.priority
            .iter()
            .copied()
            .find(|tool| probe(*tool))
            .unwrap_or(self.default)
    }
}

/// Clipboard tool used when the config says "auto"
pub fn default_clipboard_tool(display_server: DisplayServer) -> &'static str {
    match display_server {
        DisplayServer::Wayland => WL_COPY,
        DisplayServer::X11 | DisplayServer::Unknown => XSEL,
    }
}

/// Typing priority table for an environment
pub fn type_chain_for(env: &Environment) -> ToolChain {
    match env.display_server {
        DisplayServer::X11 => X11_TYPE_CHAIN,
        DisplayServer::Wayland if env.is_gnome_with_wayland() => GNOME_WAYLAND_TYPE_CHAIN,
        DisplayServer::Wayland => WAYLAND_TYPE_CHAIN,
        DisplayServer::Unknown => UNKNOWN_TYPE_CHAIN,
    }
}

/// Resolve the clipboard tool name
pub fn select_clipboard_tool(env: &Environment, config: &OutputConfig) -> String {
    if !is_auto(&config.clipboard_tool) {
        return config.clipboard_tool.trim().to_string();
    }

    let tool = default_clipboard_tool(env.display_server);
    tracing::debug!("Selected clipboard tool {} for {}", tool, env.display_server);
    tool.to_string()
}

/// Resolve the typing tool name, probing availability with `probe`
pub fn select_type_tool<F>(env: &Environment, config: &OutputConfig, probe: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !is_auto(&config.type_tool) {
        return config.type_tool.trim().to_string();
    }

    let chain = type_chain_for(env);
    let tool = chain.pick(probe);
    tracing::debug!(
        "Selected type tool {} for {} ({})",
        tool,
        env.display_server,
        env.desktop
    );
    tool.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(display_server: DisplayServer, desktop: &str) -> Environment {
        Environment {
            display_server,
            desktop: desktop.to_string(),
        }
    }

    fn only<'a>(available: &'a [&'a str]) -> impl Fn(&str) -> bool + 'a {
        move |tool: &str| available.iter().any(|a| *a == tool)
    }

    fn auto() -> OutputConfig {
        OutputConfig::default()
    }

    #[test]
    fn test_clipboard_defaults() {
        let config = auto();
        assert_eq!(select_clipboard_tool(&env(DisplayServer::Wayland, "KDE"), &config), "wl-copy");
        assert_eq!(select_clipboard_tool(&env(DisplayServer::X11, "KDE"), &config), "xsel");
        assert_eq!(select_clipboard_tool(&env(DisplayServer::Unknown, "Unknown"), &config), "xsel");
    }

    #[test]
    fn test_clipboard_override_wins_everywhere() {
        let config = OutputConfig {
            clipboard_tool: "xclip".to_string(),
            ..OutputConfig::default()
        };
        for ds in [DisplayServer::Wayland, DisplayServer::X11, DisplayServer::Unknown] {
            assert_eq!(select_clipboard_tool(&env(ds, "GNOME"), &config), "xclip");
        }
    }

    #[test]
    fn test_type_override_wins_without_probing() {
        let config = OutputConfig {
            type_tool: "wtype".to_string(),
            ..OutputConfig::default()
        };
        let probe = |_: &str| -> bool { panic!("override must not probe") };
        assert_eq!(select_type_tool(&env(DisplayServer::X11, "i3"), &config, probe), "wtype");
    }

    #[test]
    fn test_padded_override_is_trimmed() {
        let config = OutputConfig {
            clipboard_tool: " xsel ".to_string(),
            type_tool: "\twtype ".to_string(),
            ..OutputConfig::default()
        };
        let e = env(DisplayServer::X11, "i3");
        assert_eq!(select_clipboard_tool(&e, &config), "xsel");
        assert_eq!(select_type_tool(&e, &config, |_: &str| false), "wtype");
    }

    #[test]
    fn test_x11_always_xdotool() {
        let e = env(DisplayServer::X11, "XFCE");
        assert_eq!(select_type_tool(&e, &auto(), only(&["wtype", "ydotool"])), "xdotool");
        assert_eq!(select_type_tool(&e, &auto(), only(&[])), "xdotool");
    }

    #[test]
    fn test_gnome_wayland_chain() {
        let e = env(DisplayServer::Wayland, "ubuntu:GNOME");
        assert_eq!(select_type_tool(&e, &auto(), only(&["ydotool"])), "ydotool");
        assert_eq!(select_type_tool(&e, &auto(), only(&["wtype"])), "wtype");
        assert_eq!(select_type_tool(&e, &auto(), only(&[])), "xdotool");
        assert_eq!(
            select_type_tool(&e, &auto(), only(&["wtype", "ydotool", "xdotool"])),
            "ydotool"
        );
    }

    #[test]
    fn test_other_wayland_prefers_wtype() {
        let e = env(DisplayServer::Wayland, "Hyprland");
        assert_eq!(
            select_type_tool(&e, &auto(), only(&["wtype", "ydotool"])),
            "wtype"
        );
        assert_eq!(select_type_tool(&e, &auto(), only(&["ydotool"])), "ydotool");
        assert_eq!(select_type_tool(&e, &auto(), only(&["xdotool"])), "xdotool");
        assert_eq!(select_type_tool(&e, &auto(), only(&[])), "xdotool");
    }

    #[test]
    fn test_unknown_chain() {
        let e = env(DisplayServer::Unknown, "Unknown");
        assert_eq!(select_type_tool(&e, &auto(), only(&["ydotool", "wtype"])), "wtype");
        assert_eq!(select_type_tool(&e, &auto(), only(&["ydotool"])), "ydotool");
        assert_eq!(select_type_tool(&e, &auto(), only(&[])), "xdotool");
    }

    #[test]
    fn test_gnome_on_x11_uses_x11_chain() {
        let e = env(DisplayServer::X11, "GNOME");
        assert_eq!(type_chain_for(&e), X11_TYPE_CHAIN);
    }
}
