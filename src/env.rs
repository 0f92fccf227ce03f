//! Display server and desktop environment detection
//!
//! The environment is captured once into an [`Environment`] snapshot and
//! passed down to the tool selector and outputters. Every detector has a
//! `*_from` variant taking a variable lookup so tests never touch the real
//! process environment.

use crate::output::ToolResolver;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Display server type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

impl std::fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayServer::Wayland => write!(f, "Wayland"),
            DisplayServer::X11 => write!(f, "X11"),
            DisplayServer::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Session bus names that advertise a StatusNotifier tray host
pub const TRAY_WATCHER_NAMES: &[&str] = &[
    "org.kde.StatusNotifierWatcher",
    "org.freedesktop.StatusNotifierWatcher",
    "org.ayatana.StatusNotifierWatcher",
];

/// Upper bound on each session bus query
pub const TRAY_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const DBUS_SEND: &str = "dbus-send";

/// Snapshot of the graphical session the process runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub display_server: DisplayServer,
    pub desktop: String,
}

impl Environment {
    /// Capture the current process environment
    pub fn detect() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Capture from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            display_server: detect_environment_from(&lookup),
            desktop: detect_desktop_environment_from(&lookup),
        }
    }

    /// True for a GNOME session running on Wayland
    pub fn is_gnome_with_wayland(&self) -> bool {
        self.display_server == DisplayServer::Wayland && is_gnome(&self.desktop)
    }
}

/// Detect the current display server
pub fn detect_environment() -> DisplayServer {
    detect_environment_from(|key| std::env::var(key).ok())
}

/// Detect the display server from a variable lookup
///
/// Wayland wins when both are set, since XWayland exports `DISPLAY` too.
pub fn detect_environment_from<F>(lookup: F) -> DisplayServer
where
    F: Fn(&str) -> Option<String>,
{
    let is_set = |key: &str| lookup(key).is_some_and(|v| !v.trim().is_empty());

    if is_set("WAYLAND_DISPLAY") {
        return DisplayServer::Wayland;
    }
    if is_set("DISPLAY") {
        return DisplayServer::X11;
    }
    DisplayServer::Unknown
}

/// Detect the desktop environment name
pub fn detect_desktop_environment() -> String {
    detect_desktop_environment_from(|key| std::env::var(key).ok())
}

/// Detect the desktop name from `XDG_CURRENT_DESKTOP`, then `DESKTOP_SESSION`
pub fn detect_desktop_environment_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION"]
        .iter()
        .filter_map(|&key| lookup(key))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// True when running GNOME on Wayland
pub fn is_gnome_with_wayland() -> bool {
    Environment::detect().is_gnome_with_wayland()
}

/// Matches GNOME, ubuntu:GNOME, GNOME-Classic, gnome-xorg and friends
fn is_gnome(desktop: &str) -> bool {
    desktop
        .split(':')
        .any(|part| part.to_ascii_lowercase().contains("gnome"))
}

/// Check whether a tray watcher owns its name on the session bus
///
/// Advisory only: any failure (no bus, no dbus-send, timeout) reads as false.
pub async fn has_tray_watcher() -> bool {
    has_tray_watcher_with(&ToolResolver::system(), TRAY_PROBE_TIMEOUT).await
}

/// [`has_tray_watcher`] with an explicit resolver and per-query timeout
pub async fn has_tray_watcher_with(resolver: &ToolResolver, timeout: Duration) -> bool {
    let dbus_send = match resolver.resolve(DBUS_SEND) {
        Some(path) => path,
        None => {
            tracing::debug!("{} not found, assuming no tray watcher", DBUS_SEND);
            return false;
        }
    };

    for name in TRAY_WATCHER_NAMES {
        if name_has_owner(&dbus_send, name, timeout).await {
            tracing::debug!("Tray watcher present: {}", name);
            return true;
        }
    }
    tracing::debug!("No tray watcher on the session bus");
    false
}

async fn name_has_owner(dbus_send: &Path, name: &str, timeout: Duration) -> bool {
    let query = Command::new(dbus_send)
        .args([
            "--session",
            "--print-reply",
            "--dest=org.freedesktop.DBus",
            "/org/freedesktop/DBus",
            "org.freedesktop.DBus.NameHasOwner",
            &format!("string:{}", name),
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(timeout, query).await {
        Ok(Ok(output)) if output.status.success() => {
            parse_name_has_owner_reply(&String::from_utf8_lossy(&output.stdout))
        }
        Ok(Ok(output)) => {
            tracing::trace!("Session bus query for {} failed: {}", name, output.status);
            false
        }
        Ok(Err(e)) => {
            tracing::trace!("dbus-send unavailable: {}", e);
            false
        }
        Err(_) => {
            tracing::trace!("Session bus query for {} timed out", name);
            false
        }
    }
}

/// Parse `dbus-send --print-reply` output for a boolean reply
fn parse_name_has_owner_reply(reply: &str) -> bool {
    reply
        .lines()
        .any(|line| line.trim() == "boolean true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::resolve::testing::FakeBin;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_wayland_takes_precedence() {
        let lookup = vars(&[("WAYLAND_DISPLAY", "wayland-0"), ("DISPLAY", ":0")]);
        assert_eq!(detect_environment_from(lookup), DisplayServer::Wayland);

        let lookup = vars(&[("WAYLAND_DISPLAY", "wayland-1")]);
        assert_eq!(detect_environment_from(lookup), DisplayServer::Wayland);
    }

    #[test]
    fn test_x11_only() {
        let lookup = vars(&[("DISPLAY", ":1")]);
        assert_eq!(detect_environment_from(lookup), DisplayServer::X11);
    }

    #[test]
    fn test_nothing_set_is_unknown() {
        assert_eq!(detect_environment_from(vars(&[])), DisplayServer::Unknown);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let lookup = vars(&[("WAYLAND_DISPLAY", ""), ("DISPLAY", ":0")]);
        assert_eq!(detect_environment_from(lookup), DisplayServer::X11);
    }

    #[test]
    fn test_desktop_prefers_xdg_current_desktop() {
        let lookup = vars(&[("XDG_CURRENT_DESKTOP", "KDE"), ("DESKTOP_SESSION", "plasma")]);
        assert_eq!(detect_desktop_environment_from(lookup), "KDE");
    }

    #[test]
    fn test_desktop_falls_back_to_session() {
        let lookup = vars(&[("DESKTOP_SESSION", "gnome")]);
        assert_eq!(detect_desktop_environment_from(lookup), "gnome");
        assert_eq!(detect_desktop_environment_from(vars(&[])), "Unknown");
    }

    #[test]
    fn test_gnome_with_wayland() {
        let env = Environment::from_lookup(vars(&[
            ("WAYLAND_DISPLAY", "wayland-0"),
            ("XDG_CURRENT_DESKTOP", "ubuntu:GNOME"),
        ]));
        assert!(env.is_gnome_with_wayland());

        let env = Environment::from_lookup(vars(&[
            ("DISPLAY", ":0"),
            ("XDG_CURRENT_DESKTOP", "GNOME"),
        ]));
        assert!(!env.is_gnome_with_wayland());

        let env = Environment::from_lookup(vars(&[
            ("WAYLAND_DISPLAY", "wayland-0"),
            ("XDG_CURRENT_DESKTOP", "Hyprland"),
        ]));
        assert!(!env.is_gnome_with_wayland());
    }

    #[test]
    fn test_parse_name_has_owner_reply() {
        let reply = "method return time=1700000000.1 sender=org.freedesktop.DBus -> destination=:1.99 serial=3 reply_serial=2\n   boolean true\n";
        assert!(parse_name_has_owner_reply(reply));

        let reply = "method return time=1700000000.1 sender=org.freedesktop.DBus\n   boolean false\n";
        assert!(!parse_name_has_owner_reply(reply));
        assert!(!parse_name_has_owner_reply(""));
    }

    const SHORT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_tray_probe_without_dbus_send() {
        let bin = FakeBin::new();
        assert!(!has_tray_watcher_with(&bin.resolver(), SHORT).await);
    }

    #[tokio::test]
    async fn test_tray_probe_bus_error() {
        let bin = FakeBin::new();
        bin.script(
            "dbus-send",
            "echo 'Failed to open connection to \"session\" message bus' >&2\nexit 1",
        );
        assert!(!has_tray_watcher_with(&bin.resolver(), SHORT).await);
    }

    #[tokio::test]
    async fn test_tray_probe_timeout() {
        let bin = FakeBin::new();
        bin.script("dbus-send", "exec sleep 5");

        let started = std::time::Instant::now();
        assert!(!has_tray_watcher_with(&bin.resolver(), SHORT).await);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_tray_probe_owner_present() {
        let bin = FakeBin::new();
        bin.script(
            "dbus-send",
            "echo 'method return time=1 sender=org.freedesktop.DBus'\necho '   boolean true'",
        );
        assert!(has_tray_watcher_with(&bin.resolver(), SHORT).await);
    }

    #[tokio::test]
    async fn test_tray_probe_tries_each_watcher_name() {
        let bin = FakeBin::new();
        bin.script(
            "dbus-send",
            "case \"$6\" in\n  string:org.ayatana.StatusNotifierWatcher) echo '   boolean true' ;;\n  *) echo '   boolean false' ;;\nesac",
        );
        assert!(has_tray_watcher_with(&bin.resolver(), SHORT).await);
    }
}
