//! Environment and tool status report
//!
//! Backs `typeout status`: what session we are in, which tools the selector
//! would pick, and whether each known tool is installed and allowed.

use crate::config::OutputConfig;
use crate::env::{self, DisplayServer, Environment};
use crate::output::select::{select_clipboard_tool, select_type_tool};
use crate::output::{OutputContext, KNOWN_TOOLS};
use std::path::PathBuf;

/// One known tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: &'static str,
    pub path: Option<PathBuf>,
    pub allowed: bool,
}

impl ToolStatus {
    pub fn usable(&self) -> bool {
        self.path.is_some() && self.allowed
    }
}

/// Complete status report
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub environment: Environment,
    pub tray_watcher: bool,
    pub clipboard_tool: String,
    pub type_tool: String,
    pub tools: Vec<ToolStatus>,
}

impl StatusReport {
    pub fn tool(&self, name: &str) -> Option<&ToolStatus> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// Build the report without probing the session bus
pub fn collect(env: &Environment, config: &OutputConfig, ctx: &OutputContext) -> StatusReport {
    let tools = KNOWN_TOOLS
        .iter()
        .map(|&name| ToolStatus {
            name,
            path: ctx.resolver.resolve(name),
            allowed: ctx.policy.is_command_allowed(name),
        })
        .collect();

    StatusReport {
        environment: env.clone(),
        tray_watcher: false,
        clipboard_tool: select_clipboard_tool(env, config),
        type_tool: select_type_tool(env, config, |tool| ctx.resolver.is_available(tool)),
        tools,
    }
}

/// Build the full report, including the advisory tray watcher probe
pub async fn detect(env: &Environment, config: &OutputConfig, ctx: &OutputContext) -> StatusReport {
    let mut report = collect(env, config, ctx);
    report.tray_watcher =
        env::has_tray_watcher_with(&ctx.resolver, env::TRAY_PROBE_TIMEOUT).await;
    report
}

/// Print status report
pub fn print_status(report: &StatusReport) {
    let env = &report.environment;
    let ds_info = match env.display_server {
        DisplayServer::Wayland => {
            let display = std::env::var("WAYLAND_DISPLAY").unwrap_or_default();
            format!("Wayland (WAYLAND_DISPLAY={})", display)
        }
        DisplayServer::X11 => {
            let display = std::env::var("DISPLAY").unwrap_or_default();
            format!("X11 (DISPLAY={})", display)
        }
        DisplayServer::Unknown => "Unknown (no WAYLAND_DISPLAY or DISPLAY set)".to_string(),
    };

    println!("\nEnvironment:");
    println!("  Display server:  {}", ds_info);
    println!("  Desktop:         {}", env.desktop);
    if env.is_gnome_with_wayland() {
        println!("  \x1b[34mℹ\x1b[0m GNOME on Wayland: ydotool preferred over wtype");
    }
    println!(
        "  Tray watcher:    {}",
        if report.tray_watcher { "present" } else { "not found" }
    );

    println!("\nTools:");
    for tool in &report.tools {
        print_tool_status(tool);
    }

    println!();
    print_selection("Clipboard", &report.clipboard_tool, report.tool(&report.clipboard_tool));
    print_selection("Type", &report.type_tool, report.tool(&report.type_tool));
}

fn print_tool_status(tool: &ToolStatus) {
    let label = format!("{}:", tool.name);
    match (&tool.path, tool.allowed) {
        (Some(path), true) => {
            println!("  {:<16} \x1b[32m✓\x1b[0m installed ({})", label, path.display())
        }
        (Some(path), false) => println!(
            "  {:<16} \x1b[33m⚠\x1b[0m installed ({}), not in allowed_commands",
            label,
            path.display()
        ),
        (None, _) => println!("  {:<16} \x1b[31m✗\x1b[0m not installed", label),
    }
}

fn print_selection(what: &str, name: &str, status: Option<&ToolStatus>) {
    match status {
        Some(status) if status.usable() => {
            println!("  \x1b[32m→\x1b[0m {} via {}", what, name)
        }
        Some(status) if status.path.is_some() => {
            println!("  \x1b[33m→\x1b[0m {} via {} (not allowed)", what, name)
        }
        Some(_) => println!("  \x1b[31m→\x1b[0m {} via {} (not installed)", what, name),
        None => println!("  \x1b[33m→\x1b[0m {} via {} (unsupported tool)", what, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::resolve::testing::FakeBin;
    use crate::security::SecurityPolicy;

    #[test]
    fn test_collect_reports_install_and_policy() {
        let bin = FakeBin::new();
        bin.recorder("wl-copy");
        bin.recorder("wtype");
        let ctx = OutputContext::new(SecurityPolicy::new(["wl-copy"]).into())
            .with_resolver(bin.resolver());
        let env = Environment {
            display_server: DisplayServer::Wayland,
            desktop: "sway".to_string(),
        };

        let report = collect(&env, &OutputConfig::default(), &ctx);

        assert_eq!(report.clipboard_tool, "wl-copy");
        assert_eq!(report.type_tool, "wtype");
        assert!(report.tool("wl-copy").unwrap().usable());

        let wtype = report.tool("wtype").unwrap();
        assert!(wtype.path.is_some());
        assert!(!wtype.allowed);

        assert!(report.tool("xsel").unwrap().path.is_none());
        assert_eq!(report.tools.len(), KNOWN_TOOLS.len());
    }

    #[tokio::test]
    async fn test_detect_probes_tray_on_same_search_path() {
        let bin = FakeBin::new();
        bin.script("dbus-send", "echo '   boolean true'");
        let ctx = OutputContext::new(SecurityPolicy::default().into())
            .with_resolver(bin.resolver());
        let env = Environment {
            display_server: DisplayServer::X11,
            desktop: "KDE".to_string(),
        };

        let report = detect(&env, &OutputConfig::default(), &ctx).await;
        assert!(report.tray_watcher);
        assert_eq!(report.type_tool, "xdotool");
        assert!(!collect(&env, &OutputConfig::default(), &ctx).tray_watcher);
    }
}
