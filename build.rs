//! Build script for typeout
//!
//! Renders man pages from the clap definitions in `src/cli.rs`: one page
//! for `typeout` and one per subcommand (`typeout-send.1`, ...).
//!
//! Pages are written on release builds or when `TYPEOUT_GEN_MANPAGES` is
//! set. `TYPEOUT_MAN_DIR` redirects them (packaging), otherwise they land in
//! `$OUT_DIR/man`.

use clap::CommandFactory;
use clap_mangen::Man;
use std::env;
use std::fs::{self, File};
use std::io::Error;
use std::path::{Path, PathBuf};

include!("src/cli.rs");

const GEN_VAR: &str = "TYPEOUT_GEN_MANPAGES";
const DIR_VAR: &str = "TYPEOUT_MAN_DIR";

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed={}", GEN_VAR);
    println!("cargo:rerun-if-env-changed={}", DIR_VAR);

    let release = env::var("PROFILE").map(|p| p == "release").unwrap_or(false);
    if !release && env::var_os(GEN_VAR).is_none() {
        return Ok(());
    }

    let man_dir = man_dir();
    fs::create_dir_all(&man_dir)?;

    let cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    render(&cmd, &man_dir, &bin)?;

    let mut pages = 1;
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        render(sub, &man_dir, &format!("{}-{}", bin, sub.get_name()))?;
        pages += 1;
    }

    println!(
        "cargo:warning={} man pages written to {}",
        pages,
        man_dir.display()
    );
    Ok(())
}

fn man_dir() -> PathBuf {
    if let Some(dir) = env::var_os(DIR_VAR) {
        return PathBuf::from(dir);
    }
    env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target"))
        .join("man")
}

/// Write `<page>.1` for `cmd`
fn render(cmd: &clap::Command, dir: &Path, page: &str) -> Result<(), Error> {
    let mut file = File::create(dir.join(format!("{}.1", page)))?;
    Man::new(cmd.clone()).render(&mut file)
}
