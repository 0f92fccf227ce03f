//! Executable resolution on the search path
//!
//! Used both as the selector's availability probe and by outputter
//! constructors, which refuse tools that do not resolve.

use crate::error::OutputError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolves tool names to executables
#[derive(Debug, Clone, Default)]
pub struct ToolResolver {
    /// Overrides `PATH` when set
    search_path: Option<OsString>,
}

/// A tool name together with the executable it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTool {
    pub name: String,
    pub path: PathBuf,
}

impl ToolResolver {
    /// Resolve against the process `PATH`
    pub fn system() -> Self {
        Self::default()
    }

    /// Resolve against an explicit search path (colon separated)
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(path.into()),
        }
    }

    /// Full path of `name`, if it resolves
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let found = match &self.search_path {
            None => which::which(name),
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(name, Some(paths), cwd)
            }
        };

        match found {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::trace!("{} did not resolve: {}", name, e);
                None
            }
        }
    }

    /// Best-effort availability hint
    pub fn is_available(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Resolve `name` or fail with `ToolNotFound`
    ///
    /// The bound name is trimmed, so policy and template lookups see the
    /// same name the search path did.
    pub fn bind(&self, name: &str) -> Result<BoundTool, OutputError> {
        let name = name.trim();
        let path = self
            .resolve(name)
            .ok_or_else(|| OutputError::ToolNotFound(name.to_string()))?;
        tracing::debug!("Resolved {} to {}", name, path.display());
        Ok(BoundTool {
            name: name.to_string(),
            path,
        })
    }
}

impl BoundTool {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake tool scripts on a private search path

    use super::ToolResolver;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub struct FakeBin {
        pub dir: TempDir,
    }

    impl FakeBin {
        pub fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
            }
        }

        /// Install an executable shell script named `name`
        pub fn script(&self, name: &str, body: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        /// Script that records its arguments (one per line) and stdin
        pub fn recorder(&self, name: &str) -> PathBuf {
            let args = self.log_path(name, "args");
            let stdin = self.log_path(name, "stdin");
            self.script(
                name,
                &format!(
                    "for a in \"$@\"; do printf '%s\\n' \"$a\" >> '{}'; done\ncat > '{}'",
                    args.display(),
                    stdin.display()
                ),
            )
        }

        /// Script that prints to stderr and exits 1
        pub fn failing(&self, name: &str) -> PathBuf {
            self.script(name, &format!("echo '{} exploded' >&2\nexit 1", name))
        }

        pub fn log_path(&self, name: &str, kind: &str) -> PathBuf {
            self.dir.path().join(format!("{}.{}", name, kind))
        }

        pub fn read_log(&self, name: &str, kind: &str) -> Option<String> {
            std::fs::read_to_string(self.log_path(name, kind)).ok()
        }

        pub fn resolver(&self) -> ToolResolver {
            ToolResolver::with_search_path(self.dir.path().as_os_str())
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }
    }
}
