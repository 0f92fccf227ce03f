//! Command allowlist and argument sanitization
//!
//! Every outputter asks the policy whether its tool may run and passes its
//! argument vector through [`sanitize_arguments`] before each spawn. An
//! empty allowlist permits nothing.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

/// Set of executable names that may be spawned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityPolicy {
    allowed_commands: BTreeSet<String>,
}

impl SecurityPolicy {
    /// Build a policy from a list of command names
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_commands: allowed
                .into_iter()
                .map(Into::into)
                .map(|name: String| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }

    /// True iff `name` is on the allowlist
    pub fn is_command_allowed(&self, name: &str) -> bool {
        self.allowed_commands.contains(name)
    }

    pub fn allowed_commands(&self) -> impl Iterator<Item = &str> {
        self.allowed_commands.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_commands.is_empty()
    }
}

/// Shared, reloadable handle to the active policy
///
/// Outputters read through the handle on every invocation, so a reload takes
/// effect for instances that were constructed earlier.
#[derive(Debug, Clone, Default)]
pub struct PolicyHandle {
    inner: Arc<RwLock<SecurityPolicy>>,
}

impl PolicyHandle {
    pub fn new(policy: SecurityPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(policy)),
        }
    }

    /// Check a command against the current policy
    pub fn is_command_allowed(&self, name: &str) -> bool {
        match self.inner.read() {
            Ok(policy) => policy.is_command_allowed(name),
            // A writer panicked mid-reload; deny rather than trust the state
            Err(_) => false,
        }
    }

    /// Replace the active policy
    pub fn reload(&self, policy: SecurityPolicy) {
        match self.inner.write() {
            Ok(mut guard) => *guard = policy,
            Err(poisoned) => *poisoned.into_inner() = policy,
        }
        tracing::debug!("Security policy reloaded");
    }
}

impl From<SecurityPolicy> for PolicyHandle {
    fn from(policy: SecurityPolicy) -> Self {
        Self::new(policy)
    }
}

/// Sanitize an argument vector before spawning
///
/// The argument count is preserved. Control bytes are removed except tab and
/// newline, which are legitimate in dictated text. Printable Unicode and
/// shell metacharacters are kept as-is: arguments are never joined into a
/// shell string, so they reach the tool literally.
pub fn sanitize_arguments<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter().map(|arg| sanitize_text(arg.as_ref())).collect()
}

/// Strip control characters from a single argument or stdin payload
pub fn sanitize_text(text: &str) -> String {
    text.chars().filter(|c| !is_stripped_control(*c)).collect()
}

fn is_stripped_control(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t'
}
