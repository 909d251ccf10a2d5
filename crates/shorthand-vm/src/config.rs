//! Virtual machine settings.

use std::time::Duration;

pub const DEFAULT_SHELL: &str = "bash";
pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Written before each line read by the run loop; empty disables it.
    pub prompt: String,
    /// Program invoked as `<shell> -c <command>`.
    pub shell: String,
    /// Kill shell commands that run longer than this. `None` waits forever.
    pub shell_timeout: Option<Duration>,
    pub max_import_depth: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            shell: DEFAULT_SHELL.to_string(),
            shell_timeout: None,
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }
}

impl VmConfig {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_shell_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.shell_timeout = timeout;
        self
    }

    pub fn with_max_import_depth(mut self, depth: usize) -> Self {
        self.max_import_depth = depth;
        self
    }
}
