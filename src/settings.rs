//! Command line settings and their translation into a `VmConfig`.

use std::time::Duration;

use shorthand_vm::config::{DEFAULT_MAX_IMPORT_DEPTH, DEFAULT_SHELL};
use shorthand_vm::VmConfig;
use thiserror::Error;

pub const DEFAULT_PROMPT: &str = "=> ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Shell program must not be empty")]
    EmptyShell,

    #[error("Shell timeout must be at least one second")]
    ZeroTimeout,

    #[error("Import depth must be at least 1")]
    ZeroImportDepth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prompt: String,
    pub no_prompt: bool,
    pub shell: String,
    pub shell_timeout_secs: Option<u64>,
    pub max_import_depth: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            no_prompt: false,
            shell: DEFAULT_SHELL.to_string(),
            shell_timeout_secs: None,
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.shell.trim().is_empty() {
            return Err(SettingsError::EmptyShell);
        }
        if self.shell_timeout_secs == Some(0) {
            return Err(SettingsError::ZeroTimeout);
        }
        if self.max_import_depth == 0 {
            return Err(SettingsError::ZeroImportDepth);
        }
        Ok(())
    }

    /// The prompt is only shown to a person at a terminal.
    pub fn effective_prompt(&self, interactive: bool) -> &str {
        if self.no_prompt || !interactive {
            ""
        } else {
            &self.prompt
        }
    }

    pub fn vm_config(&self, interactive: bool) -> VmConfig {
        VmConfig::default()
            .with_prompt(self.effective_prompt(interactive))
            .with_shell(self.shell.clone())
            .with_shell_timeout(self.shell_timeout_secs.map(Duration::from_secs))
            .with_max_import_depth(self.max_import_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.validate(), Ok(()));
        let config = settings.vm_config(true);
        assert_eq!(config.prompt, "=> ");
        assert_eq!(config.shell, "bash");
        assert_eq!(config.shell_timeout, None);
    }

    #[test]
    fn prompt_is_suppressed() {
        let settings = Settings {
            no_prompt: true,
            ..Settings::default()
        };
        assert_eq!(settings.effective_prompt(true), "");
        assert_eq!(Settings::default().effective_prompt(false), "");
    }

    #[test]
    fn timeout_converts_to_seconds() {
        let settings = Settings {
            shell_timeout_secs: Some(3),
            ..Settings::default()
        };
        assert_eq!(
            settings.vm_config(false).shell_timeout,
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn rejects_nonsense() {
        let bad_shell = Settings {
            shell: "  ".to_string(),
            ..Settings::default()
        };
        assert_eq!(bad_shell.validate(), Err(SettingsError::EmptyShell));

        let bad_timeout = Settings {
            shell_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(bad_timeout.validate(), Err(SettingsError::ZeroTimeout));

        let bad_depth = Settings {
            max_import_depth: 0,
            ..Settings::default()
        };
        assert_eq!(bad_depth.validate(), Err(SettingsError::ZeroImportDepth));
    }
}
