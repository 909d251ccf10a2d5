//! Operator kinds and the token registry.
//!
//! Every kind has a legacy glyph token and a readable keyword token. Tokens
//! carry their own delimiter spacing (`" :X: "`) so that no token is a
//! substring of another.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, ShorthandError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    AssignString,
    AssignInclude,
    ImportAssignments,
    AssignExpansion,
    AssignExpandExpansion,
    IncludeExpansion,
    AssignShell,
    AssignExpandShell,
    AssignMarkdown,
    AssignExpandMarkdown,
    IncludeMarkdown,
    IncludeExpandMarkdown,
    ExportExpansion,
    ExportAllExpansions,
    ExportAssignment,
    ExportAllAssignments,
    Exit,
}

impl OperatorKind {
    /// All kinds in registration order.
    pub const ALL: [OperatorKind; 17] = [
        OperatorKind::AssignString,
        OperatorKind::AssignInclude,
        OperatorKind::ImportAssignments,
        OperatorKind::AssignExpansion,
        OperatorKind::AssignExpandExpansion,
        OperatorKind::IncludeExpansion,
        OperatorKind::AssignShell,
        OperatorKind::AssignExpandShell,
        OperatorKind::AssignMarkdown,
        OperatorKind::AssignExpandMarkdown,
        OperatorKind::IncludeMarkdown,
        OperatorKind::IncludeExpandMarkdown,
        OperatorKind::ExportExpansion,
        OperatorKind::ExportAllExpansions,
        OperatorKind::ExportAssignment,
        OperatorKind::ExportAllAssignments,
        OperatorKind::Exit,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            OperatorKind::AssignString => " :=: ",
            OperatorKind::AssignInclude => " :=<: ",
            OperatorKind::ImportAssignments => " :}<: ",
            OperatorKind::AssignExpansion => " :{: ",
            OperatorKind::AssignExpandExpansion => " :{{: ",
            OperatorKind::IncludeExpansion => " :{<: ",
            OperatorKind::AssignShell => " :!: ",
            OperatorKind::AssignExpandShell => " :{!: ",
            OperatorKind::AssignMarkdown => " :[: ",
            OperatorKind::AssignExpandMarkdown => " :{[: ",
            OperatorKind::IncludeMarkdown => " :[<: ",
            OperatorKind::IncludeExpandMarkdown => " :{[<: ",
            OperatorKind::ExportExpansion => " :>: ",
            OperatorKind::ExportAllExpansions => " :@>: ",
            OperatorKind::ExportAssignment => " :}>: ",
            OperatorKind::ExportAllAssignments => " :@}>: ",
            OperatorKind::Exit => " :exit: ",
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            OperatorKind::AssignString => " :set: ",
            OperatorKind::AssignInclude => " :import-text: ",
            OperatorKind::ImportAssignments => " :import-shorthand: ",
            OperatorKind::AssignExpansion => " :expand: ",
            OperatorKind::AssignExpandExpansion => " :expand-expansion: ",
            OperatorKind::IncludeExpansion => " :import-expansion: ",
            OperatorKind::AssignShell => " :bash: ",
            OperatorKind::AssignExpandShell => " :expand-bash: ",
            OperatorKind::AssignMarkdown => " :markdown: ",
            OperatorKind::AssignExpandMarkdown => " :expand-markdown: ",
            OperatorKind::IncludeMarkdown => " :import-markdown: ",
            OperatorKind::IncludeExpandMarkdown => " :import-expanded-markdown: ",
            OperatorKind::ExportExpansion => " :export-expansion: ",
            OperatorKind::ExportAllExpansions => " :export-all-expansions: ",
            OperatorKind::ExportAssignment => " :export-assignment: ",
            OperatorKind::ExportAllAssignments => " :export-all-assignments: ",
            OperatorKind::Exit => " :quit: ",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            OperatorKind::AssignString => "Assign a string to a label",
            OperatorKind::AssignInclude => "Assign the contents of a file to a label",
            OperatorKind::ImportAssignments => "Import and evaluate assignments from a file",
            OperatorKind::AssignExpansion => "Assign the expansion of a string",
            OperatorKind::AssignExpandExpansion => "Expand a string twice and assign it",
            OperatorKind::IncludeExpansion => "Read a file, expand it and assign it",
            OperatorKind::AssignShell => "Assign the output of a shell command",
            OperatorKind::AssignExpandShell => {
                "Expand a shell command, run it and assign the output"
            }
            OperatorKind::AssignMarkdown => "Render markdown and assign the HTML",
            OperatorKind::AssignExpandMarkdown => "Expand, render markdown and assign the HTML",
            OperatorKind::IncludeMarkdown => "Render a markdown file and assign the HTML",
            OperatorKind::IncludeExpandMarkdown => "Read, expand and render a markdown file",
            OperatorKind::ExportExpansion => "Write a label's value to a file",
            OperatorKind::ExportAllExpansions => "Write every label's value to a file",
            OperatorKind::ExportAssignment => "Write a label's assignment statement to a file",
            OperatorKind::ExportAllAssignments => "Write every assignment statement to a file",
            OperatorKind::Exit => "Stop processing, optionally with an error message",
        }
    }

    /// Whether a successful evaluation binds the record's label.
    pub fn commits(self) -> bool {
        !matches!(
            self,
            OperatorKind::ImportAssignments
                | OperatorKind::ExportExpansion
                | OperatorKind::ExportAllExpansions
                | OperatorKind::ExportAssignment
                | OperatorKind::ExportAllAssignments
                | OperatorKind::Exit
        )
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph().trim())
    }
}

/// A registered token.
#[derive(Debug, Clone)]
pub struct OperatorSpec {
    pub token: String,
    pub kind: OperatorKind,
    pub help: String,
}

/// Token to operator mapping, in registration order.
#[derive(Debug, Clone, Default)]
pub struct OperatorRegistry {
    specs: Vec<OperatorSpec>,
    by_token: HashMap<String, usize>,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with both spellings of every built-in operator, glyphs first.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let tokens = OperatorKind::ALL
            .iter()
            .map(|&kind| (kind.glyph(), kind))
            .chain(OperatorKind::ALL.iter().map(|&kind| (kind.keyword(), kind)));
        for (token, kind) in tokens {
            // Built-in tokens are distinct by construction.
            if let Err(err) = registry.register(token, kind, kind.help()) {
                tracing::error!("{}", err);
            }
        }
        registry
    }

    pub fn register(
        &mut self,
        token: impl Into<String>,
        kind: OperatorKind,
        help: impl Into<String>,
    ) -> Result<()> {
        let token = token.into();
        if self.by_token.contains_key(&token) {
            return Err(ShorthandError::DuplicateOperator { token });
        }
        self.by_token.insert(token.clone(), self.specs.len());
        self.specs.push(OperatorSpec {
            token,
            kind,
            help: help.into(),
        });
        Ok(())
    }

    pub fn lookup(&self, token: &str) -> Option<&OperatorSpec> {
        self.by_token.get(token).map(|&i| &self.specs[i])
    }

    pub fn kind_of(&self, token: &str) -> Option<OperatorKind> {
        self.lookup(token).map(|spec| spec.kind)
    }

    /// Registered tokens in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.token.as_str())
    }

    pub fn specs(&self) -> &[OperatorSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registers_both_spellings() {
        let registry = OperatorRegistry::builtin();
        assert_eq!(registry.len(), OperatorKind::ALL.len() * 2);
        for kind in OperatorKind::ALL {
            assert_eq!(registry.kind_of(kind.glyph()), Some(kind));
            assert_eq!(registry.kind_of(kind.keyword()), Some(kind));
        }
    }

    #[test]
    fn duplicate_token_is_rejected() {
        let mut registry = OperatorRegistry::builtin();
        let err = registry
            .register(" :=: ", OperatorKind::AssignMarkdown, "shadow")
            .unwrap_err();
        assert!(matches!(err, ShorthandError::DuplicateOperator { ref token } if token == " :=: "));
        assert_eq!(registry.kind_of(" :=: "), Some(OperatorKind::AssignString));
    }

    #[test]
    fn no_token_contains_another() {
        let registry = OperatorRegistry::builtin();
        let tokens: Vec<&str> = registry.tokens().collect();
        for a in &tokens {
            for b in &tokens {
                if a != b {
                    assert!(!a.contains(b), "{:?} contains {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn glyphs_register_before_keywords() {
        let registry = OperatorRegistry::builtin();
        let first: Vec<&str> = registry.tokens().take(2).collect();
        assert_eq!(first, vec![" :=: ", " :=<: "]);
        assert_eq!(registry.specs()[17].token, " :set: ");
    }

    #[test]
    fn export_and_exit_do_not_commit() {
        assert!(OperatorKind::AssignString.commits());
        assert!(OperatorKind::IncludeExpandMarkdown.commits());
        assert!(!OperatorKind::ExportAllAssignments.commits());
        assert!(!OperatorKind::ImportAssignments.commits());
        assert!(!OperatorKind::Exit.commits());
    }
}
