//! shorthand-vm: the label-substitution virtual machine behind `shorthand`
//!
//! This crate holds everything needed to evaluate shorthand text with no CLI
//! dependencies:
//! - `SourceMap` assignment records and the `SymbolTable`
//! - `OperatorKind` and the token `OperatorRegistry` (glyph and keyword spellings)
//! - the line parser
//! - operator handlers, including markdown rendering and shell capture
//! - `VirtualMachine`: eval, expand and the run loop
//!
//! ```rust,no_run
//! use shorthand_vm::VirtualMachine;
//!
//! let mut vm = VirtualMachine::new();
//! vm.eval("{{name}} :=: World", 1).unwrap();
//! assert_eq!(vm.expand("Hello {{name}}"), "Hello World");
//! ```

pub mod config;
pub mod error;
mod handlers;
pub mod markdown;
pub mod operators;
pub mod parser;
pub mod shell;
pub mod source_map;
pub mod symbols;
pub mod vm;

pub use config::VmConfig;
pub use error::{Result, ShellFailure, ShorthandError};
pub use operators::{OperatorKind, OperatorRegistry, OperatorSpec};
pub use source_map::{SourceMap, MISSING_LINE};
pub use symbols::SymbolTable;
pub use vm::{is_terminator, Halt, VirtualMachine, IGNORE_LABEL, TERMINATORS};

/// Library and CLI version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
