//! shorthand - a label expansion pre-processor
//!
//! Lines of the form `LABEL OP SOURCE` bind a label to a value computed from
//! a string, a file, a shell command or markdown; every other line is echoed
//! with bound labels substituted. The evaluation engine lives in
//! `shorthand-vm` and is re-exported here; this crate adds the command line
//! settings and the interactive REPL.
//!
//! ```rust,no_run
//! use shorthand::VirtualMachine;
//!
//! let mut vm = VirtualMachine::new();
//! vm.eval("@now :!: date +%H:%M", 1).unwrap();
//! print!("{}", vm.eval("It is @now", 2).unwrap());
//! ```

pub mod help;
pub mod settings;

#[cfg(feature = "cli")]
pub mod repl;

pub use settings::{Settings, SettingsError};
pub use shorthand_vm::*;
