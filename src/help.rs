//! Operator listing and banner text.

use std::io::{self, Write};

use shorthand_vm::{VirtualMachine, VERSION};

pub const WELCOME: &str = "
  Welcome to shorthand the simple label expander and markdown processor.
  Use ':exit:' to quit the repl, ':help:' to get a list of supported operators.
";

/// Typed at the interactive prompt to list operators.
pub const HELP_COMMAND: &str = ":help:";

pub fn write_operators<W: Write>(vm: &VirtualMachine, mut out: W) -> io::Result<()> {
    writeln!(out, "The following operators are supported in shorthand:")?;
    writeln!(out)?;
    let width = vm
        .help()
        .map(|(token, _)| token.trim().len())
        .max()
        .unwrap_or(0);
    for (token, help) in vm.help() {
        writeln!(out, "    {:<width$}  {}", token.trim(), help, width = width)?;
    }
    writeln!(out)?;
    writeln!(out, "shorthand {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_spelling() {
        let vm = VirtualMachine::new();
        let mut out = Vec::new();
        write_operators(&vm, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(":=:"));
        assert!(text.contains(":import-expanded-markdown:"));
        assert!(text.contains("Write every assignment statement to a file"));
        assert!(text.trim_end().ends_with(VERSION));
    }
}
