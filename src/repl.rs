//! Interactive line editor front end.
//!
//! Used when standard input is a terminal and no files were named. Each
//! entered line is evaluated as if it had been read by the run loop, with
//! `:help:` listing the operators.

use std::io::{self, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use shorthand_vm::VirtualMachine;

use crate::help::{self, HELP_COMMAND};

/// What the session does after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Returns the number of lines entered.
pub fn run(vm: &mut VirtualMachine, prompt: &str) -> Result<usize> {
    let mut editor = DefaultEditor::new().context("failed to initialise line editor")?;
    let mut line_no = 0usize;

    loop {
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("failed to read line"),
        };
        line_no += 1;
        let _ = editor.add_history_entry(line.as_str());

        let flow = handle_line(
            vm,
            &line,
            line_no as i64,
            io::stdout().lock(),
            io::stderr().lock(),
        )?;
        if flow == Flow::Stop {
            break;
        }
    }

    debug!(line_no, "repl finished");
    Ok(line_no)
}

/// Evaluate one entered line, writing its output to `out` and any error to
/// `err`. A terminator or exit operator stops the session, with the exit
/// message kept on the machine.
pub fn handle_line<W: Write, E: Write>(
    vm: &mut VirtualMachine,
    line: &str,
    line_no: i64,
    mut out: W,
    mut err: E,
) -> io::Result<Flow> {
    if line.trim() == HELP_COMMAND {
        help::write_operators(vm, &mut out)?;
        return Ok(Flow::Continue);
    }
    if vm.terminate(line, line_no) {
        return Ok(Flow::Stop);
    }

    match vm.eval(&format!("{}\n", line), line_no) {
        Ok(text) => write!(out, "{}", text)?,
        Err(e) => writeln!(err, "{} ({}): {}", "ERROR".red().bold(), line_no, e)?,
    }
    out.flush()?;

    Ok(if vm.halt().is_some() {
        Flow::Stop
    } else {
        Flow::Continue
    })
}
