//! The shorthand virtual machine.
//!
//! Owns the symbol table and the operator registry. Lines go in through
//! [`VirtualMachine::eval`]: assignments are dispatched to their operator
//! and committed, anything else is returned with labels substituted.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::VmConfig;
use crate::error::{Result, ShorthandError};
use crate::handlers;
use crate::operators::{OperatorKind, OperatorRegistry};
use crate::parser;
use crate::source_map::SourceMap;
use crate::symbols::SymbolTable;

/// Markers that end the run loop wherever they appear in a line.
pub const TERMINATORS: [&str; 2] = [":exit:", ":quit:"];

/// Label whose assignments run for their side effects only and are never bound.
pub const IGNORE_LABEL: &str = "_";

/// A request to stop processing, raised by the exit operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    /// Fatal message to surface; `None` is a clean exit.
    pub message: Option<String>,
    pub line_no: i64,
}

#[derive(Debug)]
pub struct VirtualMachine {
    symbols: SymbolTable,
    operators: OperatorRegistry,
    config: VmConfig,
    halt: Option<Halt>,
    import_depth: usize,
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualMachine {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            symbols: SymbolTable::new(),
            operators: OperatorRegistry::builtin(),
            config,
            halt: None,
            import_depth: 0,
        }
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.config.prompt = prompt.into();
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    /// Add another spelling for an operator kind.
    pub fn register_op(
        &mut self,
        token: impl Into<String>,
        kind: OperatorKind,
        help: impl Into<String>,
    ) -> Result<()> {
        self.operators.register(token, kind, help)
    }

    /// `(token, help)` for every registered operator, in registration order.
    pub fn help(&self) -> impl Iterator<Item = (&str, &str)> {
        self.operators
            .specs()
            .iter()
            .map(|spec| (spec.token.as_str(), spec.help.as_str()))
    }

    pub fn halt(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }

    pub(crate) fn request_halt(&mut self, halt: Halt) {
        self.halt = Some(halt);
    }

    /// Forget a previous exit so the machine can process more input.
    pub fn clear_halt(&mut self) {
        self.halt = None;
    }

    /// Whether `line` ends processing. An exit operator on that line still
    /// records its halt, so the message is not lost.
    pub fn terminate(&mut self, line: &str, line_no: i64) -> bool {
        if !is_terminator(line) {
            return false;
        }
        let sm = self.parse(line, line_no);
        if self.operators.kind_of(&sm.op) == Some(OperatorKind::Exit) {
            // The exit handler cannot fail.
            handlers::apply(self, OperatorKind::Exit, sm).ok();
        }
        debug!(line_no, "terminator reached");
        true
    }

    pub(crate) fn import_depth(&self) -> usize {
        self.import_depth
    }

    pub(crate) fn enter_import(&mut self) {
        self.import_depth += 1;
    }

    pub(crate) fn leave_import(&mut self) {
        self.import_depth -= 1;
    }

    pub fn parse(&self, line: &str, line_no: i64) -> SourceMap {
        parser::parse(&self.operators, line, line_no)
    }

    pub fn parse_strict(&self, line: &str, line_no: i64) -> Result<SourceMap> {
        parser::parse_strict(&self.operators, line, line_no)
    }

    pub fn is_assignment(&self, line: &str) -> bool {
        parser::is_assignment(&self.operators, line)
    }

    /// Evaluate one line.
    ///
    /// Plain text comes back with labels substituted. Assignments return an
    /// empty string; a failing operator leaves the symbol table untouched.
    pub fn eval(&mut self, line: &str, line_no: i64) -> Result<String> {
        let sm = self.parse(line, line_no);
        if sm.is_text() {
            return Ok(self.expand(line));
        }

        let kind = self
            .operators
            .kind_of(&sm.op)
            .ok_or_else(|| ShorthandError::UnknownOperator {
                token: sm.op.clone(),
                line_no,
            })?;

        let sm = handlers::apply(self, kind, sm)?;
        if !sm.label.is_empty() && sm.label != IGNORE_LABEL {
            debug!(label = %sm.label, line_no, "binding label");
            self.symbols.set(sm);
        }
        Ok(String::new())
    }

    /// Replace every bound label found in `text` with its value.
    ///
    /// A label is substituted when it occurs in the original `text`; the
    /// replacement runs over the accumulated result. One pass per label, so
    /// labels introduced by a substituted value stay as they are.
    pub fn expand(&self, text: &str) -> String {
        let mut result = text.to_string();
        for sm in self.symbols.get_all() {
            if text.contains(sm.label.as_str()) {
                result = result.replace(sm.label.as_str(), &sm.expanded);
            }
        }
        result
    }

    /// Read-evaluate-print until end of input, a terminator or an exit
    /// operator. Per-line errors go to `err` and processing continues.
    ///
    /// Returns the number of lines read, the terminating line included. A halt
    /// left over from earlier input is cleared first.
    pub fn run<R, W, E>(&mut self, mut input: R, mut out: W, mut err: E) -> io::Result<usize>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        self.clear_halt();
        let mut line_no = 0usize;
        let mut line = String::new();
        loop {
            if !self.config.prompt.is_empty() {
                out.write_all(self.config.prompt.as_bytes())?;
                out.flush()?;
            }
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;
            if self.terminate(&line, line_no as i64) {
                break;
            }
            match self.eval(&line, line_no as i64) {
                Ok(text) if !text.is_empty() => out.write_all(text.as_bytes())?,
                Ok(_) => {}
                Err(e) => {
                    debug!(line_no, error = %e, "line failed");
                    writeln!(err, "ERROR ({}): {}", line_no, e)?;
                }
            }
            if self.halt.is_some() {
                break;
            }
        }
        out.flush()?;
        Ok(line_no)
    }

    /// [`run`](Self::run) over the process's standard streams.
    pub fn run_stdio(&mut self) -> io::Result<usize> {
        let stdin = io::stdin();
        self.run(stdin.lock(), io::stdout().lock(), io::stderr().lock())
    }
}

pub fn is_terminator(line: &str) -> bool {
    TERMINATORS.iter().any(|t| line.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_assignment_round_trip() {
        let mut vm = VirtualMachine::new();
        assert_eq!(vm.eval("X :=: hello", 1).unwrap(), "");
        let sm = vm.symbols().get("X");
        assert_eq!(sm.expanded, "hello");
        assert_eq!(sm.op, " :=: ");
        assert_eq!(vm.expand("say X"), "say hello");
    }

    #[test]
    fn plain_text_is_expanded() {
        let mut vm = VirtualMachine::new();
        vm.eval("@now :=: This is now.", 1).unwrap();
        assert_eq!(
            vm.eval("This is '@now'\n", 2).unwrap(),
            "This is 'This is now.'\n"
        );
        assert_eq!(vm.eval("untouched\n", 3).unwrap(), "untouched\n");
    }

    #[test]
    fn expand_replaces_every_occurrence() {
        let mut vm = VirtualMachine::new();
        vm.eval("@me :=: Fred", 1).unwrap();
        vm.eval("@now :=: 9:00", 2).unwrap();
        let text = "\n   @me\n\n   8:00 - @now; some stuff\n   @me again\n   This \"now\" should not change.";
        let expected = "\n   Fred\n\n   8:00 - 9:00; some stuff\n   Fred again\n   This \"now\" should not change.";
        assert_eq!(vm.expand(text), expected);
    }

    #[test]
    fn expansion_is_single_pass() {
        let mut vm = VirtualMachine::new();
        vm.eval("B :=: bee", 1).unwrap();
        vm.eval("A :=: has B inside", 2).unwrap();
        assert_eq!(vm.expand("A"), "has B inside");

        vm.eval("C :{{: A", 3).unwrap();
        assert_eq!(vm.expand("C"), "has bee inside");
    }

    #[test]
    fn reassignment_keeps_history() {
        let mut vm = VirtualMachine::new();
        vm.eval("X :=: one", 1).unwrap();
        vm.eval("X :set: two", 2).unwrap();
        assert_eq!(vm.symbols().get("X").expanded, "two");
        assert_eq!(vm.symbols().get("X").line_no, 2);
        assert_eq!(vm.symbols().history().len(), 2);
    }

    #[test]
    fn failed_operator_commits_nothing() {
        let mut vm = VirtualMachine::new();
        let err = vm.eval("@x :=<: /nonexistent/file.txt", 1).unwrap_err();
        assert!(matches!(err, ShorthandError::FileRead { .. }));
        assert!(vm.symbols().is_empty());
    }

    #[test]
    fn empty_label_is_never_bound() {
        let mut vm = VirtualMachine::new();
        vm.eval(" :=: orphan", 1).unwrap();
        assert!(vm.symbols().is_empty());
    }

    #[test]
    fn markdown_is_trimmed() {
        let mut vm = VirtualMachine::new();
        vm.eval("M :[: **strong**", 1).unwrap();
        assert_eq!(vm.expand("M"), "<p><strong>strong</strong></p>");
    }

    #[test]
    fn expand_markdown_substitutes_first() {
        let mut vm = VirtualMachine::new();
        vm.eval("@link :=: my link", 1).unwrap();
        vm.eval("@url :=: http://example.com", 2).unwrap();
        vm.eval("@html :{[: [@link](@url)", 3).unwrap();
        assert_eq!(
            vm.expand("@html"),
            "<p><a href=\"http://example.com\">my link</a></p>"
        );
    }

    #[test]
    fn exit_records_halt() {
        let mut vm = VirtualMachine::new();
        vm.eval("_ :exit: ", 4).unwrap();
        assert_eq!(
            vm.halt(),
            Some(&Halt {
                message: None,
                line_no: 4
            })
        );

        let mut vm = VirtualMachine::new();
        vm.eval("_ :quit: something broke", 9).unwrap();
        assert_eq!(
            vm.halt().and_then(|h| h.message.as_deref()),
            Some("something broke")
        );
        assert!(vm.symbols().is_empty());
    }

    #[test]
    fn custom_spelling_dispatches() {
        let mut vm = VirtualMachine::new();
        vm.register_op(" := ", OperatorKind::AssignString, "Short assignment")
            .unwrap();
        vm.eval("ACME := the point", 1).unwrap();
        assert_eq!(vm.expand("My, ACME"), "My, the point");
        assert!(vm
            .register_op(" := ", OperatorKind::AssignShell, "again")
            .is_err());
        assert!(vm.help().any(|(token, help)| token == " := " && help == "Short assignment"));
    }

    #[test]
    fn terminators_match_anywhere() {
        assert!(is_terminator(":exit:\n"));
        assert!(is_terminator("please :quit: now"));
        assert!(!is_terminator("exit quit"));
    }

    #[test]
    fn underscore_label_is_never_bound() {
        let mut vm = VirtualMachine::new();
        vm.eval("@hello_world :=: Hello", 1).unwrap();
        vm.eval("_ :!: true", 2).unwrap();
        vm.eval("_ :=: discarded", 3).unwrap();
        assert!(!vm.symbols().contains(IGNORE_LABEL));
        assert_eq!(
            vm.expand("@hello_world and snake_case"),
            "Hello and snake_case"
        );
    }

    #[test]
    fn terminate_records_exit_message() {
        let mut vm = VirtualMachine::new();
        assert!(!vm.terminate("plain text\n", 1));
        assert!(vm.halt().is_none());

        assert!(vm.terminate(":quit:", 2));
        assert!(vm.halt().is_none());

        assert!(vm.terminate("_ :exit: boom", 3));
        assert_eq!(
            vm.halt(),
            Some(&Halt {
                message: Some("boom".to_string()),
                line_no: 3
            })
        );
        assert!(vm.symbols().is_empty());
    }

    #[test]
    fn halt_is_cleared_for_new_input() {
        let mut vm = VirtualMachine::new();
        vm.eval("_ :exit: ", 1).unwrap();
        assert!(vm.halt().is_some());

        let mut out = Vec::new();
        let lines = vm
            .run(io::Cursor::new("a\nb\nc\n"), &mut out, io::sink())
            .unwrap();
        assert_eq!(lines, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "a\nb\nc\n");
        assert!(vm.halt().is_none());

        vm.eval("_ :quit: again", 4).unwrap();
        vm.clear_halt();
        assert!(vm.halt().is_none());
    }
}
