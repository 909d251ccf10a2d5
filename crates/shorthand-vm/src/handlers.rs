//! Operator handlers.
//!
//! Each handler takes the parsed record and returns it with `expanded`
//! filled in. Handlers for operators that do not bind a label come back
//! unlabelled so `eval` never commits them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, ShorthandError};
use crate::markdown::markdown_to_html;
use crate::operators::OperatorKind;
use crate::shell::run_shell;
use crate::source_map::SourceMap;
use crate::vm::{Halt, VirtualMachine};

pub(crate) fn apply(vm: &mut VirtualMachine, kind: OperatorKind, sm: SourceMap) -> Result<SourceMap> {
    debug!(%kind, label = %sm.label, line_no = sm.line_no, "applying operator");
    let sm = match kind {
        OperatorKind::AssignString => {
            let expanded = sm.source.clone();
            sm.with_expanded(expanded)
        }
        OperatorKind::AssignInclude => {
            let expanded = read_file(&sm.source)?;
            sm.with_expanded(expanded)
        }
        OperatorKind::ImportAssignments => import_assignments(vm, sm)?,
        OperatorKind::AssignExpansion => {
            let expanded = vm.expand(&sm.source);
            sm.with_expanded(expanded)
        }
        OperatorKind::AssignExpandExpansion => {
            let once = vm.expand(&sm.source);
            let expanded = vm.expand(&once);
            sm.with_expanded(expanded)
        }
        OperatorKind::IncludeExpansion => {
            let text = read_file(&sm.source)?;
            let expanded = vm.expand(&text);
            sm.with_expanded(expanded)
        }
        OperatorKind::AssignShell => {
            let expanded = shell(vm, &sm.source)?;
            sm.with_expanded(expanded)
        }
        OperatorKind::AssignExpandShell => {
            let command = vm.expand(&sm.source);
            let expanded = shell(vm, &command)?;
            sm.with_expanded(expanded)
        }
        OperatorKind::AssignMarkdown => {
            let expanded = render_trimmed(&sm.source);
            sm.with_expanded(expanded)
        }
        OperatorKind::AssignExpandMarkdown => {
            let expanded = render_trimmed(&vm.expand(&sm.source));
            sm.with_expanded(expanded)
        }
        OperatorKind::IncludeMarkdown => {
            let text = read_file(&sm.source)?;
            sm.with_expanded(markdown_to_html(&text))
        }
        OperatorKind::IncludeExpandMarkdown => {
            let text = read_file(&sm.source)?;
            let expanded = render_trimmed(&vm.expand(&text));
            sm.with_expanded(expanded)
        }
        OperatorKind::ExportExpansion => {
            let bound = bound_record(vm, &sm);
            write_file(&sm.source, |w| w.write_all(bound.expanded.as_bytes()))?;
            sm
        }
        OperatorKind::ExportAllExpansions => {
            write_file(&sm.source, |w| {
                for bound in vm.symbols().get_all() {
                    writeln!(w, "{}", bound.expanded)?;
                }
                Ok(())
            })?;
            info!(path = %sm.source, count = vm.symbols().len(), "exported values");
            sm
        }
        OperatorKind::ExportAssignment => {
            let bound = bound_record(vm, &sm);
            write_file(&sm.source, |w| w.write_all(bound.statement().as_bytes()))?;
            sm
        }
        OperatorKind::ExportAllAssignments => {
            write_file(&sm.source, |w| {
                for bound in vm.symbols().get_all() {
                    writeln!(w, "{}", bound.statement())?;
                }
                Ok(())
            })?;
            info!(path = %sm.source, count = vm.symbols().len(), "exported assignments");
            sm
        }
        OperatorKind::Exit => {
            let message = (!sm.source.is_empty()).then(|| sm.source.clone());
            vm.request_halt(Halt {
                message,
                line_no: sm.line_no,
            });
            sm
        }
    };
    Ok(if kind.commits() { sm } else { sm.unlabelled() })
}

fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ShorthandError::file_read(path, e))
}

/// Create `path` and hand a buffered writer to `body`. The file is closed on
/// every return path.
fn write_file<F>(path: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let wrap = |e| ShorthandError::file_write(path, e);
    let mut writer = BufWriter::new(File::create(path).map_err(wrap)?);
    body(&mut writer).map_err(wrap)?;
    writer.flush().map_err(wrap)
}

fn shell(vm: &VirtualMachine, command: &str) -> Result<String> {
    let config = vm.config();
    run_shell(&config.shell, command, config.shell_timeout)
}

fn render_trimmed(src: &str) -> String {
    markdown_to_html(src).trim_end().to_string()
}

fn bound_record(vm: &VirtualMachine, sm: &SourceMap) -> SourceMap {
    let bound = vm.symbols().get(&sm.label);
    if bound.is_not_found() {
        warn!(label = %sm.label, line_no = sm.line_no, "exporting unbound label");
    }
    bound
}

fn import_assignments(vm: &mut VirtualMachine, sm: SourceMap) -> Result<SourceMap> {
    let max = vm.config().max_import_depth;
    if vm.import_depth() >= max {
        return Err(ShorthandError::ImportDepthExceeded { depth: max });
    }
    let text = read_file(&sm.source)?;
    info!(path = %sm.source, "importing assignments");

    vm.enter_import();
    let result = eval_lines(vm, Path::new(&sm.source), &text);
    vm.leave_import();
    result?;
    Ok(sm)
}

fn eval_lines(vm: &mut VirtualMachine, path: &Path, text: &str) -> Result<()> {
    for (i, line) in text.lines().enumerate() {
        let line_no = i as i64 + 1;
        vm.eval(line, line_no)
            .map_err(|e| ShorthandError::Import {
                path: path.to_path_buf(),
                line_no,
                source: Box::new(e),
            })?;
        if vm.halt().is_some() {
            debug!(path = %path.display(), line_no, "import stopped by exit");
            break;
        }
    }
    Ok(())
}
