//! Line parser.
//!
//! A line is an assignment when it contains a registered operator token. The
//! token starting earliest in the line wins; tokens starting at the same byte
//! are resolved in registration order.

use crate::error::{Result, ShorthandError};
use crate::operators::OperatorRegistry;
use crate::source_map::SourceMap;

/// Locate the winning operator token: `(byte offset, token)`.
pub fn find_operator<'r>(registry: &'r OperatorRegistry, line: &str) -> Option<(usize, &'r str)> {
    let mut found: Option<(usize, &str)> = None;
    for token in registry.tokens() {
        if let Some(pos) = line.find(token) {
            match found {
                Some((best, _)) if best <= pos => {}
                _ => found = Some((pos, token)),
            }
        }
    }
    found
}

pub fn is_assignment(registry: &OperatorRegistry, line: &str) -> bool {
    find_operator(registry, line).is_some()
}

/// Split `line` around its operator token.
///
/// Lines without a token come back as plain text with `source` holding the
/// whole line unchanged.
pub fn parse(registry: &OperatorRegistry, line: &str, line_no: i64) -> SourceMap {
    match find_operator(registry, line) {
        Some((pos, token)) => {
            let label = line[..pos].trim();
            let source = line[pos + token.len()..].trim_end();
            SourceMap::new(label, token, source, line_no)
        }
        None => SourceMap::text(line, line_no),
    }
}

/// Like [`parse`], but a line without an operator is an error.
pub fn parse_strict(registry: &OperatorRegistry, line: &str, line_no: i64) -> Result<SourceMap> {
    let sm = parse(registry, line, line_no);
    if sm.op.is_empty() {
        return Err(ShorthandError::ParseMismatch {
            line_no,
            line: line.trim_end().to_string(),
        });
    }
    Ok(sm)
}
