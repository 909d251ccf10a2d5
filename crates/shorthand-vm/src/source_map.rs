//! The assignment record: one parsed line and the value computed from it.

/// Line number carried by the sentinel returned for unbound labels.
pub const MISSING_LINE: i64 = -1;

/// A parsed line and, once evaluated, its expanded value.
///
/// An empty `label` with an empty `op` marks plain text; `source` then holds
/// the whole line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    /// Symbol replaced in later text.
    pub label: String,
    /// Operator token as it appeared in the line, delimiter spacing included.
    pub op: String,
    /// Raw text right of the operator.
    pub source: String,
    /// Value computed by evaluating `op` against `source`.
    pub expanded: String,
    pub line_no: i64,
}

impl SourceMap {
    pub fn new(
        label: impl Into<String>,
        op: impl Into<String>,
        source: impl Into<String>,
        line_no: i64,
    ) -> Self {
        Self {
            label: label.into(),
            op: op.into(),
            source: source.into(),
            expanded: String::new(),
            line_no,
        }
    }

    /// A plain-text record: no label, no operator.
    pub fn text(line: impl Into<String>, line_no: i64) -> Self {
        Self::new("", "", line, line_no)
    }

    /// The record handed out for labels that were never bound.
    pub fn not_found() -> Self {
        Self {
            line_no: MISSING_LINE,
            ..Self::default()
        }
    }

    pub fn is_text(&self) -> bool {
        self.label.is_empty() && self.op.is_empty()
    }

    pub fn is_not_found(&self) -> bool {
        self.line_no == MISSING_LINE
    }

    pub fn with_expanded(mut self, expanded: impl Into<String>) -> Self {
        self.expanded = expanded.into();
        self
    }

    /// Drop the label so the record is never committed.
    pub fn unlabelled(mut self) -> Self {
        self.label.clear();
        self
    }

    /// The statement that recreates this record, e.g. `@name :=: Fred`.
    pub fn statement(&self) -> String {
        format!("{}{}{}", self.label, self.op, self.source)
    }
}
