//! Registry of diagnostic codes emitted by `semantic-rk`.
//!
//! Messages are fixed templates; each [`Code`] notes the template and where
//! the primary span points.

use diagnostics::{Diagnostic, Span};

/// Metadata describing a diagnostic code.
#[derive(Clone, Copy, Debug)]
pub struct Code {
  /// Stable string identifier, e.g. `BR0005`.
  pub id: &'static str,
  /// Message template.
  pub description: &'static str,
  /// Guidance for where the primary span should be anchored.
  pub primary_span: &'static str,
}

impl Code {
  pub const fn new(id: &'static str, description: &'static str, primary_span: &'static str) -> Self {
    Code {
      id,
      description,
      primary_span,
    }
  }

  pub const fn as_str(&self) -> &'static str {
    self.id
  }

  pub fn error(&self, message: impl Into<String>, primary: Span) -> Diagnostic {
    Diagnostic::error(self.id, message, primary)
  }
}

pub const BREAK_OUTSIDE_TARGET: Code = Code::new(
  "BR0001",
  "break is not in a loop, switch, or select",
  "the break statement",
);

pub const CONTINUE_OUTSIDE_LOOP: Code = Code::new(
  "BR0002",
  "continue is not in a loop",
  "the continue statement",
);

pub const DUPLICATE_LABEL: Code = Code::new(
  "BR0003",
  "label <name> already defined at <line:col>",
  "the repeated label; a secondary label marks the first declaration",
);

pub const UNUSED_LABEL: Code = Code::new(
  "BR0004",
  "label <name> defined and not used",
  "the label identifier",
);

pub const BREAK_LABEL_UNDEFINED: Code = Code::new(
  "BR0005",
  "break label not defined: <name>",
  "the label after break",
);

pub const CONTINUE_LABEL_UNDEFINED: Code = Code::new(
  "BR0006",
  "continue label not defined: <name>",
  "the label after continue",
);

pub const INVALID_BREAK_LABEL: Code = Code::new(
  "BR0007",
  "invalid break label <name>",
  "the label after break",
);

pub const INVALID_CONTINUE_LABEL: Code = Code::new(
  "BR0008",
  "invalid continue label <name>",
  "the label after continue",
);

pub const GOTO_LABEL_UNDEFINED: Code = Code::new(
  "BR0009",
  "label <name> not defined",
  "the label after goto",
);

pub const INTERNAL_ERROR: Code = Code::new(
  "BR9000",
  "internal error: <reason>",
  "the statement the pass could not handle",
);

pub const ALL: &[Code] = &[
  BREAK_OUTSIDE_TARGET,
  CONTINUE_OUTSIDE_LOOP,
  DUPLICATE_LABEL,
  UNUSED_LABEL,
  BREAK_LABEL_UNDEFINED,
  CONTINUE_LABEL_UNDEFINED,
  INVALID_BREAK_LABEL,
  INVALID_CONTINUE_LABEL,
  GOTO_LABEL_UNDEFINED,
  INTERNAL_ERROR,
];
