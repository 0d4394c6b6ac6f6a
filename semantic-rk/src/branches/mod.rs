//! Label and branch checking for a single function body.
//!
//! The pass walks the statement tree of one body, declaring every label in a
//! per-body [`LabelTable`] and resolving each `break`, `continue` and `goto`
//! to the statement it transfers control to. The result is written to
//! [`BranchStmt::target`]; misuse is reported to the caller's handler and the
//! walk carries on. Once the walk completes, labels nobody referred to are
//! reported as unused.
//!
//! Statements the pass visits are numbered in pre-order ([`StmtId`]) and the
//! number is attached to each statement node, so a target can be matched back
//! to its node with [`crate::assoc::stmt_id`]. Closures are separate bodies and
//! are not entered.

pub mod labels;
#[cfg(test)]
mod tests;

use crate::codes;
use crate::error::CheckError;
use diagnostics::{Diagnostic, FileId, Label as DiagnosticLabel, Span};
use labels::{BlockId, Blocks, Declared, Label, LabelTable, Resolution};
use syntax_rk::ast::expr::Ident;
use syntax_rk::ast::node::Node;
use syntax_rk::ast::stmt::{
  BlockStmt, BranchStmt, BranchTarget, BranchTok, IfStmt, LabeledStmt, Stmt, StmtId, TargetKind,
};
use syntax_rk::loc::{LineIndex, Loc};
use tracing::{debug_span, field, trace};

pub const DEFAULT_MAX_DEPTH: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
  /// Maximum number of nested blocks (including the body itself) before
  /// checking gives up with [`CheckError::NestingTooDeep`].
  pub max_depth: usize,
}

impl Default for CheckOptions {
  fn default() -> Self {
    CheckOptions {
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

/// What the pass needs to know about the file a body came from.
#[derive(Clone, Copy, Debug)]
pub struct CheckContext<'a> {
  pub file: FileId,
  /// Positions quoted in messages come from here. An index over empty text
  /// is fine when the source is unavailable.
  pub lines: &'a LineIndex,
  pub options: CheckOptions,
}

impl<'a> CheckContext<'a> {
  pub fn new(file: FileId, lines: &'a LineIndex) -> Self {
    CheckContext {
      file,
      lines,
      options: CheckOptions::default(),
    }
  }

  pub fn with_options(mut self, options: CheckOptions) -> Self {
    self.options = options;
    self
  }
}

/// Statements an unlabeled `break` or `continue` would transfer to.
#[derive(Clone, Copy, Default, Debug)]
struct Targets {
  breaks: Option<BranchTarget>,
  continues: Option<BranchTarget>,
}

struct BranchChecker<'t, 'a> {
  cx: &'a CheckContext<'a>,
  errh: &'a mut dyn FnMut(Diagnostic),
  labels: LabelTable,
  blocks: Blocks,
  // Resolved once all labels of the body are known.
  gotos: Vec<&'t mut Node<BranchStmt>>,
  next_stmt: u32,
  depth: usize,
  branches: usize,
  reported: usize,
}

/// Checks labels and branch statements of one function body, writing the
/// resolved target of every branch statement and reporting misuse to `errh`.
///
/// Re-running on the same tree reports the same diagnostics and writes the
/// same targets. An `Err` means the tree violates a structural contract (or
/// nests too deeply); diagnostics reported before that point stand, but unused
/// labels are not reported for the aborted body.
pub fn check_branches(
  body: &mut Node<BlockStmt>,
  cx: &CheckContext<'_>,
  errh: &mut dyn FnMut(Diagnostic),
) -> Result<(), CheckError> {
  let span = debug_span!(
    "semantic_rk.check_branches",
    file = cx.file.0,
    labels = field::Empty,
    branches = field::Empty,
    diagnostics = field::Empty,
  );
  let _enter = span.enter();

  let mut checker = BranchChecker {
    cx,
    errh,
    labels: LabelTable::default(),
    blocks: Blocks::default(),
    gotos: Vec::new(),
    next_stmt: 0,
    depth: 0,
    branches: 0,
    reported: 0,
  };
  let start = body.loc;
  let result = checker.walk_list(None, Targets::default(), None, start, &mut body.stx.body);
  if result.is_ok() {
    checker.resolve_gotos();
    checker.report_unused();
  }

  span.record("labels", checker.labels.len());
  span.record("branches", checker.branches);
  span.record("diagnostics", checker.reported);
  result
}

impl<'t, 'a> BranchChecker<'t, 'a> {
  fn report(&mut self, diagnostic: Diagnostic) {
    self.reported += 1;
    (self.errh)(diagnostic);
  }

  fn span(&self, loc: Loc) -> Span {
    Span::from_loc(self.cx.file, loc)
  }

  fn number(&mut self, stmt: &mut Node<Stmt>) -> StmtId {
    let id = StmtId(self.next_stmt);
    self.next_stmt += 1;
    stmt.assoc.set(id);
    id
  }

  fn walk_list(
    &mut self,
    parent: Option<BlockId>,
    targets: Targets,
    labeled: Option<StmtId>,
    start: Loc,
    body: &'t mut [Node<Stmt>],
  ) -> Result<(), CheckError> {
    if self.depth >= self.cx.options.max_depth {
      return Err(CheckError::NestingTooDeep {
        limit: self.cx.options.max_depth,
        loc: start,
      });
    }
    self.depth += 1;
    let block = self.blocks.push(parent, labeled);
    for stmt in body.iter_mut() {
      self.walk_stmt(block, targets, stmt)?;
    }
    self.depth -= 1;
    Ok(())
  }

  fn walk_stmt(
    &mut self,
    block: BlockId,
    targets: Targets,
    mut stmt: &'t mut Node<Stmt>,
  ) -> Result<(), CheckError> {
    // Labeled statement currently being processed; blocks it introduces are
    // associated with it.
    let mut labeled = None;
    loop {
      let id = self.number(stmt);
      let loc = stmt.loc;
      match stmt.stx.as_mut() {
        Stmt::Labeled(labeled_stmt) => {
          let LabeledStmt {
            label: name,
            stmt: inner,
          } = labeled_stmt.stx.as_mut();
          if name.stx.name != "_" {
            self.declare(name, id, loc, inner);
          }
          labeled = Some(id);
          stmt = inner;
        }
        Stmt::Branch(branch) => return self.branch(block, targets, loc, branch),
        Stmt::Block(inner) => {
          let start = inner.loc;
          return self.walk_list(Some(block), targets, labeled, start, &mut inner.stx.body);
        }
        Stmt::If(if_stmt) => {
          let IfStmt {
            then, alternate, ..
          } = if_stmt.stx.as_mut();
          let start = then.loc;
          self.walk_list(Some(block), targets, labeled, start, &mut then.stx.body)?;
          if let Some(alternate) = alternate {
            let start = alternate.loc;
            self.walk_list(
              Some(block),
              targets,
              labeled,
              start,
              std::slice::from_mut(alternate),
            )?;
          }
          return Ok(());
        }
        Stmt::For(for_stmt) => {
          let this = Some(BranchTarget {
            stmt: id,
            kind: TargetKind::For,
            loc,
          });
          let inner = Targets {
            breaks: this,
            continues: this,
          };
          let body = &mut for_stmt.stx.body;
          let start = body.loc;
          return self.walk_list(Some(block), inner, labeled, start, &mut body.stx.body);
        }
        Stmt::Switch(switch) => {
          let inner = Targets {
            breaks: Some(BranchTarget {
              stmt: id,
              kind: TargetKind::Switch,
              loc,
            }),
            continues: targets.continues,
          };
          for clause in switch.stx.body.iter_mut() {
            let start = clause.loc;
            self.walk_list(Some(block), inner, labeled, start, &mut clause.stx.body)?;
          }
          return Ok(());
        }
        Stmt::Select(select) => {
          let inner = Targets {
            breaks: Some(BranchTarget {
              stmt: id,
              kind: TargetKind::Select,
              loc,
            }),
            continues: targets.continues,
          };
          for clause in select.stx.body.iter_mut() {
            let start = clause.loc;
            self.walk_list(Some(block), inner, labeled, start, &mut clause.stx.body)?;
          }
          return Ok(());
        }
        Stmt::Assign(_)
        | Stmt::Decl(_)
        | Stmt::Empty(_)
        | Stmt::Expr(_)
        | Stmt::Return(_)
        | Stmt::Send(_) => return Ok(()),
      }
    }
  }

  /// Declares the label of the statement numbered `stmt`, whose labeled
  /// statement is `inner`. A duplicate is reported and not declared.
  fn declare(&mut self, name: &Node<Ident>, stmt: StmtId, stmt_loc: Loc, inner: &Node<Stmt>) {
    // The inner statement is numbered next.
    let inner_id = StmtId(self.next_stmt);
    let referent = match inner.stx.as_ref() {
      Stmt::For(_) => Some(TargetKind::For),
      Stmt::Switch(_) => Some(TargetKind::Switch),
      Stmt::Select(_) => Some(TargetKind::Select),
      _ => None,
    }
    .map(|kind| BranchTarget {
      stmt: inner_id,
      kind,
      loc: inner.loc,
    });

    let declared = self.labels.declare(Label {
      name: name.stx.name.clone(),
      loc: name.loc,
      stmt,
      stmt_loc,
      referent,
      used: false,
    });
    match declared {
      Declared::New(_) => {
        trace!(label = %name.stx.name, stmt = stmt.0, "declared label");
      }
      Declared::Duplicate(existing) => {
        let previous = self.labels.get(existing).loc;
        let diagnostic = codes::DUPLICATE_LABEL
          .error(
            format!(
              "label {} already defined at {}",
              name.stx.name,
              self.cx.lines.pos(previous.0)
            ),
            self.span(name.loc),
          )
          .with_label(DiagnosticLabel::secondary(
            self.span(previous),
            "previous declaration here",
          ));
        self.report(diagnostic);
      }
    }
  }

  fn branch(
    &mut self,
    block: BlockId,
    targets: Targets,
    loc: Loc,
    branch: &'t mut Node<BranchStmt>,
  ) -> Result<(), CheckError> {
    self.branches += 1;
    let tok = branch.stx.tok;
    if tok == BranchTok::Goto {
      if branch.stx.label.is_none() {
        return Err(CheckError::UnlabeledGoto { loc });
      }
      branch.stx.target = None;
      self.gotos.push(branch);
      return Ok(());
    }

    let target = match branch.stx.label.as_ref() {
      None => match tok {
        BranchTok::Break => targets.breaks.or_else(|| {
          self.report(codes::BREAK_OUTSIDE_TARGET.error(
            "break is not in a loop, switch, or select",
            self.span(loc),
          ));
          None
        }),
        BranchTok::Continue => targets.continues.or_else(|| {
          self.report(
            codes::CONTINUE_OUTSIDE_LOOP.error("continue is not in a loop", self.span(loc)),
          );
          None
        }),
        BranchTok::Fallthrough | BranchTok::Goto => None,
      },
      Some(label) => match tok {
        BranchTok::Break => self.resolve_labeled(block, label, tok),
        BranchTok::Continue => self.resolve_labeled(block, label, tok),
        BranchTok::Fallthrough | BranchTok::Goto => {
          return Err(CheckError::LabeledFallthrough { loc: label.loc });
        }
      },
    };
    branch.stx.target = target;
    Ok(())
  }

  /// Resolves `break <label>` or `continue <label>`.
  fn resolve_labeled(
    &mut self,
    block: BlockId,
    label: &Node<Ident>,
    tok: BranchTok,
  ) -> Option<BranchTarget> {
    let name = label.stx.name.as_str();
    let resolution = self.labels.resolve_target(&self.blocks, block, name);
    trace!(label = name, branch = %tok, ?resolution, "resolved label");

    let (undefined, invalid) = match tok {
      BranchTok::Continue => (
        codes::CONTINUE_LABEL_UNDEFINED,
        codes::INVALID_CONTINUE_LABEL,
      ),
      _ => (codes::BREAK_LABEL_UNDEFINED, codes::INVALID_BREAK_LABEL),
    };
    let accepts = |kind: TargetKind| match tok {
      BranchTok::Continue => kind.is_continuable(),
      _ => kind.is_breakable(),
    };

    match resolution {
      Resolution::Found(id) => {
        if let Some(target) = self.labels.get(id).referent.filter(|t| accepts(t.kind)) {
          return Some(target);
        }
        self.report(invalid.error(format!("invalid {tok} label {name}"), self.span(label.loc)));
      }
      Resolution::NotEnclosing(_) => {
        self.report(invalid.error(format!("invalid {tok} label {name}"), self.span(label.loc)));
      }
      Resolution::NotFound => {
        self.report(undefined.error(
          format!("{tok} label not defined: {name}"),
          self.span(label.loc),
        ));
      }
    }
    None
  }

  fn resolve_gotos(&mut self) {
    for branch in std::mem::take(&mut self.gotos) {
      let Some(label) = branch.stx.label.as_ref() else {
        continue;
      };
      let target = match self.labels.lookup(&label.stx.name) {
        Some(id) => {
          self.labels.mark_used(id);
          Some(self.labels.get(id).goto_target())
        }
        None => {
          let diagnostic = codes::GOTO_LABEL_UNDEFINED.error(
            format!("label {} not defined", label.stx.name),
            self.span(label.loc),
          );
          self.report(diagnostic);
          None
        }
      };
      trace!(label = %label.stx.name, resolved = target.is_some(), "resolved goto");
      branch.stx.target = target;
    }
  }

  fn report_unused(&mut self) {
    let unused: Vec<Diagnostic> = self
      .labels
      .unused()
      .map(|label| {
        codes::UNUSED_LABEL.error(
          format!("label {} defined and not used", label.name),
          self.span(label.loc),
        )
      })
      .collect();
    for diagnostic in unused {
      self.report(diagnostic);
    }
  }
}
