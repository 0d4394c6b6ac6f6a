use crate::branches::check_branches;
use crate::branches::CheckContext;
use derive_visitor::{DriveMut, VisitorMut};
use diagnostics::{sort_diagnostics, Diagnostic};
use rayon::prelude::*;
use syntax_rk::ast::func::FuncLit;
use syntax_rk::ast::node::Node;
use syntax_rk::ast::stmt::BlockStmt;
use syntax_rk::ast::stx::{Decl, File};
use tracing::{debug_span, field};

type FuncLitNode = Node<FuncLit>;

/// Checks every function body in `file`: each function declaration's body and
/// each closure body, wherever it appears. Bodies are independent, so
/// top-level declarations are checked in parallel; the returned diagnostics
/// are sorted by position.
pub fn check_file(file: &mut Node<File>, cx: &CheckContext<'_>) -> Vec<Diagnostic> {
  let span = debug_span!(
    "semantic_rk.check_file",
    file = cx.file.0,
    decls = file.stx.decls.len(),
    diagnostics = field::Empty,
  );
  let _enter = span.enter();

  let mut diagnostics: Vec<Diagnostic> = file
    .stx
    .decls
    .par_iter_mut()
    .flat_map_iter(|decl| check_decl(decl, cx))
    .collect();
  sort_diagnostics(&mut diagnostics);

  span.record("diagnostics", diagnostics.len());
  diagnostics
}

fn check_decl(decl: &mut Node<Decl>, cx: &CheckContext<'_>) -> Vec<Diagnostic> {
  let mut diagnostics = Vec::new();
  if let Decl::Func(func) = decl.stx.as_mut() {
    // Declarations without a body are implemented elsewhere.
    if let Some(body) = func.stx.body.as_mut() {
      check_body(body, cx, &mut diagnostics);
    }
  }
  let mut closures = ClosureBodies {
    cx,
    diagnostics: &mut diagnostics,
  };
  decl.drive_mut(&mut closures);
  diagnostics
}

fn check_body(body: &mut Node<BlockStmt>, cx: &CheckContext<'_>, out: &mut Vec<Diagnostic>) {
  let result = check_branches(body, cx, &mut |diagnostic| out.push(diagnostic));
  if let Err(err) = result {
    out.push(err.to_diagnostic(cx.file));
  }
}

#[derive(VisitorMut)]
#[visitor(FuncLitNode(enter))]
struct ClosureBodies<'a> {
  cx: &'a CheckContext<'a>,
  diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> ClosureBodies<'a> {
  fn enter_func_lit_node(&mut self, node: &mut FuncLitNode) {
    check_body(&mut node.stx.body, self.cx, self.diagnostics);
  }
}
