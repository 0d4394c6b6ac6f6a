use super::check_branches;
use super::CheckContext;
use super::CheckOptions;
use crate::assoc::stmt_id;
use crate::error::CheckError;
use derive_visitor::{Drive, Visitor};
use diagnostics::{Diagnostic, FileId, Span};
use syntax_rk::ast::node::Node;
use syntax_rk::ast::stmt::{
  BlockStmt, BranchStmt, BranchTarget, BranchTok, Stmt, StmtId, TargetKind,
};
use syntax_rk::build::*;
use syntax_rk::loc::{LineIndex, Loc};

type BranchStmtNode = Node<BranchStmt>;

#[derive(Default, Visitor)]
#[visitor(BranchStmtNode(enter))]
struct CollectTargets {
  targets: Vec<Option<BranchTarget>>,
}

impl CollectTargets {
  fn enter_branch_stmt_node(&mut self, node: &BranchStmtNode) {
    self.targets.push(node.stx.target);
  }
}

fn targets(body: &Node<BlockStmt>) -> Vec<Option<BranchTarget>> {
  let mut collect = CollectTargets::default();
  body.drive(&mut collect);
  collect.targets
}

fn run_with(
  body: &mut Node<BlockStmt>,
  options: CheckOptions,
) -> (Vec<Diagnostic>, Result<(), CheckError>) {
  let lines = LineIndex::new("");
  let cx = CheckContext::new(FileId(0), &lines).with_options(options);
  let mut diagnostics = Vec::new();
  let result = check_branches(body, &cx, &mut |d| diagnostics.push(d));
  (diagnostics, result)
}

fn run(body: &mut Node<BlockStmt>) -> Vec<Diagnostic> {
  let (diagnostics, result) = run_with(body, CheckOptions::default());
  result.unwrap();
  diagnostics
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
  diagnostics.iter().map(|d| d.message.as_str()).collect()
}

fn target(stmt: u32, kind: TargetKind, loc: Loc) -> Option<BranchTarget> {
  Some(BranchTarget {
    stmt: StmtId(stmt),
    kind,
    loc,
  })
}

#[test]
fn labeled_break_targets_the_loop() {
  let mut body = block_stmt(0, vec![labeled(2, "L", for_(5, vec![brk_to(11, "L")]))]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body), vec![target(1, TargetKind::For, Loc(5, 8))]);
}

#[test]
fn continue_passes_through_switch() {
  let mut body = block_stmt(0, vec![for_(2, vec![switch(7, vec![case(16, vec![
    cont(24),
  ])])])]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body), vec![target(0, TargetKind::For, Loc(2, 5))]);
}

#[test]
fn switch_captures_unlabeled_break() {
  let mut body = block_stmt(0, vec![for_(2, vec![switch(7, vec![
    case(16, vec![brk(24)]),
    default_case(32, vec![fallthrough(42)]),
  ])])]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body), vec![
    target(1, TargetKind::Switch, Loc(7, 13)),
    None,
  ]);
}

#[test]
fn select_captures_unlabeled_break() {
  let mut body = block_stmt(0, vec![for_(2, vec![select(7, vec![
    comm(16, true, vec![brk(30)]),
    comm(40, false, vec![cont(50)]),
  ])])]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body), vec![
    target(1, TargetKind::Select, Loc(7, 13)),
    target(0, TargetKind::For, Loc(2, 5)),
  ]);
}

#[test]
fn top_level_break() {
  let mut body = block_stmt(0, vec![brk(2)]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "break is not in a loop, switch, or select"
  ]);
  assert_eq!(diagnostics[0].code, "BR0001");
  assert_eq!(diagnostics[0].primary, Span::from_loc(FileId(0), Loc(2, 7)));
  assert_eq!(targets(&body), vec![None]);
}

#[test]
fn continue_outside_loop() {
  let mut body = block_stmt(0, vec![
    cont(2),
    switch(12, vec![case(21, vec![cont(29)])]),
  ]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "continue is not in a loop",
    "continue is not in a loop",
  ]);
  assert!(diagnostics.iter().all(|d| d.code == "BR0002"));
  assert_eq!(targets(&body), vec![None, None]);
}

#[test]
fn if_and_else_inherit_targets() {
  let mut body = block_stmt(0, vec![for_(2, vec![if_(
    7,
    vec![cont(15)],
    Some(block(25, vec![brk(27)])),
  )])]);
  assert!(run(&mut body).is_empty());
  let for_target = target(0, TargetKind::For, Loc(2, 5));
  assert_eq!(targets(&body), vec![for_target, for_target]);
}

#[test]
fn duplicate_label_keeps_first_declaration() {
  let mut body = block_stmt(0, vec![
    labeled(2, "L", for_(5, vec![brk_to(11, "L")])),
    labeled(20, "L", for_(23, vec![cont_to(29, "L")])),
  ]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "label L already defined at 1:3",
    "invalid continue label L",
  ]);
  let duplicate = &diagnostics[0];
  assert_eq!(duplicate.code, "BR0003");
  assert_eq!(duplicate.primary, Span::from_loc(FileId(0), Loc(20, 21)));
  assert_eq!(duplicate.labels.len(), 1);
  assert_eq!(duplicate.labels[0].span, Span::from_loc(FileId(0), Loc(2, 3)));
  assert_eq!(duplicate.labels[0].message, "previous declaration here");

  // The name means the first loop, which does not enclose the second one.
  assert_eq!(diagnostics[1].code, "BR0008");
  assert_eq!(diagnostics[1].primary, Span::from_loc(FileId(0), Loc(38, 39)));
  let first_loop = target(1, TargetKind::For, Loc(5, 8));
  assert_eq!(targets(&body), vec![first_loop, None]);
}

#[test]
fn break_inside_duplicate_is_not_redirected() {
  let mut body = block_stmt(0, vec![
    labeled(2, "L", for_(5, vec![])),
    labeled(20, "L", for_(23, vec![brk_to(29, "L")])),
  ]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "label L already defined at 1:3",
    "invalid break label L",
  ]);
  assert_eq!(diagnostics[1].code, "BR0007");
  assert_eq!(targets(&body), vec![None]);
}

#[test]
fn nested_labels_resolve_to_their_own_loops() {
  let mut body = block_stmt(0, vec![labeled(2, "Outer", for_(9, vec![labeled(
    20,
    "Inner",
    for_(27, vec![
      brk_to(35, "Outer"),
      cont_to(50, "Inner"),
      switch(70, vec![case(80, vec![brk_to(90, "Inner")])]),
    ]),
  )]))]);
  assert!(run(&mut body).is_empty());
  let outer = target(1, TargetKind::For, Loc(9, 12));
  let inner = target(3, TargetKind::For, Loc(27, 30));
  assert_eq!(targets(&body), vec![outer, inner, inner]);
}

#[test]
fn unused_label_reported_after_walk() {
  let mut body = block_stmt(0, vec![labeled(2, "Unused", for_(10, vec![])), brk(20)]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "break is not in a loop, switch, or select",
    "label Unused defined and not used",
  ]);
  assert_eq!(diagnostics[1].code, "BR0004");
  assert_eq!(diagnostics[1].primary, Span::from_loc(FileId(0), Loc(2, 8)));
}

#[test]
fn unused_labels_in_declaration_order() {
  let mut body = block_stmt(0, vec![
    labeled(2, "B", expr(5, "f")),
    for_(12, vec![labeled(17, "A", expr(20, "g"))]),
  ]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "label B defined and not used",
    "label A defined and not used",
  ]);
}

#[test]
fn break_label_on_if_is_invalid() {
  let mut body = block_stmt(0, vec![labeled(2, "L", if_(5, vec![brk_to(13, "L")], None))]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec!["invalid break label L"]);
  assert_eq!(diagnostics[0].code, "BR0007");
  assert_eq!(diagnostics[0].primary, Span::from_loc(FileId(0), Loc(19, 20)));
  assert_eq!(targets(&body), vec![None]);
}

#[test]
fn break_label_on_block_is_invalid() {
  let mut body = block_stmt(0, vec![labeled(2, "L", block(5, vec![brk_to(7, "L")]))]);
  assert_eq!(messages(&run(&mut body)), vec!["invalid break label L"]);
}

#[test]
fn continue_label_on_switch_is_invalid() {
  let mut body = block_stmt(0, vec![for_(2, vec![labeled(
    7,
    "S",
    switch(10, vec![case(19, vec![cont_to(27, "S"), brk_to(40, "S")])]),
  )])]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec!["invalid continue label S"]);
  assert_eq!(diagnostics[0].code, "BR0008");
  assert_eq!(diagnostics[0].primary, Span::from_loc(FileId(0), Loc(36, 37)));
  assert_eq!(targets(&body), vec![
    None,
    target(2, TargetKind::Switch, Loc(10, 16)),
  ]);
}

#[test]
fn label_of_sibling_statement_is_invalid() {
  let mut body = block_stmt(0, vec![
    labeled(2, "L", for_(5, vec![])),
    for_(12, vec![brk_to(18, "L")]),
  ]);
  // The label counts as used even though the reference is rejected.
  assert_eq!(messages(&run(&mut body)), vec!["invalid break label L"]);
}

#[test]
fn outer_label_of_stacked_labels_is_invalid() {
  let mut body = block_stmt(0, vec![labeled(
    2,
    "A",
    labeled(5, "B", for_(8, vec![brk_to(14, "A"), cont_to(24, "B")])),
  )]);
  assert_eq!(messages(&run(&mut body)), vec!["invalid break label A"]);
  assert_eq!(targets(&body), vec![None, target(2, TargetKind::For, Loc(8, 11))]);
}

#[test]
fn undefined_labels() {
  let mut body = block_stmt(0, vec![for_(2, vec![brk_to(8, "M"), cont_to(16, "N")])]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec![
    "break label not defined: M",
    "continue label not defined: N",
  ]);
  assert_eq!(diagnostics[0].code, "BR0005");
  assert_eq!(diagnostics[1].code, "BR0006");
  assert_eq!(diagnostics[1].primary, Span::from_loc(FileId(0), Loc(25, 26)));
  assert_eq!(targets(&body), vec![None, None]);
}

#[test]
fn blank_label_is_not_declared() {
  let mut body = block_stmt(0, vec![labeled(2, "_", for_(5, vec![brk(11), brk_to(17, "_")]))]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec!["break label not defined: _"]);
  assert_eq!(targets(&body)[0], target(1, TargetKind::For, Loc(5, 8)));
}

#[test]
fn goto_resolves_forward_and_backward() {
  let mut body = block_stmt(0, vec![
    goto(2, "End"),
    labeled(12, "Top", expr(17, "f")),
    goto(24, "Top"),
    labeled(34, "End", empty(39)),
  ]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body), vec![
    target(4, TargetKind::Labeled, Loc(34, 39)),
    target(1, TargetKind::Labeled, Loc(12, 20)),
  ]);
}

#[test]
fn goto_into_other_block_is_resolved() {
  let mut body = block_stmt(0, vec![
    goto(2, "Inner"),
    for_(14, vec![labeled(19, "Inner", expr(26, "f"))]),
  ]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body)[0].map(|t| t.kind), Some(TargetKind::Labeled));
}

#[test]
fn goto_undefined_label() {
  let mut body = block_stmt(0, vec![goto(2, "Nowhere")]);
  let diagnostics = run(&mut body);
  assert_eq!(messages(&diagnostics), vec!["label Nowhere not defined"]);
  assert_eq!(diagnostics[0].code, "BR0009");
  assert_eq!(diagnostics[0].primary, Span::from_loc(FileId(0), Loc(7, 14)));
}

#[test]
fn labeled_fallthrough_aborts() {
  let mut body = block_stmt(0, vec![
    brk(2),
    labeled(10, "L", for_(13, vec![])),
    branch(20, BranchTok::Fallthrough, Some("L")),
  ]);
  let (diagnostics, result) = run_with(&mut body, CheckOptions::default());
  assert_eq!(result, Err(CheckError::LabeledFallthrough { loc: Loc(32, 33) }));
  // Earlier diagnostics stand; unused labels are not swept.
  assert_eq!(messages(&diagnostics), vec![
    "break is not in a loop, switch, or select"
  ]);
}

#[test]
fn unlabeled_goto_aborts() {
  let mut body = block_stmt(0, vec![branch(2, BranchTok::Goto, None)]);
  let (diagnostics, result) = run_with(&mut body, CheckOptions::default());
  assert_eq!(result, Err(CheckError::UnlabeledGoto { loc: Loc(2, 6) }));
  assert!(diagnostics.is_empty());
}

#[test]
fn nesting_limit() {
  let mut body = block_stmt(0, vec![block(1, vec![block(2, vec![block(3, vec![])])])]);
  let (_, result) = run_with(&mut body, CheckOptions { max_depth: 3 });
  assert_eq!(result, Err(CheckError::NestingTooDeep {
    limit: 3,
    loc: Loc(3, 4)
  }));

  let (_, result) = run_with(&mut body, CheckOptions { max_depth: 4 });
  assert_eq!(result, Ok(()));
}

#[test]
fn closures_are_not_entered() {
  let mut body = block_stmt(0, vec![expr_stmt(func_lit(2, vec![brk(9)]))]);
  assert!(run(&mut body).is_empty());
  assert_eq!(targets(&body), vec![None]);
}

#[test]
fn statements_are_numbered_in_pre_order() {
  let mut body = block_stmt(0, vec![
    expr(2, "f"),
    labeled(8, "L", for_(11, vec![brk_to(17, "L")])),
    expr(30, "g"),
  ]);
  run(&mut body);
  let ids: Vec<_> = body.stx.body.iter().map(|s| stmt_id(&s.assoc)).collect();
  assert_eq!(ids, vec![Some(StmtId(0)), Some(StmtId(1)), Some(StmtId(4))]);
  let Stmt::Labeled(labeled) = body.stx.body[1].stx.as_ref() else {
    panic!("expected labeled statement");
  };
  assert_eq!(stmt_id(&labeled.stx.stmt.assoc), Some(StmtId(2)));
  assert_eq!(targets(&body), vec![target(2, TargetKind::For, Loc(11, 14))]);
}

#[test]
fn rerunning_is_idempotent() {
  let mut body = block_stmt(0, vec![
    labeled(2, "L", for_(5, vec![brk_to(11, "L"), brk_to(20, "M")])),
    labeled(30, "L", expr(33, "f")),
    labeled(40, "U", expr(43, "g")),
    brk(50),
    goto(60, "L"),
  ]);
  let first = run(&mut body);
  let first_targets = targets(&body);
  let second = run(&mut body);
  assert_eq!(first, second);
  assert_eq!(first_targets, targets(&body));
  assert_eq!(first.len(), 4);
}

#[test]
fn stale_targets_are_cleared() {
  let mut body = block_stmt(0, vec![brk(2)]);
  let Stmt::Branch(branch) = body.stx.body[0].stx.as_mut() else {
    panic!("expected branch");
  };
  branch.stx.target = target(7, TargetKind::For, Loc(0, 1));
  run(&mut body);
  assert_eq!(targets(&body), vec![None]);
}
