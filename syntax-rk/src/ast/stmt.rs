use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

use super::{
  expr::{Expr, Ident},
  node::Node,
  stx::VarDecl,
};
use crate::loc::Loc;

// We must wrap each variant with Node<T> as otherwise we won't be able to visit Node<T> instead of just T.
#[derive(Debug, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Stmt {
  Assign(Node<AssignStmt>),
  Block(Node<BlockStmt>),
  Branch(Node<BranchStmt>),
  Decl(Node<VarDecl>),
  Empty(Node<EmptyStmt>),
  Expr(Node<ExprStmt>),
  For(Node<ForStmt>),
  If(Node<IfStmt>),
  Labeled(Node<LabeledStmt>),
  Return(Node<ReturnStmt>),
  Select(Node<SelectStmt>),
  Send(Node<SendStmt>),
  Switch(Node<SwitchStmt>),
}

/// Identity of a statement within one function body: its pre-order number
/// among the statements the branch checker visits, starting at zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchTok {
  Break,
  Continue,
  Fallthrough,
  Goto,
}

impl BranchTok {
  pub const fn as_str(&self) -> &'static str {
    match self {
      BranchTok::Break => "break",
      BranchTok::Continue => "continue",
      BranchTok::Fallthrough => "fallthrough",
      BranchTok::Goto => "goto",
    }
  }
}

impl Display for BranchTok {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Kind of statement a branch transfers control to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
  For,
  Switch,
  Select,
  /// A labeled statement; only `goto` targets these.
  Labeled,
}

impl TargetKind {
  /// Whether a `break` may terminate a statement of this kind.
  pub fn is_breakable(&self) -> bool {
    matches!(self, TargetKind::For | TargetKind::Switch | TargetKind::Select)
  }

  /// Whether a `continue` may advance a statement of this kind.
  pub fn is_continuable(&self) -> bool {
    matches!(self, TargetKind::For)
  }
}

/// Resolved destination of a branch statement.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BranchTarget {
  pub stmt: StmtId,
  pub kind: TargetKind,
  pub loc: Loc,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct AssignStmt {
  // `:=` rather than `=`.
  #[drive(skip)]
  #[serde(default)]
  pub define: bool,
  pub lhs: Vec<Node<Expr>>,
  pub rhs: Vec<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct BlockStmt {
  #[serde(default)]
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct BranchStmt {
  #[drive(skip)]
  pub tok: BranchTok,
  #[serde(default)]
  pub label: Option<Node<Ident>>,
  // Written by branch checking; None until resolved or if resolution failed.
  #[drive(skip)]
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub target: Option<BranchTarget>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct EmptyStmt {}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct ExprStmt {
  pub expr: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct ForStmt {
  #[serde(default)]
  pub init: Option<Node<Stmt>>,
  #[serde(default)]
  pub cond: Option<Node<Expr>>,
  #[serde(default)]
  pub post: Option<Node<Stmt>>,
  pub body: Node<BlockStmt>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct IfStmt {
  #[serde(default)]
  pub init: Option<Node<Stmt>>,
  pub cond: Node<Expr>,
  pub then: Node<BlockStmt>,
  // Either another IfStmt or a BlockStmt.
  #[serde(default)]
  pub alternate: Option<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct LabeledStmt {
  pub label: Node<Ident>,
  pub stmt: Node<Stmt>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct ReturnStmt {
  #[serde(default)]
  pub results: Vec<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct SelectStmt {
  #[serde(default)]
  pub body: Vec<Node<CommClause>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct CommClause {
  // If None, it's `default`.
  #[serde(default)]
  pub comm: Option<Node<Stmt>>,
  #[serde(default)]
  pub body: Vec<Node<Stmt>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct SendStmt {
  pub chan: Node<Expr>,
  pub value: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct SwitchStmt {
  #[serde(default)]
  pub init: Option<Node<Stmt>>,
  #[serde(default)]
  pub tag: Option<Node<Expr>>,
  #[serde(default)]
  pub body: Vec<Node<CaseClause>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct CaseClause {
  // Empty for `default`.
  #[serde(default)]
  pub cases: Vec<Node<Expr>>,
  #[serde(default)]
  pub body: Vec<Node<Stmt>>,
}
