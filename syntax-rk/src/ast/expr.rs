use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

use super::{func::FuncLit, node::Node};

/// An identifier in a declaring position (labels, parameters, declared names).
#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct Ident {
  #[drive(skip)]
  pub name: String,
}

// Only the expression forms the front end needs to carry statements through;
// branch checking never looks inside expressions except to find closures.
#[derive(Debug, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Expr {
  Binary(Node<BinaryExpr>),
  Call(Node<CallExpr>),
  FuncLit(Node<FuncLit>),
  Id(Node<IdExpr>),
  Lit(Node<LitExpr>),
  Unary(Node<UnaryExpr>),
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct BinaryExpr {
  #[drive(skip)]
  pub op: String,
  pub left: Node<Expr>,
  pub right: Node<Expr>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct CallExpr {
  pub callee: Node<Expr>,
  #[serde(default)]
  pub args: Vec<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct IdExpr {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct LitExpr {
  // Raw literal text as written, e.g. `1`, `"s"`, `'c'`.
  #[drive(skip)]
  pub value: String,
}

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct UnaryExpr {
  #[drive(skip)]
  pub op: String,
  pub operand: Node<Expr>,
}
