use derive_more::derive::From;
use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

use super::{expr::Expr, expr::Ident, func::FuncDecl, node::Node};

/// A parsed source file.
#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct File {
  pub package: Node<Ident>,
  #[serde(default)]
  pub decls: Vec<Node<Decl>>,
}

#[derive(Debug, Drive, DriveMut, From, Serialize, Deserialize)]
#[serde(tag = "$t")]
pub enum Decl {
  Func(Node<FuncDecl>),
  Var(Node<VarDecl>),
}

/// `var a, b = x, y`, at package level or as a statement.
#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct VarDecl {
  pub names: Vec<Node<Ident>>,
  #[serde(default)]
  pub values: Vec<Node<Expr>>,
}
