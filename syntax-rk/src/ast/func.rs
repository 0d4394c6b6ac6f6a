use derive_visitor::{Drive, DriveMut};
use serde::{Deserialize, Serialize};

use super::{expr::Ident, node::Node, stmt::BlockStmt};

#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct FuncDecl {
  pub name: Node<Ident>,
  #[serde(default)]
  pub params: Vec<Node<Ident>>,
  // None for functions implemented outside the language (assembly, linkname).
  #[serde(default)]
  pub body: Option<Node<BlockStmt>>,
}

/// A function literal. Its body is a function body of its own: labels declared
/// outside are not visible inside and vice versa.
#[derive(Debug, Drive, DriveMut, Serialize, Deserialize)]
pub struct FuncLit {
  #[serde(default)]
  pub params: Vec<Node<Ident>>,
  pub body: Node<BlockStmt>,
}
