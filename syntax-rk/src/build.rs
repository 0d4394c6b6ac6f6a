//! Constructors for synthesizing trees without a parser.
//!
//! Each helper takes the byte offset `at` where the construct starts and gives
//! the node a location covering its leading keyword (or name), which is where
//! diagnostics about it point. Nested positions such as a branch's label are
//! derived from `at` the way they would appear in formatted source, e.g.
//! `brk_to(10, "L")` places the label identifier at offset 16.

use crate::ast::expr::{CallExpr, Expr, IdExpr, Ident, LitExpr};
use crate::ast::func::{FuncDecl, FuncLit};
use crate::ast::node::Node;
use crate::ast::stmt::{
  BlockStmt, BranchStmt, BranchTok, CaseClause, CommClause, EmptyStmt, ExprStmt, ForStmt, IfStmt,
  LabeledStmt, SelectStmt, Stmt, SwitchStmt,
};
use crate::ast::stx::{Decl, File, VarDecl};
use crate::loc::Loc;

pub fn ident(at: usize, name: &str) -> Node<Ident> {
  Node::new(Loc::at(at, name.len()), Ident {
    name: name.to_string(),
  })
}

pub fn id(at: usize, name: &str) -> Node<Expr> {
  Node::new(Loc::at(at, name.len()), IdExpr {
    name: name.to_string(),
  })
  .wrap(Expr::from)
}

pub fn lit(at: usize, value: &str) -> Node<Expr> {
  Node::new(Loc::at(at, value.len()), LitExpr {
    value: value.to_string(),
  })
  .wrap(Expr::from)
}

/// `name()` as an expression statement.
pub fn expr(at: usize, name: &str) -> Node<Stmt> {
  let callee = id(at, name);
  let call = Node::new(Loc::at(at, name.len() + 2), CallExpr {
    callee,
    args: Vec::new(),
  })
  .wrap(Expr::from);
  expr_stmt(call)
}

pub fn expr_stmt(expr: Node<Expr>) -> Node<Stmt> {
  Node::new(expr.loc, ExprStmt { expr }).wrap(Stmt::from)
}

pub fn empty(at: usize) -> Node<Stmt> {
  Node::new(Loc::at(at, 0), EmptyStmt {}).wrap(Stmt::from)
}

pub fn block_stmt(at: usize, body: Vec<Node<Stmt>>) -> Node<BlockStmt> {
  Node::new(Loc::at(at, 1), BlockStmt { body })
}

pub fn block(at: usize, body: Vec<Node<Stmt>>) -> Node<Stmt> {
  block_stmt(at, body).wrap(Stmt::from)
}

/// `name: stmt`, with the label identifier at `at`.
pub fn labeled(at: usize, name: &str, stmt: Node<Stmt>) -> Node<Stmt> {
  let label = ident(at, name);
  let loc = label.loc + stmt.loc;
  Node::new(loc, LabeledStmt { label, stmt }).wrap(Stmt::from)
}

pub fn branch(at: usize, tok: BranchTok, label: Option<&str>) -> Node<Stmt> {
  let keyword = tok.as_str().len();
  let label = label.map(|name| ident(at + keyword + 1, name));
  let loc = Loc::at(at, keyword).add_option(label.as_ref().map(|l| l.loc));
  Node::new(loc, BranchStmt {
    tok,
    label,
    target: None,
  })
  .wrap(Stmt::from)
}

pub fn brk(at: usize) -> Node<Stmt> {
  branch(at, BranchTok::Break, None)
}

pub fn brk_to(at: usize, label: &str) -> Node<Stmt> {
  branch(at, BranchTok::Break, Some(label))
}

pub fn cont(at: usize) -> Node<Stmt> {
  branch(at, BranchTok::Continue, None)
}

pub fn cont_to(at: usize, label: &str) -> Node<Stmt> {
  branch(at, BranchTok::Continue, Some(label))
}

pub fn fallthrough(at: usize) -> Node<Stmt> {
  branch(at, BranchTok::Fallthrough, None)
}

pub fn goto(at: usize, label: &str) -> Node<Stmt> {
  branch(at, BranchTok::Goto, Some(label))
}

/// `for { body }` with the body's brace at `at + 4`.
pub fn for_(at: usize, body: Vec<Node<Stmt>>) -> Node<Stmt> {
  Node::new(Loc::at(at, 3), ForStmt {
    init: None,
    cond: None,
    post: None,
    body: block_stmt(at + 4, body),
  })
  .wrap(Stmt::from)
}

/// `if c { then } else alternate`.
pub fn if_(at: usize, then: Vec<Node<Stmt>>, alternate: Option<Node<Stmt>>) -> Node<Stmt> {
  Node::new(Loc::at(at, 2), IfStmt {
    init: None,
    cond: id(at + 3, "c"),
    then: block_stmt(at + 5, then),
    alternate,
  })
  .wrap(Stmt::from)
}

/// `case 1: body`.
pub fn case(at: usize, body: Vec<Node<Stmt>>) -> Node<CaseClause> {
  Node::new(Loc::at(at, 4), CaseClause {
    cases: vec![lit(at + 5, "1")],
    body,
  })
}

/// `default: body` inside a switch.
pub fn default_case(at: usize, body: Vec<Node<Stmt>>) -> Node<CaseClause> {
  Node::new(Loc::at(at, 7), CaseClause {
    cases: Vec::new(),
    body,
  })
}

pub fn switch(at: usize, clauses: Vec<Node<CaseClause>>) -> Node<Stmt> {
  Node::new(Loc::at(at, 6), SwitchStmt {
    init: None,
    tag: None,
    body: clauses,
  })
  .wrap(Stmt::from)
}

/// `case <-ch: body`, or `default: body` when `recv` is false.
pub fn comm(at: usize, recv: bool, body: Vec<Node<Stmt>>) -> Node<CommClause> {
  let comm = recv.then(|| expr(at + 5, "recv"));
  Node::new(Loc::at(at, if recv { 4 } else { 7 }), CommClause { comm, body })
}

pub fn select(at: usize, clauses: Vec<Node<CommClause>>) -> Node<Stmt> {
  Node::new(Loc::at(at, 6), SelectStmt { body: clauses }).wrap(Stmt::from)
}

/// `func() { body }` as an expression.
pub fn func_lit(at: usize, body: Vec<Node<Stmt>>) -> Node<Expr> {
  Node::new(Loc::at(at, 4), FuncLit {
    params: Vec::new(),
    body: block_stmt(at + 7, body),
  })
  .wrap(Expr::from)
}

/// `func name() { body }`.
pub fn func(at: usize, name: &str, body: Vec<Node<Stmt>>) -> Node<Decl> {
  let name_node = ident(at + 5, name);
  let body = block_stmt(at + 8 + name.len(), body);
  Node::new(Loc::at(at, 4), FuncDecl {
    name: name_node,
    params: Vec::new(),
    body: Some(body),
  })
  .wrap(Decl::from)
}

/// `func name()` without a body.
pub fn extern_func(at: usize, name: &str) -> Node<Decl> {
  Node::new(Loc::at(at, 4), FuncDecl {
    name: ident(at + 5, name),
    params: Vec::new(),
    body: None,
  })
  .wrap(Decl::from)
}

/// `var name = value`.
pub fn var(at: usize, name: &str, value: Node<Expr>) -> Node<Decl> {
  Node::new(Loc::at(at, 3), VarDecl {
    names: vec![ident(at + 4, name)],
    values: vec![value],
  })
  .wrap(Decl::from)
}

pub fn file(decls: Vec<Node<Decl>>) -> Node<File> {
  Node::new(Loc(0, 0), File {
    package: ident(8, "main"),
    decls,
  })
}
