//! Syntax tree for the rk front end.
//!
//! Trees are produced by the parser (or deserialized from its JSON output) and
//! consumed by semantic passes such as branch checking. Passes annotate trees
//! through [`ast::node::NodeAssocData`] and the few output fields the syntax
//! types reserve for them (e.g. [`ast::stmt::BranchStmt::target`]).

pub mod ast;
pub mod build;
pub mod loc;
