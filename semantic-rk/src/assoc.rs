use syntax_rk::ast::node::NodeAssocData;
use syntax_rk::ast::stmt::StmtId;

/// Identity the branch pass gave a statement; compare with
/// [`BranchTarget::stmt`](syntax_rk::ast::stmt::BranchTarget::stmt).
pub fn stmt_id(assoc: &NodeAssocData) -> Option<StmtId> {
  assoc.get::<StmtId>().copied()
}
