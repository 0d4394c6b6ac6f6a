use ahash::HashMap;
use syntax_rk::ast::stmt::BranchTarget;
use syntax_rk::ast::stmt::StmtId;
use syntax_rk::ast::stmt::TargetKind;
use syntax_rk::loc::Loc;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BlockId(u32);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LabelId(u32);

/// A statement list being walked: a function body, a braced block, a branch
/// of an `if`, or a clause of a `switch`/`select`.
#[derive(Clone, Debug)]
pub struct Block {
  pub parent: Option<BlockId>,
  /// Labeled statement that introduced this block, if any. A duplicate label
  /// still ties its blocks to its own statement.
  pub labeled: Option<StmtId>,
}

/// Arena of blocks; parents are referred to by index.
#[derive(Default, Debug)]
pub struct Blocks {
  blocks: Vec<Block>,
}

impl Blocks {
  pub fn push(&mut self, parent: Option<BlockId>, labeled: Option<StmtId>) -> BlockId {
    let id = BlockId(self.blocks.len() as u32);
    self.blocks.push(Block { parent, labeled });
    id
  }

  pub fn get(&self, id: BlockId) -> &Block {
    &self.blocks[id.0 as usize]
  }

  /// `from` followed by each enclosing block, innermost first.
  pub fn ancestors(&self, from: BlockId) -> impl Iterator<Item = &Block> + '_ {
    std::iter::successors(Some(self.get(from)), |block| {
      block.parent.map(|parent| self.get(parent))
    })
  }
}

#[derive(Clone, Debug)]
pub struct Label {
  pub name: String,
  /// Location of the label identifier.
  pub loc: Loc,
  /// The labeled statement.
  pub stmt: StmtId,
  pub stmt_loc: Loc,
  /// The labeled `for`, `switch` or `select`; None for any other statement.
  pub referent: Option<BranchTarget>,
  pub used: bool,
}

impl Label {
  /// Where a `goto` naming this label lands.
  pub fn goto_target(&self) -> BranchTarget {
    BranchTarget {
      stmt: self.stmt,
      kind: TargetKind::Labeled,
      loc: self.stmt_loc,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Declared {
  New(LabelId),
  /// The name was taken; holds the first declaration, which stays in effect.
  Duplicate(LabelId),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolution {
  NotFound,
  /// Declared, but not on a statement enclosing the branch.
  NotEnclosing(LabelId),
  Found(LabelId),
}

/// All labels of one function body. Labels share a single namespace
/// regardless of the block they are declared in.
#[derive(Default, Debug)]
pub struct LabelTable {
  labels: Vec<Label>,
  by_name: HashMap<String, LabelId>,
}

impl LabelTable {
  pub fn declare(&mut self, label: Label) -> Declared {
    if let Some(&existing) = self.by_name.get(&label.name) {
      return Declared::Duplicate(existing);
    }
    let id = LabelId(self.labels.len() as u32);
    self.by_name.insert(label.name.clone(), id);
    self.labels.push(label);
    Declared::New(id)
  }

  pub fn get(&self, id: LabelId) -> &Label {
    &self.labels[id.0 as usize]
  }

  pub fn lookup(&self, name: &str) -> Option<LabelId> {
    self.by_name.get(name).copied()
  }

  pub fn mark_used(&mut self, id: LabelId) {
    self.labels[id.0 as usize].used = true;
  }

  /// Finds the label `name` among the labels of statements enclosing block
  /// `from`. Any declared label is marked used, even if it turns out not to be
  /// a valid target.
  pub fn resolve_target(&mut self, blocks: &Blocks, from: BlockId, name: &str) -> Resolution {
    let Some(id) = self.lookup(name) else {
      return Resolution::NotFound;
    };
    self.mark_used(id);
    let stmt = self.get(id).stmt;
    if blocks.ancestors(from).any(|block| block.labeled == Some(stmt)) {
      Resolution::Found(id)
    } else {
      Resolution::NotEnclosing(id)
    }
  }

  /// Labels never used, in declaration order.
  pub fn unused(&self) -> impl Iterator<Item = &Label> + '_ {
    self.labels.iter().filter(|label| !label.used)
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }
}
