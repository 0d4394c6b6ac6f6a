use crate::codes;
use diagnostics::{Diagnostic, FileId, Span};
use std::error::Error;
use std::fmt;
use syntax_rk::loc::Loc;

/// Failure that aborts checking of one function body. These are contract
/// violations by whoever built the tree (a parser never produces them) or
/// exhausted limits, not user errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckError {
  UnlabeledGoto { loc: Loc },
  LabeledFallthrough { loc: Loc },
  NestingTooDeep { limit: usize, loc: Loc },
}

impl CheckError {
  pub fn loc(&self) -> Loc {
    match self {
      CheckError::UnlabeledGoto { loc }
      | CheckError::LabeledFallthrough { loc }
      | CheckError::NestingTooDeep { loc, .. } => *loc,
    }
  }

  pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
    codes::INTERNAL_ERROR.error(
      format!("internal error: {self}"),
      Span::from_loc(file, self.loc()),
    )
  }
}

impl fmt::Display for CheckError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CheckError::UnlabeledGoto { .. } => write!(f, "goto statement without a label"),
      CheckError::LabeledFallthrough { .. } => write!(f, "fallthrough statement with a label"),
      CheckError::NestingTooDeep { limit, .. } => {
        write!(f, "blocks nested deeper than {limit} levels")
      }
    }
  }
}

impl Error for CheckError {}
