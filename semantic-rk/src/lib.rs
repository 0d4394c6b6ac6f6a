//! Semantic checks over `syntax-rk` trees.
//!
//! The crate currently hosts the branch pass, which validates labels and the
//! structured jumps (`break`, `continue`, `fallthrough`, `goto`) of each
//! function body and records where every branch transfers control:
//! - [`branches`]: the per-body pass and its label table.
//! - [`file`]: runs the pass over every function body of a file, in parallel.
//! - [`assoc`]: helpers for reading identities the pass attaches to nodes.
//! - [`codes`]: the stable diagnostic codes the pass emits.
//!
//! ```
//! use diagnostics::FileId;
//! use semantic_rk::{check_file, CheckContext};
//! use syntax_rk::build::{brk, brk_to, file, for_, func, labeled};
//! use syntax_rk::loc::LineIndex;
//!
//! let mut ast = file(vec![func(0, "f", vec![
//!   labeled(11, "L", for_(14, vec![brk_to(20, "L")])),
//!   brk(30),
//! ])]);
//! let lines = LineIndex::new("");
//! let diagnostics = check_file(&mut ast, &CheckContext::new(FileId(0), &lines));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].code, "BR0001");
//! assert_eq!(diagnostics[0].message, "break is not in a loop, switch, or select");
//! ```

pub mod assoc;
pub mod branches;
pub mod codes;
mod error;
pub mod file;

pub use branches::check_branches;
pub use branches::CheckContext;
pub use branches::CheckOptions;
pub use error::CheckError;
pub use file::check_file;
