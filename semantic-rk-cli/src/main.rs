use clap::Parser;
use derive_visitor::{Drive, Visitor};
use diagnostics::render::{render_diagnostic, SourceProvider};
use diagnostics::{Diagnostic, FileId, Severity};
use semantic_rk::branches::DEFAULT_MAX_DEPTH;
use semantic_rk::{check_file, CheckContext, CheckOptions};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use syntax_rk::ast::node::Node;
use syntax_rk::ast::stmt::{BranchStmt, BranchTarget, BranchTok};
use syntax_rk::ast::stx::File;
use syntax_rk::loc::{LineIndex, Loc};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(
  author,
  version,
  about = "Check labels and branch statements of an rk syntax tree"
)]
struct Cli {
  /// Syntax tree of one file, as JSON.
  ast: PathBuf,

  /// Source text the tree was parsed from; enables line:col positions and
  /// snippets.
  #[arg(long)]
  source: Option<PathBuf>,

  /// Print diagnostics and resolved branch targets as JSON on stdout.
  #[arg(long)]
  json: bool,

  /// Maximum block nesting depth per function body.
  #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
  max_depth: usize,

  /// Emit tracing spans (JSON) on stderr.
  #[arg(long)]
  trace: bool,
}

/// The single file being checked.
struct InputFile {
  name: String,
  text: Option<String>,
}

impl SourceProvider for InputFile {
  fn file_name(&self, file: FileId) -> Option<&str> {
    (file == FileId(0)).then_some(self.name.as_str())
  }

  fn file_text(&self, file: FileId) -> Option<&str> {
    self.text.as_deref().filter(|_| file == FileId(0))
  }
}

#[derive(Serialize)]
struct BranchReport {
  tok: BranchTok,
  loc: Loc,
  #[serde(skip_serializing_if = "Option::is_none")]
  label: Option<String>,
  target: Option<BranchTarget>,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
  diagnostics: &'a [Diagnostic],
  branches: Vec<BranchReport>,
}

type BranchStmtNode = Node<BranchStmt>;

#[derive(Default, Visitor)]
#[visitor(BranchStmtNode(enter))]
struct CollectBranches {
  branches: Vec<BranchReport>,
}

impl CollectBranches {
  fn enter_branch_stmt_node(&mut self, node: &BranchStmtNode) {
    self.branches.push(BranchReport {
      tok: node.stx.tok,
      loc: node.loc,
      label: node.stx.label.as_ref().map(|l| l.stx.name.clone()),
      target: node.stx.target,
    });
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.trace);

  let raw = match fs::read_to_string(&cli.ast) {
    Ok(raw) => raw,
    Err(err) => {
      eprintln!("failed to read {}: {err}", cli.ast.display());
      return ExitCode::from(2);
    }
  };
  let mut ast: Node<File> = match serde_json::from_str(&raw) {
    Ok(ast) => ast,
    Err(err) => {
      eprintln!("invalid syntax tree in {}: {err}", cli.ast.display());
      return ExitCode::from(2);
    }
  };
  let input = match &cli.source {
    Some(path) => match fs::read_to_string(path) {
      Ok(text) => InputFile {
        name: path.display().to_string(),
        text: Some(text),
      },
      Err(err) => {
        eprintln!("failed to read {}: {err}", path.display());
        return ExitCode::from(2);
      }
    },
    None => InputFile {
      name: cli.ast.display().to_string(),
      text: None,
    },
  };

  let lines = LineIndex::new(input.text.as_deref().unwrap_or(""));
  let cx = CheckContext::new(FileId(0), &lines).with_options(CheckOptions {
    max_depth: cli.max_depth,
  });
  let diagnostics = check_file(&mut ast, &cx);

  if cli.json {
    let mut collect = CollectBranches::default();
    ast.drive(&mut collect);
    let output = JsonOutput {
      diagnostics: &diagnostics,
      branches: collect.branches,
    };
    match serde_json::to_string_pretty(&output) {
      Ok(serialized) => println!("{serialized}"),
      Err(err) => {
        eprintln!("failed to serialize JSON: {err}");
        return ExitCode::from(2);
      }
    }
  } else {
    for diagnostic in &diagnostics {
      eprintln!("{}", render_diagnostic(&input, diagnostic));
    }
  }

  let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
  if has_errors {
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let _ = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(Level::DEBUG)
    .json()
    .with_ansi(false)
    .with_writer(std::io::stderr)
    .try_init();
}
