use crate::Diagnostic;
use crate::FileId;
use crate::Label;
use std::fmt::Write;
use syntax_rk::loc::LineIndex;

/// Supplies file names and source text to the renderer. Either may be missing,
/// in which case positions are computed as if the file were a single line.
pub trait SourceProvider {
  fn file_name(&self, file: FileId) -> Option<&str>;
  fn file_text(&self, file: FileId) -> Option<&str>;
}

/// Renders a diagnostic as plain text:
///
/// ```text
/// error[BR0005]: break label not defined: L
///  --> main.rk:3:11
///   |
/// 3 |     break L
///   |           ^ break label not defined: L
/// ```
///
/// The primary span is underlined with `^` and carries the message unless an
/// explicit primary label covers it; secondary labels use `-`. Labels are
/// grouped per file in the order their files first appear.
pub fn render_diagnostic(provider: &dyn SourceProvider, diagnostic: &Diagnostic) -> String {
  let mut output = String::new();
  let _ = writeln!(
    output,
    "{}[{}]: {}",
    diagnostic.severity, diagnostic.code, diagnostic.message
  );

  let labels = collect_labels(diagnostic);
  let mut groups: Vec<FileGroup<'_>> = Vec::new();
  for label in labels.iter() {
    match groups.iter_mut().find(|g| g.file == label.span.file) {
      Some(group) => group.labels.push(label),
      None => {
        let text = provider.file_text(label.span.file);
        groups.push(FileGroup {
          file: label.span.file,
          name: provider
            .file_name(label.span.file)
            .unwrap_or("<unknown file>"),
          index: LineIndex::new(text.unwrap_or("")),
          text,
          labels: vec![label],
        });
      }
    }
  }

  let gutter_width = groups
    .iter()
    .filter(|g| g.text.is_some())
    .flat_map(|g| {
      g.labels
        .iter()
        .map(|l| g.index.pos(l.span.range.start as usize).line)
    })
    .max()
    .map_or(1, |line| line.to_string().len());
  let pad = " ".repeat(gutter_width);

  for group in groups.iter() {
    let first = group.index.pos(group.labels[0].span.range.start as usize);
    let _ = writeln!(output, "{pad}--> {}:{first}", group.name);
    let Some(text) = group.text else {
      continue;
    };
    let _ = writeln!(output, "{pad} |");
    for label in group.labels.iter() {
      render_label(&mut output, text, &group.index, label, gutter_width);
    }
  }

  for note in diagnostic.notes.iter() {
    let _ = writeln!(output, "= note: {note}");
  }
  output
}

struct FileGroup<'a> {
  file: FileId,
  name: &'a str,
  text: Option<&'a str>,
  index: LineIndex,
  labels: Vec<&'a Label>,
}

fn collect_labels(diagnostic: &Diagnostic) -> Vec<Label> {
  let mut labels = Vec::with_capacity(diagnostic.labels.len() + 1);
  let covered = diagnostic
    .labels
    .iter()
    .any(|l| l.is_primary && l.span == diagnostic.primary);
  if !covered {
    labels.push(Label::primary(diagnostic.primary, diagnostic.message.clone()));
  }
  labels.extend(diagnostic.labels.iter().cloned());
  labels
}

fn render_label(
  output: &mut String,
  text: &str,
  index: &LineIndex,
  label: &Label,
  gutter_width: usize,
) {
  let start = clamp_offset_to_char_boundary(text, label.span.range.start as usize);
  let line = index.line_of(start);
  let Some((line_start, line_end)) = index.line_range(line) else {
    return;
  };
  let line_text = &text[line_start..line_end];
  let start = start.clamp(line_start, line_end);
  let end = clamp_offset_to_char_boundary(text, label.span.range.end as usize).clamp(start, line_end);

  let column = text[line_start..start].chars().count();
  let width = text[start..end].chars().count().max(1);
  let marker = if label.is_primary { "^" } else { "-" };

  let _ = writeln!(output, "{:>gutter_width$} | {line_text}", line + 1);
  let _ = write!(
    output,
    "{} | {}{}",
    " ".repeat(gutter_width),
    " ".repeat(column),
    marker.repeat(width)
  );
  if !label.message.is_empty() {
    let _ = write!(output, " {}", label.message);
  }
  output.push('\n');
}

fn clamp_offset_to_char_boundary(text: &str, offset: usize) -> usize {
  let mut offset = offset.min(text.len());
  while !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}
