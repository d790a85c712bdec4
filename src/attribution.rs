//! Maps a mutation back to the function it altered.
//!
//! Both listings are line-numbered before diffing, so the removed side of
//! the diff carries stable pre-mutation line numbers even when the edit
//! shifts later lines. The first removed line of the first hunk anchors the
//! lookup against the original's top-level function spans. Mutations that
//! touch several non-contiguous regions resolve to the first edit only; an
//! unresolved attribution is an expected outcome, not an error.

use similar::{ChangeTag, TextDiff};
use tree_sitter::{Node, Parser};

/// Context lines kept around each diff hunk.
pub const DIFF_CONTEXT: usize = 4;

/// Span of one top-level function in the original source, 1-based and
/// inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Prefixes each line with its right-aligned 1-based number, `"{n}: {line}"`.
/// The column width is fixed so an edit that changes the line count does not
/// perturb the numbering of unrelated lines.
pub fn add_line_numbers(source: &str) -> String {
    source
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{:>4}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Unified line diff between two listings, context [`DIFF_CONTEXT`], with
/// the file and hunk header lines already dropped. Removed lines are
/// prefixed `"- "`, inserted lines `"+ "`, context lines `"  "`.
pub fn diff_lines(original: &str, mutant: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(original, mutant);
    let mut unified = diff.unified_diff();
    unified.context_radius(DIFF_CONTEXT);

    let mut out = Vec::new();
    for hunk in unified.iter_hunks() {
        for change in hunk.iter_changes() {
            let prefix = match change.tag() {
                ChangeTag::Delete => "- ",
                ChangeTag::Insert => "+ ",
                ChangeTag::Equal => "  ",
            };
            out.push(format!("{}{}", prefix, change.value().trim_end_matches('\n')));
        }
    }
    out
}

/// Original line number embedded in the first removed line of a numbered
/// diff, if any.
pub fn first_removed_line(diff: &[String]) -> Option<usize> {
    let removed = diff.iter().find_map(|line| line.strip_prefix("- "))?;
    let (number, _) = removed.split_once(':')?;
    number.trim().parse().ok()
}

/// Top-level function definitions of a Python module with their line spans.
/// Nested functions are attributed to their enclosing definition.
pub fn function_spans(source: &str) -> Vec<FunctionSpan> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    if parser.set_language(&language.into()).is_err() {
        return Vec::new();
    }
    let Some(tree) = parser.parse(source, None) else {
        return Vec::new();
    };

    let root = tree.root_node();
    let mut spans = Vec::new();
    let count = root.child_count();
    for i in 0..count {
        let Some(child) = root.child(i) else { continue };
        let func = match child.kind() {
            "function_definition" => Some(child),
            "decorated_definition" => child
                .child_by_field_name("definition")
                .filter(|n| n.kind() == "function_definition"),
            _ => None,
        };
        if let Some(func) = func {
            if let Some(name_node) = func.child_by_field_name("name") {
                spans.push(FunctionSpan {
                    name: node_text(name_node, source).to_string(),
                    start_line: func.start_position().row + 1,
                    end_line: func.end_position().row + 1,
                });
            }
        }
    }
    spans
}

/// Name of the top-level function whose span contains `line`.
pub fn function_name_at(source: &str, line: usize) -> Option<String> {
    function_spans(source)
        .into_iter()
        .find(|span| span.start_line <= line && line <= span.end_line)
        .map(|span| span.name)
}

/// Resolves which function of `original` a mutation altered, given the
/// regenerated mutant listing. `None` when no removed line is found or no
/// function span contains it.
pub fn attribute(original: &str, mutant: &str) -> Option<String> {
    let diff = diff_lines(&add_line_numbers(original), &add_line_numbers(mutant));
    let line = first_removed_line(&diff)?;
    function_name_at(original, line)
}

fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}
