//! Rendering of per-file change spans as line-oriented display rows.
//!
//! Input chunks carry whole-file context; this module numbers every line,
//! then trims the output down to a context window around each change, the
//! same shape a unified diff would show.

use serde::Serialize;

pub const ELLIPSIS: &str = ". . .";
pub const BINARY_MARKER: &str = "Changes to binary file";

/// A contiguous span of one file's content between two revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    pub op: ChunkOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOp {
    /// The span is identical in both revisions.
    Equal,
    /// The span is added by the newer revision.
    Add,
    /// The span is removed by the newer revision.
    Delete,
}

/// One row of a rendered file patch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PatchRow {
    /// Line number in the old file; absent on additions and ellipses.
    pub left: Option<u32>,
    /// Line number in the new file; absent on deletions and ellipses.
    pub right: Option<u32>,
    pub kind: RowKind,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Context,
    Add,
    Delete,
    /// Placeholder for one or more rows dropped by windowing.
    Ellipsis,
    /// The single marker row emitted for a binary file.
    Binary,
}

/// Render a file's chunks as display rows, keeping `context_lines` of
/// unchanged context around each change and collapsing the rest into
/// ellipsis rows. Binary files short-circuit to a single marker row.
pub fn render(chunks: &[Chunk], is_binary: bool, context_lines: usize) -> Vec<PatchRow> {
    if is_binary {
        return vec![PatchRow {
            left: None,
            right: None,
            kind: RowKind::Binary,
            content: BINARY_MARKER.to_string(),
        }];
    }
    let (rows, changed) = expand(chunks);
    window(rows, &changed, context_lines)
}

// Line numbers are assigned here, once, by strict sequential counting;
// windowing never renumbers, so rows on either side of an ellipsis keep
// their original, non-contiguous numbers.
fn expand(chunks: &[Chunk]) -> (Vec<PatchRow>, Vec<usize>) {
    let mut rows = Vec::new();
    let mut changed = Vec::new();
    let (mut left, mut right) = (1u32, 1u32);
    for chunk in chunks {
        for line in chunk.content.lines() {
            match chunk.op {
                ChunkOp::Equal => {
                    rows.push(PatchRow {
                        left: Some(left),
                        right: Some(right),
                        kind: RowKind::Context,
                        content: format!(" {line}"),
                    });
                    left += 1;
                    right += 1;
                }
                ChunkOp::Add => {
                    changed.push(rows.len());
                    rows.push(PatchRow {
                        left: None,
                        right: Some(right),
                        kind: RowKind::Add,
                        content: format!("+{line}"),
                    });
                    right += 1;
                }
                ChunkOp::Delete => {
                    changed.push(rows.len());
                    rows.push(PatchRow {
                        left: Some(left),
                        right: None,
                        kind: RowKind::Delete,
                        content: format!("-{line}"),
                    });
                    left += 1;
                }
            }
        }
    }
    (rows, changed)
}

fn window(rows: Vec<PatchRow>, changed: &[usize], context_lines: usize) -> Vec<PatchRow> {
    let mut out = Vec::new();
    let mut gap = false;
    for (i, row) in rows.into_iter().enumerate() {
        let keep = changed.iter().any(|&c| c.abs_diff(i) <= context_lines);
        if keep {
            if gap {
                out.push(PatchRow {
                    left: None,
                    right: None,
                    kind: RowKind::Ellipsis,
                    content: ELLIPSIS.to_string(),
                });
                gap = false;
            }
            out.push(row);
        } else {
            gap = true;
        }
    }
    // A trailing run of dropped rows emits nothing: no trailing ellipsis.
    out
}
