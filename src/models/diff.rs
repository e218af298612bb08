//! Line-level comparison between protocol versions
//!
//! Compares the exact stored byte content of two versions, line by line,
//! using a longest-common-subsequence alignment. Rendering the result is a
//! presentation concern; the comparison itself lives here because it must
//! operate on historical content, never on a re-rendered view.

use serde::{Deserialize, Serialize};

use super::ids::ProtocolGroupId;

/// How a line relates across the two versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    /// Present in both versions
    Unchanged,
    /// Only in the newer (second) version
    Added,
    /// Only in the older (first) version
    Removed,
}

/// One aligned line of a version comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffLine {
    pub op: DiffOp,
    pub text: String,
}

/// Result of comparing two versions within a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDiff {
    pub group_id: ProtocolGroupId,
    pub from_version: u32,
    pub to_version: u32,
    pub lines: Vec<DiffLine>,
}

impl VersionDiff {
    /// Number of added lines
    pub fn added(&self) -> usize {
        self.lines.iter().filter(|l| l.op == DiffOp::Added).count()
    }

    /// Number of removed lines
    pub fn removed(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.op == DiffOp::Removed)
            .count()
    }

    /// Whether the two versions have identical content
    pub fn is_identical(&self) -> bool {
        self.lines.iter().all(|l| l.op == DiffOp::Unchanged)
    }

    /// One-line summary, e.g. "+3 -1 lines"
    pub fn summary(&self) -> String {
        if self.is_identical() {
            "no changes".to_string()
        } else {
            format!("+{} -{} lines", self.added(), self.removed())
        }
    }
}

/// Compare two bodies of text line by line
///
/// Produces an aligned sequence: unchanged lines appear once, removed lines
/// come from `from`, added lines from `to`. Quadratic in line count, which is
/// fine for protocol-sized documents.
pub fn diff_lines(
    group_id: ProtocolGroupId,
    from_version: u32,
    from: &str,
    to_version: u32,
    to: &str,
) -> VersionDiff {
    let a: Vec<&str> = from.lines().collect();
    let b: Vec<&str> = to.lines().collect();

    // LCS length table: lcs[i][j] = longest common subsequence of a[i..], b[j..]
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            lines.push(DiffLine {
                op: DiffOp::Unchanged,
                text: a[i].to_string(),
            });
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(DiffLine {
                op: DiffOp::Removed,
                text: a[i].to_string(),
            });
            i += 1;
        } else {
            lines.push(DiffLine {
                op: DiffOp::Added,
                text: b[j].to_string(),
            });
            j += 1;
        }
    }
    for line in &a[i..] {
        lines.push(DiffLine {
            op: DiffOp::Removed,
            text: line.to_string(),
        });
    }
    for line in &b[j..] {
        lines.push(DiffLine {
            op: DiffOp::Added,
            text: line.to_string(),
        });
    }

    VersionDiff {
        group_id,
        from_version,
        to_version,
        lines,
    }
}
