//! Protocol display formatting
//!
//! Formats protocol version chains for terminal output in table and detail
//! views, plus the line diff between two versions.

use crate::models::{DiffOp, ProtocolVersion, VersionDiff};

/// Format the current version of each protocol group as a table
pub fn format_protocol_list(protocols: &[ProtocolVersion]) -> String {
    if protocols.is_empty() {
        return "No protocols found.".to_string();
    }

    let title_width = protocols
        .iter()
        .map(|p| p.title.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<title_width$}  {:>7}  {:<12}  {:<40}\n",
        "Title",
        "Version",
        "Author",
        "ID",
        title_width = title_width,
    ));
    output.push_str(&format!(
        "{:-<title_width$}  {:->7}  {:-<12}  {:-<40}\n",
        "",
        "",
        "",
        "",
        title_width = title_width,
    ));

    for protocol in protocols {
        output.push_str(&format!(
            "{:<title_width$}  {:>7}  {:<12}  {}\n",
            protocol.title,
            protocol.version,
            protocol.created_by,
            protocol.group_id,
            title_width = title_width,
        ));
    }

    output
}

/// Format the full version history of one protocol group
pub fn format_version_history(versions: &[ProtocolVersion]) -> String {
    if versions.is_empty() {
        return "No versions found.".to_string();
    }

    let author_width = versions
        .iter()
        .map(|v| v.created_by.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!("Protocol: {}\n\n", versions[0].title));
    output.push_str(&format!(
        "{:>7}  {:<author_width$}  {:<16}  {}\n",
        "Version",
        "Author",
        "Created",
        "Status",
        author_width = author_width,
    ));
    output.push_str(&format!(
        "{:->7}  {:-<author_width$}  {:-<16}  {:-<7}\n",
        "",
        "",
        "",
        "",
        author_width = author_width,
    ));

    for version in versions {
        output.push_str(&format!(
            "{:>7}  {:<author_width$}  {:<16}  {}\n",
            version.version,
            version.created_by,
            version.created_at.format("%Y-%m-%d %H:%M"),
            if version.is_current { "current" } else { "" },
            author_width = author_width,
        ));
    }

    output
}

/// Format a single protocol version's details
pub fn format_protocol_details(version: &ProtocolVersion) -> String {
    let mut output = String::new();

    output.push_str(&format!("Protocol: {}\n", version.title));
    output.push_str(&format!("  Group ID:  {}\n", version.group_id));
    output.push_str(&format!("  Version:   {}\n", version.version));
    output.push_str(&format!(
        "  Status:    {}\n",
        if version.is_current {
            "current"
        } else {
            "superseded"
        }
    ));
    output.push_str(&format!("  Author:    {}\n", version.created_by));
    output.push_str(&format!(
        "  Created:   {}\n",
        version.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push('\n');
    output.push_str(&version.content);
    if !version.content.ends_with('\n') {
        output.push('\n');
    }

    output
}

/// Format a line diff between two protocol versions
pub fn format_diff(diff: &VersionDiff) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "--- {} version {}\n+++ {} version {}\n",
        diff.group_id, diff.from_version, diff.group_id, diff.to_version
    ));

    if diff.is_identical() {
        output.push_str("(no changes)\n");
        return output;
    }

    for line in &diff.lines {
        let marker = match line.op {
            DiffOp::Unchanged => ' ',
            DiffOp::Added => '+',
            DiffOp::Removed => '-',
        };
        output.push_str(&format!("{}{}\n", marker, line.text));
    }
    output.push_str(&format!("\n{}\n", diff.summary()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{diff_lines, ProtocolGroupId};

    fn chain() -> Vec<ProtocolVersion> {
        let group_id = ProtocolGroupId::new();
        let mut v1 = ProtocolVersion::first(group_id, "PCR Setup", "step 1", "alice");
        v1.is_current = false;
        let v2 = ProtocolVersion::successor(group_id, 1, "PCR Setup", "step 1\nstep 2", "bob");
        vec![v1, v2]
    }

    #[test]
    fn test_format_protocol_list() {
        let versions = chain();
        let output = format_protocol_list(&versions[1..]);
        assert!(output.contains("PCR Setup"));
        assert!(output.contains("pro-"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_protocol_list(&[]).contains("No protocols found"));
    }

    #[test]
    fn test_format_version_history_marks_current() {
        let versions = chain();
        let output = format_version_history(&versions);
        assert!(output.contains("alice"));
        assert!(output.contains("bob"));
        assert_eq!(output.matches("current").count(), 1);
    }

    #[test]
    fn test_format_diff_markers() {
        let versions = chain();
        let diff = diff_lines(
            versions[0].group_id,
            1,
            &versions[0].content,
            2,
            &versions[1].content,
        );
        let output = format_diff(&diff);
        assert!(output.contains(" step 1"));
        assert!(output.contains("+step 2"));
    }
}
