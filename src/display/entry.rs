//! Entry display formatting
//!
//! Formats entries for terminal output in table and detail views, including
//! lock status and reagent links.

use crate::models::{Entry, Reagent};

/// Format a list of entries as a table
pub fn format_entry_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries found.".to_string();
    }

    let title_width = entries
        .iter()
        .map(|e| e.title.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<title_width$}  {:<6}  {:<16}  {:<40}\n",
        "Title",
        "Status",
        "Updated",
        "ID",
        title_width = title_width,
    ));
    output.push_str(&format!(
        "{:-<title_width$}  {:-<6}  {:-<16}  {:-<40}\n",
        "",
        "",
        "",
        "",
        title_width = title_width,
    ));

    for entry in entries {
        output.push_str(&format!(
            "{:<title_width$}  {:<6}  {:<16}  {}\n",
            entry.title,
            entry.status,
            entry.updated_at.format("%Y-%m-%d %H:%M"),
            entry.id,
            title_width = title_width,
        ));
    }

    output
}

/// Format a single entry's details
///
/// `reagents` supplies names for the entry's links; links whose reagent is
/// not in the slice fall back to the raw id.
pub fn format_entry_details(entry: &Entry, reagents: &[Reagent]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entry: {}\n", entry.title));
    output.push_str(&format!("  ID:       {}\n", entry.id));
    output.push_str(&format!("  Status:   {}\n", entry.status));

    if let Some(signed_by) = &entry.signed_by {
        output.push_str(&format!("  Signed by: {}\n", signed_by));
        if let Some(signed_at) = entry.signed_at {
            output.push_str(&format!(
                "  Signed at: {}\n",
                signed_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
    }

    output.push_str(&format!(
        "  Created:  {}\n",
        entry.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Updated:  {}\n",
        entry.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if !entry.linked_reagents.is_empty() {
        output.push('\n');
        output.push_str("  Linked reagents:\n");
        for link in &entry.linked_reagents {
            let name = reagents
                .iter()
                .find(|r| r.id == link.reagent_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| link.reagent_id.to_string());

            let quantity = match link.quantity_used {
                Some(q) if !link.unit.is_empty() => format!(" ({} {})", q, link.unit),
                Some(q) => format!(" ({})", q),
                None => String::new(),
            };
            output.push_str(&format!("    - {}{}\n", name, quantity));
            if !link.notes.is_empty() {
                output.push_str(&format!("      {}\n", link.notes));
            }
        }
    }

    if !entry.content.is_empty() {
        output.push('\n');
        output.push_str(&entry.content);
        if !entry.content.ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkedReagent;

    #[test]
    fn test_format_entry_list() {
        let entries = vec![Entry::new("Gel run", ""), Entry::new("Western blot", "")];
        let output = format_entry_list(&entries);
        assert!(output.contains("Gel run"));
        assert!(output.contains("Western blot"));
        assert!(output.contains("Draft"));
    }

    #[test]
    fn test_format_empty_list() {
        assert!(format_entry_list(&[]).contains("No entries found"));
    }

    #[test]
    fn test_format_details_shows_signature() {
        let mut entry = Entry::new("Gel run", "Loaded 5 uL per lane.");
        entry.sign("alice", true).unwrap();

        let output = format_entry_details(&entry, &[]);
        assert!(output.contains("Locked"));
        assert!(output.contains("Signed by: alice"));
        assert!(output.contains("Loaded 5 uL per lane."));
    }

    #[test]
    fn test_format_details_resolves_reagent_names() {
        let reagent = Reagent::new("Taq polymerase");
        let mut entry = Entry::new("Gel run", "");
        let mut link = LinkedReagent::new(reagent.id);
        link.quantity_used = Some(2.5);
        link.unit = "uL".to_string();
        entry.linked_reagents.push(link);

        let output = format_entry_details(&entry, &[reagent]);
        assert!(output.contains("Taq polymerase"));
        assert!(output.contains("2.5 uL"));
    }
}
