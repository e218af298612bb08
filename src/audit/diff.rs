//! Field-change summaries for audit descriptions
//!
//! Generates the human-readable "what changed" text carried by Update audit
//! events, from before/after JSON snapshots of a record.

use serde_json::Value;

/// Generate a human-readable summary of changed fields
///
/// Returns `None` when nothing differs. Only top-level fields are compared;
/// audit descriptions name the fields that changed, not full content.
pub fn describe_changes(before: &Value, after: &Value) -> Option<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes = Vec::new();

            // Modified and removed fields
            for (key, before_val) in before_obj {
                if let Some(after_val) = after_obj.get(key) {
                    if before_val != after_val {
                        changes.push(format!(
                            "{}: {} -> {}",
                            key,
                            format_value(before_val),
                            format_value(after_val)
                        ));
                    }
                } else {
                    changes.push(format!(
                        "{}: {} -> (removed)",
                        key,
                        format_value(before_val)
                    ));
                }
            }

            // Added fields
            for (key, after_val) in after_obj {
                if !before_obj.contains_key(key) {
                    changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
                }
            }

            if changes.is_empty() {
                None
            } else {
                Some(changes.join(", "))
            }
        }
        _ => {
            if before != after {
                Some(format!(
                    "{} -> {}",
                    format_value(before),
                    format_value(after)
                ))
            } else {
                None
            }
        }
    }
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Truncate long strings; count characters, not bytes, so
            // multibyte content never splits mid-character
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_field_change() {
        let before = json!({"title": "Old Title"});
        let after = json!({"title": "New Title"});

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains("title: \"Old Title\" -> \"New Title\""));
    }

    #[test]
    fn test_unchanged_fields_skipped() {
        let before = json!({"title": "Run 3", "content": "A"});
        let after = json!({"title": "Run 3", "content": "B"});

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains("content"));
        assert!(!diff.contains("title:"));
    }

    #[test]
    fn test_no_changes() {
        let before = json!({"title": "Run 3", "content": "A"});
        let after = json!({"title": "Run 3", "content": "A"});

        assert!(describe_changes(&before, &after).is_none());
    }

    #[test]
    fn test_field_added_and_removed() {
        let before = json!({"old_field": "value"});
        let after = json!({"new_field": 5});

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains("old_field: \"value\" -> (removed)"));
        assert!(diff.contains("new_field: (added) -> 5"));
    }

    #[test]
    fn test_long_string_truncation() {
        let long_string = "a".repeat(100);
        let before = json!({"content": long_string});
        let after = json!({"content": "short"});

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }

    #[test]
    fn test_multibyte_string_truncation() {
        // Over 50 bytes but exactly 40 characters; must format whole
        let accented = "é".repeat(40);
        let before = json!({"content": accented});
        let after = json!({"content": "updated"});

        let diff = describe_changes(&before, &after).unwrap();
        assert!(diff.contains(&"é".repeat(40)));
        assert!(!diff.contains("..."));

        // Over 50 characters; truncation must land on a char boundary
        let units = "µ".repeat(60);
        let formatted = format_value(&json!(units));
        assert_eq!(formatted, format!("\"{}...\"", "µ".repeat(47)));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!("test")), "\"test\"");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(format_value(&json!({"a": 1, "b": 2})), "{2 fields}");
    }
}
