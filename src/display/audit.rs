//! Audit trail display formatting

use crate::audit::AuditEvent;

/// Format audit events for terminal output, oldest first
pub fn format_audit_trail(events: &[AuditEvent]) -> String {
    if events.is_empty() {
        return "No audit events found.".to_string();
    }

    let mut output = String::new();
    for event in events {
        output.push_str(&event.format_human_readable());
        output.push('\n');
    }
    output
}

/// Format audit events as JSON lines (for piping into other tools)
pub fn format_audit_trail_json(events: &[AuditEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
