//! Audit trail CLI command
//!
//! Queries the append-only audit log with optional filters. Output is
//! oldest-first, matching the order of the log itself.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;

use crate::audit::{AuditFilter, AuditSink, EntityKind};
use crate::display::audit::{format_audit_trail, format_audit_trail_json};
use crate::error::{LabbookError, LabbookResult};

/// Arguments for the audit command
#[derive(Args)]
pub struct AuditArgs {
    /// Filter by entity kind (protocol, entry, reagent, project, experiment, sample, equipment)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Filter by entity ID
    #[arg(short, long)]
    pub id: Option<String>,

    /// Filter by the actor who performed the action
    #[arg(short, long)]
    pub by: Option<String>,

    /// Only events at or after this time (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub since: Option<String>,

    /// Only events at or before this time (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub until: Option<String>,

    /// Show at most this many events (most recent kept)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Emit events as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Handle the audit command
pub fn handle_audit_command(audit: &dyn AuditSink, args: AuditArgs) -> LabbookResult<()> {
    let mut filter = AuditFilter::all();

    if let Some(kind) = &args.kind {
        let kind = EntityKind::parse(kind).ok_or_else(|| {
            LabbookError::Validation(format!(
                "Unknown entity kind: '{}'. Valid kinds: project, experiment, entry, protocol, reagent, sample, equipment",
                kind
            ))
        })?;
        filter = filter.entity_kind(kind);
    }
    if let Some(id) = &args.id {
        filter = filter.entity_id(id.clone());
    }
    if let Some(actor) = &args.by {
        filter = filter.actor(actor.clone());
    }
    if let Some(since) = &args.since {
        filter = filter.since(parse_instant(since)?);
    }
    if let Some(until) = &args.until {
        filter = filter.until(parse_instant(until)?);
    }

    let mut events = audit.query(&filter)?;
    if let Some(limit) = args.limit {
        if events.len() > limit {
            events.drain(..events.len() - limit);
        }
    }

    if args.json {
        print!("{}", format_audit_trail_json(&events)?);
    } else {
        print!("{}", format_audit_trail(&events));
    }

    Ok(())
}

/// Parse a user-supplied instant: a plain date means midnight UTC that day
fn parse_instant(s: &str) -> LabbookResult<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
        }
    }
    Err(LabbookError::Validation(format!(
        "Could not parse time '{}'. Use YYYY-MM-DD or RFC 3339.",
        s
    )))
}
