//! File-backed audit sink
//!
//! Writes audit events to an append-only log file using a line-delimited
//! JSON format (JSONL). Each event is flushed and synced before the write is
//! reported durable. The file is never truncated or rewritten.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::error::{LabbookError, LabbookResult};

use super::event::{AuditDraft, AuditEvent, AuditFilter, EventId};
use super::sink::{stamp, AuditSink};

/// Append-only audit log backed by a JSONL file
///
/// Ids are a monotonic sequence resumed from the existing file on open, so
/// restarts never reuse an id. The interior mutex serializes writers, which
/// keeps ids and timestamps ordered; audit writes are not on a hot path.
pub struct FileAuditLog {
    log_path: PathBuf,
    inner: Mutex<LogState>,
}

struct LogState {
    next_id: EventId,
    last_timestamp: DateTime<Utc>,
}

impl FileAuditLog {
    /// Open (or create on first write) the audit log at the given path
    ///
    /// Scans any existing log once to resume the id sequence and timestamp
    /// clamp.
    pub fn open(log_path: PathBuf) -> LabbookResult<Self> {
        let mut next_id: EventId = 0;
        let mut last_timestamp = DateTime::<Utc>::MIN_UTC;

        if log_path.exists() {
            for event in read_events(&log_path)? {
                next_id = next_id.max(event.id);
                last_timestamp = last_timestamp.max(event.timestamp);
            }
        }

        Ok(Self {
            log_path,
            inner: Mutex::new(LogState {
                next_id,
                last_timestamp,
            }),
        })
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }

    /// Get the number of events in the audit log
    pub fn event_count(&self) -> LabbookResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }
        Ok(read_events(&self.log_path)?.len())
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, draft: AuditDraft) -> LabbookResult<EventId> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| LabbookError::Storage(format!("Audit log lock poisoned: {}", e)))?;

        let event = stamp(draft, state.next_id + 1, state.last_timestamp);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LabbookError::Storage(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(&event)
            .map_err(|e| LabbookError::Storage(format!("Failed to serialize audit event: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LabbookError::Storage(format!("Failed to write audit event: {}", e)))?;

        file.flush()
            .map_err(|e| LabbookError::Storage(format!("Failed to flush audit log: {}", e)))?;

        file.sync_all()
            .map_err(|e| LabbookError::Storage(format!("Failed to sync audit log: {}", e)))?;

        // Advance the sequence only after the event is durable
        state.next_id = event.id;
        state.last_timestamp = event.timestamp;
        Ok(event.id)
    }

    fn query(&self, filter: &AuditFilter) -> LabbookResult<Vec<AuditEvent>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        // Events are appended in (timestamp, id) order, so file order is
        // already oldest-first.
        Ok(read_events(&self.log_path)?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect())
    }
}

/// Read every event from the log file, in file (chronological) order
fn read_events(path: &PathBuf) -> LabbookResult<Vec<AuditEvent>> {
    let file = File::open(path)
        .map_err(|e| LabbookError::Storage(format!("Failed to open audit log: {}", e)))?;

    let reader = BufReader::new(file);
    let mut events = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            LabbookError::Storage(format!(
                "Failed to read audit log line {}: {}",
                line_num + 1,
                e
            ))
        })?;

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let event: AuditEvent = serde_json::from_str(&line).map_err(|e| {
            LabbookError::Storage(format!(
                "Failed to parse audit event at line {}: {}",
                line_num + 1,
                e
            ))
        })?;

        events.push(event);
    }

    Ok(events)
}
