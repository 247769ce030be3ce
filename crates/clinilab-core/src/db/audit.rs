//! Audit event database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::audit::{AuditAction, AuditEvent};

impl Database {
    /// Insert an audit event, returning its assigned sequence number.
    pub fn insert_audit_event(&self, event: &AuditEvent) -> DbResult<i64> {
        let detail = serde_json::to_string(&event.detail)?;
        self.conn.execute(
            r#"
            INSERT INTO audit_events (unit, action, detail, created_at, prev_hash, hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.unit,
                event.action.as_str(),
                detail,
                event.created_at,
                event.prev_hash,
                event.hash,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// The most recent event, if any.
    pub fn last_audit_event(&self) -> DbResult<Option<AuditEvent>> {
        self.conn
            .query_row(
                &format!("{SELECT_EVENT} ORDER BY seq DESC LIMIT 1"),
                [],
                map_event_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// All events in chain order.
    pub fn list_audit_events(&self) -> DbResult<Vec<AuditEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_EVENT} ORDER BY seq ASC"))?;
        let rows = stmt.query_map([], map_event_row)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?.try_into()?);
        }
        Ok(events)
    }
}

const SELECT_EVENT: &str = r#"
    SELECT seq, unit, action, detail, created_at, prev_hash, hash
    FROM audit_events
"#;

/// Intermediate row struct for database mapping.
struct EventRow {
    seq: i64,
    unit: String,
    action: String,
    detail: String,
    created_at: String,
    prev_hash: String,
    hash: String,
}

fn map_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        seq: row.get(0)?,
        unit: row.get(1)?,
        action: row.get(2)?,
        detail: row.get(3)?,
        created_at: row.get(4)?,
        prev_hash: row.get(5)?,
        hash: row.get(6)?,
    })
}

impl TryFrom<EventRow> for AuditEvent {
    type Error = DbError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let action = AuditAction::parse(&row.action)
            .ok_or_else(|| DbError::Constraint(format!("Unknown audit action: {}", row.action)))?;
        let detail = serde_json::from_str(&row.detail)?;

        Ok(AuditEvent {
            seq: row.seq,
            unit: row.unit,
            action,
            detail,
            created_at: row.created_at,
            prev_hash: row.prev_hash,
            hash: row.hash,
        })
    }
}
