//! Hash-chained audit trail.
//!
//! Every state-changing administrative action (register open/close, ledger
//! entries, batch inclusion, sample cancellation) appends an event whose
//! SHA-256 hash binds the previous event, so any edit to a stored event
//! breaks every hash after it. `verify` re-walks the chain.

use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::{Database, DbError};

/// Chain head before the first event: 64 zero hex digits.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Audit errors.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Audit chain broken at event {seq}")]
    ChainBroken { seq: i64 },
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Auditable administrative actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    RegisterOpened,
    RegisterClosed,
    LedgerEntryAdded,
    SampleBatchCreated,
    SampleCancelled,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::RegisterOpened => "register_opened",
            AuditAction::RegisterClosed => "register_closed",
            AuditAction::LedgerEntryAdded => "ledger_entry_added",
            AuditAction::SampleBatchCreated => "sample_batch_created",
            AuditAction::SampleCancelled => "sample_cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "register_opened" => Some(AuditAction::RegisterOpened),
            "register_closed" => Some(AuditAction::RegisterClosed),
            "ledger_entry_added" => Some(AuditAction::LedgerEntryAdded),
            "sample_batch_created" => Some(AuditAction::SampleBatchCreated),
            "sample_cancelled" => Some(AuditAction::SampleCancelled),
            _ => None,
        }
    }
}

/// One committed audit event.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Chain position, assigned by the store
    pub seq: i64,
    /// Unit that performed the action
    pub unit: String,
    /// What happened
    pub action: AuditAction,
    /// Action payload (entity codes, amounts, reasons)
    pub detail: Value,
    /// Commit timestamp
    pub created_at: String,
    /// Hash of the previous event ([`GENESIS_HASH`] for the first)
    pub prev_hash: String,
    /// SHA-256 over this event's fields and `prev_hash`
    pub hash: String,
}

/// Append-only audit log over the database.
pub struct AuditLog<'a> {
    db: &'a Database,
    unit: String,
}

impl<'a> AuditLog<'a> {
    /// Create an audit log writer stamping events with the unit label.
    pub fn new(db: &'a Database, unit: &str) -> Self {
        Self {
            db,
            unit: unit.to_string(),
        }
    }

    /// Append an event to the chain.
    pub fn append(&self, action: AuditAction, detail: Value) -> AuditResult<AuditEvent> {
        let prev_hash = self
            .db
            .last_audit_event()?
            .map(|e| e.hash)
            .unwrap_or_else(|| GENESIS_HASH.to_string());

        let created_at = chrono::Utc::now().to_rfc3339();
        // serde_json sorts object keys, so this serialization is canonical
        let detail_str = serde_json::to_string(&detail)?;
        let hash = chain_hash(&prev_hash, &self.unit, action, &detail_str, &created_at);

        let mut event = AuditEvent {
            seq: 0,
            unit: self.unit.clone(),
            action,
            detail,
            created_at,
            prev_hash,
            hash,
        };
        event.seq = self.db.insert_audit_event(&event)?;

        tracing::debug!(action = action.as_str(), seq = event.seq, "audit event committed");
        Ok(event)
    }

    /// All events in chain order.
    pub fn events(&self) -> AuditResult<Vec<AuditEvent>> {
        Ok(self.db.list_audit_events()?)
    }

    /// Walk the whole chain, recomputing every hash.
    ///
    /// Returns the number of verified events, or the first broken link.
    pub fn verify(&self) -> AuditResult<usize> {
        let events = self.db.list_audit_events()?;
        let mut prev = GENESIS_HASH.to_string();

        for event in &events {
            let detail_str = serde_json::to_string(&event.detail)?;
            let expected = chain_hash(
                &event.prev_hash,
                &event.unit,
                event.action,
                &detail_str,
                &event.created_at,
            );
            if event.prev_hash != prev || event.hash != expected {
                return Err(AuditError::ChainBroken { seq: event.seq });
            }
            prev = event.hash.clone();
        }

        Ok(events.len())
    }
}

/// Hash one event's fields, binding the previous event's hash.
fn chain_hash(
    prev_hash: &str,
    unit: &str,
    action: AuditAction,
    detail_json: &str,
    created_at: &str,
) -> String {
    let mut hasher = Sha256::new();
    for field in [prev_hash, unit, action.as_str(), detail_json, created_at] {
        hasher.update(field.as_bytes());
        hasher.update([0x1f]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_links_chain() {
        let db = Database::open_in_memory().unwrap();
        let log = AuditLog::new(&db, "Unidade Central");

        let first = log
            .append(AuditAction::RegisterOpened, json!({"code": "CX-0001"}))
            .unwrap();
        let second = log
            .append(AuditAction::RegisterClosed, json!({"code": "CX-0001"}))
            .unwrap();

        assert_eq!(first.prev_hash, GENESIS_HASH);
        assert_eq!(second.prev_hash, first.hash);
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_eq!(first.hash.len(), 64);
    }

    #[test]
    fn test_verify_clean_chain() {
        let db = Database::open_in_memory().unwrap();
        let log = AuditLog::new(&db, "Unidade Central");

        for i in 0..5 {
            log.append(AuditAction::LedgerEntryAdded, json!({"n": i}))
                .unwrap();
        }
        assert_eq!(log.verify().unwrap(), 5);
    }

    #[test]
    fn test_verify_empty_chain() {
        let db = Database::open_in_memory().unwrap();
        let log = AuditLog::new(&db, "Unidade Central");
        assert_eq!(log.verify().unwrap(), 0);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let db = Database::open_in_memory().unwrap();
        let log = AuditLog::new(&db, "Unidade Central");

        log.append(AuditAction::SampleCancelled, json!({"code": "AM-00001"}))
            .unwrap();
        log.append(AuditAction::SampleCancelled, json!({"code": "AM-00002"}))
            .unwrap();

        db.conn()
            .execute(
                "UPDATE audit_events SET detail = '{\"code\":\"AM-09999\"}' WHERE seq = 1",
                [],
            )
            .unwrap();

        match log.verify() {
            Err(AuditError::ChainBroken { seq }) => assert_eq!(seq, 1),
            other => panic!("expected broken chain, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_action_roundtrip() {
        for action in [
            AuditAction::RegisterOpened,
            AuditAction::RegisterClosed,
            AuditAction::LedgerEntryAdded,
            AuditAction::SampleBatchCreated,
            AuditAction::SampleCancelled,
        ] {
            assert_eq!(AuditAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(AuditAction::parse("unknown"), None);
    }
}
