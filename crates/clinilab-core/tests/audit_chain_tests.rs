//! Audit chain integration and property tests.

use clinilab_core::audit::{AuditAction, AuditError, AuditLog};
use clinilab_core::db::Database;
use proptest::prelude::*;
use serde_json::json;

const ACTIONS: [AuditAction; 5] = [
    AuditAction::RegisterOpened,
    AuditAction::RegisterClosed,
    AuditAction::LedgerEntryAdded,
    AuditAction::SampleBatchCreated,
    AuditAction::SampleCancelled,
];

#[test]
fn test_chain_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.db");

    {
        let db = Database::open(&path).unwrap();
        let log = AuditLog::new(&db, "Unidade Central");
        log.append(AuditAction::RegisterOpened, json!({"code": "CX-0001"}))
            .unwrap();
        log.append(AuditAction::RegisterClosed, json!({"code": "CX-0001"}))
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let log = AuditLog::new(&db, "Unidade Central");
    assert_eq!(log.verify().unwrap(), 2);

    // Appending after reopen continues the same chain
    log.append(AuditAction::LedgerEntryAdded, json!({"amount": 10.0}))
        .unwrap();
    assert_eq!(log.verify().unwrap(), 3);
}

proptest! {
    #[test]
    fn prop_untampered_chains_verify(
        actions in prop::collection::vec(0usize..ACTIONS.len(), 0..20),
        payloads in prop::collection::vec(any::<u32>(), 0..20),
    ) {
        let db = Database::open_in_memory().unwrap();
        let log = AuditLog::new(&db, "Unidade Central");

        let n = actions.len().min(payloads.len());
        for i in 0..n {
            log.append(ACTIONS[actions[i]], json!({"n": payloads[i]})).unwrap();
        }
        prop_assert_eq!(log.verify().unwrap(), n);
    }

    #[test]
    fn prop_any_tampered_event_breaks_chain(
        count in 1usize..10,
        victim in 0usize..10,
    ) {
        let victim = victim % count;
        let db = Database::open_in_memory().unwrap();
        let log = AuditLog::new(&db, "Unidade Central");

        for i in 0..count {
            log.append(ACTIONS[i % ACTIONS.len()], json!({"n": i})).unwrap();
        }

        db.conn()
            .execute(
                "UPDATE audit_events SET detail = '{\"n\":9999}' WHERE seq = ?",
                [(victim + 1) as i64],
            )
            .unwrap();

        match log.verify() {
            Err(AuditError::ChainBroken { seq }) => {
                prop_assert_eq!(seq, (victim + 1) as i64);
            }
            other => prop_assert!(false, "expected broken chain, got {:?}", other.map(|_| ())),
        }
    }
}
