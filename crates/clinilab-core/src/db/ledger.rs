//! Unit ledger database operations.

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{LedgerEntry, LedgerKind};

impl Database {
    /// Append a ledger entry. Entries are never updated or deleted.
    pub fn insert_ledger_entry(&self, entry: &LedgerEntry) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO ledger_entries (id, kind, amount, reason, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.id,
                entry.kind.as_str(),
                entry.amount,
                entry.reason,
                entry.notes,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// List ledger entries, most recent first.
    pub fn list_ledger_entries(&self) -> DbResult<Vec<LedgerEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, kind, amount, reason, notes, created_at
            FROM ledger_entries
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(LedgerRow {
                id: row.get(0)?,
                kind: row.get(1)?,
                amount: row.get(2)?,
                reason: row.get(3)?,
                notes: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    /// Net unit balance: entradas minus saídas.
    pub fn ledger_balance(&self) -> DbResult<f64> {
        let balance: f64 = self.conn.query_row(
            r#"
            SELECT COALESCE(SUM(CASE WHEN kind = 'entrada' THEN amount ELSE -amount END), 0)
            FROM ledger_entries
            "#,
            [],
            |row| row.get(0),
        )?;
        Ok(balance)
    }
}

/// Intermediate row struct for database mapping.
struct LedgerRow {
    id: String,
    kind: String,
    amount: f64,
    reason: String,
    notes: Option<String>,
    created_at: String,
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = DbError;

    fn try_from(row: LedgerRow) -> Result<Self, Self::Error> {
        let kind = LedgerKind::parse(&row.kind)
            .ok_or_else(|| DbError::Constraint(format!("Unknown ledger kind: {}", row.kind)))?;
        Ok(LedgerEntry {
            id: row.id,
            kind,
            amount: row.amount,
            reason: row.reason,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_list() {
        let db = Database::open_in_memory().unwrap();
        let entry = LedgerEntry::new(
            LedgerKind::Entrada,
            10.5,
            "Reforço de caixa".into(),
            Some("troco para o turno".into()),
        );
        db.insert_ledger_entry(&entry).unwrap();

        let entries = db.list_ledger_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], entry);
    }

    #[test]
    fn test_balance_signs_by_kind() {
        let db = Database::open_in_memory().unwrap();
        db.insert_ledger_entry(&LedgerEntry::new(
            LedgerKind::Entrada,
            100.0,
            "Reforço de caixa".into(),
            None,
        ))
        .unwrap();
        db.insert_ledger_entry(&LedgerEntry::new(
            LedgerKind::Saida,
            30.0,
            "Sangria".into(),
            None,
        ))
        .unwrap();

        assert_eq!(db.ledger_balance().unwrap(), 70.0);
    }

    #[test]
    fn test_empty_ledger_balance_is_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.ledger_balance().unwrap(), 0.0);
    }
}
