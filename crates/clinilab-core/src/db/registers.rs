//! Cash register database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{CashRegister, RegisterStatus};

impl Database {
    /// Insert a newly opened register session.
    pub fn insert_register(&self, register: &CashRegister) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO cash_registers (
                id, code, attendant, opening_balance,
                cash_total, card_total, check_total,
                status, opened_at, closed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                register.id,
                register.code,
                register.attendant,
                register.opening_balance,
                register.cash_total,
                register.card_total,
                register.check_total,
                status_to_string(&register.status),
                register.opened_at,
                register.closed_at,
            ],
        )?;
        Ok(())
    }

    /// Persist mutated totals/status for an existing register.
    pub fn update_register(&self, register: &CashRegister) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE cash_registers SET
                cash_total = ?2,
                card_total = ?3,
                check_total = ?4,
                status = ?5,
                closed_at = ?6
            WHERE id = ?1
            "#,
            params![
                register.id,
                register.cash_total,
                register.card_total,
                register.check_total,
                status_to_string(&register.status),
                register.closed_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a register by ID.
    pub fn get_register(&self, id: &str) -> DbResult<Option<CashRegister>> {
        self.conn
            .query_row(
                &format!("{SELECT_REGISTER} WHERE id = ?"),
                [id],
                map_register_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Find the open register for an attendant, if any.
    pub fn find_open_register_for_attendant(
        &self,
        attendant: &str,
    ) -> DbResult<Option<CashRegister>> {
        self.conn
            .query_row(
                &format!("{SELECT_REGISTER} WHERE attendant = ? AND status = 'open'"),
                [attendant],
                map_register_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List registers by status, most recently opened first.
    pub fn list_registers_by_status(
        &self,
        status: &RegisterStatus,
    ) -> DbResult<Vec<CashRegister>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_REGISTER} WHERE status = ? ORDER BY opened_at DESC"))?;
        let rows = stmt.query_map([status_to_string(status)], map_register_row)?;

        let mut registers = Vec::new();
        for row in rows {
            registers.push(row?.try_into()?);
        }
        Ok(registers)
    }

    /// Total register sessions ever opened (feeds code generation).
    pub fn count_registers(&self) -> DbResult<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cash_registers", [], |row| row.get(0))?;
        Ok(count)
    }
}

const SELECT_REGISTER: &str = r#"
    SELECT id, code, attendant, opening_balance,
           cash_total, card_total, check_total,
           status, opened_at, closed_at
    FROM cash_registers
"#;

/// Intermediate row struct for database mapping.
struct RegisterRow {
    id: String,
    code: String,
    attendant: String,
    opening_balance: f64,
    cash_total: f64,
    card_total: f64,
    check_total: f64,
    status: String,
    opened_at: String,
    closed_at: Option<String>,
}

fn map_register_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RegisterRow> {
    Ok(RegisterRow {
        id: row.get(0)?,
        code: row.get(1)?,
        attendant: row.get(2)?,
        opening_balance: row.get(3)?,
        cash_total: row.get(4)?,
        card_total: row.get(5)?,
        check_total: row.get(6)?,
        status: row.get(7)?,
        opened_at: row.get(8)?,
        closed_at: row.get(9)?,
    })
}

impl TryFrom<RegisterRow> for CashRegister {
    type Error = DbError;

    fn try_from(row: RegisterRow) -> Result<Self, Self::Error> {
        let status = string_to_status(&row.status)?;
        Ok(CashRegister {
            id: row.id,
            code: row.code,
            attendant: row.attendant,
            opening_balance: row.opening_balance,
            cash_total: row.cash_total,
            card_total: row.card_total,
            check_total: row.check_total,
            status,
            opened_at: row.opened_at,
            closed_at: row.closed_at,
        })
    }
}

fn status_to_string(status: &RegisterStatus) -> &'static str {
    match status {
        RegisterStatus::Open => "open",
        RegisterStatus::Closed => "closed",
    }
}

fn string_to_status(s: &str) -> Result<RegisterStatus, DbError> {
    match s {
        "open" => Ok(RegisterStatus::Open),
        "closed" => Ok(RegisterStatus::Closed),
        _ => Err(DbError::Constraint(format!("Unknown register status: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;

    #[test]
    fn test_insert_and_get_register() {
        let db = Database::open_in_memory().unwrap();
        let register = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 100.0);
        db.insert_register(&register).unwrap();

        let retrieved = db.get_register(&register.id).unwrap().unwrap();
        assert_eq!(retrieved, register);
    }

    #[test]
    fn test_find_open_register_for_attendant() {
        let db = Database::open_in_memory().unwrap();
        let mut register = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 0.0);
        db.insert_register(&register).unwrap();

        let found = db
            .find_open_register_for_attendant("Maria Silva")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, register.id);
        assert!(db
            .find_open_register_for_attendant("Outra Pessoa")
            .unwrap()
            .is_none());

        // Closing frees the attendant
        register.close().unwrap();
        db.update_register(&register).unwrap();
        assert!(db
            .find_open_register_for_attendant("Maria Silva")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_register_totals() {
        let db = Database::open_in_memory().unwrap();
        let mut register = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 0.0);
        db.insert_register(&register).unwrap();

        register.add_payment(PaymentMethod::Cash, 80.0).unwrap();
        register.add_payment(PaymentMethod::Card, 20.0).unwrap();
        assert!(db.update_register(&register).unwrap());

        let retrieved = db.get_register(&register.id).unwrap().unwrap();
        assert_eq!(retrieved.cash_total, 80.0);
        assert_eq!(retrieved.card_total, 20.0);
        assert_eq!(retrieved.grand_total(), 100.0);
    }

    #[test]
    fn test_list_registers_by_status() {
        let db = Database::open_in_memory().unwrap();
        let mut a = CashRegister::open("CX-0001".into(), "Maria".into(), 0.0);
        let b = CashRegister::open("CX-0002".into(), "José".into(), 0.0);
        db.insert_register(&a).unwrap();
        db.insert_register(&b).unwrap();

        a.close().unwrap();
        db.update_register(&a).unwrap();

        let open = db.list_registers_by_status(&RegisterStatus::Open).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].code, "CX-0002");

        let closed = db.list_registers_by_status(&RegisterStatus::Closed).unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].code, "CX-0001");
        assert_eq!(db.count_registers().unwrap(), 2);
    }
}
