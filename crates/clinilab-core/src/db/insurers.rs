//! Insurer activity database operations.

use rusqlite::params;

use super::{Database, DbResult};
use crate::models::InsurerActivity;

impl Database {
    /// Add or replace an insurer's activity row.
    pub fn upsert_insurer_activity(&self, activity: &InsurerActivity) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO insurer_activity (name, requests, exams, total_value)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(name) DO UPDATE SET
                requests = excluded.requests,
                exams = excluded.exams,
                total_value = excluded.total_value
            "#,
            params![
                activity.name,
                activity.requests,
                activity.exams,
                activity.total_value,
            ],
        )?;
        Ok(())
    }

    /// List activity rows, highest value first.
    pub fn list_insurer_activity(&self) -> DbResult<Vec<InsurerActivity>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, requests, exams, total_value
            FROM insurer_activity
            ORDER BY total_value DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(InsurerActivity {
                name: row.get(0)?,
                requests: row.get(1)?,
                exams: row.get(2)?,
                total_value: row.get(3)?,
            })
        })?;

        let mut activity = Vec::new();
        for row in rows {
            activity.push(row?);
        }
        Ok(activity)
    }
}
