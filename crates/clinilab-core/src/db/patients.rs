//! Patient registry database operations.

use rusqlite::{params, OptionalExtension};
use strsim::jaro_winkler;

use super::{Database, DbResult};
use crate::models::Patient;

/// Minimum similarity for fuzzy name matches when LIKE finds nothing.
const FUZZY_THRESHOLD: f64 = 0.82;

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, name, document, birth_date, insurer, phone, notes,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                patient.id,
                patient.name,
                patient.document,
                patient.birth_date,
                patient.insurer,
                patient.phone,
                patient.notes,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                document = ?3,
                birth_date = ?4,
                insurer = ?5,
                phone = ?6,
                notes = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.name,
                patient.document,
                patient.birth_date,
                patient.insurer,
                patient.phone,
                patient.notes,
                patient.updated_at,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("{SELECT_PATIENT} WHERE id = ?"),
                [id],
                map_patient_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients by name.
    ///
    /// Substring matches come first; when the query matches nothing, the full
    /// registry is ranked by similarity so a misspelled name still finds its
    /// record.
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_PATIENT} WHERE name LIKE ?1 COLLATE NOCASE ORDER BY name ASC"
        ))?;
        let rows = stmt.query_map([format!("%{}%", needle)], map_patient_row)?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }

        if matches.is_empty() {
            matches = self.fuzzy_patient_matches(&needle)?;
        }

        matches.truncate(limit);
        Ok(matches)
    }

    fn fuzzy_patient_matches(&self, needle: &str) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(SELECT_PATIENT)?;
        let rows = stmt.query_map([], map_patient_row)?;

        let mut scored: Vec<(f64, Patient)> = Vec::new();
        for row in rows {
            let patient = row?;
            let score = jaro_winkler(needle, &patient.name.to_lowercase());
            if score >= FUZZY_THRESHOLD {
                scored.push((score, patient));
            }
        }

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored.into_iter().map(|(_, p)| p).collect())
    }
}

const SELECT_PATIENT: &str = r#"
    SELECT id, name, document, birth_date, insurer, phone, notes,
           created_at, updated_at
    FROM patients
"#;

fn map_patient_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        document: row.get(2)?,
        birth_date: row.get(3)?,
        insurer: row.get(4)?,
        phone: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
