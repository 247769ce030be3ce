//! Lab sample and batch database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{LabSample, SampleBatch, SampleStatus};

impl Database {
    /// Insert a newly registered sample.
    pub fn insert_sample(&self, sample: &LabSample) -> DbResult<()> {
        let (status, batch_id, cancel_reason) = status_columns(&sample.status);
        self.conn.execute(
            r#"
            INSERT INTO lab_samples (
                id, code, patient, material, bench, collected_at,
                status, batch_id, cancel_reason, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                sample.id,
                sample.code,
                sample.patient,
                sample.material,
                sample.bench,
                sample.collected_at,
                status,
                batch_id,
                cancel_reason,
                sample.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Persist a sample's current status.
    pub fn update_sample(&self, sample: &LabSample) -> DbResult<bool> {
        let (status, batch_id, cancel_reason) = status_columns(&sample.status);
        let rows_affected = self.conn.execute(
            r#"
            UPDATE lab_samples SET
                status = ?2,
                batch_id = ?3,
                cancel_reason = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
            params![sample.id, status, batch_id, cancel_reason, sample.updated_at],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a sample by ID.
    pub fn get_sample(&self, id: &str) -> DbResult<Option<LabSample>> {
        self.conn
            .query_row(
                &format!("{SELECT_SAMPLE} WHERE id = ?"),
                [id],
                map_sample_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List samples still available for batching, oldest collection first.
    pub fn list_available_samples(&self) -> DbResult<Vec<LabSample>> {
        self.query_samples(&format!(
            "{SELECT_SAMPLE} WHERE status = 'available' ORDER BY collected_at ASC"
        ))
    }

    /// List samples included in a batch.
    pub fn list_batch_samples(&self, batch_id: &str) -> DbResult<Vec<LabSample>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SAMPLE} WHERE batch_id = ? ORDER BY code ASC"))?;
        let rows = stmt.query_map([batch_id], map_sample_row)?;

        let mut samples = Vec::new();
        for row in rows {
            samples.push(row?.try_into()?);
        }
        Ok(samples)
    }

    /// List cancelled samples with their reasons, most recent first.
    pub fn list_cancelled_samples(&self) -> DbResult<Vec<LabSample>> {
        self.query_samples(&format!(
            "{SELECT_SAMPLE} WHERE status = 'cancelled' ORDER BY updated_at DESC"
        ))
    }

    /// Total samples ever registered (feeds code generation).
    pub fn count_samples(&self) -> DbResult<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lab_samples", [], |row| row.get(0))?;
        Ok(count)
    }

    fn query_samples(&self, sql: &str) -> DbResult<Vec<LabSample>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], map_sample_row)?;

        let mut samples = Vec::new();
        for row in rows {
            samples.push(row?.try_into()?);
        }
        Ok(samples)
    }

    /// Insert a new batch.
    pub fn insert_batch(&self, batch: &SampleBatch) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO sample_batches (id, code, created_at) VALUES (?1, ?2, ?3)",
            params![batch.id, batch.code, batch.created_at],
        )?;
        Ok(())
    }

    /// Get a batch with its member sample IDs.
    pub fn get_batch(&self, id: &str) -> DbResult<Option<SampleBatch>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, code, created_at FROM sample_batches WHERE id = ?",
                [id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, code, created_at)) = header else {
            return Ok(None);
        };

        let sample_ids = self
            .list_batch_samples(&id)?
            .into_iter()
            .map(|s| s.id)
            .collect();

        Ok(Some(SampleBatch {
            id,
            code,
            sample_ids,
            created_at,
        }))
    }

    /// Total batches ever created (feeds code generation).
    pub fn count_batches(&self) -> DbResult<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sample_batches", [], |row| row.get(0))?;
        Ok(count)
    }
}

const SELECT_SAMPLE: &str = r#"
    SELECT id, code, patient, material, bench, collected_at,
           status, batch_id, cancel_reason, updated_at
    FROM lab_samples
"#;

/// Intermediate row struct for database mapping.
struct SampleRow {
    id: String,
    code: String,
    patient: String,
    material: String,
    bench: String,
    collected_at: String,
    status: String,
    batch_id: Option<String>,
    cancel_reason: Option<String>,
    updated_at: String,
}

fn map_sample_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SampleRow> {
    Ok(SampleRow {
        id: row.get(0)?,
        code: row.get(1)?,
        patient: row.get(2)?,
        material: row.get(3)?,
        bench: row.get(4)?,
        collected_at: row.get(5)?,
        status: row.get(6)?,
        batch_id: row.get(7)?,
        cancel_reason: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

impl TryFrom<SampleRow> for LabSample {
    type Error = DbError;

    fn try_from(row: SampleRow) -> Result<Self, Self::Error> {
        let status = match row.status.as_str() {
            "available" => SampleStatus::Available,
            "batched" => SampleStatus::Batched {
                batch_id: row.batch_id.ok_or_else(|| {
                    DbError::Constraint(format!("Batched sample {} without batch", row.code))
                })?,
            },
            "cancelled" => SampleStatus::Cancelled {
                reason: row.cancel_reason.ok_or_else(|| {
                    DbError::Constraint(format!("Cancelled sample {} without reason", row.code))
                })?,
            },
            other => {
                return Err(DbError::Constraint(format!(
                    "Unknown sample status: {}",
                    other
                )))
            }
        };

        Ok(LabSample {
            id: row.id,
            code: row.code,
            patient: row.patient,
            material: row.material,
            bench: row.bench,
            collected_at: row.collected_at,
            status,
            updated_at: row.updated_at,
        })
    }
}

fn status_columns(status: &SampleStatus) -> (&'static str, Option<&str>, Option<&str>) {
    match status {
        SampleStatus::Available => ("available", None, None),
        SampleStatus::Batched { batch_id } => ("batched", Some(batch_id.as_str()), None),
        SampleStatus::Cancelled { reason } => ("cancelled", None, Some(reason.as_str())),
    }
}
