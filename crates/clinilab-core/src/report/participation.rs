//! Insurer participation report.
//!
//! Totals and percentage shares are computed from the activity rows at
//! generation time; nothing here is stored, so rows and totals cannot
//! diverge.

use serde::{Deserialize, Serialize};

use super::{format_brl, format_percent};
use crate::db::{Database, DbResult};
use crate::models::InsurerActivity;

/// One insurer's line in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipationRow {
    pub name: String,
    pub requests: u32,
    pub exams: u32,
    pub total_value: f64,
    /// Percentage of the grand total, one decimal
    pub share: f64,
}

impl ParticipationRow {
    /// Value formatted for display.
    pub fn display_value(&self) -> String {
        format_brl(self.total_value)
    }

    /// Share formatted for display.
    pub fn display_share(&self) -> String {
        format_percent(self.share)
    }
}

/// The computed totals line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipationTotals {
    pub requests: u64,
    pub exams: u64,
    pub total_value: f64,
}

impl ParticipationTotals {
    pub fn display_value(&self) -> String {
        format_brl(self.total_value)
    }
}

/// Participation report over a set of insurer activity rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticipationReport {
    /// Generation timestamp
    pub generated_at: String,
    /// Per-insurer lines, input order preserved
    pub rows: Vec<ParticipationRow>,
    /// Totals computed from the rows
    pub totals: ParticipationTotals,
}

impl ParticipationReport {
    /// Build the report from activity rows, computing totals and shares.
    pub fn from_activity(activity: &[InsurerActivity]) -> Self {
        let totals = ParticipationTotals {
            requests: activity.iter().map(|a| a.requests as u64).sum(),
            exams: activity.iter().map(|a| a.exams as u64).sum(),
            total_value: activity.iter().map(|a| a.total_value).sum(),
        };

        let rows = activity
            .iter()
            .map(|a| ParticipationRow {
                name: a.name.clone(),
                requests: a.requests,
                exams: a.exams,
                total_value: a.total_value,
                share: share_of(a.total_value, totals.total_value),
            })
            .collect();

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            rows,
            totals,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("insurer,requests,exams,total_value,share\n");

        for row in &self.rows {
            csv.push_str(&format!(
                "{},{},{},{:.2},{:.1}\n",
                escape_csv(&row.name),
                row.requests,
                row.exams,
                row.total_value,
                row.share,
            ));
        }
        csv.push_str(&format!(
            "TOTAL,{},{},{:.2},\n",
            self.totals.requests, self.totals.exams, self.totals.total_value,
        ));

        csv
    }
}

/// Percentage of total with one-decimal rounding; 0 when there is no total.
fn share_of(value: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (value / total * 1000.0).round() / 10.0
}

/// Participation reporter over the database.
pub struct ParticipationReporter<'a> {
    db: &'a Database,
}

impl<'a> ParticipationReporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Generate the report from the stored activity rows.
    pub fn report(&self) -> DbResult<ParticipationReport> {
        let activity = self.db.list_insurer_activity()?;
        Ok(ParticipationReport::from_activity(&activity))
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
