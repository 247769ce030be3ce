//! Unit ledger screen: manual entrada/saída entries.
//!
//! Entries land on the unit-level ledger, not on any attendant's register;
//! the entry modal says as much to the operator.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{parse_positive_amount, ScreenError};
use crate::audit::{AuditAction, AuditLog};
use crate::config::CoreConfig;
use crate::db::Database;
use crate::models::{LedgerEntry, LedgerKind, OTHER_REASON};
use crate::ui::Notifier;

/// Payload of the manual entry modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryInput {
    /// "entrada" or "saida"
    #[serde(rename = "tipo")]
    pub kind: String,
    /// Amount as typed; must parse to a positive number
    #[serde(rename = "valor")]
    pub amount: String,
    /// Selected reason, or free text behind the "Outro" option
    #[serde(rename = "motivo")]
    pub reason: String,
    /// Optional notes
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

/// View-model for the unit ledger screen.
pub struct LedgerScreen<'a> {
    db: &'a Database,
    notifier: &'a dyn Notifier,
    config: &'a CoreConfig,
}

impl<'a> LedgerScreen<'a> {
    pub fn new(db: &'a Database, notifier: &'a dyn Notifier, config: &'a CoreConfig) -> Self {
        Self {
            db,
            notifier,
            config,
        }
    }

    /// Append one manual entry to the unit ledger.
    ///
    /// The reason must be one of the fixed options for the kind or free text
    /// typed behind the "Outro" option; the bare sentinel is rejected so an
    /// unfilled fallback cannot be submitted.
    pub fn add_entry(&self, input: &LedgerEntryInput) -> Result<LedgerEntry, ScreenError> {
        let Some(kind) = LedgerKind::parse(&input.kind) else {
            self.notifier.error("Tipo de lançamento inválido");
            return Err(ScreenError::UnknownEntryKind(input.kind.clone()));
        };

        let Some(amount) = parse_positive_amount(&input.amount) else {
            self.notifier.error("Informe um valor maior que zero");
            return Err(ScreenError::NonPositiveAmount);
        };

        let reason = input.reason.trim();
        if reason.is_empty() {
            self.notifier.error("Selecione um motivo");
            return Err(ScreenError::RequiredField("motivo"));
        }
        if reason == OTHER_REASON {
            self.notifier.error("Descreva o motivo");
            return Err(ScreenError::UnspecifiedOtherReason);
        }

        let notes = input
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);

        let entry = LedgerEntry::new(kind, amount, reason.to_string(), notes);
        self.db.insert_ledger_entry(&entry)?;

        AuditLog::new(self.db, &self.config.unit_name).append(
            AuditAction::LedgerEntryAdded,
            json!({
                "kind": entry.kind.as_str(),
                "amount": entry.amount,
                "reason": entry.reason,
            }),
        )?;

        info!(kind = entry.kind.as_str(), amount, "ledger entry added");
        self.notifier.success("Lançamento registrado");
        Ok(entry)
    }

    /// Ledger listing, most recent first.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, ScreenError> {
        Ok(self.db.list_ledger_entries()?)
    }

    /// Net unit balance (entradas minus saídas).
    pub fn balance(&self) -> Result<f64, ScreenError> {
        Ok(self.db.ledger_balance()?)
    }
}
