//! Unit ledger models.
//!
//! Manual entries (entrada/saída) belong to the unit-level ledger and are
//! independent of any attendant's register session. Entries are immutable
//! once created.

use serde::{Deserialize, Serialize};

/// Sentinel reason that swaps the reason select for free text on the modal.
pub const OTHER_REASON: &str = "Outro";

/// Fixed reason options offered for incoming (entrada) entries.
pub const ENTRADA_REASONS: &[&str] = &[
    "Reforço de caixa",
    "Recebimento avulso",
    "Troco inicial",
    OTHER_REASON,
];

/// Fixed reason options offered for outgoing (saída) entries.
pub const SAIDA_REASONS: &[&str] = &[
    "Sangria",
    "Pagamento a fornecedor",
    "Despesa operacional",
    OTHER_REASON,
];

/// Direction of a manual ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerKind {
    #[serde(rename = "entrada")]
    Entrada,
    #[serde(rename = "saida")]
    Saida,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Entrada => "entrada",
            LedgerKind::Saida => "saida",
        }
    }

    /// Parse the wire value used by the entry modal.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "entrada" => Some(LedgerKind::Entrada),
            "saida" => Some(LedgerKind::Saida),
            _ => None,
        }
    }

    /// Fixed reason options for this kind.
    pub fn reasons(&self) -> &'static [&'static str] {
        match self {
            LedgerKind::Entrada => ENTRADA_REASONS,
            LedgerKind::Saida => SAIDA_REASONS,
        }
    }
}

/// A manual unit-ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    /// Unique entry ID
    pub id: String,
    /// Entry direction
    pub kind: LedgerKind,
    /// Always positive; direction comes from `kind`
    pub amount: f64,
    /// Selected or free-text reason
    pub reason: String,
    /// Optional notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl LedgerEntry {
    /// Create a new entry. Validation happens on the ledger screen.
    pub fn new(kind: LedgerKind, amount: f64, reason: String, notes: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            amount,
            reason,
            notes,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Amount signed by direction (saída negative).
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            LedgerKind::Entrada => self.amount,
            LedgerKind::Saida => -self.amount,
        }
    }
}
