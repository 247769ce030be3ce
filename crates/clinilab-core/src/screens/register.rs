//! Cash register screen: open, receive payments, close.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{coerce_amount, ScreenError};
use crate::audit::{AuditAction, AuditLog};
use crate::config::CoreConfig;
use crate::db::Database;
use crate::models::{CashRegister, ClosingSummary, PaymentMethod, RegisterStatus};
use crate::ui::Notifier;

/// Payload of the "abrir caixa" modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRegisterInput {
    /// Attendant name; required
    #[serde(rename = "atendente")]
    pub attendant: String,
    /// Opening float as typed; coerced leniently, defaults to 0
    #[serde(rename = "saldoInicial")]
    pub opening_balance: String,
}

/// View-model for the register screen.
pub struct RegisterScreen<'a> {
    db: &'a Database,
    notifier: &'a dyn Notifier,
    config: &'a CoreConfig,
}

impl<'a> RegisterScreen<'a> {
    pub fn new(db: &'a Database, notifier: &'a dyn Notifier, config: &'a CoreConfig) -> Self {
        Self {
            db,
            notifier,
            config,
        }
    }

    /// Open a new register session.
    ///
    /// The attendant name is required; the opening float coerces leniently
    /// (unparseable or negative input opens with 0). When the single-open
    /// rule is on, an attendant with an open register is rejected.
    pub fn open_register(&self, input: &OpenRegisterInput) -> Result<CashRegister, ScreenError> {
        let attendant = input.attendant.trim();
        if attendant.is_empty() {
            self.notifier.error("Informe o nome do atendente");
            return Err(ScreenError::RequiredField("atendente"));
        }

        if self.config.enforce_single_open_register
            && self.db.find_open_register_for_attendant(attendant)?.is_some()
        {
            self.notifier
                .error(&format!("{} já possui um caixa aberto", attendant));
            return Err(ScreenError::RegisterAlreadyOpen(attendant.to_string()));
        }

        let opening_balance = coerce_amount(&input.opening_balance);
        let code = format!("CX-{:04}", self.db.count_registers()? + 1);
        let register = CashRegister::open(code, attendant.to_string(), opening_balance);
        self.db.insert_register(&register)?;

        self.audit_log().append(
            AuditAction::RegisterOpened,
            json!({
                "code": register.code,
                "attendant": register.attendant,
                "opening_balance": register.opening_balance,
            }),
        )?;

        info!(code = %register.code, attendant, "register opened");
        self.notifier
            .success(&format!("Caixa {} aberto", register.code));
        Ok(register)
    }

    /// Accumulate a payment into an open register.
    pub fn record_payment(
        &self,
        register_id: &str,
        method: PaymentMethod,
        amount: f64,
    ) -> Result<CashRegister, ScreenError> {
        let mut register = self.require_register(register_id)?;

        if let Err(e) = register.add_payment(method, amount) {
            self.notifier.error("Pagamento não registrado");
            return Err(e.into());
        }
        self.db.update_register(&register)?;
        Ok(register)
    }

    /// Close a register session, snapshotting its totals. Irreversible.
    pub fn close_register(
        &self,
        register_id: &str,
        print_report: bool,
    ) -> Result<ClosingSummary, ScreenError> {
        let mut register = self.require_register(register_id)?;

        if let Err(e) = register.close() {
            self.notifier.error("Este caixa já está fechado");
            return Err(e.into());
        }
        self.db.update_register(&register)?;

        let summary = ClosingSummary {
            register_id: register.id.clone(),
            code: register.code.clone(),
            attendant: register.attendant.clone(),
            opening_balance: register.opening_balance,
            cash_total: register.cash_total,
            card_total: register.card_total,
            check_total: register.check_total,
            grand_total: register.grand_total(),
            closed_at: register.closed_at.clone().unwrap_or_default(),
            print_report,
        };

        self.audit_log().append(
            AuditAction::RegisterClosed,
            json!({
                "code": summary.code,
                "grand_total": summary.grand_total,
                "print_report": summary.print_report,
            }),
        )?;

        info!(
            code = %summary.code,
            grand_total = summary.grand_total,
            "register closed"
        );
        self.notifier
            .success(&format!("Caixa {} fechado", summary.code));
        Ok(summary)
    }

    /// Registers currently open, for the close-register picker.
    pub fn open_registers(&self) -> Result<Vec<CashRegister>, ScreenError> {
        Ok(self.db.list_registers_by_status(&RegisterStatus::Open)?)
    }

    fn require_register(&self, register_id: &str) -> Result<CashRegister, ScreenError> {
        self.db
            .get_register(register_id)?
            .ok_or_else(|| ScreenError::NotFound(register_id.to_string()))
    }

    fn audit_log(&self) -> AuditLog<'a> {
        AuditLog::new(self.db, &self.config.unit_name)
    }
}
