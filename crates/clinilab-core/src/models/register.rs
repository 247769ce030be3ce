//! Cash register (caixa) models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for invalid register state transitions.
#[derive(Error, Debug, PartialEq)]
pub enum RegisterStateError {
    #[error("register is closed")]
    Closed,

    #[error("amount must be positive")]
    NonPositiveAmount,
}

/// Cash register status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegisterStatus {
    /// Accepting payments, open for the attendant's shift
    Open,
    /// Totals snapshotted, no further mutation
    Closed,
}

/// Payment method, each accumulating into its own total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Check,
}

impl PaymentMethod {
    /// Display label (pt-BR, as shown on the register screens).
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "dinheiro",
            PaymentMethod::Card => "cartão",
            PaymentMethod::Check => "cheque",
        }
    }
}

/// One attendant's cash register session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashRegister {
    /// Unique register ID
    pub id: String,
    /// Sequential display code (e.g. "CX-0001")
    pub code: String,
    /// Attendant responsible for the session
    pub attendant: String,
    /// Float the session opened with
    pub opening_balance: f64,
    /// Accumulated cash payments
    pub cash_total: f64,
    /// Accumulated card payments
    pub card_total: f64,
    /// Accumulated check payments
    pub check_total: f64,
    /// Session status
    pub status: RegisterStatus,
    /// Opening timestamp
    pub opened_at: String,
    /// Closing timestamp, set on close
    pub closed_at: Option<String>,
}

impl CashRegister {
    /// Open a new register session for an attendant.
    pub fn open(code: String, attendant: String, opening_balance: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            attendant,
            opening_balance,
            cash_total: 0.0,
            card_total: 0.0,
            check_total: 0.0,
            status: RegisterStatus::Open,
            opened_at: chrono::Utc::now().to_rfc3339(),
            closed_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RegisterStatus::Open
    }

    /// Sum of cash, card and check totals.
    pub fn grand_total(&self) -> f64 {
        self.cash_total + self.card_total + self.check_total
    }

    /// Accumulate a payment into the matching total.
    ///
    /// Totals are additive only; a closed register rejects every payment.
    pub fn add_payment(
        &mut self,
        method: PaymentMethod,
        amount: f64,
    ) -> Result<(), RegisterStateError> {
        if !self.is_open() {
            return Err(RegisterStateError::Closed);
        }
        if amount <= 0.0 {
            return Err(RegisterStateError::NonPositiveAmount);
        }
        match method {
            PaymentMethod::Cash => self.cash_total += amount,
            PaymentMethod::Card => self.card_total += amount,
            PaymentMethod::Check => self.check_total += amount,
        }
        Ok(())
    }

    /// Close the session, snapshotting totals. Irreversible.
    pub fn close(&mut self) -> Result<(), RegisterStateError> {
        if !self.is_open() {
            return Err(RegisterStateError::Closed);
        }
        self.status = RegisterStatus::Closed;
        self.closed_at = Some(chrono::Utc::now().to_rfc3339());
        Ok(())
    }
}

/// Snapshot returned when a register session closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosingSummary {
    pub register_id: String,
    pub code: String,
    pub attendant: String,
    pub opening_balance: f64,
    pub cash_total: f64,
    pub card_total: f64,
    pub check_total: f64,
    /// cash + card + check, exactly
    pub grand_total: f64,
    pub closed_at: String,
    /// Whether the caller asked for a printed closing report
    pub print_report: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_register() {
        let reg = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 150.0);
        assert!(reg.is_open());
        assert_eq!(reg.code, "CX-0001");
        assert_eq!(reg.opening_balance, 150.0);
        assert_eq!(reg.grand_total(), 0.0);
        assert_eq!(reg.id.len(), 36);
        assert!(reg.closed_at.is_none());
    }

    #[test]
    fn test_payments_accumulate_per_method() {
        let mut reg = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 0.0);
        reg.add_payment(PaymentMethod::Cash, 100.0).unwrap();
        reg.add_payment(PaymentMethod::Card, 55.5).unwrap();
        reg.add_payment(PaymentMethod::Check, 44.5).unwrap();
        reg.add_payment(PaymentMethod::Cash, 10.0).unwrap();

        assert_eq!(reg.cash_total, 110.0);
        assert_eq!(reg.card_total, 55.5);
        assert_eq!(reg.check_total, 44.5);
        assert_eq!(reg.grand_total(), 210.0);
    }

    #[test]
    fn test_non_positive_payment_rejected() {
        let mut reg = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 0.0);
        assert_eq!(
            reg.add_payment(PaymentMethod::Cash, 0.0),
            Err(RegisterStateError::NonPositiveAmount)
        );
        assert_eq!(
            reg.add_payment(PaymentMethod::Cash, -5.0),
            Err(RegisterStateError::NonPositiveAmount)
        );
        assert_eq!(reg.grand_total(), 0.0);
    }

    #[test]
    fn test_close_is_terminal() {
        let mut reg = CashRegister::open("CX-0001".into(), "Maria Silva".into(), 0.0);
        reg.add_payment(PaymentMethod::Cash, 30.0).unwrap();
        reg.close().unwrap();

        assert!(!reg.is_open());
        assert!(reg.closed_at.is_some());
        assert_eq!(reg.close(), Err(RegisterStateError::Closed));
        assert_eq!(
            reg.add_payment(PaymentMethod::Card, 10.0),
            Err(RegisterStateError::Closed)
        );
        assert_eq!(reg.grand_total(), 30.0);
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Cash.label(), "dinheiro");
        assert_eq!(PaymentMethod::Card.label(), "cartão");
        assert_eq!(PaymentMethod::Check.label(), "cheque");
    }
}
