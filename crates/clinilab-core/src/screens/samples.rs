//! Lab sample screen: batch inclusion and cancellation.

use std::collections::BTreeSet;

use serde_json::json;
use tracing::info;

use super::ScreenError;
use crate::audit::{AuditAction, AuditLog};
use crate::config::CoreConfig;
use crate::db::Database;
use crate::models::{LabSample, SampleBatch, SampleNotAvailable};
use crate::ui::{ConfirmPrompt, ConfirmationGate, Notifier};

/// Transient selection state of the inclusion dialog.
///
/// Lives on the screen, never persisted; resets when a batch is confirmed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SampleSelection {
    ids: BTreeSet<String>,
}

impl SampleSelection {
    /// Flip one id in or out of the selection. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in stable order.
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    fn replace_with(&mut self, ids: impl IntoIterator<Item = String>) {
        self.ids = ids.into_iter().collect();
    }

    fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }
}

/// View-model for the sample tracking screen.
pub struct SampleScreen<'a> {
    db: &'a Database,
    notifier: &'a dyn Notifier,
    gate: &'a dyn ConfirmationGate,
    config: &'a CoreConfig,
    selection: SampleSelection,
}

impl<'a> SampleScreen<'a> {
    pub fn new(
        db: &'a Database,
        notifier: &'a dyn Notifier,
        gate: &'a dyn ConfirmationGate,
        config: &'a CoreConfig,
    ) -> Self {
        Self {
            db,
            notifier,
            gate,
            config,
            selection: SampleSelection::default(),
        }
    }

    /// Register a freshly collected sample, available for batching.
    pub fn register_collection(
        &self,
        patient: &str,
        material: &str,
        bench: &str,
    ) -> Result<LabSample, ScreenError> {
        let patient = patient.trim();
        if patient.is_empty() {
            self.notifier.error("Informe o paciente");
            return Err(ScreenError::RequiredField("paciente"));
        }

        let code = format!("AM-{:05}", self.db.count_samples()? + 1);
        let sample = LabSample::new(
            code,
            patient.to_string(),
            material.trim().to_string(),
            bench.trim().to_string(),
        );
        self.db.insert_sample(&sample)?;
        info!(code = %sample.code, "sample registered");
        Ok(sample)
    }

    /// Samples still available for batching.
    pub fn available_samples(&self) -> Result<Vec<LabSample>, ScreenError> {
        Ok(self.db.list_available_samples()?)
    }

    /// Flip one sample in or out of the selection.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Select exactly the available set at this instant.
    pub fn select_all(&mut self) -> Result<usize, ScreenError> {
        let ids = self
            .db
            .list_available_samples()?
            .into_iter()
            .map(|s| s.id);
        self.selection.replace_with(ids);
        Ok(self.selection.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SampleSelection {
        &self.selection
    }

    /// Confirm the inclusion dialog: move every selected sample into a new
    /// batch. Requires at least one selected sample; resets the selection on
    /// success.
    pub fn confirm_inclusion(&mut self) -> Result<SampleBatch, ScreenError> {
        if self.selection.is_empty() {
            self.notifier.error("Selecione ao menos uma amostra");
            return Err(ScreenError::EmptySelection);
        }

        // Validate the whole selection before moving anything
        let mut samples = Vec::new();
        for id in self.selection.ids() {
            let sample = self
                .db
                .get_sample(&id)?
                .ok_or_else(|| ScreenError::NotFound(id.clone()))?;
            if !sample.is_available() {
                self.notifier
                    .error(&format!("Amostra {} não está disponível", sample.code));
                return Err(ScreenError::SampleUnavailable(SampleNotAvailable {
                    code: sample.code.clone(),
                    status: sample.status.label().to_string(),
                }));
            }
            samples.push(sample);
        }

        let code = format!("LT-{:04}", self.db.count_batches()? + 1);
        let mut batch = SampleBatch::new(code);
        self.db.insert_batch(&batch)?;

        for sample in &mut samples {
            sample.assign_to_batch(&batch.id)?;
            self.db.update_sample(sample)?;
            batch.sample_ids.push(sample.id.clone());
        }

        AuditLog::new(self.db, &self.config.unit_name).append(
            AuditAction::SampleBatchCreated,
            json!({
                "code": batch.code,
                "samples": samples.iter().map(|s| s.code.clone()).collect::<Vec<_>>(),
            }),
        )?;

        info!(code = %batch.code, count = batch.sample_ids.len(), "batch created");
        self.notifier.success(&format!(
            "Lote {} criado com {} amostra(s)",
            batch.code,
            batch.sample_ids.len()
        ));
        self.selection.clear();
        Ok(batch)
    }

    /// Cancel a sample. Requires a reason and passage through the confirm
    /// gate; the transition is terminal and the reason is kept for audit.
    pub fn cancel_sample(&mut self, id: &str, reason: &str) -> Result<LabSample, ScreenError> {
        let reason = reason.trim();
        if reason.is_empty() {
            self.notifier.error("Informe o motivo do cancelamento");
            return Err(ScreenError::RequiredField("motivo"));
        }

        let mut sample = self
            .db
            .get_sample(id)?
            .ok_or_else(|| ScreenError::NotFound(id.to_string()))?;

        let prompt = ConfirmPrompt {
            title: "Cancelar amostra",
            description: "Esta ação não pode ser desfeita",
            confirm_label: "Cancelar amostra",
            destructive: true,
        };
        if !self.gate.confirm(&prompt) {
            return Err(ScreenError::NotConfirmed);
        }

        if let Err(e) = sample.cancel(reason) {
            self.notifier
                .error(&format!("Amostra {} não está disponível", sample.code));
            return Err(e.into());
        }
        self.db.update_sample(&sample)?;
        self.selection.remove(id);

        AuditLog::new(self.db, &self.config.unit_name).append(
            AuditAction::SampleCancelled,
            json!({
                "code": sample.code,
                "reason": reason,
            }),
        )?;

        info!(code = %sample.code, "sample cancelled");
        self.notifier
            .success(&format!("Amostra {} cancelada", sample.code));
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SampleStatus;
    use crate::ui::{AlwaysConfirm, NeverConfirm, RecordingNotifier};

    struct Fixture {
        db: Database,
        notifier: RecordingNotifier,
        config: CoreConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                db: Database::open_in_memory().unwrap(),
                notifier: RecordingNotifier::default(),
                config: CoreConfig::default(),
            }
        }

        fn screen(&self) -> SampleScreen<'_> {
            SampleScreen::new(&self.db, &self.notifier, &AlwaysConfirm, &self.config)
        }
    }

    fn seed(screen: &SampleScreen<'_>, count: usize) -> Vec<LabSample> {
        (0..count)
            .map(|i| {
                screen
                    .register_collection(&format!("Paciente {}", i), "Sangue", "Bioquímica")
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_select_all_matches_available_set() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        let samples = seed(&screen, 3);

        assert_eq!(screen.select_all().unwrap(), 3);
        let mut expected: Vec<String> = samples.iter().map(|s| s.id.clone()).collect();
        expected.sort();
        assert_eq!(screen.selection().ids(), expected);

        // Deselecting one yields set-minus-one
        screen.toggle(&samples[1].id);
        assert_eq!(screen.selection().len(), 2);
        assert!(!screen.selection().contains(&samples[1].id));
    }

    #[test]
    fn test_select_all_skips_non_available() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        let samples = seed(&screen, 3);

        screen
            .cancel_sample(&samples[0].id, "Material insuficiente")
            .unwrap();
        assert_eq!(screen.select_all().unwrap(), 2);
        assert!(!screen.selection().contains(&samples[0].id));
    }

    #[test]
    fn test_empty_selection_blocks_inclusion() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        seed(&screen, 2);

        let err = screen.confirm_inclusion().unwrap_err();
        assert!(matches!(err, ScreenError::EmptySelection));
        assert_eq!(fx.notifier.errors(), vec!["Selecione ao menos uma amostra"]);
    }

    #[test]
    fn test_confirm_inclusion_batches_and_resets() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        let samples = seed(&screen, 3);

        screen.toggle(&samples[0].id);
        screen.toggle(&samples[2].id);
        let batch = screen.confirm_inclusion().unwrap();

        assert_eq!(batch.code, "LT-0001");
        assert_eq!(batch.sample_ids.len(), 2);
        assert!(screen.selection().is_empty());

        // Batched samples leave the available listing
        let available = screen.available_samples().unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, samples[1].id);

        let stored = fx.db.get_sample(&samples[0].id).unwrap().unwrap();
        assert_eq!(
            stored.status,
            SampleStatus::Batched {
                batch_id: batch.id.clone()
            }
        );
    }

    #[test]
    fn test_cancel_requires_reason() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        let samples = seed(&screen, 1);

        let err = screen.cancel_sample(&samples[0].id, "   ").unwrap_err();
        assert!(matches!(err, ScreenError::RequiredField("motivo")));
        assert!(fx.db.get_sample(&samples[0].id).unwrap().unwrap().is_available());
    }

    #[test]
    fn test_cancel_gated_by_dialog() {
        let fx = Fixture::new();
        let mut screen =
            SampleScreen::new(&fx.db, &fx.notifier, &NeverConfirm, &fx.config);
        let samples = seed(&screen, 1);

        let err = screen
            .cancel_sample(&samples[0].id, "Pedido do médico")
            .unwrap_err();
        assert!(matches!(err, ScreenError::NotConfirmed));
        assert!(fx.db.get_sample(&samples[0].id).unwrap().unwrap().is_available());
    }

    #[test]
    fn test_cancelled_sample_never_listed_again() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        let samples = seed(&screen, 2);

        let cancelled = screen
            .cancel_sample(&samples[0].id, "Amostra hemolisada")
            .unwrap();
        assert_eq!(
            cancelled.status,
            SampleStatus::Cancelled {
                reason: "Amostra hemolisada".into()
            }
        );

        let available = screen.available_samples().unwrap();
        assert!(available.iter().all(|s| s.id != samples[0].id));

        // And it cannot be batched afterwards
        screen.toggle(&samples[0].id);
        let err = screen.confirm_inclusion().unwrap_err();
        assert!(matches!(err, ScreenError::SampleUnavailable(_)));
    }

    #[test]
    fn test_lifecycle_feeds_audit_chain() {
        let fx = Fixture::new();
        let mut screen = fx.screen();
        let samples = seed(&screen, 2);

        screen.toggle(&samples[0].id);
        screen.confirm_inclusion().unwrap();
        screen
            .cancel_sample(&samples[1].id, "Recipiente inadequado")
            .unwrap();

        let log = AuditLog::new(&fx.db, &fx.config.unit_name);
        assert_eq!(log.verify().unwrap(), 2);
        let events = log.events().unwrap();
        assert_eq!(events[0].action, AuditAction::SampleBatchCreated);
        assert_eq!(events[1].action, AuditAction::SampleCancelled);
        assert_eq!(events[1].detail["reason"], "Recipiente inadequado");
    }
}
