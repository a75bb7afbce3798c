use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::BackendApi;
use crate::form::{FieldError, PropertyForm};
use crate::gallery::ImageSet;
use crate::models::PropertyRecord;

/// Phase of the current (or last) submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    /// Validation failed; nothing was sent
    Blocked,
    InFlight,
    Succeeded,
}

/// Why a submission did not complete
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Schema validation failed; the field-level messages live on the form
    #[error("campos obrigatórios não preenchidos")]
    Validation(Vec<FieldError>),
    #[error("Para continuar precisar ter ao menos uma imagem")]
    EmptyGallery,
    /// A previous submission is still in flight
    #[error("já existe um envio em andamento")]
    InFlight,
    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

/// Sequences one save attempt: validate, delete stale images, upload the
/// working set, persist the record. One attempt at a time, no retry, no
/// rollback of completed steps.
pub struct Orchestrator {
    phase: Phase,
    busy: bool,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            busy: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub async fn save(
        &mut self,
        api: &dyn BackendApi,
        record: &PropertyRecord,
        form: &mut PropertyForm,
        gallery: &ImageSet,
    ) -> Result<(), SubmitError> {
        if self.busy {
            return Err(SubmitError::InFlight);
        }

        self.phase = Phase::Validating;
        if !form.validate() {
            self.phase = Phase::Blocked;
            return Err(SubmitError::Validation(form.errors().to_vec()));
        }
        if gallery.is_empty() {
            self.phase = Phase::Blocked;
            return Err(SubmitError::EmptyGallery);
        }

        self.busy = true;
        self.phase = Phase::InFlight;
        let result = run_pipeline(api, record, form, gallery).await;
        self.busy = false;

        match result {
            Ok(()) => {
                self.phase = Phase::Succeeded;
                Ok(())
            }
            Err(err) => {
                // The screen stays on its unsaved state for a retry
                self.phase = Phase::Idle;
                Err(SubmitError::Pipeline(err))
            }
        }
    }

    #[cfg(test)]
    fn force_busy(&mut self) {
        self.busy = true;
        self.phase = Phase::InFlight;
    }
}

/// The fixed step order: conditional delete, upload, persist. An upload
/// success followed by a persist failure leaves the fresh uploads orphaned;
/// there is no compensating delete.
async fn run_pipeline(
    api: &dyn BackendApi,
    record: &PropertyRecord,
    form: &PropertyForm,
    gallery: &ImageSet,
) -> Result<()> {
    let stale: Vec<String> = record
        .files
        .iter()
        .map(|file| file.file_name.clone())
        .collect();
    if !stale.is_empty() {
        // Cleanup only; a failure here leaves unreferenced files behind and
        // the pipeline carries on.
        if let Err(err) = api.delete_images(&stale).await {
            warn!("failed to delete {} stale image(s): {err:#}", stale.len());
        }
    }

    let images = gallery.local_images();
    let paths = api
        .upload_images(&images)
        .await
        .context("Failed to upload gallery images")?;
    info!("uploaded {} image(s)", paths.len());

    let payload = form.to_payload(paths);
    api.update_property(&record.id, &payload)
        .await
        .context("Failed to persist property")?;

    Ok(())
}
