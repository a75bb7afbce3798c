use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::{BackendApi, CepLookup};
use crate::form::{Field, PropertyForm};
use crate::gallery::{self, ImageSet, PluginRegistry};
use crate::models::{ImageEntry, LocalImage, PropertyRecord, PropertyType};
use crate::submit::{Orchestrator, SubmitError};
use crate::watch::{AddressResolver, Dispatcher, EditEvent, EditState, FileListWatcher};

/// Session state as reported by the auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
    Loading,
}

/// Toast-style notifications surfaced to the user
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Client-side route changes
pub trait Navigator: Send + Sync {
    fn push(&self, route: &str);
}

/// Notifier used by the binary: plain log lines
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("✅ {message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

/// Navigator used by the binary: logs the route it would move to
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn push(&self, route: &str) {
        info!("navigating to {route}");
    }
}

/// Everything the edit screen needs from the outside world
pub struct ScreenDeps {
    pub api: Arc<dyn BackendApi>,
    pub cep: Arc<dyn CepLookup>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub plugins: Arc<PluginRegistry>,
}

/// What opening the screen produced
pub enum ScreenEntry {
    Editor(EditorScreen),
    RedirectToLogin,
}

/// Screen-level controller for the property edit flow
///
/// Owns the form state and the image working set for the duration of one
/// edit session; every input runs through the single event dispatcher.
pub struct EditorScreen {
    deps: ScreenDeps,
    dispatcher: Dispatcher,
    state: EditState,
    record: PropertyRecord,
    types: Vec<PropertyType>,
    orchestrator: Orchestrator,
}

impl EditorScreen {
    /// Opens the edit screen for `property_id`. An unauthenticated session
    /// is sent to the login page instead of a screen.
    pub async fn open(
        session: SessionStatus,
        deps: ScreenDeps,
        property_id: &str,
    ) -> Result<ScreenEntry> {
        if session == SessionStatus::Unauthenticated {
            deps.navigator.push("/login");
            return Ok(ScreenEntry::RedirectToLogin);
        }

        let record = deps
            .api
            .fetch_property(property_id)
            .await
            .context("Failed to load property")?;
        let types = deps
            .api
            .fetch_property_types()
            .await
            .context("Failed to load property types")?;

        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Box::new(AddressResolver::new(deps.cep.clone())));
        dispatcher.subscribe(Box::new(FileListWatcher));

        let mut state = EditState {
            form: PropertyForm::from_record(&record),
            gallery: ImageSet::new(),
        };

        match gallery::seed_from_record(deps.api.as_ref(), &record.files, &deps.plugins).await {
            Ok(entries) => {
                if !entries.is_empty() {
                    dispatcher
                        .dispatch(&mut state, EditEvent::FilesChanged(entries))
                        .await;
                }
            }
            // The screen still opens; the user re-adds images by hand
            Err(err) => warn!("failed to seed gallery: {err:#}"),
        }

        Ok(ScreenEntry::Editor(EditorScreen {
            deps,
            dispatcher,
            state,
            record,
            types,
            orchestrator: Orchestrator::new(),
        }))
    }

    pub fn record(&self) -> &PropertyRecord {
        &self.record
    }

    pub fn types(&self) -> &[PropertyType] {
        &self.types
    }

    pub fn form(&self) -> &PropertyForm {
        &self.state.form
    }

    pub fn gallery(&self) -> &ImageSet {
        &self.state.gallery
    }

    /// Whether a submission is in flight (the busy indicator)
    pub fn is_saving(&self) -> bool {
        self.orchestrator.is_busy()
    }

    /// The user edited one field; the change runs through the dispatcher so
    /// watchers see it.
    pub async fn input(&mut self, field: Field, value: impl Into<String>) {
        self.state.form.set(field, value);
        self.dispatcher
            .dispatch(&mut self.state, EditEvent::FieldChanged(field))
            .await;
    }

    /// The gallery widget handed back its full file list
    pub async fn set_files(&mut self, entries: Vec<ImageEntry>) {
        self.dispatcher
            .dispatch(&mut self.state, EditEvent::FilesChanged(entries))
            .await;
    }

    pub async fn add_file(&mut self, mut image: LocalImage) {
        self.deps.plugins.apply(&mut image);
        self.state.gallery.add(ImageEntry::Local(image));
        self.sync_files().await;
    }

    pub async fn remove_file(&mut self, index: usize) {
        self.state.gallery.remove(index);
        self.sync_files().await;
    }

    pub async fn reorder_file(&mut self, from: usize, to: usize) {
        self.state.gallery.reorder(from, to);
        self.sync_files().await;
    }

    /// After a widget-side mutation the full list goes back through the
    /// dispatcher, like the widget's change callback does.
    async fn sync_files(&mut self) {
        let entries = self.state.gallery.entries().to_vec();
        self.set_files(entries).await;
    }

    /// Runs the save pipeline and reports the outcome to the user
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        let result = self
            .orchestrator
            .save(
                self.deps.api.as_ref(),
                &self.record,
                &mut self.state.form,
                &self.state.gallery,
            )
            .await;

        match &result {
            Ok(()) => {
                self.deps.notifier.success("Imóvel alterado com sucesso");
                self.deps.navigator.push("/admin/imoveis");
            }
            Err(SubmitError::Validation(errors)) => {
                // Field-level messages are already on the form
                info!("submission blocked: {} field error(s)", errors.len());
            }
            Err(SubmitError::EmptyGallery) => {
                self.deps
                    .notifier
                    .error("Para continuar precisar ter ao menos uma imagem");
            }
            Err(SubmitError::InFlight) => {}
            Err(SubmitError::Pipeline(err)) => {
                error!("failed to save property: {err:#}");
                self.deps
                    .notifier
                    .error("Não foi possível salvar o imóvel, tente novamente");
            }
        }

        result
    }
}
