use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::CepLookup;
use crate::form::{Field, PropertyForm};
use crate::gallery::ImageSet;
use crate::models::ImageEntry;

/// Minimum postal-code length before a lookup fires
const CEP_LOOKUP_LEN: usize = 8;

/// Something that happened in the edit session
#[derive(Debug, Clone)]
pub enum EditEvent {
    FieldChanged(Field),
    /// The gallery widget handed back its full file list
    FilesChanged(Vec<ImageEntry>),
}

/// The mutable screen state observers act on
#[derive(Debug, Default)]
pub struct EditState {
    pub form: PropertyForm,
    pub gallery: ImageSet,
}

/// An observer subscribed to the edit session's events
#[async_trait]
pub trait EditObserver: Send + Sync {
    async fn on_event(&self, state: &mut EditState, event: &EditEvent) -> Result<()>;
}

/// Single dispatcher every edit event flows through
///
/// Observers run in subscription order; a failing observer is logged and
/// never blocks the session.
#[derive(Default)]
pub struct Dispatcher {
    observers: Vec<Box<dyn EditObserver>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn EditObserver>) {
        self.observers.push(observer);
    }

    pub async fn dispatch(&self, state: &mut EditState, event: EditEvent) {
        for observer in &self.observers {
            if let Err(err) = observer.on_event(state, &event).await {
                warn!("edit observer failed: {err:#}");
            }
        }
    }
}

/// Watches the CEP field and auto-fills the address once the code is long
/// enough to resolve. Resolved values always win over manual entries.
pub struct AddressResolver {
    lookup: Arc<dyn CepLookup>,
}

impl AddressResolver {
    pub fn new(lookup: Arc<dyn CepLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl EditObserver for AddressResolver {
    async fn on_event(&self, state: &mut EditState, event: &EditEvent) -> Result<()> {
        match event {
            EditEvent::FieldChanged(Field::Cep) => {}
            _ => return Ok(()),
        }

        let cep = state.form.get(Field::Cep).to_string();
        if cep.len() < CEP_LOOKUP_LEN {
            return Ok(());
        }

        match self.lookup.lookup(&cep).await {
            Ok(address) => {
                debug!("CEP {cep} resolved to {}/{}", address.city, address.state);
                state.form.set(Field::City, address.city);
                state.form.set(Field::Neighborhood, address.neighborhood);
                state.form.set(Field::State, address.state);
                state.form.set(Field::Street, address.street);
                state
                    .form
                    .set(Field::Latitude, address.location.coordinates.latitude);
                state
                    .form
                    .set(Field::Longitude, address.location.coordinates.longitude);
            }
            // A failed lookup never reaches the user; prior values stay put
            Err(err) => debug!("CEP {cep} lookup failed: {err:#}"),
        }

        Ok(())
    }
}

/// Mirrors the widget's file list into the working set, always as a whole
pub struct FileListWatcher;

#[async_trait]
impl EditObserver for FileListWatcher {
    async fn on_event(&self, state: &mut EditState, event: &EditEvent) -> Result<()> {
        if let EditEvent::FilesChanged(entries) = event {
            state.gallery.replace(entries.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        balneario_lookup, local_entry, sample_record, CountingCep, FailingCep,
    };

    fn state() -> EditState {
        EditState {
            form: PropertyForm::from_record(&sample_record()),
            gallery: ImageSet::new(),
        }
    }

    fn resolver_with(cep: Arc<CountingCep>) -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Box::new(AddressResolver::new(cep)));
        dispatcher
    }

    #[tokio::test]
    async fn short_codes_never_trigger_a_lookup() {
        let cep = Arc::new(CountingCep::new(balneario_lookup()));
        let dispatcher = resolver_with(cep.clone());
        let mut state = state();

        for code in ["8", "88", "8835000"] {
            state.form.set(Field::Cep, code);
            dispatcher
                .dispatch(&mut state, EditEvent::FieldChanged(Field::Cep))
                .await;
        }

        assert_eq!(cep.calls(), 0);
    }

    #[tokio::test]
    async fn a_qualifying_code_resolves_once_and_overwrites_the_address() {
        let cep = Arc::new(CountingCep::new(balneario_lookup()));
        let dispatcher = resolver_with(cep.clone());
        let mut state = state();

        // Manual entries that the resolver must overwrite
        state.form.set(Field::City, "Itajaí");
        state.form.set(Field::Street, "Rua Errada");

        state.form.set(Field::Cep, "88350000");
        dispatcher
            .dispatch(&mut state, EditEvent::FieldChanged(Field::Cep))
            .await;

        assert_eq!(cep.calls(), 1);
        assert_eq!(state.form.get(Field::City), "Balneário Camboriú");
        assert_eq!(state.form.get(Field::Neighborhood), "Centro");
        assert_eq!(state.form.get(Field::State), "SC");
        assert_eq!(state.form.get(Field::Street), "Rua 2000");
        assert_eq!(state.form.get(Field::Latitude), "-26.99");
        assert_eq!(state.form.get(Field::Longitude), "-48.63");
    }

    #[tokio::test]
    async fn every_qualifying_change_retriggers_the_lookup() {
        let cep = Arc::new(CountingCep::new(balneario_lookup()));
        let dispatcher = resolver_with(cep.clone());
        let mut state = state();

        state.form.set(Field::Cep, "88350000");
        dispatcher
            .dispatch(&mut state, EditEvent::FieldChanged(Field::Cep))
            .await;
        state.form.set(Field::Cep, "88350001");
        dispatcher
            .dispatch(&mut state, EditEvent::FieldChanged(Field::Cep))
            .await;

        assert_eq!(cep.calls(), 2);
    }

    #[tokio::test]
    async fn other_fields_do_not_trigger_lookups() {
        let cep = Arc::new(CountingCep::new(balneario_lookup()));
        let dispatcher = resolver_with(cep.clone());
        let mut state = state();

        state.form.set(Field::City, "Brusque");
        dispatcher
            .dispatch(&mut state, EditEvent::FieldChanged(Field::City))
            .await;

        assert_eq!(cep.calls(), 0);
    }

    #[tokio::test]
    async fn a_failed_lookup_leaves_the_address_untouched() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Box::new(AddressResolver::new(Arc::new(FailingCep))));
        let mut state = state();

        state.form.set(Field::City, "Itajaí");
        state.form.set(Field::Cep, "88350000");
        dispatcher
            .dispatch(&mut state, EditEvent::FieldChanged(Field::Cep))
            .await;

        assert_eq!(state.form.get(Field::City), "Itajaí");
    }

    #[tokio::test]
    async fn file_list_watcher_replaces_the_working_set() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(Box::new(FileListWatcher));
        let mut state = state();
        state.gallery.add(local_entry("old.jpg"));

        dispatcher
            .dispatch(
                &mut state,
                EditEvent::FilesChanged(vec![local_entry("new1.png"), local_entry("new2.png")]),
            )
            .await;

        let names: Vec<&str> = state
            .gallery
            .entries()
            .iter()
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec!["new1.png", "new2.png"]);
    }
}
