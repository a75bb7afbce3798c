//! Shared fakes and fixtures for the module tests. The remote services are
//! exercised through their traits; every fake records what was called.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::{BackendApi, CepLookup};
use crate::models::{
    AddressLookup, Coordinates, GeoLocation, ImageEntry, LocalImage, PropertyRecord, PropertyType,
    RemoteFile, UpdateProperty,
};
use crate::screen::{Navigator, Notifier};

pub fn sample_type() -> PropertyType {
    PropertyType {
        id: "tipo-1".to_string(),
        description: "Casa".to_string(),
        created_at: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
    }
}

/// A fully filled record with no gallery files
pub fn sample_record() -> PropertyRecord {
    PropertyRecord {
        id: "imovel-1".to_string(),
        name: "Casa no Centro".to_string(),
        summary: "Casa ampla no centro da cidade".to_string(),
        description: "<p>Casa ampla, recém reformada.</p>".to_string(),
        value: "R$350.000,00".to_string(),
        bedrooms: "3".to_string(),
        bathrooms: "2".to_string(),
        suites: "1".to_string(),
        parking_spots: "2".to_string(),
        total_area: "200".to_string(),
        private_area: "150".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        cep: "88350000".to_string(),
        state: "SC".to_string(),
        city: "Brusque".to_string(),
        neighborhood: "Centro".to_string(),
        street: "Rua Principal".to_string(),
        number_address: "42".to_string(),
        latitude: "-27.09".to_string(),
        longitude: "-48.91".to_string(),
        type_property: sample_type(),
        files: Vec::new(),
    }
}

pub fn remote_file(path: &str, file_name: &str) -> RemoteFile {
    RemoteFile {
        id: file_name.to_string(),
        path: path.to_string(),
        file_name: file_name.to_string(),
    }
}

pub fn local_image(file_name: &str) -> LocalImage {
    LocalImage::new(file_name, "image/png", vec![1, 2, 3])
}

pub fn local_entry(file_name: &str) -> ImageEntry {
    ImageEntry::Local(local_image(file_name))
}

pub fn balneario_lookup() -> AddressLookup {
    AddressLookup {
        city: "Balneário Camboriú".to_string(),
        neighborhood: "Centro".to_string(),
        state: "SC".to_string(),
        street: "Rua 2000".to_string(),
        location: GeoLocation {
            coordinates: Coordinates {
                latitude: "-26.99".to_string(),
                longitude: "-48.63".to_string(),
            },
        },
    }
}

/// Backend fake that records every call in order
#[derive(Default)]
pub struct RecordingApi {
    pub calls: Mutex<Vec<String>>,
    pub record: Option<PropertyRecord>,
    pub types: Vec<PropertyType>,
    /// Image bodies served by `fetch_image`, keyed by path
    pub images: HashMap<String, Vec<u8>>,
    pub fail_delete: bool,
    pub fail_upload: bool,
    pub fail_update: bool,
    pub deletes: Mutex<Vec<Vec<String>>>,
    pub uploads: Mutex<Vec<Vec<String>>>,
    pub updates: Mutex<Vec<(String, UpdateProperty)>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn note(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BackendApi for RecordingApi {
    async fn fetch_property(&self, id: &str) -> Result<PropertyRecord> {
        self.note(format!("GET /imovel/{id}"));
        self.record
            .clone()
            .ok_or_else(|| anyhow!("no record configured"))
    }

    async fn fetch_property_types(&self) -> Result<Vec<PropertyType>> {
        self.note("GET /tipo-imovel".to_string());
        Ok(self.types.clone())
    }

    async fn fetch_image(&self, path: &str) -> Result<Vec<u8>> {
        self.note(format!("GET {path}"));
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("no image at {path}"))
    }

    async fn delete_images(&self, file_names: &[String]) -> Result<()> {
        self.note("POST /files/delete-images".to_string());
        self.deletes.lock().unwrap().push(file_names.to_vec());
        if self.fail_delete {
            bail!("delete failed");
        }
        Ok(())
    }

    async fn upload_images(&self, images: &[LocalImage]) -> Result<Vec<String>> {
        self.note("POST /files/upload".to_string());
        let names: Vec<String> = images.iter().map(|i| i.file_name.clone()).collect();
        self.uploads.lock().unwrap().push(names);
        if self.fail_upload {
            bail!("upload failed");
        }
        Ok(images
            .iter()
            .enumerate()
            .map(|(i, image)| format!("uploads/{i}-{}", image.file_name))
            .collect())
    }

    async fn update_property(&self, id: &str, payload: &UpdateProperty) -> Result<()> {
        self.note(format!("PUT /imovel/{id}"));
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), payload.clone()));
        if self.fail_update {
            bail!("update failed");
        }
        Ok(())
    }
}

/// CEP fake that always resolves to the same address and counts lookups
pub struct CountingCep {
    result: AddressLookup,
    calls: AtomicUsize,
}

impl CountingCep {
    pub fn new(result: AddressLookup) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CepLookup for CountingCep {
    async fn lookup(&self, _code: &str) -> Result<AddressLookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.result.clone())
    }
}

/// CEP fake whose lookups always fail
pub struct FailingCep;

#[async_trait]
impl CepLookup for FailingCep {
    async fn lookup(&self, code: &str) -> Result<AddressLookup> {
        bail!("lookup for {code} failed")
    }
}

#[derive(Default)]
pub struct TestNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl TestNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for TestNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct TestNavigator {
    routes: Mutex<Vec<String>>,
}

impl TestNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for TestNavigator {
    fn push(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}
