use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One gallery file as the backend persists it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub path: String,
    pub file_name: String,
}

/// Reference data describing a kind of listing (house, apartment, lot, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyType {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Property record as returned by `GET /imovel/{id}`
///
/// Counters and measurements travel as strings; the backend formats them and
/// the form never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: String,
    pub name: String,
    pub summary: String,
    /// Rich-text description, serialized HTML markup
    pub description: String,
    /// Currency-formatted decimal, e.g. "R$350.000,00"
    pub value: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub suites: String,
    pub parking_spots: String,
    pub total_area: String,
    pub private_area: String,
    pub created_at: DateTime<Utc>,
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number_address: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(rename = "type_property")]
    pub type_property: PropertyType,
    pub files: Vec<RemoteFile>,
}

/// An image file held in memory, pending upload
#[derive(Debug, Clone, PartialEq)]
pub struct LocalImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// Preview shown by the gallery widget, filled in by the preview plugin
    pub preview: Option<Vec<u8>>,
    /// Crop selection made in the widget; the bytes are uploaded untouched
    pub crop_aspect: Option<String>,
}

impl LocalImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
            preview: None,
            crop_aspect: None,
        }
    }
}

/// A gallery entry: either already persisted remotely or pending local upload
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEntry {
    Remote { path: String, file_name: String },
    Local(LocalImage),
}

impl ImageEntry {
    pub fn file_name(&self) -> &str {
        match self {
            ImageEntry::Remote { file_name, .. } => file_name,
            ImageEntry::Local(image) => &image.file_name,
        }
    }
}

/// Response of the external postal-code service (`GET /api/cep/v2/{code}`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddressLookup {
    pub city: String,
    pub neighborhood: String,
    pub state: String,
    pub street: String,
    pub location: GeoLocation,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoLocation {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// Body of `POST /files/delete-images`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteImagesRequest {
    pub files: Vec<String>,
}

/// Response of `POST /files/upload`; paths come back in upload order
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub paths: Vec<String>,
}

/// Body of `PUT /imovel/{id}`: every form field plus the freshly uploaded paths
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProperty {
    pub name: String,
    pub value: String,
    pub summary: String,
    #[serde(rename = "type_id")]
    pub type_id: String,
    pub description: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub suites: String,
    pub parking_spots: String,
    pub total_area: String,
    pub private_area: String,
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub number: String,
    pub latitude: String,
    pub longitude: String,
    pub files: Vec<String>,
}
