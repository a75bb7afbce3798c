use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::debug;

use crate::models::{
    AddressLookup, DeleteImagesRequest, LocalImage, PropertyRecord, PropertyType, UpdateProperty,
    UploadResponse,
};

/// Everything the edit screen needs from the brokerage backend
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn fetch_property(&self, id: &str) -> Result<PropertyRecord>;

    async fn fetch_property_types(&self) -> Result<Vec<PropertyType>>;

    /// Fetches the raw bytes of an already persisted gallery image
    async fn fetch_image(&self, path: &str) -> Result<Vec<u8>>;

    async fn delete_images(&self, file_names: &[String]) -> Result<()>;

    /// Uploads every image in one multipart request; the returned storage
    /// paths follow the upload order.
    async fn upload_images(&self, images: &[LocalImage]) -> Result<Vec<String>>;

    async fn update_property(&self, id: &str, payload: &UpdateProperty) -> Result<()>;
}

/// Postal-code resolution against the external address service
#[async_trait]
pub trait CepLookup: Send + Sync {
    async fn lookup(&self, code: &str) -> Result<AddressLookup>;
}

/// reqwest-backed client for the brokerage backend
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl BackendApi for ApiClient {
    async fn fetch_property(&self, id: &str) -> Result<PropertyRecord> {
        let url = self.url(&format!("/imovel/{id}"));
        debug!("Fetching property from {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch property")?
            .error_for_status()?;

        response.json().await.context("Failed to parse property")
    }

    async fn fetch_property_types(&self) -> Result<Vec<PropertyType>> {
        let response = self
            .client
            .get(self.url("/tipo-imovel"))
            .send()
            .await
            .context("Failed to fetch property types")?
            .error_for_status()?;

        response
            .json()
            .await
            .context("Failed to parse property types")
    }

    async fn fetch_image(&self, path: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("Failed to fetch image {path}"))?
            .error_for_status()?;

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read image body {path}"))?;

        Ok(bytes.to_vec())
    }

    async fn delete_images(&self, file_names: &[String]) -> Result<()> {
        let body = DeleteImagesRequest {
            files: file_names.to_vec(),
        };

        self.client
            .post(self.url("/files/delete-images"))
            .json(&body)
            .send()
            .await
            .context("Failed to delete images")?
            .error_for_status()?;

        Ok(())
    }

    async fn upload_images(&self, images: &[LocalImage]) -> Result<Vec<String>> {
        let mut form = Form::new();
        for image in images {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.content_type)
                .with_context(|| format!("Invalid content type {}", image.content_type))?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.url("/files/upload"))
            .multipart(form)
            .send()
            .await
            .context("Failed to upload images")?
            .error_for_status()?;

        let body: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;

        Ok(body.paths)
    }

    async fn update_property(&self, id: &str, payload: &UpdateProperty) -> Result<()> {
        self.client
            .put(self.url(&format!("/imovel/{id}")))
            .json(payload)
            .send()
            .await
            .context("Failed to update property")?
            .error_for_status()?;

        Ok(())
    }
}

/// reqwest-backed client for the Brasil API postal-code service
pub struct BrasilApiClient {
    base_url: String,
    client: Client,
}

impl BrasilApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl CepLookup for BrasilApiClient {
    async fn lookup(&self, code: &str) -> Result<AddressLookup> {
        let url = format!("{}/api/cep/v2/{code}", self.base_url);
        debug!("Resolving CEP via {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to look up CEP {code}"))?
            .error_for_status()?;

        response.json().await.context("Failed to parse CEP lookup")
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    let _ = Url::parse(&base).context("Invalid base URL")?;
    Ok(base)
}
