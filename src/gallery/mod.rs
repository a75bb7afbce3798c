pub mod plugins;

use anyhow::{Context, Result};
use futures_util::future::join_all;
use tracing::warn;

use crate::api::BackendApi;
use crate::models::{ImageEntry, LocalImage, RemoteFile};

pub use plugins::{register_default_plugins, PluginRegistry, UploadPlugin};

/// Extensions the gallery accepts; anything else is dropped on load
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Matches the trailing extension of `path` against the known image
/// extensions, case-insensitively. Returns the lowercased extension, which
/// doubles as the content-type subtype.
pub fn image_extension(path: &str) -> Option<String> {
    let (_, ext) = path.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Ordered working set of gallery images for one edit session
///
/// The list order is canonical: it is the order files are uploaded in and the
/// order the persisted record ends up with.
#[derive(Debug, Default)]
pub struct ImageSet {
    entries: Vec<ImageEntry>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement. The widget hands back the full ordered list
    /// after every change; there is no incremental patch contract.
    pub fn replace(&mut self, entries: Vec<ImageEntry>) {
        self.entries = entries;
    }

    pub fn add(&mut self, entry: ImageEntry) {
        let mut next = self.entries.clone();
        next.push(entry);
        self.replace(next);
    }

    pub fn remove(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        let mut next = self.entries.clone();
        next.remove(index);
        self.replace(next);
    }

    pub fn reorder(&mut self, from: usize, to: usize) {
        if from >= self.entries.len() {
            return;
        }
        let mut next = self.entries.clone();
        let entry = next.remove(from);
        let to = to.min(next.len());
        next.insert(to, entry);
        self.replace(next);
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The files to send on save. Remote entries carry no bytes and cannot be
    /// re-uploaded; a hydrated working set never contains any.
    pub fn local_images(&self) -> Vec<LocalImage> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                ImageEntry::Local(image) => Some(image.clone()),
                ImageEntry::Remote { path, .. } => {
                    warn!("skipping unhydrated remote image {path}");
                    None
                }
            })
            .collect()
    }
}

/// Seeds the working set for an existing record: keeps the files with a known
/// image extension, fetches their bytes concurrently and hydrates them into
/// local entries, preserving the record's file order.
pub async fn seed_from_record(
    api: &dyn BackendApi,
    files: &[RemoteFile],
    plugins: &PluginRegistry,
) -> Result<Vec<ImageEntry>> {
    let candidates: Vec<(&RemoteFile, String)> = files
        .iter()
        .filter_map(|file| image_extension(&file.path).map(|ext| (file, ext)))
        .collect();

    // Fan out one fetch per file, join on all of them; join_all keeps the
    // input order regardless of completion order.
    let fetches = candidates.iter().map(|(file, _)| api.fetch_image(&file.path));
    let bodies = join_all(fetches).await;

    let mut entries = Vec::with_capacity(candidates.len());
    for ((file, ext), body) in candidates.iter().zip(bodies) {
        let bytes = body.with_context(|| format!("Failed to fetch image {}", file.path))?;
        let mut image = LocalImage::new(file.file_name.clone(), format!("image/{ext}"), bytes);
        plugins.apply(&mut image);
        entries.push(ImageEntry::Local(image));
    }

    Ok(entries)
}
