use crate::models::LocalImage;

/// A capability applied to every image entering the gallery widget
pub trait UploadPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, image: &mut LocalImage);
}

/// Registry of upload-widget capabilities
///
/// Populated explicitly once during application bootstrap via
/// `register_default_plugins`, never as an import side effect.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn UploadPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn UploadPlugin>) {
        self.plugins.push(plugin);
    }

    /// Runs every registered plugin over the image, in registration order
    pub fn apply(&self, image: &mut LocalImage) {
        for plugin in &self.plugins {
            plugin.apply(image);
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}

/// Fills in the preview the gallery shows; the preview is the file content
/// itself, decoded by the widget.
pub struct ImagePreviewPlugin;

impl UploadPlugin for ImagePreviewPlugin {
    fn name(&self) -> &'static str {
        "image-preview"
    }

    fn apply(&self, image: &mut LocalImage) {
        if image.preview.is_none() {
            image.preview = Some(image.bytes.clone());
        }
    }
}

/// Records the crop selection offered in the widget. Selection metadata only;
/// no pixel processing happens client-side.
pub struct ImageCropPlugin {
    pub aspect_ratio: String,
}

impl UploadPlugin for ImageCropPlugin {
    fn name(&self) -> &'static str {
        "image-crop"
    }

    fn apply(&self, image: &mut LocalImage) {
        image.crop_aspect = Some(self.aspect_ratio.clone());
    }
}

/// The plugin set the edit screen runs with
pub fn register_default_plugins(registry: &mut PluginRegistry) {
    registry.register(Box::new(ImagePreviewPlugin));
    registry.register(Box::new(ImageCropPlugin {
        aspect_ratio: "16:9".to_string(),
    }));
}
