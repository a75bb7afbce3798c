mod api;
mod config;
mod form;
mod gallery;
mod models;
mod screen;
mod submit;
#[cfg(test)]
mod testutil;
mod watch;

use std::sync::Arc;

use anyhow::Context;
use api::{ApiClient, BrasilApiClient};
use config::Config;
use gallery::{register_default_plugins, PluginRegistry};
use screen::{EditorScreen, LogNavigator, LogNotifier, ScreenDeps, ScreenEntry, SessionStatus};
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏢 Auros Admin - Edição de Imóvel");

    let property_id = std::env::args()
        .nth(1)
        .context("usage: auros-admin <property-id>")?;
    let config = Config::from_env();

    // Upload-widget capabilities are registered once here, never at import time
    let mut plugins = PluginRegistry::new();
    register_default_plugins(&mut plugins);
    info!("Registered upload plugins: {}", plugins.names().join(", "));

    let deps = ScreenDeps {
        api: Arc::new(ApiClient::new(&config.api_base_url)?),
        cep: Arc::new(BrasilApiClient::new(&config.cep_base_url)?),
        notifier: Arc::new(LogNotifier),
        navigator: Arc::new(LogNavigator),
        plugins: Arc::new(plugins),
    };

    info!("Loading property {property_id} from {}", config.api_base_url);

    match EditorScreen::open(SessionStatus::Authenticated, deps, &property_id).await? {
        ScreenEntry::RedirectToLogin => info!("Session expired, redirected to /login"),
        ScreenEntry::Editor(editor) => {
            let record = editor.record();
            info!("Loaded \"{}\" ({})", record.name, record.id);
            info!("{} property type(s) available", editor.types().len());
            let names: Vec<&str> = editor
                .gallery()
                .entries()
                .iter()
                .map(|entry| entry.file_name())
                .collect();
            info!(
                "Gallery seeded with {} image(s): {}",
                names.len(),
                names.join(", ")
            );
        }
    }

    Ok(())
}
