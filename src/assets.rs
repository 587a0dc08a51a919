//! Background loading of the card's model and font.
//!
//! Both requests run independently on the rayon pool. Results are handed to a
//! sink (the event loop proxy in the app) and applied on the main thread with
//! [`apply`], so scene state is never touched from a worker.

use std::path::Path;
use std::sync::Arc;

use crate::cards::CardScene;
use crate::config::AssetPaths;
use crate::model::Mesh;
use crate::text::Font;

#[derive(Debug)]
pub enum AssetEvent {
    Model(anyhow::Result<Arc<Mesh>>),
    Font(anyhow::Result<Arc<Font>>),
}

pub fn load_model(path: &Path) -> anyhow::Result<Mesh> {
    Ok(Mesh::load_obj(path)?.normalized())
}

pub fn load_font(path: &Path) -> anyhow::Result<Font> {
    Font::load(path)
}

/// Starts both loads. Neither waits for the other, and there is no timeout or
/// cancellation; `sink` is called once per asset from a worker thread.
pub fn spawn_loads<F>(paths: &AssetPaths, sink: F)
where
    F: Fn(AssetEvent) + Clone + Send + 'static,
{
    let model_path = paths.model.clone();
    let model_sink = sink.clone();
    rayon::spawn(move || {
        let result = load_model(&model_path).map(Arc::new);
        model_sink(AssetEvent::Model(result));
    });

    let font_path = paths.font.clone();
    rayon::spawn(move || {
        let result = load_font(&font_path).map(Arc::new);
        sink(AssetEvent::Font(result));
    });
}

/// Publishes a finished load into the card. Failures are logged and the card
/// keeps running without the asset.
pub fn apply(card: &mut dyn CardScene, event: AssetEvent) {
    match event {
        AssetEvent::Model(Ok(mesh)) => {
            log::info!(
                "Loaded model {} ({} vertices, {} triangles)",
                mesh.name,
                mesh.vertices.len(),
                mesh.triangle_count()
            );
            card.on_model_loaded(mesh);
        }
        AssetEvent::Model(Err(err)) => {
            log::error!("Failed to load model: {err:#}");
        }
        AssetEvent::Font(Ok(font)) => {
            log::info!(
                "Loaded font {} ({} glyphs)",
                font.family,
                font.glyph_count()
            );
            card.on_font_loaded(font);
        }
        AssetEvent::Font(Err(err)) => {
            log::error!("Failed to load font: {err:#}");
        }
    }
}
