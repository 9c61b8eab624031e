use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui;
use tracing::{debug, warn};

/// Decoded slide images, keyed by the path written in the deck.
///
/// Failed loads are cached too, so a missing file is reported once.
pub struct ImageCache {
    base_path: PathBuf,
    entries: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Absolute paths are used as-is, relative ones resolve against the deck directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_path.join(p)
        }
    }

    pub fn get_or_load(&self, ui: &egui::Ui, path: &str) -> Option<egui::TextureHandle> {
        if let Some(entry) = self.entries.borrow().get(path) {
            return entry.clone();
        }

        let resolved = self.resolve(path);
        let texture = match load_color_image(&resolved) {
            Ok(image) => {
                debug!("Loaded image {}", resolved.display());
                Some(
                    ui.ctx()
                        .load_texture(path, image, egui::TextureOptions::LINEAR),
                )
            }
            Err(err) => {
                warn!("{err:#}");
                None
            }
        };
        self.entries
            .borrow_mut()
            .insert(path.to_string(), texture.clone());
        texture
    }
}

pub fn load_color_image(path: &Path) -> Result<egui::ColorImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load image {}", path.display()))?
        .into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        image.as_raw(),
    ))
}
