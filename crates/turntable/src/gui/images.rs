use gdk_pixbuf::Pixbuf;
use musicdisk::{DiskConfig, DiskGeometry, ImageRef};
use std::path::{Path, PathBuf};

const EXTENSIONS: [&str; 3] = ["png", "svg", "jpg"];

/// Finds the file behind an image name: an existing absolute path, or a
/// file in `assets_dir` with or without a known extension.
pub fn find_image_path(image: &ImageRef, assets_dir: Option<&Path>) -> Option<PathBuf> {
    if image.is_empty() {
        return None;
    }

    let path = Path::new(image.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    let dir = assets_dir?;
    std::iter::once(dir.join(path))
        .chain(
            EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("{}.{}", image, ext))),
        )
        .find(|candidate| candidate.is_file())
}

/// Decoded images, pre-scaled to the size they are drawn at. Missing or
/// broken files are `None` and drawn with a fallback shape.
pub struct DiskImages {
    pub disk: Option<Pixbuf>,
    pub notes: Vec<Option<Pixbuf>>,
}

impl DiskImages {
    pub fn empty() -> Self {
        Self {
            disk: None,
            notes: Vec::new(),
        }
    }

    pub fn load(config: &DiskConfig, geometry: &DiskGeometry, assets_dir: Option<&Path>) -> Self {
        let disk_side = geometry.disk.width as i32;
        let icon_side = geometry.icon_size as i32;

        Self {
            disk: load_scaled(config.disk_image(), disk_side, assets_dir),
            notes: config
                .particle_images()
                .iter()
                .map(|image| load_scaled(image, icon_side, assets_dir))
                .collect(),
        }
    }

    pub fn note(&self, index: usize) -> Option<&Pixbuf> {
        self.notes.get(index).and_then(Option::as_ref)
    }
}

fn load_scaled(image: &ImageRef, side: i32, assets_dir: Option<&Path>) -> Option<Pixbuf> {
    let Some(path) = find_image_path(image, assets_dir) else {
        log::warn!("Image '{}' not found, drawing a placeholder", image);
        return None;
    };

    Pixbuf::from_file_at_scale(&path, side, side, true)
        .map_err(|e| log::error!("Failed to load {}: {}", path.display(), e))
        .ok()
}
