use crate::config::{DEFAULT_SIZE, Settings};
use crate::gui::images::DiskImages;
use musicdisk::{DiskConfig, DiskError, DiskEvent, MusicDisk};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] musicdisk::ConfigError),
    #[error(transparent)]
    Disk(#[from] DiskError),
}

/// The controller plus the images it is drawn with.
pub struct Scene {
    pub disk: MusicDisk,
    pub images: DiskImages,
}

impl Scene {
    pub fn build(settings: &Settings) -> Result<Self, SceneError> {
        let config = settings.disk_config()?;
        let mut disk = match settings.seed {
            Some(seed) => MusicDisk::seeded(config, seed),
            None => MusicDisk::new(config),
        };
        disk.init(settings.size)?;

        let images = match disk.geometry() {
            Some(geometry) => {
                DiskImages::load(disk.config(), geometry, settings.assets_dir().as_deref())
            }
            None => DiskImages::empty(),
        };
        Ok(Self { disk, images })
    }

    /// Default disk with placeholder shapes, for when the settings can't be
    /// used at all.
    pub fn fallback() -> Self {
        let mut disk = MusicDisk::new(DiskConfig::default());
        if let Err(e) = disk.init(DEFAULT_SIZE) {
            log::error!("Failed to lay out fallback disk: {}", e);
        }
        Self {
            disk,
            images: DiskImages::empty(),
        }
    }

    pub fn size(&self) -> u32 {
        self.disk
            .geometry()
            .map(|g| g.size)
            .unwrap_or(DEFAULT_SIZE)
    }

    pub fn start(&mut self, now: Duration) {
        if let Err(e) = self.disk.start(now) {
            log::error!("Failed to start music disk: {}", e);
        }
    }

    pub fn stop(&mut self) {
        if let Err(e) = self.disk.stop() {
            log::error!("Failed to stop music disk: {}", e);
        }
    }

    pub fn toggle(&mut self, now: Duration) {
        if self.disk.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Keeps the notes `previous` still has in flight when this scene draws
    /// them the same way.
    pub fn carry_over(&mut self, previous: &mut Scene) -> bool {
        self.disk.adopt_particles(&mut previous.disk)
    }

    pub fn frame(&mut self, now: Duration) {
        for event in self.disk.advance(now) {
            match event {
                DiskEvent::Spawned(id) => log::trace!("{} launched", id),
                DiskEvent::Retired(id) => log::trace!("{} landed", id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(duration_ms: u64) -> Settings {
        Settings {
            animation_duration_ms: duration_ms,
            seed: Some(5),
            assets_dir: Some(std::env::temp_dir().join("turntable-no-such-assets")),
            ..Settings::default()
        }
    }

    #[test]
    fn test_reloaded_scene_keeps_notes_in_flight() {
        let mut old = Scene::build(&settings(3000)).unwrap();
        old.start(Duration::ZERO);
        old.frame(Duration::ZERO);
        assert_eq!(old.disk.live_count(), 1);

        let mut new = Scene::build(&settings(4000)).unwrap();
        assert!(new.carry_over(&mut old));
        assert_eq!(new.disk.live_count(), 1);

        let mut resized = Scene::build(&Settings {
            size: 200,
            ..settings(3000)
        })
        .unwrap();
        assert!(!resized.carry_over(&mut new));
        assert_eq!(new.disk.live_count(), 1);
    }
}
