use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const DEFAULT_DURATION_MILLIS: u64 = 3000;
pub const DEFAULT_MUSIC_ICON_NUM: u32 = 2;
pub const DEFAULT_DISK_IMAGE: &str = "music_disk";
pub const DEFAULT_PARTICLE_IMAGES: [&str; 6] = [
    "music_icon_0",
    "music_icon_1",
    "music_icon_2",
    "music_icon_3",
    "music_icon_4",
    "music_icon_5",
];

/// Asset name or path of an image; the host decides how to load it.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ImageRef(String);

crate::impl_string_newtype!(ImageRef);

/// What `start()` does to a disk that is already spinning.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum RotationRestart {
    /// Rewind the rotation to 0° on every start.
    #[default]
    #[strum(to_string = "always")]
    Always,
    #[strum(to_string = "if-stopped", serialize = "ifstopped", serialize = "if_stopped")]
    IfStopped,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Animation duration must be positive")]
    ZeroDuration,
    #[error("Music icon count must be positive")]
    ZeroIconCount,
    #[error("At least one particle image is required")]
    NoParticleImages,
    #[error("Spawn interval {duration:?} / {count} rounds down to zero")]
    IntervalTooShort { duration: Duration, count: u32 },
}

/// Validated, immutable settings of one disk widget.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskConfig {
    animation_duration: Duration,
    music_icon_num: u32,
    disk_image: ImageRef,
    particle_images: Vec<ImageRef>,
    rotation_restart: RotationRestart,
}

impl DiskConfig {
    pub fn builder() -> DiskConfigBuilder {
        DiskConfigBuilder::default()
    }

    pub fn animation_duration(&self) -> Duration {
        self.animation_duration
    }

    /// How many notes are meant to be on screen at once.
    pub fn music_icon_num(&self) -> u32 {
        self.music_icon_num
    }

    pub fn disk_image(&self) -> &ImageRef {
        &self.disk_image
    }

    pub fn particle_images(&self) -> &[ImageRef] {
        &self.particle_images
    }

    pub fn rotation_restart(&self) -> RotationRestart {
        self.rotation_restart
    }

    /// A note lives for one animation duration and a new one appears every
    /// `duration / count`, so about `count` notes are live at any time.
    pub fn spawn_interval(&self) -> Duration {
        self.animation_duration / self.music_icon_num
    }

    /// One full turn of the disk takes two note lifetimes.
    pub fn rotation_period(&self) -> Duration {
        self.animation_duration * 2
    }
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            animation_duration: Duration::from_millis(DEFAULT_DURATION_MILLIS),
            music_icon_num: DEFAULT_MUSIC_ICON_NUM,
            disk_image: ImageRef::from(DEFAULT_DISK_IMAGE),
            particle_images: DEFAULT_PARTICLE_IMAGES
                .iter()
                .copied()
                .map(ImageRef::from)
                .collect(),
            rotation_restart: RotationRestart::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiskConfigBuilder {
    config: DiskConfig,
}

impl DiskConfigBuilder {
    pub fn disk_image(mut self, image: impl Into<ImageRef>) -> Self {
        self.config.disk_image = image.into();
        self
    }

    pub fn animation_duration(mut self, duration: Duration) -> Self {
        self.config.animation_duration = duration;
        self
    }

    pub fn animation_duration_millis(self, millis: u64) -> Self {
        self.animation_duration(Duration::from_millis(millis))
    }

    pub fn music_icon_num(mut self, count: u32) -> Self {
        self.config.music_icon_num = count;
        self
    }

    pub fn particle_images<I>(mut self, images: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ImageRef>,
    {
        self.config.particle_images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn rotation_restart(mut self, policy: RotationRestart) -> Self {
        self.config.rotation_restart = policy;
        self
    }

    pub fn build(self) -> Result<DiskConfig, ConfigError> {
        let config = self.config;
        if config.animation_duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if config.music_icon_num == 0 {
            return Err(ConfigError::ZeroIconCount);
        }
        if config.particle_images.is_empty() {
            return Err(ConfigError::NoParticleImages);
        }
        if config.spawn_interval().is_zero() {
            return Err(ConfigError::IntervalTooShort {
                duration: config.animation_duration,
                count: config.music_icon_num,
            });
        }
        Ok(config)
    }
}
