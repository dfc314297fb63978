use directories::ProjectDirs;
use musicdisk::config::{
    DEFAULT_DISK_IMAGE, DEFAULT_DURATION_MILLIS, DEFAULT_MUSIC_ICON_NUM, DEFAULT_PARTICLE_IMAGES,
};
use musicdisk::{DiskConfig, ImageRef, RotationRestart};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SIZE: u32 = 300;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub animation_duration_ms: u64,
    pub music_icon_num: u32,
    pub disk_image: ImageRef,
    pub particle_images: Vec<ImageRef>,
    /// Side of the square drawing area, in pixels.
    pub size: u32,
    pub rotation_restart: RotationRestart,
    /// Fixed seed for note selection; random when unset.
    pub seed: Option<u64>,
    pub autostart: bool,
    /// Where bare image names are looked up. Defaults to `assets/` next to
    /// the config file.
    pub assets_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animation_duration_ms: DEFAULT_DURATION_MILLIS,
            music_icon_num: DEFAULT_MUSIC_ICON_NUM,
            disk_image: ImageRef::from(DEFAULT_DISK_IMAGE),
            particle_images: DEFAULT_PARTICLE_IMAGES
                .iter()
                .copied()
                .map(ImageRef::from)
                .collect(),
            size: DEFAULT_SIZE,
            rotation_restart: RotationRestart::default(),
            seed: None,
            autostart: true,
            assets_dir: None,
        }
    }
}

impl Settings {
    pub fn disk_config(&self) -> Result<DiskConfig, musicdisk::ConfigError> {
        DiskConfig::builder()
            .disk_image(self.disk_image.clone())
            .animation_duration_millis(self.animation_duration_ms)
            .music_icon_num(self.music_icon_num)
            .particle_images(self.particle_images.iter().cloned())
            .rotation_restart(self.rotation_restart)
            .build()
    }

    pub fn assets_dir(&self) -> Option<PathBuf> {
        self.assets_dir.clone().or_else(|| {
            get_config_path()
                .ok()
                .and_then(|p| p.parent().map(|dir| dir.join("assets")))
        })
    }

    fn validate(self) -> Result<Self, SettingsError> {
        if self.size == 0 {
            return Err(SettingsError::ZeroSize);
        }
        self.disk_config()?;
        Ok(self)
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid disk settings: {0}")]
    Disk(#[from] musicdisk::ConfigError),
    #[error("Widget size must be positive")]
    ZeroSize,
}

pub fn get_config_path() -> Result<PathBuf, SettingsError> {
    let proj_dirs = ProjectDirs::from("org", "musicdisk", "turntable")
        .ok_or(SettingsError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_settings() -> Result<Settings, SettingsError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    s.try_deserialize::<Settings>()?.validate()
}

/// `TURNTABLE_*` variables; `TURNTABLE_PARTICLE_IMAGES` is a comma-separated
/// list.
fn environment() -> config::Environment {
    config::Environment::with_prefix("TURNTABLE")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("particle_images")
}

pub fn load_or_default() -> Settings {
    match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Falling back to default settings: {}", e);
            Settings::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent.join("assets"))?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};
    use std::time::Duration;

    fn parse(toml: &str) -> Result<Settings, SettingsError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?
            .validate()
    }

    #[test]
    fn test_default_config_file_is_valid() {
        let settings = parse(DEFAULT_CONFIG).unwrap();
        let config = settings.disk_config().unwrap();
        assert_eq!(config.spawn_interval(), Duration::from_millis(1500));
        assert_eq!(settings.size, 300);
        assert_eq!(config.particle_images().len(), 6);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = parse(
            r#"
            music_icon_num = 3
            rotation_restart = "IfStopped"
            particle_images = ["note.png"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.animation_duration_ms, 3000);
        assert_eq!(settings.music_icon_num, 3);
        assert_eq!(settings.rotation_restart, RotationRestart::IfStopped);
        assert_eq!(settings.particle_images, vec![ImageRef::from("note.png")]);
        assert!(settings.autostart);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        assert!(matches!(
            parse("music_icon_num = 0"),
            Err(SettingsError::Disk(musicdisk::ConfigError::ZeroIconCount))
        ));
        assert!(matches!(parse("size = 0"), Err(SettingsError::ZeroSize)));
        assert!(matches!(
            parse("animation_duration_ms = 0"),
            Err(SettingsError::Disk(musicdisk::ConfigError::ZeroDuration))
        ));
    }

    #[test]
    fn test_settings_deserialize_from_json() {
        let settings: Settings =
            serde_json::from_str(r#"{"animation_duration_ms": 1200, "seed": 9}"#).unwrap();
        assert_eq!(settings.seed, Some(9));
        assert_eq!(
            settings.disk_config().unwrap().spawn_interval(),
            Duration::from_millis(600)
        );
    }

    #[test]
    fn test_environment_overrides_lists_and_numbers() {
        let vars: config::Map<String, String> = [
            ("TURNTABLE_PARTICLE_IMAGES", "a.png,b.png"),
            ("TURNTABLE_SIZE", "240"),
            ("TURNTABLE_DISK_IMAGE", "vinyl"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let settings = Config::builder()
            .add_source(File::from_str("music_icon_num = 3", FileFormat::Toml))
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(
            settings.particle_images,
            vec![ImageRef::from("a.png"), ImageRef::from("b.png")]
        );
        assert_eq!(settings.size, 240);
        assert_eq!(settings.disk_image, ImageRef::from("vinyl"));
        assert_eq!(settings.music_icon_num, 3);
    }
}
