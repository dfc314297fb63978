//! Spinning record with floating music notes.
//!
//! Toolkit-independent core of the effect: layout, particle motion, the
//! periodic spawner and the controller tying them together. Everything is
//! driven by an explicit clock (`Duration` since an arbitrary origin), so a
//! host can pump it from its frame clock and tests can pump it by hand.

pub mod animation;
pub mod config;
pub mod disk;
pub mod geometry;
pub mod macros;
pub mod motion;
pub mod particle;
pub mod scheduler;

pub use config::{ConfigError, DiskConfig, DiskConfigBuilder, ImageRef, RotationRestart};
pub use disk::{DiskError, DiskEvent, MusicDisk};
pub use geometry::{DiskGeometry, Point, Rect};
pub use particle::{Particle, ParticleId, ParticleState};
pub use scheduler::{Scheduler, Tick};
