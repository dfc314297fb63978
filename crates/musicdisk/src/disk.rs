use crate::animation::Animation;
use crate::config::{DiskConfig, ImageRef, RotationRestart};
use crate::geometry::DiskGeometry;
use crate::particle::{Particle, ParticleArena, ParticleId};
use crate::scheduler::Scheduler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use thiserror::Error;

pub const FULL_TURN: f64 = 360.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiskError {
    #[error("Music disk is not initialized; call init() first")]
    NotInitialized,
    #[error("Music disk is already initialized")]
    AlreadyInitialized,
    #[error("Widget size is unknown (zero)")]
    NotLaidOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskEvent {
    Spawned(ParticleId),
    Retired(ParticleId),
}

/// The spinning disk and its notes.
///
/// Lifecycle: build from a [`DiskConfig`], `init` once the square size is
/// known, then toggle with `start`/`stop` and pump `advance` with the
/// current clock time. Stopping only halts the disk and future spawns;
/// notes already in flight finish their path.
pub struct MusicDisk<R = StdRng> {
    config: DiskConfig,
    geometry: Option<DiskGeometry>,
    rotation: Option<Animation>,
    disk_angle: f64,
    scheduler: Option<Scheduler>,
    particles: ParticleArena,
    rng: R,
}

impl MusicDisk<StdRng> {
    pub fn new(config: DiskConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Same seed, same sequence of note images.
    pub fn seeded(config: DiskConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MusicDisk<R> {
    pub fn with_rng(config: DiskConfig, rng: R) -> Self {
        Self {
            config,
            geometry: None,
            rotation: None,
            disk_angle: 0.0,
            scheduler: None,
            particles: ParticleArena::new(),
            rng,
        }
    }

    pub fn init(&mut self, size: u32) -> Result<(), DiskError> {
        if self.geometry.is_some() {
            return Err(DiskError::AlreadyInitialized);
        }
        if size == 0 {
            return Err(DiskError::NotLaidOut);
        }
        let geometry = DiskGeometry::compute(size);
        log::debug!(
            "Music disk laid out at {}px: disk {:?}, notes {}px",
            size,
            geometry.disk,
            geometry.icon_size
        );
        self.geometry = Some(geometry);
        Ok(())
    }

    pub fn start(&mut self, now: Duration) -> Result<(), DiskError> {
        self.ensure_initialized()?;

        let spinning = self.rotation.is_some();
        if !(spinning && self.config.rotation_restart() == RotationRestart::IfStopped) {
            self.rotation = Some(Animation::infinite(now, self.config.rotation_period()));
            self.disk_angle = 0.0;
        }

        let interval = self.config.spawn_interval();
        let scheduler = self
            .scheduler
            .get_or_insert_with(|| Scheduler::new(interval));
        if !scheduler.is_running() {
            scheduler.start(now);
            log::info!("Music disk started, a note every {:?}", interval);
        }
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), DiskError> {
        self.ensure_initialized()?;

        self.rotation = None;
        if let Some(scheduler) = self.scheduler.as_mut()
            && scheduler.is_running()
        {
            scheduler.stop();
            log::info!(
                "Music disk stopped, {} notes left to finish",
                self.particles.len()
            );
        }
        Ok(())
    }

    /// Brings everything up to `now`: retires finished notes, then handles a
    /// due tick by spawning a note that starts at `now`, then updates every
    /// live transform and the disk angle. Events come back in the order they
    /// happened.
    pub fn advance(&mut self, now: Duration) -> Vec<DiskEvent> {
        let Some(geometry) = self.geometry else {
            return Vec::new();
        };
        let mut events = Vec::new();

        while let Some((_, id)) = self
            .particles
            .next_completion()
            .filter(|(end, _)| *end <= now)
        {
            self.retire(id, &mut events);
        }

        // a late tick is handled once, at `now`
        if let Some(tick) = self.scheduler.as_mut().and_then(|s| s.poll(now)) {
            let id = self.spawn_particle(tick.handled_at, &geometry);
            events.push(DiskEvent::Spawned(id));
        }

        self.particles.update(now, &geometry.path);
        if let Some(rotation) = &self.rotation {
            self.disk_angle = FULL_TURN * rotation.fraction(now);
        }
        events
    }

    /// Takes over the notes still in flight on `previous`, so a disk rebuilt
    /// from new settings does not cut them off. Only happens when both disks
    /// are laid out the same, use the same note images, and this one has no
    /// notes yet. Returns whether any note was carried over.
    pub fn adopt_particles<Q>(&mut self, previous: &mut MusicDisk<Q>) -> bool {
        let compatible = self.geometry.is_some()
            && self.geometry == previous.geometry
            && self.config.particle_images() == previous.config.particle_images()
            && self.particles.is_empty();
        if !compatible || previous.particles.is_empty() {
            return false;
        }

        self.particles = std::mem::take(&mut previous.particles);
        log::debug!("Carried {} notes over to the new disk", self.particles.len());
        true
    }

    fn retire(&mut self, id: ParticleId, events: &mut Vec<DiskEvent>) {
        if let Some(particle) = self.particles.retire(id) {
            log::trace!("{} retired after {:?}", id, particle.animation.duration());
            events.push(DiskEvent::Retired(id));
        }
    }

    fn spawn_particle(&mut self, at: Duration, geometry: &DiskGeometry) -> ParticleId {
        let image = self
            .rng
            .random_range(0..self.config.particle_images().len());
        let animation = Animation::once(at, self.config.animation_duration());
        let id = self.particles.spawn(image, animation, &geometry.path);
        log::debug!("{} spawned at {:?} with image {}", id, at, image);
        id
    }

    fn ensure_initialized(&self) -> Result<(), DiskError> {
        match self.geometry {
            Some(_) => Ok(()),
            None => Err(DiskError::NotInitialized),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.as_ref().is_some_and(Scheduler::is_running)
    }

    pub fn is_spinning(&self) -> bool {
        self.rotation.is_some()
    }

    pub fn config(&self) -> &DiskConfig {
        &self.config
    }

    pub fn geometry(&self) -> Option<&DiskGeometry> {
        self.geometry.as_ref()
    }

    pub fn spawn_interval(&self) -> Duration {
        self.config.spawn_interval()
    }

    /// Degrees, as of the last `advance`. Kept as is after a stop.
    pub fn disk_angle(&self) -> f64 {
        self.disk_angle
    }

    /// Live notes in spawn order.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    pub fn particle_image(&self, particle: &Particle) -> Option<&ImageRef> {
        self.config.particle_images().get(particle.image)
    }

    pub fn live_count(&self) -> usize {
        self.particles.len()
    }

    pub fn spawned_count(&self) -> u64 {
        self.particles.spawned()
    }
}
