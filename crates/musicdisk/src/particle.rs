use crate::animation::Animation;
use crate::motion::{ParticleTransform, QuadraticBezier};
use derive_more::{Display, From, Into};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("particle#{_0}")]
pub struct ParticleId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleState {
    Spawned,
    Animating,
    Retired,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub id: ParticleId,
    /// Index into the configured particle images.
    pub image: usize,
    pub animation: Animation,
    pub transform: ParticleTransform,
    pub state: ParticleState,
}

impl Particle {
    fn new(id: ParticleId, image: usize, animation: Animation, path: &QuadraticBezier) -> Self {
        Self {
            id,
            image,
            animation,
            transform: ParticleTransform::at(path, 0.0),
            state: ParticleState::Spawned,
        }
    }

    fn begin(mut self) -> Self {
        self.state = ParticleState::Animating;
        self
    }

    pub fn fraction(&self, now: Duration) -> f64 {
        self.animation.fraction(now)
    }

    pub fn update(&mut self, now: Duration, path: &QuadraticBezier) {
        if self.state == ParticleState::Animating {
            self.transform = ParticleTransform::at(path, self.fraction(now));
        }
    }
}

/// Live particles keyed by id. Ids only grow, so iteration order is spawn
/// order.
#[derive(Debug, Clone, Default)]
pub struct ParticleArena {
    next_id: u64,
    live: BTreeMap<ParticleId, Particle>,
}

impl ParticleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        image: usize,
        animation: Animation,
        path: &QuadraticBezier,
    ) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.live
            .insert(id, Particle::new(id, image, animation, path).begin());
        id
    }

    /// Removes the particle; the returned value is the only place the
    /// `Retired` state is ever observed.
    pub fn retire(&mut self, id: ParticleId) -> Option<Particle> {
        self.live.remove(&id).map(|mut particle| {
            particle.state = ParticleState::Retired;
            particle
        })
    }

    /// Earliest completion among live particles, lowest id first on ties.
    pub fn next_completion(&self) -> Option<(Duration, ParticleId)> {
        self.live
            .values()
            .filter_map(|p| p.animation.ends_at().map(|end| (end, p.id)))
            .min()
    }

    pub fn update(&mut self, now: Duration, path: &QuadraticBezier) {
        self.live
            .values_mut()
            .for_each(|particle| particle.update(now, path));
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.live.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.live.values()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn spawned(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DiskGeometry;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_spawned_particle_is_animating_at_path_start() {
        let path = DiskGeometry::compute(300).path;
        let mut arena = ParticleArena::new();
        let id = arena.spawn(3, Animation::once(ms(0), ms(3000)), &path);

        let particle = arena.get(id).unwrap();
        assert_eq!(particle.state, ParticleState::Animating);
        assert_eq!(particle.image, 3);
        assert_eq!(particle.transform.position, path.start);
        assert_eq!(particle.transform.opacity, 0.0);
    }

    #[test]
    fn test_retire_removes_once() {
        let path = DiskGeometry::compute(300).path;
        let mut arena = ParticleArena::new();
        let id = arena.spawn(0, Animation::once(ms(0), ms(3000)), &path);

        let retired = arena.retire(id).unwrap();
        assert_eq!(retired.state, ParticleState::Retired);
        assert!(arena.retire(id).is_none());
        assert!(arena.is_empty());
    }

    #[test]
    fn test_next_completion_prefers_earliest_then_lowest_id() {
        let path = DiskGeometry::compute(300).path;
        let mut arena = ParticleArena::new();
        let late = arena.spawn(0, Animation::once(ms(1500), ms(3000)), &path);
        let early = arena.spawn(0, Animation::once(ms(0), ms(3000)), &path);
        let tied = arena.spawn(0, Animation::once(ms(0), ms(3000)), &path);

        assert_eq!(arena.next_completion(), Some((ms(3000), early)));
        arena.retire(early);
        assert_eq!(arena.next_completion(), Some((ms(3000), tied)));
        arena.retire(tied);
        assert_eq!(arena.next_completion(), Some((ms(4500), late)));
    }

    #[test]
    fn test_ids_keep_growing_after_retire() {
        let path = DiskGeometry::compute(300).path;
        let mut arena = ParticleArena::new();
        let first = arena.spawn(0, Animation::once(ms(0), ms(10)), &path);
        arena.retire(first);
        let second = arena.spawn(0, Animation::once(ms(0), ms(10)), &path);

        assert!(second > first);
        assert_eq!(second.to_string(), "particle#1");
        assert_eq!(arena.spawned(), 2);
    }
}
