use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Infinite,
}

/// Linear mapping from clock time to an animation fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    started_at: Duration,
    duration: Duration,
    repeat: Repeat,
}

impl Animation {
    pub fn once(started_at: Duration, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
            repeat: Repeat::Once,
        }
    }

    pub fn infinite(started_at: Duration, duration: Duration) -> Self {
        Self {
            started_at,
            duration,
            repeat: Repeat::Infinite,
        }
    }

    pub fn started_at(&self) -> Duration {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// `None` for animations that never complete.
    pub fn ends_at(&self) -> Option<Duration> {
        match self.repeat {
            Repeat::Once => Some(self.started_at + self.duration),
            Repeat::Infinite => None,
        }
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.ends_at().is_some_and(|end| now >= end)
    }

    pub fn fraction(&self, now: Duration) -> f64 {
        let total = self.duration.as_nanos();
        if total == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at).as_nanos();

        match self.repeat {
            Repeat::Once => (elapsed.min(total) as f64) / total as f64,
            Repeat::Infinite => (elapsed % total) as f64 / total as f64,
        }
    }
}
