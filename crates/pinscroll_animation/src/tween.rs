//! Eased scroll-offset tweens

use crate::easing::Easing;

/// Interpolates a scroll offset from `from` to `to` over a fixed duration
#[derive(Debug, Clone)]
pub struct ScrollTween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
}

impl ScrollTween {
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        }
    }

    /// Advance the tween, returning the new value
    pub fn tick(&mut self, dt_ms: f32) -> f32 {
        if dt_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
        }
        self.value()
    }

    /// Current interpolated value
    ///
    /// Lands exactly on `to` once finished, never past it.
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed_ms / self.duration_ms;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn start_value(&self) -> f32 {
        self.from
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }
}
