//! Animation scheduler
//!
//! Owns every active scroll tween and advances them once per frame.
//! Controllers keep only a `TweenId` and read the value back after the
//! scheduler has ticked.

use crate::tween::ScrollTween;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TweenId;
}

/// The animation scheduler that ticks all active tweens
pub struct AnimationScheduler {
    tweens: SlotMap<TweenId, ScrollTween>,
    last_frame_ms: Option<f64>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
            last_frame_ms: None,
        }
    }

    pub fn add_tween(&mut self, tween: ScrollTween) -> TweenId {
        let id = self.tweens.insert(tween);
        tracing::trace!(?id, active = self.tweens.len(), "tween added");
        id
    }

    pub fn get_tween(&self, id: TweenId) -> Option<&ScrollTween> {
        self.tweens.get(id)
    }

    pub fn remove_tween(&mut self, id: TweenId) -> Option<ScrollTween> {
        let removed = self.tweens.remove(id);
        if removed.is_some() {
            tracing::trace!(?id, active = self.tweens.len(), "tween removed");
        }
        removed
    }

    /// Advance all tweens by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        for (_, tween) in self.tweens.iter_mut() {
            tween.tick(dt_ms);
        }
    }

    /// Advance all tweens to the host clock `now_ms`
    ///
    /// The first call only records the clock; frames are measured from it.
    pub fn tick_at(&mut self, now_ms: f64) {
        let dt = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        if dt > 0.0 {
            self.tick(dt);
        }
    }

    /// Check if any tweens are still running
    pub fn has_active_animations(&self) -> bool {
        self.tweens.iter().any(|(_, t)| !t.is_finished())
    }

    /// Get the number of tweens in the scheduler (finished ones included)
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    #[test]
    fn test_tick_advances_all_tweens() {
        let mut scheduler = AnimationScheduler::new();
        let a = scheduler.add_tween(ScrollTween::new(0.0, 100.0, 100.0, Easing::Linear));
        let b = scheduler.add_tween(ScrollTween::new(50.0, 0.0, 200.0, Easing::Linear));

        scheduler.tick(50.0);
        assert_eq!(scheduler.get_tween(a).unwrap().value(), 50.0);
        assert_eq!(scheduler.get_tween(b).unwrap().value(), 37.5);
        assert!(scheduler.has_active_animations());

        scheduler.tick(200.0);
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.tween_count(), 2);
    }

    #[test]
    fn test_tick_at_measures_from_first_frame() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_tween(ScrollTween::new(0.0, 160.0, 160.0, Easing::Linear));

        scheduler.tick_at(1000.0);
        assert_eq!(scheduler.get_tween(id).unwrap().value(), 0.0);

        scheduler.tick_at(1016.0);
        assert_eq!(scheduler.get_tween(id).unwrap().value(), 16.0);

        // Clock going backwards never rewinds a tween
        scheduler.tick_at(1010.0);
        assert_eq!(scheduler.get_tween(id).unwrap().value(), 16.0);
    }

    #[test]
    fn test_removed_tween_is_gone() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_tween(ScrollTween::new(0.0, 1.0, 10.0, Easing::Linear));
        assert!(scheduler.remove_tween(id).is_some());
        assert!(scheduler.get_tween(id).is_none());
        assert_eq!(scheduler.tween_count(), 0);

        // A stale id is a no-op
        assert!(scheduler.remove_tween(id).is_none());
    }
}
