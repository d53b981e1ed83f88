//! Stuck-pin detection
//!
//! Some mobile browsers drop scroll events during momentum scrolling, so a
//! section can stay pinned after the document has already moved past it.
//! The guard samples the host's real scroll offset on a fixed cadence while
//! pinned and reports when the pin no longer matches it.

use pinscroll_animation::Interval;
use pinscroll_core::SectionLayout;

use crate::config::StuckGuardConfig;

/// Why the guard declared a pin stuck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StuckReason {
    /// Consecutive samples showed the document past a pin boundary
    BoundaryOverrun,
    /// Pinned for longer than the configured ceiling
    PinnedTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Samples a pinned section for desync with the native scroller
#[derive(Debug, Clone)]
pub struct StuckGuard {
    config: StuckGuardConfig,
    enabled: bool,
    sampler: Interval,
    /// Consecutive exit-bound samples seen so far
    strikes: u32,
    /// Start of the current continuous pin (None while paused)
    pinned_since_ms: Option<f64>,
    last_offset: Option<f32>,
    /// Last non-zero direction of travel
    direction: Option<Direction>,
    paused: bool,
}

impl StuckGuard {
    pub fn new(config: StuckGuardConfig, enabled: bool) -> Self {
        let sampler = Interval::new(config.sample_interval_ms);
        Self {
            config,
            enabled,
            sampler,
            strikes: 0,
            pinned_since_ms: None,
            last_offset: None,
            direction: None,
            paused: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    /// Whether the guard is currently sampling
    pub fn is_armed(&self) -> bool {
        self.sampler.is_running()
    }

    /// The section settled into a pin
    pub fn on_pinned(&mut self, now_ms: f64, offset: f32) {
        self.reset();
        if !self.enabled {
            return;
        }
        self.last_offset = Some(offset);
        if !self.paused {
            self.pinned_since_ms = Some(now_ms);
            self.sampler.start(now_ms);
        }
    }

    /// The section left the pin through a normal transition or a recovery
    pub fn on_released(&mut self) {
        self.reset();
    }

    /// Page hidden: timers stop, nothing counts until visible again
    pub fn pause(&mut self) {
        self.paused = true;
        self.pinned_since_ms = None;
        self.sampler.stop();
        self.strikes = 0;
    }

    /// Page visible again; restart the clocks if still pinned
    pub fn resume(&mut self, now_ms: f64, pinned: bool, offset: f32) {
        self.paused = false;
        if self.enabled && pinned {
            self.pinned_since_ms = Some(now_ms);
            self.last_offset = Some(offset);
            self.sampler.start(now_ms);
        }
    }

    /// Sample the host's real offset; `Some` means the pin is stuck
    ///
    /// Only meaningful while the controller is `Pinned`. The strike count
    /// resets once a verdict is returned.
    pub fn poll(&mut self, now_ms: f64, offset: f32, layout: &SectionLayout) -> Option<StuckReason> {
        if !self.enabled || self.paused {
            return None;
        }

        if let Some(since) = self.pinned_since_ms {
            if now_ms - since > self.config.pinned_timeout_ms {
                tracing::debug!(pinned_ms = now_ms - since, "pin exceeded timeout");
                self.reset();
                return Some(StuckReason::PinnedTimeout);
            }
        }

        // Missed periods observe the same offset, so they count once
        if self.sampler.poll(now_ms) == 0 {
            return None;
        }

        if let Some(last) = self.last_offset {
            if offset < last {
                self.direction = Some(Direction::Up);
            } else if offset > last {
                self.direction = Some(Direction::Down);
            }
        }
        self.last_offset = Some(offset);

        let relative = layout.relative(offset);
        let overrun = match self.direction {
            Some(Direction::Up) => relative < 0.0,
            Some(Direction::Down) => relative > layout.scrollable_width(),
            None => false,
        };

        if !overrun {
            self.strikes = 0;
            return None;
        }

        self.strikes += 1;
        tracing::trace!(strikes = self.strikes, relative, "pinned past boundary");
        if self.strikes >= self.config.consecutive_samples.max(1) {
            self.reset();
            return Some(StuckReason::BoundaryOverrun);
        }
        None
    }

    fn reset(&mut self) {
        self.strikes = 0;
        self.pinned_since_ms = None;
        self.last_offset = None;
        self.direction = None;
        self.sampler.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SectionLayout {
        SectionLayout {
            start: 1000.0,
            content_width: 1200.0,
            viewport_width: 300.0,
            viewport_height: 600.0,
            panel_count: 4,
            dot_count: 4,
        }
    }

    fn guard() -> StuckGuard {
        StuckGuard::new(StuckGuardConfig::default(), true)
    }

    #[test]
    fn test_three_overrun_samples_trip() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1100.0);

        // Document jumped above the section without the controller noticing
        assert_eq!(g.poll(16.0, 900.0, &layout), None);
        assert_eq!(g.strikes(), 1);
        assert_eq!(g.poll(32.0, 880.0, &layout), None);
        assert_eq!(g.poll(48.0, 880.0, &layout), Some(StuckReason::BoundaryOverrun));
        assert_eq!(g.strikes(), 0);
        assert!(!g.is_armed());
    }

    #[test]
    fn test_normal_pinned_scrolling_never_trips() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1000.0);
        let mut t = 16.0;
        let mut offset = 1000.0;
        while offset <= 1900.0 {
            assert_eq!(g.poll(t, offset, &layout), None);
            t += 16.0;
            offset += 25.0;
        }
        assert_eq!(g.strikes(), 0);
    }

    #[test]
    fn test_strikes_reset_when_back_in_range() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1100.0);
        g.poll(16.0, 990.0, &layout);
        g.poll(32.0, 980.0, &layout);
        assert_eq!(g.strikes(), 2);
        g.poll(48.0, 1050.0, &layout);
        assert_eq!(g.strikes(), 0);
    }

    #[test]
    fn test_overrun_past_far_end() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1800.0);
        assert_eq!(g.poll(16.0, 2000.0, &layout), None);
        assert_eq!(g.poll(32.0, 2000.0, &layout), None);
        assert_eq!(g.poll(48.0, 2000.0, &layout), Some(StuckReason::BoundaryOverrun));
    }

    #[test]
    fn test_pinned_timeout() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1200.0);
        assert_eq!(g.poll(5000.0, 1200.0, &layout), None);
        assert_eq!(g.poll(5001.0, 1200.0, &layout), Some(StuckReason::PinnedTimeout));
    }

    #[test]
    fn test_hidden_page_pauses_timeout() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1200.0);
        g.pause();
        assert_eq!(g.poll(60_000.0, 1200.0, &layout), None);

        g.resume(60_000.0, true, 1200.0);
        assert_eq!(g.poll(64_000.0, 1200.0, &layout), None);
        assert_eq!(g.poll(65_001.0, 1200.0, &layout), Some(StuckReason::PinnedTimeout));
    }

    #[test]
    fn test_disabled_guard_is_inert() {
        let layout = layout();
        let mut g = StuckGuard::new(StuckGuardConfig::default(), false);
        g.on_pinned(0.0, 1100.0);
        assert!(!g.is_armed());
        for i in 1..10 {
            assert_eq!(g.poll(i as f64 * 16.0, 0.0, &layout), None);
        }
        assert_eq!(g.poll(10_000.0, 0.0, &layout), None);
    }

    #[test]
    fn test_release_clears_strikes() {
        let layout = layout();
        let mut g = guard();
        g.on_pinned(0.0, 1100.0);
        g.poll(16.0, 900.0, &layout);
        g.poll(32.0, 890.0, &layout);
        g.on_released();
        assert_eq!(g.strikes(), 0);
        assert_eq!(g.poll(48.0, 880.0, &layout), None);
    }
}
