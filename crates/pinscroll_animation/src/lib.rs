//! Pinscroll Animation System
//!
//! Time-driven pieces of a pinned section.
//!
//! # Features
//!
//! - **Easing**: standard curves plus CSS-compatible cubic beziers
//! - **Tweens**: eased interpolation of a scroll offset over a fixed duration
//! - **Scheduler**: owns active tweens and advances them once per frame
//! - **Timers**: trailing-edge debounce and fixed-cadence intervals
//!
//! All time is injected in milliseconds so hosts control the clock.

pub mod easing;
pub mod scheduler;
pub mod timer;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{AnimationScheduler, TweenId};
pub use timer::{Debounce, Interval};
pub use tween::ScrollTween;
