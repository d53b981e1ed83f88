//! Deterministic frame loop for headless runs.

use anyhow::{bail, Result};

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
    /// Trace sampling interval in frames (0 disables the trace).
    pub probe_every_frames: u32,
    /// Upper bound on frames a single step may run.
    pub max_frames_per_step: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            probe_every_frames: 4,
            max_frames_per_step: 60 * 60 * 5,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            bail!("tick_ms must be > 0");
        }
        if self.max_frames_per_step == 0 {
            bail!("max_frames_per_step must be > 0");
        }
        Ok(())
    }

    /// Frames needed to cover `ms` (rounded up).
    pub fn frames_for(&self, ms: u64) -> u32 {
        if ms == 0 {
            return 0;
        }
        let tick = self.tick_ms.max(1);
        let frames = ms.saturating_add(tick - 1) / tick;
        frames.min(u32::MAX as u64) as u32
    }
}

/// Frame context passed to frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Frame number since the start of the run (1-based).
    pub frame_index: u64,
    /// Host clock at this frame.
    pub now_ms: f64,
}

/// Clock and frame counter shared by every step of a run.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    cfg: RunConfig,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl FrameLoop {
    pub fn new(cfg: RunConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    /// Run `frames` frames, advancing the clock one tick per frame.
    pub fn run<F>(&mut self, frames: u32, mut on_frame: F) -> Result<()>
    where
        F: FnMut(&FrameContext),
    {
        if frames > self.cfg.max_frames_per_step {
            bail!(
                "step needs {frames} frames, more than the limit of {}",
                self.cfg.max_frames_per_step
            );
        }
        for _ in 0..frames {
            self.elapsed_frames = self.elapsed_frames.saturating_add(1);
            self.elapsed_ms = self.elapsed_ms.saturating_add(self.cfg.tick_ms);
            on_frame(&FrameContext {
                frame_index: self.elapsed_frames,
                now_ms: self.elapsed_ms as f64,
            });
        }
        Ok(())
    }

    pub fn config(&self) -> &RunConfig {
        &self.cfg
    }

    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms as f64
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
