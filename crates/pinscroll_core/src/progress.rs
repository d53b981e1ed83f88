//! Offset → progress → panel mapping
//!
//! Pure functions shared by the pin controller, the dot navigation and the
//! stuck-state recovery so that every caller agrees on one mapping.
//!
//! Two tie-breaks are in play and they are deliberately different:
//!
//! - continuous scrubbing uses `floor(progress * panel_count)`, so a panel
//!   stays active until its successor is reached
//! - seeking and snapping use exact panel fractions `index / (panel_count - 1)`
//!   and `round`, so a dot lands precisely on its panel boundary

/// Result of mapping a scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSample {
    /// Normalized travel through the pinned range, in `[0, 1]`
    pub progress: f32,
    /// Panel index in `[0, panel_count - 1]`
    pub active_panel: usize,
}

impl ProgressSample {
    pub const START: ProgressSample = ProgressSample {
        progress: 0.0,
        active_panel: 0,
    };
}

/// Stateless offset/progress/panel conversions
pub struct ProgressMapper;

impl ProgressMapper {
    /// Normalized progress for an offset relative to the section start
    ///
    /// Computes in f64 internally; f32 division drifts enough at multi-
    /// thousand-pixel ranges to misplace exact panel boundaries.
    pub fn progress(offset: f32, scrollable_width: f32) -> f32 {
        if !(scrollable_width > 0.0) || offset.is_nan() {
            return 0.0;
        }
        (offset as f64 / scrollable_width as f64).clamp(0.0, 1.0) as f32
    }

    /// Active panel for a progress value (floor tie-break)
    pub fn active_panel(progress: f32, panel_count: usize) -> usize {
        let count = panel_count.max(1);
        let raw = (progress.clamp(0.0, 1.0) as f64 * count as f64).floor();
        (raw as usize).min(count - 1)
    }

    /// Map an offset to progress and active panel
    pub fn sample(offset: f32, scrollable_width: f32, panel_count: usize) -> ProgressSample {
        let progress = Self::progress(offset, scrollable_width);
        ProgressSample {
            progress,
            active_panel: Self::active_panel(progress, panel_count),
        }
    }

    /// Clamp a requested panel index into `[0, panel_count - 1]`
    pub fn clamp_panel(index: usize, panel_count: usize) -> usize {
        index.min(panel_count.max(1) - 1)
    }

    /// Exact progress at which panel `index` is fully in view
    pub fn panel_fraction(index: usize, panel_count: usize) -> f32 {
        if panel_count <= 1 {
            return 0.0;
        }
        let index = Self::clamp_panel(index, panel_count);
        (index as f64 / (panel_count - 1) as f64) as f32
    }

    /// Document offset that brings panel `index` into view
    pub fn seek_offset(start: f32, scrollable_width: f32, index: usize, panel_count: usize) -> f32 {
        let fraction = Self::panel_fraction(index, panel_count) as f64;
        (start as f64 + scrollable_width.max(0.0) as f64 * fraction) as f32
    }

    /// Offset relative to the section start for a progress value
    pub fn offset_for(progress: f32, scrollable_width: f32) -> f32 {
        (progress.clamp(0.0, 1.0) as f64 * scrollable_width.max(0.0) as f64) as f32
    }

    /// Nearest panel to a progress value (round tie-break, for snapping)
    pub fn nearest_panel(progress: f32, panel_count: usize) -> usize {
        if panel_count <= 1 {
            return 0;
        }
        let exact = progress.clamp(0.0, 1.0) as f64 * (panel_count - 1) as f64;
        Self::clamp_panel(exact.round() as usize, panel_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_four_panel_walkthrough() {
        let s = ProgressMapper::sample(0.0, 900.0, 4);
        assert_eq!(s, ProgressSample::START);

        let s = ProgressMapper::sample(300.0, 900.0, 4);
        assert!((s.progress - 0.333_333).abs() < EPS);
        assert_eq!(s.active_panel, 1);

        let s = ProgressMapper::sample(900.0, 900.0, 4);
        assert_eq!(s.progress, 1.0);
        assert_eq!(s.active_panel, 3);

        assert_eq!(ProgressMapper::seek_offset(0.0, 900.0, 2, 4), 600.0);
    }

    #[test]
    fn test_boundary_clamp() {
        assert_eq!(ProgressMapper::progress(-50.0, 900.0), 0.0);
        assert_eq!(ProgressMapper::progress(5000.0, 900.0), 1.0);
        assert_eq!(ProgressMapper::sample(5000.0, 900.0, 4).active_panel, 3);
    }

    #[test]
    fn test_zero_scrollable_width() {
        for offset in [-10.0, 0.0, 10.0, 1e6] {
            assert_eq!(ProgressMapper::sample(offset, 0.0, 4), ProgressSample::START);
        }
    }

    #[test]
    fn test_nan_offset_maps_to_start() {
        assert_eq!(ProgressMapper::progress(f32::NAN, 900.0), 0.0);
    }

    #[test]
    fn test_single_panel_always_zero() {
        for offset in [0.0, 250.0, 500.0] {
            assert_eq!(ProgressMapper::sample(offset, 500.0, 1).active_panel, 0);
        }
        assert_eq!(ProgressMapper::panel_fraction(3, 1), 0.0);
        assert_eq!(ProgressMapper::nearest_panel(0.9, 1), 0);
    }

    #[test]
    fn test_monotonic_progress() {
        let mut last = 0.0f32;
        let mut offset = 0.0f32;
        while offset <= 2400.0 {
            let p = ProgressMapper::progress(offset, 2400.0);
            assert!(p >= last, "progress decreased at offset {offset}");
            last = p;
            offset += 0.75;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_round_trip_panel_mapping() {
        for panel_count in 2..=12 {
            for scrollable in [100.0f32, 937.0, 2400.0, 11_111.0] {
                for k in 0..panel_count {
                    let offset = ProgressMapper::seek_offset(0.0, scrollable, k, panel_count);
                    let sample = ProgressMapper::sample(offset, scrollable, panel_count);
                    assert_eq!(
                        sample.active_panel, k,
                        "panel {k}/{panel_count} over {scrollable}px"
                    );
                    assert_eq!(ProgressMapper::nearest_panel(sample.progress, panel_count), k);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_seek_clamps() {
        assert_eq!(ProgressMapper::seek_offset(100.0, 900.0, 99, 4), 1000.0);
        assert_eq!(ProgressMapper::clamp_panel(7, 4), 3);
        assert_eq!(ProgressMapper::clamp_panel(7, 0), 0);
    }

    #[test]
    fn test_floor_and_round_tie_breaks() {
        // Both agree away from the boundaries
        assert_eq!(ProgressMapper::active_panel(0.6, 4), 2);
        assert_eq!(ProgressMapper::nearest_panel(0.6, 4), 2);
        assert_eq!(ProgressMapper::active_panel(0.30, 4), 1);
        assert_eq!(ProgressMapper::nearest_panel(0.30, 4), 1);

        // 20%: scrubbing still shows panel 0, snapping goes forward to panel 1
        assert_eq!(ProgressMapper::active_panel(0.20, 4), 0);
        assert_eq!(ProgressMapper::nearest_panel(0.20, 4), 1);
    }

    #[test]
    fn test_offset_for_inverts_progress() {
        let offset = ProgressMapper::offset_for(0.5, 1200.0);
        assert_eq!(offset, 600.0);
        assert!((ProgressMapper::progress(offset, 1200.0) - 0.5).abs() < EPS);
    }
}
