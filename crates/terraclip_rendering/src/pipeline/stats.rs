//! Per-frame terrain statistics.

use std::fmt;

/// Statistics from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Number of draw calls.
    pub draw_calls: u32,
    /// Number of instances drawn.
    pub instances: u32,
    /// Number of instances dropped by culling.
    pub instances_culled: u32,
    /// Height rectangles uploaded.
    pub regions_uploaded: u32,
    /// Height texels uploaded.
    pub texels_uploaded: u64,
    /// Levels whose window was rebuilt completely.
    pub full_rebuilds: u32,
    /// Levels whose window moved incrementally.
    pub incremental_updates: u32,
}

impl FrameStats {
    /// Fraction of candidate instances that survived culling.
    #[must_use]
    pub fn visible_ratio(&self) -> f32 {
        let candidates = self.instances + self.instances_culled;
        if candidates > 0 {
            self.instances as f32 / candidates as f32
        } else {
            0.0
        }
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {}: {} draws, {} instances ({} culled), {} regions / {} texels uploaded",
            self.frame,
            self.draw_calls,
            self.instances,
            self.instances_culled,
            self.regions_uploaded,
            self.texels_uploaded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_ratio() {
        let stats = FrameStats {
            instances: 30,
            instances_culled: 10,
            ..FrameStats::default()
        };
        assert!((stats.visible_ratio() - 0.75).abs() < 1e-6);
        assert_eq!(FrameStats::default().visible_ratio(), 0.0);
    }

    #[test]
    fn test_display_mentions_frame() {
        let stats = FrameStats {
            frame: 7,
            draw_calls: 9,
            ..FrameStats::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("frame 7: 9 draws"));
    }
}
