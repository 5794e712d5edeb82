//! # Height Source Seam
//!
//! The streaming code never knows how heights are produced. It asks a
//! `HeightSource` for samples on the finest (level-0) integer grid, and the
//! source answers deterministically with a fixed period.

/// A deterministic, periodic height function on the level-0 grid.
///
/// Implementations must satisfy
/// `sample_height(x, y) == sample_height(x + period(), y) == sample_height(x, y + period())`
/// for every integer `x`, `y`.
pub trait HeightSource {
    /// Samples the height at integer grid coordinate `(x, y)`.
    fn sample_height(&self, x: i32, y: i32) -> f32;

    /// Returns the tiling period of the function, in level-0 texels.
    fn period(&self) -> i32;
}

impl<T: HeightSource + ?Sized> HeightSource for &T {
    #[inline]
    fn sample_height(&self, x: i32, y: i32) -> f32 {
        (**self).sample_height(x, y)
    }

    #[inline]
    fn period(&self) -> i32 {
        (**self).period()
    }
}

impl<T: HeightSource + ?Sized> HeightSource for Box<T> {
    #[inline]
    fn sample_height(&self, x: i32, y: i32) -> f32 {
        (**self).sample_height(x, y)
    }

    #[inline]
    fn period(&self) -> i32 {
        (**self).period()
    }
}

/// Samples a `HeightSource` at the resolution of one clipmap level.
///
/// A texel `(x, y)` of level `L` covers level-0 coordinate `(x << L, y << L)`.
pub struct LevelSampler<'a, S: ?Sized> {
    source: &'a S,
    level: u32,
}

impl<'a, S: HeightSource + ?Sized> LevelSampler<'a, S> {
    /// Creates a sampler for `level`.
    #[must_use]
    pub fn new(source: &'a S, level: u32) -> Self {
        Self { source, level }
    }

    /// Returns the level this sampler reads.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Height of level texel `(x, y)`.
    #[inline]
    #[must_use]
    pub fn height(&self, x: i32, y: i32) -> f32 {
        self.source.sample_height(x << self.level, y << self.level)
    }

    /// Height the next-coarser level predicts for level texel `(x, y)`.
    ///
    /// 2x2 box filter over the coarse texels surrounding the fine vertex.
    /// Even coordinates land exactly on a coarse texel; odd coordinates
    /// average the two (or four) neighbours, which is what the coarse mesh
    /// interpolates to along its edges.
    #[inline]
    #[must_use]
    pub fn coarse_height(&self, x: i32, y: i32) -> f32 {
        let coarse = self.level + 1;
        let (x0, x1) = (x >> 1, (x + 1) >> 1);
        let (y0, y1) = (y >> 1, (y + 1) >> 1);

        let sample = |cx: i32, cy: i32| self.source.sample_height(cx << coarse, cy << coarse);
        0.25 * (sample(x0, y0) + sample(x1, y0) + sample(x0, y1) + sample(x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Height equals x + 1000 * y, wrapped to a period of 64.
    struct Ramp;

    impl HeightSource for Ramp {
        fn sample_height(&self, x: i32, y: i32) -> f32 {
            let x = x.rem_euclid(64);
            let y = y.rem_euclid(64);
            (x + 1000 * y) as f32
        }

        fn period(&self) -> i32 {
            64
        }
    }

    #[test]
    fn test_level_sampler_scales_coordinates() {
        let sampler = LevelSampler::new(&Ramp, 2);
        assert_eq!(sampler.height(1, 1), Ramp.sample_height(4, 4));
        assert_eq!(sampler.height(-1, 0), Ramp.sample_height(-4, 0));
    }

    #[test]
    fn test_coarse_height_even_matches_coarse_texel() {
        let sampler = LevelSampler::new(&Ramp, 0);
        let coarse = LevelSampler::new(&Ramp, 1);
        assert_eq!(sampler.coarse_height(4, 6), coarse.height(2, 3));
    }

    #[test]
    fn test_coarse_height_odd_averages_neighbours() {
        let sampler = LevelSampler::new(&Ramp, 0);
        // x = 5 sits between coarse texels 2 and 3 (level-0 x = 4 and 6)
        let expected = 0.5 * (Ramp.sample_height(4, 0) + Ramp.sample_height(6, 0));
        assert!((sampler.coarse_height(5, 0) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_boxed_source_forwards() {
        let boxed: Box<dyn HeightSource> = Box::new(Ramp);
        assert_eq!(boxed.period(), 64);
        assert_eq!(boxed.sample_height(65, 0), Ramp.sample_height(1, 0));
    }
}
