//! The particle pool and its per-frame animation.
//!
//! A fixed pool of point sprites is stored as parallel attribute arrays:
//! interleaved positions (x, y, z), plus one size, fall speed, and opacity
//! per particle. Size, speed, and opacity are sampled once at allocation and
//! never change afterwards; only positions move. Opacity is a linear remap
//! of size, so small particles are also the dim ones.
//!
//! The pool observes the world-space viewport but never owns it: resize and
//! tick both take the current dimensions from the caller.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::camera::Viewport;

/// Number of particles in the pool. Fixed for the lifetime of the field.
pub const PARTICLE_COUNT: usize = 100;

/// Overscan factor so particles cover the viewport edge-to-edge.
const PLACEMENT_MARGIN: f32 = 1.1;
const SIZE_MIN: f32 = 0.01;
const SIZE_MAX: f32 = 0.03;
const SPEED_MIN: f32 = -0.01;
const SPEED_MAX: f32 = -0.005;
const OPACITY_MIN: f32 = 0.2;
const OPACITY_SPAN: f32 = 0.6;
/// Recycled particles re-enter within this band above the top edge.
const RESPAWN_BAND: f32 = 2.0;

/// Seedable random source for particle sampling.
///
/// The app seeds it from entropy; tests seed it explicitly so every sampled
/// attribute is reproducible.
pub struct FieldRng {
    rng: SmallRng,
}

impl FieldRng {
    /// Random source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Deterministic random source for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[min, max)`.
    ///
    /// A degenerate range (zero-width, e.g. from a zero viewport) collapses
    /// to `min` instead of failing.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            min
        } else {
            self.rng.gen_range(min..max)
        }
    }
}

fn opacity_for(size: f32) -> f32 {
    (size - SIZE_MIN) / (SIZE_MAX - SIZE_MIN) * OPACITY_SPAN + OPACITY_MIN
}

/// A fixed-size pool of falling particles.
///
/// Mutated only from the host's single-threaded event loop: the per-frame
/// tick ([`advance`](Self::advance)) and the resize handler
/// ([`handle_resize`](Self::handle_resize)) never run concurrently.
pub struct ParticleField {
    /// Interleaved x, y, z per particle.
    positions: Vec<f32>,
    sizes: Vec<f32>,
    speeds: Vec<f32>,
    opacities: Vec<f32>,
    rng: FieldRng,
    dirty: bool,
}

impl ParticleField {
    /// Allocate the pool over the given viewport, seeded from entropy.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_rng(viewport, FieldRng::from_entropy())
    }

    /// Allocate the pool over the given viewport with an explicit random
    /// source.
    pub fn with_rng(viewport: Viewport, mut rng: FieldRng) -> Self {
        let x_limit = viewport.width * PLACEMENT_MARGIN;
        let y_limit = viewport.height * PLACEMENT_MARGIN;

        let mut positions = Vec::with_capacity(PARTICLE_COUNT * 3);
        let mut sizes = Vec::with_capacity(PARTICLE_COUNT);
        let mut speeds = Vec::with_capacity(PARTICLE_COUNT);
        let mut opacities = Vec::with_capacity(PARTICLE_COUNT);

        for _ in 0..PARTICLE_COUNT {
            positions.push(rng.range(-x_limit, x_limit));
            positions.push(rng.range(-y_limit, y_limit));
            positions.push(rng.range(-1.0, 1.0));

            let size = rng.range(SIZE_MIN, SIZE_MAX);
            sizes.push(size);
            speeds.push(rng.range(SPEED_MIN, SPEED_MAX));
            opacities.push(opacity_for(size));
        }

        Self {
            positions,
            sizes,
            speeds,
            opacities,
            rng,
            dirty: false,
        }
    }

    /// Number of particles in the pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Interleaved x, y, z positions.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    #[inline]
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    /// Resample every particle's x over the new width.
    ///
    /// y, z, size, speed, and opacity are left untouched, so a resize never
    /// disturbs the vertical flow of the field.
    pub fn handle_resize(&mut self, new_width: f32) {
        let x_limit = new_width * PLACEMENT_MARGIN;
        for i in 0..self.len() {
            self.positions[i * 3] = self.rng.range(-x_limit, x_limit);
        }
        self.dirty = true;
    }

    /// Advance every particle by one frame.
    ///
    /// Each particle falls by its own speed. A particle that drops below
    /// half the viewport height under center is recycled: x and z are
    /// resampled and y restarts just above the top edge. Size, speed, and
    /// opacity survive recycling unchanged.
    pub fn advance(&mut self, viewport: Viewport) {
        let x_limit = viewport.width * PLACEMENT_MARGIN;
        let floor = -0.5 * viewport.height;

        for i in 0..self.len() {
            self.positions[i * 3 + 1] += self.speeds[i];

            if self.positions[i * 3 + 1] < floor {
                self.positions[i * 3] = self.rng.range(-x_limit, x_limit);
                self.positions[i * 3 + 1] = viewport.height + self.rng.range(0.0, RESPAWN_BAND);
                self.positions[i * 3 + 2] = self.rng.range(-1.0, 1.0);
            }
        }
        self.dirty = true;
    }

    /// Whether the positions changed since the last upload, clearing the
    /// flag. The render driver re-uploads the instance buffer when this
    /// returns true.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(width: f32, height: f32) -> Viewport {
        Viewport { width, height }
    }

    fn field(width: f32, height: f32, seed: u64) -> ParticleField {
        ParticleField::with_rng(vp(width, height), FieldRng::seeded(seed))
    }

    #[test]
    fn test_initial_attribute_ranges() {
        let field = field(10.0, 6.0, 1);
        assert_eq!(field.len(), PARTICLE_COUNT);

        for i in 0..PARTICLE_COUNT {
            assert!((SIZE_MIN..=SIZE_MAX).contains(&field.sizes[i]));
            assert!((SPEED_MIN..=SPEED_MAX).contains(&field.speeds[i]));
            assert!((OPACITY_MIN..=OPACITY_MIN + OPACITY_SPAN).contains(&field.opacities[i]));
        }
    }

    #[test]
    fn test_opacity_monotone_in_size() {
        let field = field(10.0, 6.0, 2);
        let mut pairs: Vec<(f32, f32)> = field
            .sizes
            .iter()
            .zip(field.opacities.iter())
            .map(|(&s, &o)| (s, o))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        for window in pairs.windows(2) {
            assert!(window[1].1 >= window[0].1);
        }
    }

    #[test]
    fn test_initial_positions_within_margin() {
        let field = field(10.0, 6.0, 3);
        for i in 0..PARTICLE_COUNT {
            let x = field.positions[i * 3];
            let y = field.positions[i * 3 + 1];
            let z = field.positions[i * 3 + 2];
            assert!((-11.0..=11.0).contains(&x));
            assert!((-6.6..=6.6).contains(&y));
            assert!((-1.0..=1.0).contains(&z));
        }
    }

    #[test]
    fn test_advance_keeps_pool_shape() {
        let mut field = field(10.0, 6.0, 4);
        let sizes = field.sizes.clone();
        let speeds = field.speeds.clone();
        let opacities = field.opacities.clone();

        for _ in 0..500 {
            field.advance(vp(10.0, 6.0));
        }

        assert_eq!(field.len(), PARTICLE_COUNT);
        assert_eq!(field.sizes, sizes);
        assert_eq!(field.speeds, speeds);
        assert_eq!(field.opacities, opacities);
    }

    #[test]
    fn test_advance_moves_particles_down() {
        let mut field = field(10.0, 6.0, 5);
        let y_before: Vec<f32> = (0..PARTICLE_COUNT)
            .map(|i| field.positions[i * 3 + 1])
            .collect();

        field.advance(vp(10.0, 6.0));

        for i in 0..PARTICLE_COUNT {
            let y = field.positions[i * 3 + 1];
            // Either fell by its own (negative) speed or got recycled.
            if y < y_before[i] {
                assert!((y - (y_before[i] + field.speeds[i])).abs() < 1e-6);
            } else {
                assert!((6.0..=8.0).contains(&y));
            }
        }
    }

    #[test]
    fn test_recycle_resets_to_top_band() {
        let mut field = field(10.0, 6.0, 6);
        field.positions[1] = -3.2; // below -0.5 * 6.0

        field.advance(vp(10.0, 6.0));

        assert!((6.0..=8.0).contains(&field.positions[1]));
        assert!((-11.0..=11.0).contains(&field.positions[0]));
        assert!((-1.0..=1.0).contains(&field.positions[2]));
    }

    #[test]
    fn test_particle_above_floor_is_not_recycled() {
        let mut field = field(10.0, 6.0, 7);
        field.positions[1] = 0.5;
        let x = field.positions[0];
        let z = field.positions[2];
        let speed = field.speeds[0];

        field.advance(vp(10.0, 6.0));

        assert!((field.positions[1] - (0.5 + speed)).abs() < 1e-6);
        assert_eq!(field.positions[0], x);
        assert_eq!(field.positions[2], z);
    }

    #[test]
    fn test_resize_resamples_only_x() {
        let mut field = field(10.0, 6.0, 8);
        field.positions[1] = 3.0;
        let ys: Vec<f32> = (0..PARTICLE_COUNT)
            .map(|i| field.positions[i * 3 + 1])
            .collect();
        let zs: Vec<f32> = (0..PARTICLE_COUNT)
            .map(|i| field.positions[i * 3 + 2])
            .collect();
        let sizes = field.sizes.clone();

        field.handle_resize(20.0);

        for i in 0..PARTICLE_COUNT {
            assert!((-22.0..=22.0).contains(&field.positions[i * 3]));
            assert_eq!(field.positions[i * 3 + 1], ys[i]);
            assert_eq!(field.positions[i * 3 + 2], zs[i]);
        }
        assert_eq!(field.positions[1], 3.0);
        assert_eq!(field.sizes, sizes);
    }

    #[test]
    fn test_dirty_flag_lifecycle() {
        let mut field = field(10.0, 6.0, 9);
        // Initial data goes up at buffer creation, not via the flag.
        assert!(!field.take_dirty());

        field.advance(vp(10.0, 6.0));
        assert!(field.take_dirty());
        assert!(!field.take_dirty());

        field.handle_resize(12.0);
        assert!(field.take_dirty());
    }

    #[test]
    fn test_seeded_fields_are_identical() {
        let a = field(10.0, 6.0, 42);
        let b = field(10.0, 6.0, 42);
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.sizes, b.sizes);
        assert_eq!(a.speeds, b.speeds);
    }

    #[test]
    fn test_zero_viewport_degenerates() {
        let mut field = field(0.0, 0.0, 10);
        for i in 0..PARTICLE_COUNT {
            assert_eq!(field.positions[i * 3], 0.0);
            assert_eq!(field.positions[i * 3 + 1], 0.0);
        }
        // Ticking a degenerate field recycles without panicking.
        field.advance(vp(0.0, 0.0));
        assert_eq!(field.len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_eventual_recycle_under_ticking() {
        let mut field = field(10.0, 6.0, 11);
        // The slowest particle needs at most (6.6 + 3.0) / 0.005 ticks to
        // cross the recycle threshold once.
        let mut recycled = false;
        for _ in 0..3000 {
            let y_before = field.positions[1];
            field.advance(vp(10.0, 6.0));
            let y_after = field.positions[1];
            if y_after > y_before {
                assert!((6.0..=8.0).contains(&y_after));
                recycled = true;
                break;
            }
        }
        assert!(recycled);
    }
}
