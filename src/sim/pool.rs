//! Fixed-capacity platform pool and randomized platform generator
//!
//! Slots are never reordered or compacted. Generation fills the first
//! inactive slot (lowest index), and despawning just clears the `active` flag
//! so the slot can be reused.

use std::fmt;

use rand::Rng;

use super::rect::Rect;
use super::state::{Platform, PlatformKind};
use crate::clamp_soft;
use crate::consts::*;
use crate::tuning::Tuning;

/// Generation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is active
    Exhausted { capacity: usize },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::Exhausted { capacity } => {
                write!(f, "platform pool exhausted ({} slots active)", capacity)
            }
        }
    }
}

impl std::error::Error for PoolError {}

/// Roll a platform above `(ref_x, ref_y)`: gap, horizontal offset, width and
/// kind are drawn in that order from inclusive integer ranges.
pub fn roll_platform<R: Rng>(rng: &mut R, tuning: &Tuning, ref_x: f32, ref_y: f32) -> Platform {
    let gap = rng.random_range(tuning.platform_min_gap..=tuning.platform_max_gap);
    let y = ref_y - gap as f32;

    let offset_x = rng.random_range(-tuning.max_horizontal_gap..=tuning.max_horizontal_gap);
    let (min_x, max_x) = tuning.platform_x_bounds();
    let center_x = clamp_soft(ref_x + offset_x as f32, min_x, max_x);

    let width = rng.random_range(tuning.platform_min_width..=tuning.platform_max_width) as f32;
    let kind = PlatformKind::from_index(rng.random_range(0..PlatformKind::ALL.len()));

    Platform {
        rect: Rect::new(center_x - width / 2.0, y, width, PLATFORM_HEIGHT),
        kind,
        active: true,
    }
}

/// Fixed array of platform slots
#[derive(Debug, Clone)]
pub struct PlatformPool {
    slots: [Platform; MAX_PLATFORMS],
}

impl Default for PlatformPool {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformPool {
    /// All slots inactive
    pub fn new() -> Self {
        Self {
            slots: [Platform::default(); MAX_PLATFORMS],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        MAX_PLATFORMS
    }

    pub fn get(&self, slot: usize) -> &Platform {
        &self.slots[slot]
    }

    /// Every slot, active or not, in slot order
    pub fn slots(&self) -> &[Platform] {
        &self.slots
    }

    /// Active platforms with their slot index, in slot order
    pub fn active(&self) -> impl Iterator<Item = (usize, &Platform)> {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(|p| !p.active)
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    /// Put `platform` in `slot` (overwrites whatever was there)
    pub fn place(&mut self, slot: usize, platform: Platform) {
        self.slots[slot] = platform;
    }

    /// Reset the pool to the opening layout: slot 0 is a wide platform
    /// centered near the bottom of the screen, then the next slots climb
    /// upward, each rolled relative to the one below it.
    pub fn seed_initial<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) {
        self.clear();

        let first = Platform {
            rect: Rect::new(
                tuning.half_width() - FIRST_PLATFORM_WIDTH / 2.0,
                tuning.screen_height - FIRST_PLATFORM_BOTTOM_OFFSET,
                FIRST_PLATFORM_WIDTH,
                PLATFORM_HEIGHT,
            ),
            kind: PlatformKind::Grass,
            active: true,
        };
        self.place(0, first);

        let mut last = first;
        for slot in 1..INITIAL_PLATFORMS {
            let next = roll_platform(rng, tuning, last.rect.center_x(), last.rect.top());
            self.place(slot, next);
            last = next;
        }
        log::debug!("Seeded {} initial platforms", INITIAL_PLATFORMS);
    }

    /// Fill the first free slot with a platform rolled above `(ref_x, ref_y)`.
    /// Returns the slot used, or `PoolError::Exhausted` (pool untouched) when
    /// every slot is active.
    pub fn generate<R: Rng>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
        ref_x: f32,
        ref_y: f32,
    ) -> Result<usize, PoolError> {
        let slot = self.first_free().ok_or(PoolError::Exhausted {
            capacity: MAX_PLATFORMS,
        })?;
        self.slots[slot] = roll_platform(rng, tuning, ref_x, ref_y);
        Ok(slot)
    }

    /// Deactivate every active platform whose top is below `limit_y`.
    /// Returns how many were freed.
    pub fn despawn_below(&mut self, limit_y: f32) -> usize {
        let mut freed = 0;
        for slot in &mut self.slots {
            if slot.active && slot.rect.y > limit_y {
                slot.active = false;
                freed += 1;
            }
        }
        freed
    }

    /// The highest (smallest y) active platform; ties go to the lowest slot
    pub fn highest_active(&self) -> Option<(usize, &Platform)> {
        let mut best: Option<(usize, &Platform)> = None;
        for (slot, platform) in self.active() {
            match best {
                Some((_, b)) if platform.rect.y >= b.rect.y => {}
                _ => best = Some((slot, platform)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_rolled_within_bounds(p: &Platform, ref_x: f32, ref_y: f32) {
        let gap = ref_y - p.rect.y;
        assert!((50.0..=100.0).contains(&gap), "gap {gap}");
        assert!((80.0..=180.0).contains(&p.rect.width), "width {}", p.rect.width);
        let cx = p.rect.center_x();
        assert!((50.0..=750.0).contains(&cx), "center {cx}");
        assert!((cx - ref_x).abs() <= 160.0 || cx == 50.0 || cx == 750.0);
        assert_eq!(p.rect.height, PLATFORM_HEIGHT);
        assert!(p.active);
    }

    #[test]
    fn test_roll_bounds() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for i in 0..500 {
            let ref_x = (i as f32 * 37.0) % 900.0 - 50.0;
            let ref_y = 300.0 - i as f32;
            let p = roll_platform(&mut rng, &tuning, ref_x, ref_y);
            assert_rolled_within_bounds(&p, ref_x, ref_y);
        }
    }

    #[test]
    fn test_roll_clamps_to_edges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            // Any offset in [-160, 160] from -1000 lands left of the margin
            let p = roll_platform(&mut rng, &tuning, -1000.0, 0.0);
            assert_eq!(p.rect.center_x(), 50.0);
            let p = roll_platform(&mut rng, &tuning, 5000.0, 0.0);
            assert_eq!(p.rect.center_x(), 750.0);
        }
    }

    #[test]
    fn test_seed_initial_chain() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1234);
        let mut pool = PlatformPool::new();
        pool.seed_initial(&mut rng, &tuning);

        assert_eq!(pool.active_count(), INITIAL_PLATFORMS);
        assert_eq!(pool.get(0).rect, Rect::new(300.0, 500.0, 200.0, 32.0));
        for slot in 1..INITIAL_PLATFORMS {
            let below = pool.get(slot - 1);
            let p = pool.get(slot);
            assert_rolled_within_bounds(p, below.rect.center_x(), below.rect.y);
        }
        for slot in INITIAL_PLATFORMS..MAX_PLATFORMS {
            assert!(!pool.get(slot).active);
        }
    }

    #[test]
    fn test_seed_initial_clears_previous_run() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pool = PlatformPool::new();
        for _ in 0..MAX_PLATFORMS {
            pool.generate(&mut rng, &tuning, 400.0, 300.0).unwrap();
        }
        pool.seed_initial(&mut rng, &tuning);
        assert_eq!(pool.active_count(), INITIAL_PLATFORMS);
    }

    #[test]
    fn test_generate_first_fit() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut pool = PlatformPool::new();
        assert_eq!(pool.generate(&mut rng, &tuning, 400.0, 300.0), Ok(0));
        assert_eq!(pool.generate(&mut rng, &tuning, 400.0, 300.0), Ok(1));
        assert_eq!(pool.generate(&mut rng, &tuning, 400.0, 300.0), Ok(2));

        // Free the middle slot: it is reused before later slots
        let mut freed = *pool.get(1);
        freed.active = false;
        pool.place(1, freed);
        assert_eq!(pool.generate(&mut rng, &tuning, 400.0, 300.0), Ok(1));
        assert_eq!(pool.generate(&mut rng, &tuning, 400.0, 300.0), Ok(3));
    }

    #[test]
    fn test_generate_on_full_pool_is_noop() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = PlatformPool::new();
        for _ in 0..MAX_PLATFORMS {
            pool.generate(&mut rng, &tuning, 400.0, 300.0).unwrap();
        }
        let before: Vec<Platform> = pool.slots().to_vec();

        let err = pool.generate(&mut rng, &tuning, 400.0, 300.0).unwrap_err();
        assert_eq!(err, PoolError::Exhausted { capacity: MAX_PLATFORMS });
        assert_eq!(pool.slots(), before.as_slice());
        assert_eq!(pool.active_count(), MAX_PLATFORMS);
    }

    #[test]
    fn test_despawn_below() {
        let mut pool = PlatformPool::new();
        pool.place(0, Platform { rect: Rect::new(0.0, 100.0, 80.0, 32.0), kind: PlatformKind::Grass, active: true });
        pool.place(1, Platform { rect: Rect::new(0.0, 700.0, 80.0, 32.0), kind: PlatformKind::Stone, active: true });
        pool.place(2, Platform { rect: Rect::new(0.0, 616.0, 80.0, 32.0), kind: PlatformKind::Wood, active: true });

        assert_eq!(pool.despawn_below(616.0), 1);
        assert!(pool.get(0).active);
        assert!(!pool.get(1).active);
        // Exactly on the limit stays
        assert!(pool.get(2).active);
    }

    #[test]
    fn test_highest_active() {
        let mut pool = PlatformPool::new();
        assert!(pool.highest_active().is_none());

        pool.place(3, Platform { rect: Rect::new(0.0, 200.0, 80.0, 32.0), kind: PlatformKind::Grass, active: true });
        pool.place(5, Platform { rect: Rect::new(0.0, 150.0, 80.0, 32.0), kind: PlatformKind::Grass, active: true });
        pool.place(7, Platform { rect: Rect::new(0.0, 150.0, 80.0, 32.0), kind: PlatformKind::Grass, active: true });
        pool.place(9, Platform { rect: Rect::new(0.0, 10.0, 80.0, 32.0), kind: PlatformKind::Grass, active: false });

        let (slot, platform) = pool.highest_active().unwrap();
        assert_eq!(slot, 5);
        assert_eq!(platform.rect.y, 150.0);
    }
}
