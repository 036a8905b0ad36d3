//! Property tests over random seeds and input sequences

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use sky_hop::consts::*;
use sky_hop::sim::{GameEvent, GameState, PlatformPool, TickInput, roll_platform, tick};
use sky_hop::{Tuning, speed_for_score};

fn tick_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), prop::bool::weighted(0.1)).prop_map(|(left, right, jump)| {
        TickInput {
            left,
            right,
            jump,
            autopilot: false,
        }
    })
}

/// Hold each input for a while so runs actually move around
fn input_sequence() -> impl Strategy<Value = Vec<(TickInput, u8)>> {
    prop::collection::vec((tick_input(), 1u8..60), 1..80)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn run_invariants_hold(seed in any::<u64>(), inputs in input_sequence(), autopilot in any::<bool>()) {
        let mut state = GameState::new(seed);
        let mut last_score = 0;

        for (input, hold) in &inputs {
            let input = TickInput { autopilot, ..input.clone() };
            for _ in 0..*hold {
                tick(&mut state, &input, SIM_DT);

                prop_assert!(state.platforms.active_count() <= MAX_PLATFORMS);
                prop_assert!(state.score >= last_score);
                last_score = state.score;
                prop_assert_eq!(
                    state.game_speed,
                    speed_for_score(state.score, SPEED_PER_POINT, MAX_GAME_SPEED)
                );

                for event in &state.events {
                    match *event {
                        GameEvent::PlatformSpawned { slot } => {
                            let p = state.platforms.get(slot);
                            prop_assert!((80.0..=180.0).contains(&p.rect.width));
                            let cx = p.rect.center_x();
                            prop_assert!((50.0..=750.0).contains(&cx));
                        }
                        GameEvent::Landed { surface_y, .. } => {
                            // Only from above: last tick's bottom was at or over the top
                            prop_assert!(state.player.prev_hitbox.bottom() <= surface_y + LANDING_TOLERANCE);
                            prop_assert_eq!(state.player.pos.y, surface_y);
                        }
                        _ => {}
                    }
                }

                if state.over {
                    let limit = state.camera.target.y + state.tuning.half_height() + GAME_OVER_MARGIN;
                    prop_assert!(state.player.pos.y > limit);
                    return Ok(());
                }
            }
        }
    }

    #[test]
    fn rolled_platform_bounds(seed in any::<u64>(), ref_x in -2000.0f32..2000.0, ref_y in -1.0e6f32..1.0e3) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let p = roll_platform(&mut rng, &tuning, ref_x, ref_y);

        let gap = ref_y - p.rect.y;
        prop_assert!((49.9..=100.1).contains(&gap), "gap {}", gap);
        prop_assert!((80.0..=180.0).contains(&p.rect.width));
        let cx = p.rect.center_x();
        prop_assert!((50.0..=750.0).contains(&cx), "center {}", cx);
        prop_assert_eq!(p.rect.height, PLATFORM_HEIGHT);
    }

    #[test]
    fn full_pool_is_untouched(seed in any::<u64>(), ref_x in 0.0f32..800.0, ref_y in -5000.0f32..600.0) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut pool = PlatformPool::new();
        for _ in 0..MAX_PLATFORMS {
            prop_assert!(pool.generate(&mut rng, &tuning, 400.0, 0.0).is_ok());
        }
        let before = pool.slots().to_vec();

        prop_assert!(pool.generate(&mut rng, &tuning, ref_x, ref_y).is_err());
        prop_assert_eq!(pool.slots(), before.as_slice());
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), inputs in input_sequence()) {
        let mut a = GameState::new(seed);
        let mut b = GameState::new(seed);
        for (input, hold) in &inputs {
            for _ in 0..*hold {
                tick(&mut a, input, SIM_DT);
                tick(&mut b, input, SIM_DT);
            }
        }
        prop_assert_eq!(a.player.pos, b.player.pos);
        prop_assert_eq!(a.score, b.score);
        prop_assert_eq!(a.platforms.slots(), b.platforms.slots());
    }
}
