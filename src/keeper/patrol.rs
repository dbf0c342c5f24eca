//! Goal-line patrol routes
//!
//! While waiting, the keeper shuffles along the line on one of three idle
//! routes. Once the kicker starts aiming it switches to a longer, slower route.
//! Both loop forever with a small vertical bob.

use bevy::prelude::*;
use rand::Rng;

use crate::tween::{Ease, F32Tween};

/// Idle routes as (x offset from home, seconds)
pub const IDLE_ROUTES: [&[(f32, f32)]; 3] = [
    &[(-3.5, 0.8), (0.0, 0.5), (3.5, 0.8), (0.0, 0.5), (-1.5, 0.4), (1.5, 0.4)],
    &[(3.5, 0.8), (0.0, 0.5), (-3.5, 0.8), (0.0, 0.5), (1.5, 0.4), (-1.5, 0.4)],
    &[
        (-2.5, 0.4),
        (2.5, 0.4),
        (-3.0, 0.5),
        (3.0, 0.5),
        (-1.0, 0.3),
        (1.0, 0.3),
        (0.0, 0.3),
    ],
];

pub const AIMING_ROUTE: &[(f32, f32)] = &[
    (-4.5, 1.5),
    (-2.0, 0.8),
    (0.0, 0.6),
    (2.0, 0.8),
    (4.5, 1.5),
    (2.5, 0.8),
    (0.0, 0.6),
    (-2.5, 0.8),
    (-1.0, 0.6),
    (1.0, 0.6),
    (3.0, 1.0),
    (-3.0, 1.0),
];

const IDLE_PAUSE_CHANCE: f32 = 0.3;
const IDLE_PAUSE_RANGE: (f32, f32) = (0.2, 0.5);
const AIMING_PAUSE: f32 = 0.3;

const IDLE_BOB_HEIGHT: f32 = 0.3;
const IDLE_BOB_PERIOD: (f32, f32) = (0.5, 0.8);
const AIMING_BOB_HEIGHT: f32 = 0.25;
const AIMING_BOB_PERIOD: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolKind {
    Idle,
    Aiming,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolStep {
    pub offset_x: f32,
    pub duration: f32,
    pub ease: Ease,
    /// Hold after arriving (rolled once when the route is built)
    pub pause: f32,
}

/// Up-and-down sway, each half period eased with SineInOut
#[derive(Debug, Clone, PartialEq)]
struct Bob {
    height: f32,
    half_period: f32,
    elapsed: f32,
}

impl Bob {
    fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        if self.half_period <= 0.0 {
            return 0.0;
        }
        let phase = self.elapsed / self.half_period;
        let frac = phase.fract();
        let t = if (phase as u32) % 2 == 0 { frac } else { 1.0 - frac };
        self.height * Ease::SineInOut.apply(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patrol {
    pub kind: PatrolKind,
    pub steps: Vec<PatrolStep>,
    pub index: usize,
    leg: Option<F32Tween>,
    pause_remaining: f32,
    bob: Bob,
}

impl Patrol {
    /// One of the three idle routes, alternating QuadInOut/CubicInOut legs
    pub fn idle(rng: &mut impl Rng) -> Self {
        let route = IDLE_ROUTES[rng.gen_range(0..IDLE_ROUTES.len())];
        let steps = route
            .iter()
            .enumerate()
            .map(|(i, &(offset_x, duration))| PatrolStep {
                offset_x,
                duration,
                ease: if i % 2 == 0 {
                    Ease::QuadInOut
                } else {
                    Ease::CubicInOut
                },
                pause: if rng.r#gen::<f32>() < IDLE_PAUSE_CHANCE {
                    rng.gen_range(IDLE_PAUSE_RANGE.0..IDLE_PAUSE_RANGE.1)
                } else {
                    0.0
                },
            })
            .collect();
        Self::with_steps(
            PatrolKind::Idle,
            steps,
            IDLE_BOB_HEIGHT,
            rng.gen_range(IDLE_BOB_PERIOD.0..IDLE_BOB_PERIOD.1),
        )
    }

    /// The long aiming route with fixed pauses
    pub fn aiming() -> Self {
        let steps = AIMING_ROUTE
            .iter()
            .map(|&(offset_x, duration)| PatrolStep {
                offset_x,
                duration,
                ease: Ease::SineInOut,
                pause: AIMING_PAUSE,
            })
            .collect();
        Self::with_steps(PatrolKind::Aiming, steps, AIMING_BOB_HEIGHT, AIMING_BOB_PERIOD)
    }

    fn with_steps(kind: PatrolKind, steps: Vec<PatrolStep>, bob_height: f32, bob_half_period: f32) -> Self {
        Self {
            kind,
            steps,
            index: 0,
            leg: None,
            pause_remaining: 0.0,
            bob: Bob {
                height: bob_height,
                half_period: bob_half_period,
                elapsed: 0.0,
            },
        }
    }

    /// Step the patrol and return the keeper's new position
    pub fn advance(&mut self, pos: Vec3, home: Vec3, dt: f32) -> Vec3 {
        let y = home.y + self.bob.advance(dt);

        if self.pause_remaining > 0.0 {
            self.pause_remaining -= dt;
            return Vec3::new(pos.x, y, pos.z);
        }
        if self.steps.is_empty() {
            return Vec3::new(pos.x, y, pos.z);
        }

        let step = self.steps[self.index];
        let leg = self
            .leg
            .get_or_insert_with(|| F32Tween::new(pos.x, home.x + step.offset_x, step.duration, step.ease));
        let x = leg.advance(dt);

        if leg.is_finished() {
            self.leg = None;
            self.pause_remaining = step.pause;
            self.index = (self.index + 1) % self.steps.len();
        }
        Vec3::new(x, y, pos.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::KEEPER_SPAWN;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_idle_route_is_one_of_three() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let patrol = Patrol::idle(&mut rng);
            assert_eq!(patrol.kind, PatrolKind::Idle);
            let offsets: Vec<(f32, f32)> = patrol.steps.iter().map(|s| (s.offset_x, s.duration)).collect();
            assert!(IDLE_ROUTES.iter().any(|r| r.to_vec() == offsets));
            for (i, step) in patrol.steps.iter().enumerate() {
                let expected = if i % 2 == 0 { Ease::QuadInOut } else { Ease::CubicInOut };
                assert_eq!(step.ease, expected);
                assert!(step.pause == 0.0 || (0.2..0.5).contains(&step.pause));
            }
        }
    }

    #[test]
    fn test_aiming_route_uses_fixed_pause() {
        let patrol = Patrol::aiming();
        assert_eq!(patrol.steps.len(), AIMING_ROUTE.len());
        assert!(patrol.steps.iter().all(|s| s.pause == 0.3 && s.ease == Ease::SineInOut));
    }

    #[test]
    fn test_patrol_reaches_first_waypoint_then_pauses() {
        let mut patrol = Patrol::aiming();
        let mut pos = KEEPER_SPAWN;
        let dt = 1.0 / 60.0;
        // First leg is 1.5 s to -4.5
        for _ in 0..91 {
            pos = patrol.advance(pos, KEEPER_SPAWN, dt);
        }
        assert!((pos.x + 4.5).abs() < 1e-4);
        assert_eq!(patrol.index, 1);

        // Holds x during the pause
        let held = patrol.advance(pos, KEEPER_SPAWN, dt);
        assert_eq!(held.x, pos.x);
        assert_eq!(held.z, KEEPER_SPAWN.z);
    }

    #[test]
    fn test_bob_stays_within_height() {
        let mut patrol = Patrol::aiming();
        let mut pos = KEEPER_SPAWN;
        for _ in 0..600 {
            pos = patrol.advance(pos, KEEPER_SPAWN, 1.0 / 60.0);
            assert!(pos.y >= KEEPER_SPAWN.y - 1e-6 && pos.y <= KEEPER_SPAWN.y + 0.25 + 1e-6);
            assert!(pos.x >= -4.5 - 1e-4 && pos.x <= 4.5 + 1e-4);
        }
    }

    #[test]
    fn test_routes_loop() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut patrol = Patrol::idle(&mut rng);
        let len = patrol.steps.len();
        let mut pos = KEEPER_SPAWN;
        // Longest loop is well under 10 s including pauses
        for _ in 0..600 {
            pos = patrol.advance(pos, KEEPER_SPAWN, 1.0 / 60.0);
        }
        assert!(patrol.index < len);
        assert!(pos.x.abs() <= 3.5 + 1e-4);
    }
}
