//! Ball-related components

use bevy::prelude::*;

/// Marker for the ball entity
#[derive(Component)]
pub struct Ball;

/// Ballistic state of the ball. Only integrated while `active`.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct BallFlight {
    pub velocity: Vec3,
    pub active: bool,
    /// Seconds since launch
    pub elapsed: f32,
}

impl BallFlight {
    pub fn launch(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.active = true;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.active = false;
    }
}

/// Where (and how) a flight reached the goal line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallCrossing {
    pub position: Vec3,
    /// Flight ran out of time before reaching the line
    pub timed_out: bool,
}

/// First-crossing latch. `crossing` is taken by the resolver; `crossed` stays set.
#[derive(Component, Default, Debug)]
pub struct GoalLineCheck {
    pub crossed: bool,
    pub crossing: Option<BallCrossing>,
}

impl GoalLineCheck {
    pub fn record(&mut self, crossing: BallCrossing) {
        if self.crossed {
            return;
        }
        self.crossed = true;
        self.crossing = Some(crossing);
    }

    pub fn reset(&mut self) {
        self.crossed = false;
        self.crossing = None;
    }
}
