//! Goalkeeper component and state

use bevy::prelude::*;
use rand::Rng;

use crate::constants::*;
use crate::keeper::decision::{KeeperAction, action_motion};
use crate::keeper::patrol::Patrol;
use crate::keeper::skills::KeeperSkills;
use crate::tween::{Ease, Vec3Tween};

/// What the keeper is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeeperState {
    #[default]
    Idle,
    /// Slow wide patrol while the kicker lines up
    AimingActive,
    /// Shot seen, decision pending
    Reacting,
    Ready,
    Stepping,
    Diving,
    Desperate,
    Watching,
    Recovering,
}

impl KeeperState {
    pub fn name(&self) -> &'static str {
        match self {
            KeeperState::Idle => "Idle",
            KeeperState::AimingActive => "AimingActive",
            KeeperState::Reacting => "Reacting",
            KeeperState::Ready => "Ready",
            KeeperState::Stepping => "Stepping",
            KeeperState::Diving => "Diving",
            KeeperState::Desperate => "Desperate",
            KeeperState::Watching => "Watching",
            KeeperState::Recovering => "Recovering",
        }
    }
}

/// Movement box along the goal line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeeperLimits {
    pub min_x: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl KeeperLimits {
    pub fn around(home: Vec3) -> Self {
        Self {
            min_x: KEEPER_MIN_X,
            max_x: KEEPER_MAX_X,
            max_y: home.y + KEEPER_MAX_RISE,
        }
    }

    pub fn clamp(&self, pos: Vec3) -> Vec3 {
        Vec3::new(pos.x.clamp(self.min_x, self.max_x), pos.y.min(self.max_y), pos.z)
    }
}

/// Shot seen, waiting out the reaction time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingDecision {
    pub remaining: f32,
    pub target: Option<Vec3>,
}

#[derive(Component, Debug, Clone)]
pub struct Goalkeeper {
    pub state: KeeperState,
    pub skills: KeeperSkills,
    /// Delay between seeing the shot and committing
    pub reaction_time: f32,
    pub home: Vec3,
    pub limits: KeeperLimits,
    pub pending: Option<PendingDecision>,
    /// Counts down to the return-to-neutral after a decision
    pub recovery_timer: Option<f32>,
    /// Committed action or recovery tween (overrides the patrol)
    pub motion: Option<Vec3Tween>,
    pub patrol: Option<Patrol>,
    pub last_action: Option<KeeperAction>,
}

impl Goalkeeper {
    pub fn new(home: Vec3) -> Self {
        Self {
            state: KeeperState::Idle,
            skills: KeeperSkills::default(),
            reaction_time: KEEPER_REACTION_RANGE.0,
            home,
            limits: KeeperLimits::around(home),
            pending: None,
            recovery_timer: None,
            motion: None,
            patrol: None,
            last_action: None,
        }
    }

    /// New round: fresh skills, idle patrol. Returns the position to snap to.
    pub fn reset(&mut self, skills: KeeperSkills, reaction_time: f32, rng: &mut impl Rng) -> Vec3 {
        self.state = KeeperState::Idle;
        self.skills = skills;
        self.reaction_time = reaction_time;
        self.pending = None;
        self.recovery_timer = None;
        self.motion = None;
        self.last_action = None;
        self.patrol = Some(Patrol::idle(rng));
        self.home
    }

    /// Kicker started lining up: switch to the long aiming patrol
    pub fn on_aiming_start(&mut self) {
        self.state = KeeperState::AimingActive;
        self.motion = None;
        self.patrol = Some(Patrol::aiming());
    }

    /// Shot taken. Stops the patrol, drops to home height, starts the reaction clock.
    pub fn react_to_shot(&mut self, target: Option<Vec3>, pos: Vec3) -> Vec3 {
        self.state = KeeperState::Reacting;
        self.patrol = None;
        self.motion = None;
        self.pending = Some(PendingDecision {
            remaining: self.reaction_time,
            target,
        });
        Vec3::new(pos.x, self.home.y, self.home.z)
    }

    /// Commit to an action: start its tween and schedule recovery
    pub fn commit(
        &mut self,
        action: KeeperAction,
        target: Option<Vec3>,
        pos: Vec3,
        recovery_delay: f32,
    ) {
        let (dest, duration, ease) = action_motion(action, target, pos, self.home, &self.skills, &self.limits);
        self.state = action.state();
        self.motion = Some(Vec3Tween::new(pos, self.limits.clamp(dest), duration, ease));
        self.last_action = Some(action);
        self.recovery_timer = Some(recovery_delay);
    }

    /// Tween back home, then go idle
    pub fn begin_recovery(&mut self, pos: Vec3) {
        self.state = KeeperState::Recovering;
        self.patrol = None;
        self.motion = Some(Vec3Tween::new(
            pos,
            self.home,
            KEEPER_RECOVERY_DURATION,
            Ease::CubicInOut,
        ));
    }
}
