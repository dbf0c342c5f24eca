//! Input module - KickerInput resource and capture_input system

use bevy::prelude::*;

use crate::events::{EventBus, GameEvent};
use crate::tuning::PenaltyTweaks;
use crate::tween::Ease;

/// Buffered input state for the kicker
#[derive(Resource, Default, Debug)]
pub struct KickerInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    /// Forward/back only register while the kicker may walk
    pub movement_enabled: bool,
    /// Space is held and power is rising
    pub charging: bool,
    pub charge_elapsed: f32,
    /// Current charge power in [0, 1]
    pub power: f32,
    /// Power of a released kick, waiting to be consumed
    pub kick: Option<f32>,
    pub start_pressed: bool, // Enter - leave the intro
    pub retry_pressed: bool, // R - play another round
    space_held: bool,
    start_held: bool,
    retry_held: bool,
}

impl KickerInput {
    /// Take the buffered kick power, if any
    pub fn take_kick(&mut self) -> Option<f32> {
        self.kick.take()
    }

    pub fn take_start(&mut self) -> bool {
        std::mem::take(&mut self.start_pressed)
    }

    pub fn take_retry(&mut self) -> bool {
        std::mem::take(&mut self.retry_pressed)
    }

    pub fn set_movement_enabled(&mut self, enabled: bool) {
        self.movement_enabled = enabled;
        if !enabled {
            self.forward = false;
            self.back = false;
        }
    }

    /// Horizontal movement intent as (x, z); forward is -Z
    pub fn move_direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.forward {
            dir.y -= 1.0;
        }
        if self.back {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }

    /// Space went down. Returns true if a new charge started.
    pub fn begin_charge(&mut self) -> bool {
        if self.charging {
            return false;
        }
        self.charging = true;
        self.charge_elapsed = 0.0;
        self.power = 0.0;
        true
    }

    /// Advance the power curve while Space is held
    pub fn update_charge(&mut self, dt: f32, charge_duration: f32) {
        if !self.charging {
            return;
        }
        self.charge_elapsed += dt;
        let t = if charge_duration > 0.0 {
            self.charge_elapsed / charge_duration
        } else {
            1.0
        };
        self.power = Ease::QuadIn.apply(t);
    }

    /// Space came up. Buffers the kick and resets the meter.
    pub fn release_charge(&mut self) -> Option<f32> {
        if !self.charging {
            return None;
        }
        self.charging = false;
        let power = self.power;
        self.kick = Some(power);
        self.power = 0.0;
        self.charge_elapsed = 0.0;
        Some(power)
    }

    /// Clear buffered intents and the meter. Keeps the movement gate and
    /// key latches so a key still held across a reset doesn't fire again.
    pub fn reset(&mut self) {
        *self = Self {
            movement_enabled: self.movement_enabled,
            space_held: self.space_held,
            start_held: self.start_held,
            retry_held: self.retry_held,
            ..Self::default()
        };
    }
}

/// Runs in Update to turn key state into buffered intents.
/// Works on level state only and tracks edges itself, so scripted
/// `ButtonInput` presses behave the same as real keyboard input.
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    tweaks: Res<PenaltyTweaks>,
    time: Res<Time>,
    mut input: ResMut<KickerInput>,
    mut event_bus: ResMut<EventBus>,
) {
    let movement = input.movement_enabled;
    input.forward =
        movement && (keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp));
    input.back =
        movement && (keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown));
    // A/D also shuffle the kicker sideways while aiming
    input.left = keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft);
    input.right = keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight);
    input.sprint = keyboard.pressed(KeyCode::ShiftLeft);

    // Space: press starts the charge, release fires
    let space_now = keyboard.pressed(KeyCode::Space);
    if space_now && !input.space_held && input.begin_charge() {
        event_bus.emit(GameEvent::ChargeStart);
    } else if !space_now && input.space_held {
        input.release_charge();
    }
    input.space_held = space_now;
    input.update_charge(time.delta_secs(), tweaks.charge_duration);

    // Menu keys accumulate until consumed
    let start_now = keyboard.pressed(KeyCode::Enter);
    if start_now && !input.start_held {
        input.start_pressed = true;
    }
    input.start_held = start_now;

    let retry_now = keyboard.pressed(KeyCode::KeyR);
    if retry_now && !input.retry_held {
        input.retry_pressed = true;
    }
    input.retry_held = retry_now;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_follows_quadratic_curve() {
        let mut input = KickerInput::default();
        assert!(input.begin_charge());
        input.update_charge(0.75, 1.5);
        assert!((input.power - 0.25).abs() < 1e-5);
        input.update_charge(0.75, 1.5);
        assert!((input.power - 1.0).abs() < 1e-5);
        // Stays capped after the curve completes
        input.update_charge(1.0, 1.5);
        assert_eq!(input.power, 1.0);
    }

    #[test]
    fn test_release_buffers_kick_and_resets_power() {
        let mut input = KickerInput::default();
        input.begin_charge();
        input.update_charge(0.75, 1.5);
        let power = input.release_charge().unwrap();
        assert!((power - 0.25).abs() < 1e-5);
        assert_eq!(input.power, 0.0);
        assert!(!input.charging);
        assert_eq!(input.take_kick(), Some(power));
        assert_eq!(input.take_kick(), None);
    }

    #[test]
    fn test_second_press_while_charging_is_ignored() {
        let mut input = KickerInput::default();
        assert!(input.begin_charge());
        input.update_charge(0.5, 1.5);
        let before = input.power;
        assert!(!input.begin_charge());
        assert_eq!(input.power, before);
    }

    #[test]
    fn test_release_without_charge_does_nothing() {
        let mut input = KickerInput::default();
        assert_eq!(input.release_charge(), None);
        assert_eq!(input.kick, None);
    }

    #[test]
    fn test_reset_keeps_latches() {
        let mut input = KickerInput {
            movement_enabled: true,
            retry_held: true,
            retry_pressed: true,
            kick: Some(0.5),
            ..default()
        };
        input.reset();
        assert!(input.movement_enabled);
        assert!(input.retry_held);
        assert!(!input.retry_pressed);
        assert_eq!(input.kick, None);
    }

    #[test]
    fn test_disabling_movement_drops_forward_back() {
        let mut input = KickerInput {
            forward: true,
            back: true,
            left: true,
            ..default()
        };
        input.set_movement_enabled(false);
        assert!(!input.forward);
        assert!(!input.back);
        assert!(input.left);
        assert_eq!(input.move_direction(), Vec2::new(-1.0, 0.0));
    }
}
