//! Scripted input injection for tests
//!
//! Turns `[[input]]` entries into `ButtonInput<KeyCode>` presses, mouse
//! motion and direct aim changes, applied at the start of each frame.

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::player::AimRotation;

use super::parser::FrameInput;

/// Key name used in scenario files → key code
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let key = match name.to_ascii_lowercase().as_str() {
        "w" => KeyCode::KeyW,
        "a" => KeyCode::KeyA,
        "s" => KeyCode::KeyS,
        "d" => KeyCode::KeyD,
        "r" => KeyCode::KeyR,
        "up" => KeyCode::ArrowUp,
        "down" => KeyCode::ArrowDown,
        "left" => KeyCode::ArrowLeft,
        "right" => KeyCode::ArrowRight,
        "shift" => KeyCode::ShiftLeft,
        "space" => KeyCode::Space,
        "enter" => KeyCode::Enter,
        _ => return None,
    };
    Some(key)
}

/// One frame's resolved input changes
#[derive(Debug, Clone, Default)]
pub struct FrameChanges {
    pub press: Vec<KeyCode>,
    pub release: Vec<KeyCode>,
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    pub mouse: Vec2,
}

/// Resource holding scripted inputs for a test
#[derive(Resource, Default)]
pub struct ScriptedInputs {
    /// Map of frame -> changes applied before that frame's input capture
    pub frames: HashMap<u64, FrameChanges>,
    /// Current frame number
    pub current_frame: u64,
    /// Last frame with scripted input
    pub max_frame: u64,
}

impl ScriptedInputs {
    /// Create from parsed frame inputs. Unknown key names are an error.
    pub fn from_inputs(inputs: &[FrameInput]) -> Result<Self, String> {
        let mut frames: HashMap<u64, FrameChanges> = HashMap::new();
        let mut max_frame = 0u64;

        let resolve = |names: &[String], frame: u64| -> Result<Vec<KeyCode>, String> {
            names
                .iter()
                .map(|n| {
                    key_from_name(n).ok_or_else(|| format!("Unknown key '{}' at frame {}", n, frame))
                })
                .collect()
        };

        for fi in inputs {
            max_frame = max_frame.max(fi.frame);
            let changes = frames.entry(fi.frame).or_default();
            changes.press.extend(resolve(&fi.press, fi.frame)?);
            changes.release.extend(resolve(&fi.release, fi.frame)?);
            if fi.yaw.is_some() {
                changes.yaw = fi.yaw;
            }
            if fi.pitch.is_some() {
                changes.pitch = fi.pitch;
            }
            changes.mouse += Vec2::new(fi.mouse_dx.unwrap_or(0.0), fi.mouse_dy.unwrap_or(0.0));
        }

        Ok(Self {
            frames,
            current_frame: 0,
            max_frame,
        })
    }

    /// Extend the run (for state assertions past the last input)
    pub fn set_max_frame(&mut self, frame: u64) {
        self.max_frame = self.max_frame.max(frame);
    }

    /// Changes for the current frame, then advance
    pub fn advance_frame(&mut self) -> Option<FrameChanges> {
        let changes = self.frames.get(&self.current_frame).cloned();
        self.current_frame += 1;
        changes
    }

    pub fn should_continue(&self) -> bool {
        self.current_frame <= self.max_frame
    }
}

/// Applies this frame's scripted changes. Runs before `capture_input`.
pub fn scripted_input(
    mut scripted: ResMut<ScriptedInputs>,
    mut keyboard: ResMut<ButtonInput<KeyCode>>,
    mut motion: ResMut<AccumulatedMouseMotion>,
    mut aim: ResMut<AimRotation>,
) {
    let Some(changes) = scripted.advance_frame() else {
        return;
    };
    for key in changes.release {
        keyboard.release(key);
    }
    for key in changes.press {
        keyboard.press(key);
    }
    if let Some(yaw) = changes.yaw {
        aim.yaw = yaw.to_radians();
    }
    if let Some(pitch) = changes.pitch {
        aim.pitch = pitch.to_radians();
    }
    motion.delta += changes.mouse;
}
