//! Kicker-related components and resources

use bevy::prelude::*;

/// Marker for the kicker entity (first-person camera rig)
#[derive(Component)]
pub struct Kicker;

/// Where the kicker is looking. Drives both movement heading and shot aim.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct AimRotation {
    /// Rotation about +Y in radians (positive turns left)
    pub yaw: f32,
    /// Rotation about +X in radians (positive looks up)
    pub pitch: f32,
}

impl AimRotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Full look rotation, FPS order (yaw then pitch)
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Heading only, used for walking
    pub fn heading(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Charge power mirrored for display consumers (power bar)
#[derive(Resource, Default, Debug)]
pub struct ShotPreview {
    pub power: f32,
}
