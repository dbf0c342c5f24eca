//! TOML test file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Complete test definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Test setup configuration
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    pub seed: Option<u64>,
    /// Run at least this many frames
    pub frames: Option<u64>,
    /// Override the shot pressure (0 = no noise)
    pub pressure: Option<f32>,
    /// Fixed keeper instead of the per-round roll
    pub keeper: Option<KeeperSetup>,
    /// Kicker placement applied right after the first round reset
    pub kicker: Option<KickerSetup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeeperSetup {
    pub reflexes: f32,
    pub positioning: f32,
    pub reach: f32,
    pub reaction_time: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KickerSetup {
    pub x: Option<f32>,
    pub z: Option<f32>,
    /// Look angles in degrees
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
}

/// Input changes at a specific frame. Keys stay held until released.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    #[serde(default)]
    pub press: Vec<String>,
    #[serde(default)]
    pub release: Vec<String>,
    /// Set the look angles directly (degrees)
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    /// Raw mouse motion in pixels, added to this frame's delta
    pub mouse_dx: Option<f32>,
    pub mouse_dy: Option<f32>,
}

/// Expected test outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// Matches the event's detail: target phase, keeper action or outcome code
    pub value: Option<String>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

/// State assertion after simulation
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a test file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}
