//! Kicker profiles - how a simulated kicker picks its shot
//!
//! Each profile is a set of ranges the bot rolls from once per round.
//! Loaded from assets/kicker_profiles.txt; angles are in degrees.

use bevy::prelude::*;
use rand::Rng;
use std::fs;

use crate::constants::KICKER_PROFILES_FILE;

/// A concrete shot the bot will take: look angles in radians, Space hold time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    pub yaw: f32,
    pub pitch: f32,
    pub charge_time: f32,
}

impl ShotPlan {
    /// Build from degrees, the unit profiles and grid cells use
    pub fn from_degrees(yaw_deg: f32, pitch_deg: f32, charge_time: f32) -> Self {
        Self {
            yaw: yaw_deg.to_radians(),
            pitch: pitch_deg.to_radians(),
            charge_time,
        }
    }

    /// Hold time that lands on `power` for a quadratic charge curve
    pub fn charge_for_power(power: f32, charge_duration: f32) -> f32 {
        power.clamp(0.0, 1.0).sqrt() * charge_duration
    }
}

/// Shot selection ranges for one simulated kicker
#[derive(Debug, Clone, PartialEq)]
pub struct KickerProfile {
    pub name: String,
    pub yaw_min: f32,
    pub yaw_max: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    /// Seconds Space is held
    pub charge_min: f32,
    pub charge_max: f32,
    /// Yaw range is mirrored to the other post half the time
    pub mirror_yaw: bool,
}

impl Default for KickerProfile {
    fn default() -> Self {
        Self {
            name: "Balanced".to_string(),
            yaw_min: 0.0,
            yaw_max: 15.0,
            pitch_min: 0.0,
            pitch_max: 6.0,
            charge_min: 0.9,
            charge_max: 1.3,
            mirror_yaw: true,
        }
    }
}

fn roll_range(min: f32, max: f32, rng: &mut impl Rng) -> f32 {
    if max > min { rng.gen_range(min..=max) } else { min }
}

impl KickerProfile {
    /// Roll this round's shot
    pub fn plan(&self, rng: &mut impl Rng) -> ShotPlan {
        let mut yaw = roll_range(self.yaw_min, self.yaw_max, rng);
        if self.mirror_yaw && rng.gen_bool(0.5) {
            yaw = -yaw;
        }
        let pitch = roll_range(self.pitch_min, self.pitch_max, rng);
        let charge = roll_range(self.charge_min, self.charge_max, rng);
        ShotPlan::from_degrees(yaw, pitch, charge)
    }
}

/// Database of kicker profiles loaded from file
#[derive(Resource, Debug, Clone)]
pub struct KickerProfileDatabase {
    profiles: Vec<KickerProfile>,
}

impl Default for KickerProfileDatabase {
    fn default() -> Self {
        Self::load_from_file(KICKER_PROFILES_FILE)
    }
}

impl KickerProfileDatabase {
    /// Load profiles from file, or fall back to the built-in set
    pub fn load_from_file(path: &str) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read kicker profiles file: {}, using defaults", e);
                return Self::builtin();
            }
        };

        let profiles = parse_profiles(&content);
        if profiles.is_empty() {
            warn!("No profiles parsed from {}, using defaults", path);
            return Self::builtin();
        }

        info!("Loaded {} kicker profiles from {}", profiles.len(), path);
        Self { profiles }
    }

    /// Profiles shipped in assets/kicker_profiles.txt
    pub fn builtin() -> Self {
        let profile = |name: &str, yaw: (f32, f32), pitch: (f32, f32), charge: (f32, f32)| {
            KickerProfile {
                name: name.to_string(),
                yaw_min: yaw.0,
                yaw_max: yaw.1,
                pitch_min: pitch.0,
                pitch_max: pitch.1,
                charge_min: charge.0,
                charge_max: charge.1,
                mirror_yaw: true,
            }
        };
        Self {
            profiles: vec![
                KickerProfile::default(),
                profile("Placer", (18.0, 26.0), (0.0, 4.0), (1.0, 1.2)),
                profile("Blaster", (0.0, 10.0), (-2.0, 4.0), (1.35, 1.6)),
                profile("Chipper", (0.0, 12.0), (14.0, 22.0), (0.7, 0.9)),
                profile("Nervous", (0.0, 35.0), (-4.0, 14.0), (0.4, 1.6)),
            ],
        }
    }

    pub fn profiles(&self) -> &[KickerProfile] {
        &self.profiles
    }

    /// Case-insensitive lookup
    pub fn get_by_name(&self, name: &str) -> Option<&KickerProfile> {
        self.profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Parse profiles from file content
fn parse_profiles(content: &str) -> Vec<KickerProfile> {
    let mut profiles = Vec::new();
    let mut current: Option<KickerProfile> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix("profile:") {
            if let Some(p) = current.take() {
                profiles.push(p);
            }
            current = Some(KickerProfile {
                name: name.trim().to_string(),
                ..default()
            });
            continue;
        }

        let Some(profile) = current.as_mut() else {
            continue;
        };

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if key.trim() == "mirror_yaw" {
            if let Ok(v) = value.parse() {
                profile.mirror_yaw = v;
            }
            continue;
        }
        let Ok(v) = value.parse::<f32>() else {
            continue;
        };
        match key.trim() {
            "yaw_min" => profile.yaw_min = v,
            "yaw_max" => profile.yaw_max = v,
            "pitch_min" => profile.pitch_min = v,
            "pitch_max" => profile.pitch_max = v,
            "charge_min" => profile.charge_min = v,
            "charge_max" => profile.charge_max = v,
            _ => {}
        }
    }

    if let Some(p) = current {
        profiles.push(p);
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_profiles() {
        let content = r#"
# comment
profile: Sniper
yaw_min: 20
yaw_max: 24.5
charge_max: 1.1
mirror_yaw: false
unknown_key: 3

profile: Lazy
charge_min: 0.3
charge_max: not_a_number
"#;
        let profiles = parse_profiles(content);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Sniper");
        assert_eq!(profiles[0].yaw_max, 24.5);
        assert_eq!(profiles[0].charge_max, 1.1);
        assert!(!profiles[0].mirror_yaw);
        // Untouched keys keep their defaults
        assert_eq!(profiles[0].pitch_max, KickerProfile::default().pitch_max);
        assert_eq!(profiles[1].charge_min, 0.3);
        assert_eq!(profiles[1].charge_max, KickerProfile::default().charge_max);
    }

    #[test]
    fn test_lines_before_first_profile_are_ignored() {
        assert!(parse_profiles("yaw_min: 3\n").is_empty());
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let db = KickerProfileDatabase::load_from_file("assets/no_such_profiles.txt");
        assert_eq!(db.len(), KickerProfileDatabase::builtin().len());
        assert!(db.get_by_name("placer").is_some());
        assert!(db.get_by_name("Goalie").is_none());
    }

    #[test]
    fn test_plan_stays_in_range() {
        let profile = KickerProfile {
            mirror_yaw: false,
            ..default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let plan = profile.plan(&mut rng);
            let yaw = plan.yaw.to_degrees();
            assert!((-1e-3..=15.0 + 1e-3).contains(&yaw));
            assert!(plan.charge_time >= 0.9 && plan.charge_time <= 1.3);
        }
    }

    #[test]
    fn test_charge_for_power_inverts_curve() {
        let t = ShotPlan::charge_for_power(0.25, 1.5);
        assert!((t - 0.75).abs() < 1e-5);
        assert_eq!(ShotPlan::charge_for_power(2.0, 1.5), 1.5);
    }
}
