//! Compact text format for game event serialization
//!
//! Format: `T:NNNNN|CODE|data...`
//! - T:NNNNN = milliseconds since the bus started, zero-padded to at least 5 digits
//! - CODE = 2-char event type code
//! - data = pipe-separated values specific to event type
//!
//! Examples:
//! ```text
//! T:00000|RS|1|0.74|0.61|0.83
//! T:02510|PC|PrePenal|Aiming
//! T:03120|CS|
//! T:04300|KK|0.82|0.150|0.050
//! T:04300|SC|-6.12,11.93,-47.62|-1.93,2.71
//! T:04600|KD|Dive
//! T:04610|BC|-1.87,2.68,-15.02|0
//! T:04610|KS|0|0.31
//! T:04610|OC|goal
//! ```

use super::types::{GameConfig, GameEvent};

/// Format a vector with fixed precision
fn fmt_vec3(v: (f32, f32, f32)) -> String {
    format!("{:.2},{:.2},{:.2}", v.0, v.1, v.2)
}

fn fmt_vec2(v: (f32, f32)) -> String {
    format!("{:.2},{:.2}", v.0, v.1)
}

/// Serialize a GameEvent to compact text format
pub fn serialize_event(time_ms: u32, event: &GameEvent) -> String {
    let ts = format!("T:{:05}", time_ms);
    let code = event.type_code();

    let data = match event {
        GameEvent::SessionStart {
            session_id,
            timestamp,
        } => format!("{}|{}", session_id, timestamp),
        GameEvent::Config(config) => {
            // Config is compact JSON for easy parsing
            serde_json::to_string(config).unwrap_or_else(|_| "{}".to_string())
        }
        GameEvent::RoundStart {
            round,
            reflexes,
            positioning,
            reach,
        } => format!("{}|{:.2}|{:.2}|{:.2}", round, reflexes, positioning, reach),
        GameEvent::PhaseChange { from, to } => format!("{}|{}", from, to),
        GameEvent::ChargeStart => String::new(),
        GameEvent::Kick { power, yaw, pitch } => {
            format!("{:.2}|{:.3}|{:.3}", power, yaw, pitch)
        }
        GameEvent::ShotComputed { velocity, target } => {
            let target = target.map(fmt_vec2).unwrap_or_else(|| "_".to_string());
            format!("{}|{}", fmt_vec3(*velocity), target)
        }
        GameEvent::KeeperDecision { action } => action.clone(),
        GameEvent::BallCrossed { pos, timed_out } => {
            format!("{}|{}", fmt_vec3(*pos), if *timed_out { 1 } else { 0 })
        }
        GameEvent::KeeperSave { saved, chance } => {
            format!("{}|{:.2}", if *saved { 1 } else { 0 }, chance)
        }
        GameEvent::Outcome { result } => result.clone(),
        GameEvent::RoundEnd {
            round,
            goals,
            saves,
            posts,
        } => format!("{}|{}|{}|{}", round, goals, saves, posts),
    };

    format!("{}|{}|{}", ts, code, data)
}

/// Parse a line back into timestamp and event
pub fn parse_event(line: &str) -> Option<(u32, GameEvent)> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 3 {
        return None;
    }

    let ts_str = parts[0].strip_prefix("T:")?;
    let time_ms: u32 = ts_str.parse().ok()?;

    let code = parts[1];
    let data = &parts[2..];

    let event = match code {
        "SE" if data.len() >= 2 => GameEvent::SessionStart {
            session_id: data[0].to_string(),
            timestamp: data[1].to_string(),
        },
        "CF" => {
            // Rejoin in case the JSON contains |
            let json_str = data.join("|");
            let config: GameConfig = serde_json::from_str(&json_str).ok()?;
            GameEvent::Config(config)
        }
        "RS" if data.len() >= 4 => GameEvent::RoundStart {
            round: data[0].parse().ok()?,
            reflexes: data[1].parse().ok()?,
            positioning: data[2].parse().ok()?,
            reach: data[3].parse().ok()?,
        },
        "PC" if data.len() >= 2 => GameEvent::PhaseChange {
            from: data[0].to_string(),
            to: data[1].to_string(),
        },
        "CS" => GameEvent::ChargeStart,
        "KK" if data.len() >= 3 => GameEvent::Kick {
            power: data[0].parse().ok()?,
            yaw: data[1].parse().ok()?,
            pitch: data[2].parse().ok()?,
        },
        "SC" if data.len() >= 2 => GameEvent::ShotComputed {
            velocity: parse_vec3(data[0])?,
            target: if data[1] == "_" {
                None
            } else {
                Some(parse_vec2(data[1])?)
            },
        },
        "KD" if !data.is_empty() => GameEvent::KeeperDecision {
            action: data[0].to_string(),
        },
        "BC" if data.len() >= 2 => GameEvent::BallCrossed {
            pos: parse_vec3(data[0])?,
            timed_out: data[1] == "1",
        },
        "KS" if data.len() >= 2 => GameEvent::KeeperSave {
            saved: data[0] == "1",
            chance: data[1].parse().ok()?,
        },
        "OC" if !data.is_empty() => GameEvent::Outcome {
            result: data[0].to_string(),
        },
        "RE" if data.len() >= 4 => GameEvent::RoundEnd {
            round: data[0].parse().ok()?,
            goals: data[1].parse().ok()?,
            saves: data[2].parse().ok()?,
            posts: data[3].parse().ok()?,
        },
        _ => return None,
    };

    Some((time_ms, event))
}

fn parse_vec3(s: &str) -> Option<(f32, f32, f32)> {
    let mut it = s.split(',');
    let x = it.next()?.parse().ok()?;
    let y = it.next()?.parse().ok()?;
    let z = it.next()?.parse().ok()?;
    Some((x, y, z))
}

fn parse_vec2(s: &str) -> Option<(f32, f32)> {
    let (x, y) = s.split_once(',')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}
