//! Assertion checking for test expectations

use bevy::prelude::Vec3;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::GameEvent;

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event_type: String,
    /// Phase entered, keeper action or outcome code
    pub detail: Option<String>,
}

impl CapturedEvent {
    pub fn from_game_event(frame: u64, event: &GameEvent) -> Self {
        let detail = match event {
            GameEvent::PhaseChange { to, .. } => Some(to.clone()),
            GameEvent::KeeperDecision { action } => Some(action.clone()),
            GameEvent::Outcome { result } => Some(result.clone()),
            GameEvent::BallCrossed { timed_out, .. } => {
                Some(if *timed_out { "timeout" } else { "line" }.to_string())
            }
            GameEvent::KeeperSave { saved, .. } => Some(saved.to_string()),
            _ => None,
        };
        Self {
            frame,
            event_type: event.name().to_string(),
            detail,
        }
    }
}

/// Check if captured events match expected sequence (in order, gaps allowed)
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.event_type == exp.event
                && exp
                    .value
                    .as_ref()
                    .is_none_or(|v| cap.detail.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(v)))
        });

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.frame_min
                    && cap.frame < min
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                        expected: format!("frame >= {}", min),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                if let Some(max) = exp.frame_max
                    && cap.frame > max
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                        expected: format!("frame <= {}", max),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                captured_idx += offset + 1;
            }
            None => {
                let value_str = exp.value.as_ref().map(|v| format!(" ({})", v)).unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, value_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..]
                            .iter()
                            .map(|e| match &e.detail {
                                Some(d) => format!("{}({})", e.event_type, d),
                                None => e.event_type.clone(),
                            })
                            .collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// World state for assertions
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    pub phase: String,
    pub round: u32,
    pub outcome: Option<String>,
    pub title: Option<String>,
    pub kicker: Vec3,
    /// Look angles in degrees
    pub yaw: f32,
    pub pitch: f32,
    pub power: f32,
    pub ball: Vec3,
    pub ball_flying: bool,
    pub keeper: Vec3,
    pub keeper_state: String,
    pub goals: u32,
    pub saves: u32,
    pub posts: u32,
    pub rounds: u32,
}

enum Value<'a> {
    Number(f32),
    Text(&'a str),
    Flag(bool),
}

impl WorldState {
    fn lookup(&self, path: &str) -> Option<Value<'_>> {
        let value = match path {
            "phase" => Value::Text(&self.phase),
            "round" => Value::Number(self.round as f32),
            "outcome" => Value::Text(self.outcome.as_deref().unwrap_or("none")),
            "title" => Value::Text(self.title.as_deref().unwrap_or("none")),
            "kicker.x" => Value::Number(self.kicker.x),
            "kicker.y" => Value::Number(self.kicker.y),
            "kicker.z" => Value::Number(self.kicker.z),
            "aim.yaw" => Value::Number(self.yaw),
            "aim.pitch" => Value::Number(self.pitch),
            "input.power" => Value::Number(self.power),
            "ball.x" => Value::Number(self.ball.x),
            "ball.y" => Value::Number(self.ball.y),
            "ball.z" => Value::Number(self.ball.z),
            "ball.flying" => Value::Flag(self.ball_flying),
            "keeper.x" => Value::Number(self.keeper.x),
            "keeper.y" => Value::Number(self.keeper.y),
            "keeper.z" => Value::Number(self.keeper.z),
            "keeper.state" => Value::Text(&self.keeper_state),
            "score.goals" => Value::Number(self.goals as f32),
            "score.saves" => Value::Number(self.saves as f32),
            "score.posts" => Value::Number(self.posts as f32),
            "score.rounds" => Value::Number(self.rounds as f32),
            _ => return None,
        };
        Some(value)
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'path = value' or 'path > value'".to_string(),
            actual: check.clone(),
        })?;

        let actual = state.lookup(path).ok_or_else(|| AssertionError {
            message: format!("Unknown state path '{}'", path),
            expected: "phase, round, outcome, title, kicker.*, aim.*, input.power, ball.*, keeper.*, score.*"
                .to_string(),
            actual: path.to_string(),
        })?;

        match actual {
            Value::Number(n) => check_float_comparison(path, n, operator, expected_value)?,
            Value::Text(text) => check_text(check, text, operator, expected_value.trim_matches('"'))?,
            Value::Flag(flag) => check_text(check, &flag.to_string(), operator, expected_value)?,
        }
    }

    Ok(())
}

fn check_text(check: &str, actual: &str, operator: &str, expected: &str) -> Result<(), AssertionError> {
    let equal = actual.eq_ignore_ascii_case(expected);
    let pass = match operator {
        "=" => equal,
        "!=" => !equal,
        _ => {
            return Err(AssertionError {
                message: format!("Operator '{}' needs a number: {}", operator, check),
                expected: "= or !=".to_string(),
                actual: operator.to_string(),
            });
        }
    };
    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {}", check),
            expected: format!("{} {}", operator, expected),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(path: &str, actual: f32, operator: &str, expected_str: &str) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 0.1,
        "!=" => (actual - value).abs() >= 0.1,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {} {} {} (actual: {:.2})", path, operator, expected_str, actual),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(event: &str, value: Option<&str>) -> ExpectedEvent {
        ExpectedEvent {
            event: event.to_string(),
            value: value.map(str::to_string),
            frame_min: None,
            frame_max: None,
        }
    }

    fn captured(frame: u64, event: &GameEvent) -> CapturedEvent {
        CapturedEvent::from_game_event(frame, event)
    }

    #[test]
    fn test_sequence_in_order_with_values() {
        let events = vec![
            captured(
                1,
                &GameEvent::PhaseChange {
                    from: "Intro".to_string(),
                    to: "PrePenal".to_string(),
                },
            ),
            captured(
                50,
                &GameEvent::KeeperDecision {
                    action: "Dive".to_string(),
                },
            ),
            captured(
                60,
                &GameEvent::Outcome {
                    result: "save".to_string(),
                },
            ),
        ];
        let ok = [expected("PhaseChange", Some("prepenal")), expected("Outcome", Some("save"))];
        assert!(check_sequence(&ok, &events).is_ok());

        let wrong_value = [expected("Outcome", Some("goal"))];
        assert!(check_sequence(&wrong_value, &events).is_err());

        let wrong_order = [expected("Outcome", None), expected("KeeperDecision", None)];
        assert!(check_sequence(&wrong_order, &events).is_err());
    }

    #[test]
    fn test_sequence_frame_bounds() {
        let events = vec![captured(30, &GameEvent::ChargeStart)];
        let mut exp = expected("ChargeStart", None);
        exp.frame_max = Some(20);
        let err = check_sequence(&[exp], &events).unwrap_err();
        assert!(err.message.contains("too late"));
    }

    #[test]
    fn test_state_checks() {
        let state = WorldState {
            phase: "Outcome".to_string(),
            outcome: Some("goal".to_string()),
            ball: Vec3::new(-7.0, 3.5, -15.2),
            ball_flying: false,
            keeper_state: "Desperate".to_string(),
            goals: 1,
            ..Default::default()
        };
        let assertion = StateAssertion {
            after_frame: 0,
            checks: vec![
                "phase = outcome".to_string(),
                "outcome = \"goal\"".to_string(),
                "ball.z <= -15".to_string(),
                "ball.flying = false".to_string(),
                "keeper.state != Idle".to_string(),
                "score.goals = 1".to_string(),
            ],
        };
        assert!(check_state(&assertion, &state).is_ok());

        let bad = StateAssertion {
            after_frame: 0,
            checks: vec!["score.saves >= 1".to_string()],
        };
        assert!(check_state(&bad, &state).is_err());

        let unknown = StateAssertion {
            after_frame: 0,
            checks: vec!["keeper.mood = calm".to_string()],
        };
        assert!(check_state(&unknown, &state).unwrap_err().message.contains("Unknown"));
    }
}
