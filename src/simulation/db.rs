//! SQLite database for simulation results
//!
//! Provides persistent storage and querying of simulated rounds.
//! Uses WAL mode for concurrent reads during writes.

use rusqlite::{Connection, Result, params};
use std::path::Path;

use crate::events::{GameEvent, serialize_event};

use super::metrics::RoundResult;

/// Database wrapper for simulation results
pub struct SimDatabase {
    conn: Connection,
}

impl SimDatabase {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for concurrent reads during writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                session_type TEXT NOT NULL,
                config_json TEXT
            );

            CREATE TABLE IF NOT EXISTS rounds (
                id INTEGER PRIMARY KEY,
                session_id TEXT REFERENCES sessions(id),
                seed INTEGER NOT NULL,
                round INTEGER NOT NULL,
                profile TEXT NOT NULL,
                outcome TEXT NOT NULL,
                power REAL NOT NULL,
                yaw REAL NOT NULL,
                pitch REAL NOT NULL,
                keeper_action TEXT NOT NULL,
                keeper_reflexes REAL NOT NULL,
                keeper_positioning REAL NOT NULL,
                keeper_reach REAL NOT NULL,
                save_chance REAL NOT NULL,
                cross_x REAL NOT NULL,
                cross_y REAL NOT NULL,
                cross_z REAL NOT NULL,
                timed_out INTEGER NOT NULL,
                duration_secs REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_rounds_session ON rounds(session_id);
            CREATE INDEX IF NOT EXISTS idx_rounds_profile ON rounds(profile);
            CREATE INDEX IF NOT EXISTS idx_rounds_outcome ON rounds(outcome);

            -- Event bus events, one row per compact-format line
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY,
                round_id INTEGER REFERENCES rounds(id),
                time_ms INTEGER NOT NULL,
                event_type TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_events_round ON events(round_id);
            CREATE INDEX IF NOT EXISTS idx_events_type ON events(event_type);
            "#,
        )?;
        Ok(())
    }

    /// Create a new session and return its ID
    pub fn create_session(&self, session_type: &str, config_json: Option<&str>) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO sessions (id, created_at, session_type, config_json) VALUES (?1, ?2, ?3, ?4)",
            params![id, created_at, session_type, config_json],
        )?;

        Ok(id)
    }

    /// Insert a round result (and its events) and return the round ID
    pub fn insert_round(&self, session_id: &str, result: &RoundResult) -> Result<i64> {
        self.conn.execute(
            r#"INSERT INTO rounds
               (session_id, seed, round, profile, outcome, power, yaw, pitch, keeper_action,
                keeper_reflexes, keeper_positioning, keeper_reach, save_chance,
                cross_x, cross_y, cross_z, timed_out, duration_secs)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"#,
            params![
                session_id,
                result.seed as i64,
                result.round,
                result.profile,
                result.outcome,
                result.power,
                result.yaw,
                result.pitch,
                result.keeper_action,
                result.keeper_reflexes,
                result.keeper_positioning,
                result.keeper_reach,
                result.save_chance,
                result.crossing.0,
                result.crossing.1,
                result.crossing.2,
                result.timed_out,
                result.duration,
            ],
        )?;

        let round_id = self.conn.last_insert_rowid();
        self.insert_events(round_id, &result.events)?;
        Ok(round_id)
    }

    /// Insert events for a round, stored as type code + compact data
    pub fn insert_events(&self, round_id: i64, events: &[(u32, GameEvent)]) -> Result<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO events (round_id, time_ms, event_type, data) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (time_ms, event) in events {
            let line = serialize_event(*time_ms, event);
            // Strip the "T:NNNNN|CC|" prefix, the columns already hold it
            let data = line.splitn(3, '|').nth(2).unwrap_or("");
            stmt.execute(params![round_id, time_ms, event.type_code(), data])?;
        }

        Ok(())
    }

    /// Aggregate stats for one kicker profile
    pub fn get_profile_stats(&self, profile: &str) -> Result<ProfileStats> {
        self.conn.query_row(
            r#"SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN outcome = 'goal' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN outcome = 'save' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN outcome = 'post' THEN 1 ELSE 0 END), 0),
                COALESCE(AVG(power), 0.0)
               FROM rounds WHERE profile = ?1"#,
            params![profile],
            |row| {
                Ok(ProfileStats {
                    profile: profile.to_string(),
                    rounds: row.get(0)?,
                    goals: row.get(1)?,
                    saves: row.get(2)?,
                    posts: row.get(3)?,
                    avg_power: row.get(4)?,
                })
            },
        )
    }

    /// Distinct profiles with stored rounds
    pub fn profiles(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT profile FROM rounds ORDER BY profile")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect()
    }

    /// Rounds/goals/saves per keeper action, optionally for one profile
    pub fn action_breakdown(&self, profile: Option<&str>) -> Result<Vec<ActionSummary>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT keeper_action,
                      COUNT(*),
                      SUM(CASE WHEN outcome = 'goal' THEN 1 ELSE 0 END),
                      SUM(CASE WHEN outcome = 'save' THEN 1 ELSE 0 END)
               FROM rounds
               WHERE ?1 IS NULL OR profile = ?1
               GROUP BY keeper_action
               ORDER BY COUNT(*) DESC, keeper_action"#,
        )?;
        let rows = stmt.query_map(params![profile], |row| {
            Ok(ActionSummary {
                action: row.get(0)?,
                rounds: row.get(1)?,
                goals: row.get(2)?,
                saves: row.get(3)?,
            })
        })?;
        rows.collect()
    }

    /// Get round results with optional filtering
    pub fn query_rounds(&self, filter: &RoundFilter) -> Result<Vec<RoundSummary>> {
        let mut sql = String::from(
            "SELECT id, round, profile, outcome, power, keeper_action, save_chance
             FROM rounds WHERE 1=1",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(profile) = &filter.profile {
            sql.push_str(" AND profile = ?");
            params.push(Box::new(profile.clone()));
        }

        if let Some(outcome) = &filter.outcome {
            sql.push_str(" AND outcome = ?");
            params.push(Box::new(outcome.clone()));
        }

        sql.push_str(" ORDER BY id");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(param_refs.as_slice(), |row| {
            Ok(RoundSummary {
                id: row.get(0)?,
                round: row.get(1)?,
                profile: row.get(2)?,
                outcome: row.get(3)?,
                power: row.get(4)?,
                keeper_action: row.get(5)?,
                save_chance: row.get(6)?,
            })
        })?;

        rows.collect()
    }

    pub fn round_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM rounds", [], |row| row.get(0))
    }

    pub fn session_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
    }

    /// Get events for a round
    pub fn get_events(&self, round_id: i64) -> Result<Vec<EventRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, time_ms, event_type, data FROM events WHERE round_id = ?1 ORDER BY time_ms, id",
        )?;

        let rows = stmt.query_map(params![round_id], |row| {
            Ok(EventRecord {
                id: row.get(0)?,
                time_ms: row.get(1)?,
                event_type: row.get(2)?,
                data: row.get(3)?,
            })
        })?;

        rows.collect()
    }

    pub fn event_count(&self, round_id: i64) -> Result<u64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM events WHERE round_id = ?1",
            params![round_id],
            |row| row.get(0),
        )
    }
}

/// A record from the events table
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub id: i64,
    pub time_ms: u32,
    pub event_type: String,
    pub data: String,
}

impl EventRecord {
    /// Rebuild the compact-format line
    pub fn to_line(&self) -> String {
        format!("T:{:05}|{}|{}", self.time_ms, self.event_type, self.data)
    }
}

/// Aggregate stats for a profile
#[derive(Debug, Clone)]
pub struct ProfileStats {
    pub profile: String,
    pub rounds: u32,
    pub goals: u32,
    pub saves: u32,
    pub posts: u32,
    pub avg_power: f64,
}

impl ProfileStats {
    pub fn goal_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.goals as f64 / self.rounds as f64
        }
    }
}

/// Per keeper action counts
#[derive(Debug, Clone)]
pub struct ActionSummary {
    pub action: String,
    pub rounds: u32,
    pub goals: u32,
    pub saves: u32,
}

/// Filter for querying rounds
#[derive(Debug, Clone, Default)]
pub struct RoundFilter {
    pub profile: Option<String>,
    pub outcome: Option<String>,
    pub limit: Option<u32>,
}

/// Summary of a round (without events)
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub id: i64,
    pub round: u32,
    pub profile: String,
    pub outcome: String,
    pub power: f32,
    pub keeper_action: String,
    pub save_chance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::parse_event;

    fn sample_result(outcome: &str, action: &str) -> RoundResult {
        RoundResult {
            round: 1,
            profile: "Balanced".to_string(),
            seed: 12345,
            outcome: outcome.to_string(),
            power: 0.6,
            keeper_action: action.to_string(),
            events: vec![
                (
                    0,
                    GameEvent::RoundStart {
                        round: 1,
                        reflexes: 0.7,
                        positioning: 0.7,
                        reach: 0.8,
                    },
                ),
                (
                    2100,
                    GameEvent::Outcome {
                        result: outcome.to_string(),
                    },
                ),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_database() {
        let db = SimDatabase::open_in_memory().unwrap();
        assert_eq!(db.round_count().unwrap(), 0);
        assert_eq!(db.session_count().unwrap(), 0);
    }

    #[test]
    fn test_insert_round_with_events() {
        let db = SimDatabase::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();

        let round_id = db.insert_round(&session_id, &sample_result("goal", "Dive")).unwrap();
        assert!(round_id > 0);
        assert_eq!(db.round_count().unwrap(), 1);
        assert_eq!(db.event_count(round_id).unwrap(), 2);

        let events = db.get_events(round_id).unwrap();
        assert_eq!(events[1].event_type, "OC");
        assert_eq!(events[1].data, "goal");
        let (ts, event) = parse_event(&events[1].to_line()).unwrap();
        assert_eq!(ts, 2100);
        assert_eq!(
            event,
            GameEvent::Outcome {
                result: "goal".to_string()
            }
        );
    }

    #[test]
    fn test_event_line_after_100_seconds() {
        let record = EventRecord {
            id: 1,
            time_ms: 187_250,
            event_type: "OC".to_string(),
            data: "save".to_string(),
        };
        assert_eq!(record.to_line(), "T:187250|OC|save");
        let (ts, _) = parse_event(&record.to_line()).unwrap();
        assert_eq!(ts, 187_250);
    }

    #[test]
    fn test_query_rounds() {
        let db = SimDatabase::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();
        db.insert_round(&session_id, &sample_result("goal", "Dive")).unwrap();
        db.insert_round(&session_id, &sample_result("save", "Center")).unwrap();

        let filter = RoundFilter {
            outcome: Some("save".to_string()),
            ..Default::default()
        };
        let rounds = db.query_rounds(&filter).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].keeper_action, "Center");
    }

    #[test]
    fn test_profile_stats_and_actions() {
        let db = SimDatabase::open_in_memory().unwrap();
        let session_id = db.create_session("test", None).unwrap();
        for outcome in ["goal", "goal", "save"] {
            db.insert_round(&session_id, &sample_result(outcome, "Dive")).unwrap();
        }

        let stats = db.get_profile_stats("Balanced").unwrap();
        assert_eq!(stats.rounds, 3);
        assert_eq!(stats.goals, 2);
        assert_eq!(stats.saves, 1);
        assert!((stats.goal_rate() - 2.0 / 3.0).abs() < 1e-9);

        let empty = db.get_profile_stats("Nobody").unwrap();
        assert_eq!(empty.rounds, 0);

        let actions = db.action_breakdown(None).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].rounds, 3);
        assert_eq!(db.profiles().unwrap(), vec!["Balanced".to_string()]);
    }
}
