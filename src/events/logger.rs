//! Event logger for round analytics
//!
//! Writes one `.evlog` file per session in the compact text format.

use bevy::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::format::{parse_event, serialize_event};
use super::types::{GameConfig, GameEvent};

/// Configuration for event logging
#[derive(Resource, Clone)]
pub struct EventLogConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Whether logging is enabled
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: true,
        }
    }
}

/// Active event logger with file handle
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    session_id: String,
    path: Option<PathBuf>,
    config: EventLogConfig,
}

impl EventLogger {
    /// Create a new event logger (but don't open file yet)
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            session_id: String::new(),
            path: None,
            config,
        }
    }

    /// Start a new log session with a fresh UUID and log SessionStart
    pub fn start_session(&mut self, timestamp: &str) {
        if !self.config.enabled {
            return;
        }

        self.session_id = Uuid::new_v4().to_string();

        if let Err(e) = std::fs::create_dir_all(&self.config.log_dir) {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let filename = format!("{}_{}.evlog", timestamp, &self.session_id[..8]);
        let path = self.config.log_dir.join(filename);

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
        {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                info!(
                    "Event logging started: {} (session: {})",
                    path.display(),
                    &self.session_id[..8]
                );
                self.path = Some(path);
                self.log(
                    0,
                    GameEvent::SessionStart {
                        session_id: self.session_id.clone(),
                        timestamp: timestamp.to_string(),
                    },
                );
            }
            Err(e) => {
                warn!("Failed to open event log: {}", e);
            }
        }
    }

    /// Log the game configuration (call after start_session)
    pub fn log_config(&mut self, config: GameConfig) {
        self.log(0, GameEvent::Config(config));
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Path of the open log file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Log a single event
    pub fn log(&mut self, time_ms: u32, event: GameEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };
        let line = serialize_event(time_ms, &event);
        if let Err(e) = writeln!(writer, "{}", line) {
            warn!("Failed to write event: {}", e);
        }
    }

    /// Flush and close the current log session
    pub fn end_session(&mut self) {
        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}

/// Parse evlog content, skipping lines that don't decode
pub fn parse_evlog_content(content: &str) -> Vec<(u32, GameEvent)> {
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(parse_event)
        .collect()
}

/// Read an `.evlog` file from disk
pub fn read_evlog(path: &Path) -> Result<Vec<(u32, GameEvent)>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(parse_evlog_content(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_lines_parse_back() {
        let events = vec![
            (10, GameEvent::ChargeStart),
            (
                900,
                GameEvent::KeeperDecision {
                    action: "Dive".to_string(),
                },
            ),
        ];
        let content = events
            .iter()
            .map(|(ts, e)| serialize_event(*ts, e))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_evlog_content(&content), events);
    }

    #[test]
    fn test_parse_content_skips_bad_lines() {
        let content = "T:00010|CS|\n\nnot an event\nT:00020|OC|post\n";
        let parsed = parse_evlog_content(content);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].0, 20);
    }

    #[test]
    fn test_disabled_logger_stays_inactive() {
        let mut logger = EventLogger::new(EventLogConfig {
            enabled: false,
            ..default()
        });
        logger.start_session("20260101_120000");
        assert!(!logger.is_active());
        assert!(logger.path().is_none());
        logger.log(0, GameEvent::ChargeStart);
        logger.end_session();
    }
}
