//! Round event logging
//!
//! Systems emit `GameEvent`s onto the `EventBus`. Runners drain the bus into
//! evlog files, the results database and scenario assertions.

mod bus;
mod format;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use format::{parse_event, serialize_event};
pub use logger::{EventLogConfig, EventLogger, parse_evlog_content, read_evlog};
pub use types::{GameConfig, GameEvent};
