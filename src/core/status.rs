// src/core/status.rs
// Reduces the sensor status bitmask and the soft estop stream into a handful of
// flags, a human readable summary and the control-blocking policy.

use std::collections::HashMap;
use std::fmt;

/// Named message constants as reported by the middleware schema query
pub type MessageConstants = HashMap<String, i64>;

/// Constant names of the bits we decode from the sensor status word
pub const CONST_CHARGING: &str = "SENSOR_STATUS_CHARGING";
/// Robot sits in the charging station
pub const CONST_IN_CS: &str = "SENSOR_STATUS_IN_CS";
/// Bumper or lift sensor tripped
pub const CONST_COLLISION: &str = "SENSOR_STATUS_COLLISION";
/// Stop button pressed on the robot
pub const CONST_USER_STOP: &str = "SENSOR_STATUS_USER_STOP";

/// Bit values for the sensor status word, resolved from the remote schema
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SensorStatusBits {
    /// Charging bit
    pub charging: u32,
    /// In charging station bit
    pub in_cs: u32,
    /// Collision bit
    pub collision: u32,
    /// User stop bit
    pub user_stop: u32,
}

impl SensorStatusBits {
    /// Pick the bits out of a schema constants table.
    ///
    /// Returns `None` if any of the four constants is missing or negative.
    pub fn from_constants(constants: &MessageConstants) -> Option<Self> {
        let bit = |name: &str| -> Option<u32> {
            let value = constants.get(name).and_then(|v| u32::try_from(*v).ok());
            if value.is_none() {
                log::warn!("Sensor status constant {} missing from schema", name);
            }
            value
        };
        Some(SensorStatusBits {
            charging: bit(CONST_CHARGING)?,
            in_cs: bit(CONST_IN_CS)?,
            collision: bit(CONST_COLLISION)?,
            user_stop: bit(CONST_USER_STOP)?,
        })
    }
}

/// Two-phase initialisation of the bit constants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorConstants {
    /// Schema not queried or reply not yet received
    Unresolved,
    /// Authoritative for the rest of the session
    Resolved(SensorStatusBits),
}

/// Independent status flags, recomputed on every input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusFlags {
    /// Charger current flowing
    pub charging: bool,
    /// In the charging station
    pub docked: bool,
    /// Collision sensor tripped
    pub collision: bool,
    /// Stop button pressed
    pub user_stopped: bool,
    /// Soft emergency stop engaged
    pub soft_estop: bool,
}

/// One clause of the system status line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClause {
    /// Collision detected
    Collided,
    /// In the charging station
    Docked,
    /// Stop button pressed
    Stopped,
    /// Soft estop engaged and the robot not stopped
    SoftEstop,
    /// Nothing to report
    Normal,
}

impl StatusClause {
    /// Clauses that should be rendered as an alarm
    pub fn is_alarm(&self) -> bool {
        matches!(self, StatusClause::Collided)
    }
}

impl fmt::Display for StatusClause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StatusClause::Collided => write!(f, "COLLIDED!"),
            StatusClause::Docked => write!(f, "Docked"),
            StatusClause::Stopped => write!(f, "STOPPED"),
            StatusClause::SoftEstop => write!(f, "Soft emergency stop engaged"),
            StatusClause::Normal => write!(f, "Normal"),
        }
    }
}

/// Ordered status clauses, rendered joined by ", "
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSummary(pub Vec<StatusClause>);

impl StatusSummary {
    /// Clauses in display order
    pub fn clauses(&self) -> &[StatusClause] {
        &self.0
    }
}

impl fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, clause) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Why the motion controls are disabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockReason {
    /// Charging; undocking would fight the charger
    Charging,
    /// Stop button pressed
    Stopped,
    /// Soft emergency stop engaged
    SoftEstop,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockReason::Charging => write!(
                f,
                "Charging, cannot automatically undock. Manually pull the robot out of the charging dock."
            ),
            BlockReason::Stopped => write!(
                f,
                "Stopped, press the Start button on the robot and close the lid to enable it."
            ),
            BlockReason::SoftEstop => write!(
                f,
                "Soft emergency stop active. You can disable it with the green button in upper right corner."
            ),
        }
    }
}

/// Control disablement derived from the flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockStatus {
    /// First applicable reason, `None` when controls are enabled
    pub reason: Option<BlockReason>,
}

impl BlockStatus {
    /// Whether controls are disabled
    pub fn blocked(&self) -> bool {
        self.reason.is_some()
    }
}

/// Aggregates sensor status words and soft estop events
#[derive(Debug)]
pub struct SystemStatus {
    constants: SensorConstants,
    flags: StatusFlags,
    deferred: Option<u32>,
}

impl Default for SystemStatus {
    fn default() -> Self {
        SystemStatus {
            constants: SensorConstants::Unresolved,
            flags: StatusFlags::default(),
            deferred: None,
        }
    }
}

impl SystemStatus {
    /// Status with unresolved constants and all flags clear
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution phase of the bit constants
    pub fn constants(&self) -> SensorConstants {
        self.constants
    }

    /// Install the schema constants. A status word that arrived before them is
    /// decoded now. Returns `true` if the flags were recomputed.
    pub fn resolve_constants(&mut self, bits: SensorStatusBits) -> bool {
        if let SensorConstants::Resolved(existing) = self.constants {
            log::debug!("Sensor constants already resolved ({:?}), keeping them", existing);
            return false;
        }
        log::info!("Sensor status constants resolved: {:?}", bits);
        self.constants = SensorConstants::Resolved(bits);
        match self.deferred.take() {
            Some(word) => self.on_sensor_status(word),
            None => false,
        }
    }

    /// Decode a raw status word. While the constants are unresolved the word is
    /// kept (latest wins) and `false` is returned.
    pub fn on_sensor_status(&mut self, word: u32) -> bool {
        let bits = match self.constants {
            SensorConstants::Resolved(bits) => bits,
            SensorConstants::Unresolved => {
                log::debug!("Deferring sensor status {:#06x}: constants unresolved", word);
                self.deferred = Some(word);
                return false;
            }
        };
        self.flags.charging = word & bits.charging != 0;
        self.flags.docked = word & bits.in_cs != 0;
        self.flags.collision = word & bits.collision != 0;
        self.flags.user_stopped = word & bits.user_stop != 0;
        true
    }

    /// Record the soft estop state
    pub fn on_soft_estop(&mut self, engaged: bool) {
        self.flags.soft_estop = engaged;
    }

    /// Current flags
    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// In the charging station
    pub fn is_docked(&self) -> bool {
        self.flags.docked
    }

    /// Status line: collision, docked, then stopped or (if not stopped) soft
    /// estop; "Normal" when nothing applies
    pub fn summary(&self) -> StatusSummary {
        let mut clauses = Vec::new();
        if self.flags.collision {
            clauses.push(StatusClause::Collided);
        }
        if self.flags.docked {
            clauses.push(StatusClause::Docked);
        }
        if self.flags.user_stopped {
            clauses.push(StatusClause::Stopped);
        } else if self.flags.soft_estop {
            clauses.push(StatusClause::SoftEstop);
        }
        if clauses.is_empty() {
            clauses.push(StatusClause::Normal);
        }
        StatusSummary(clauses)
    }

    /// Controls are blocked while charging, user stopped or soft estopped; the
    /// first match gives the reason
    pub fn block_status(&self) -> BlockStatus {
        let reason = if self.flags.charging {
            Some(BlockReason::Charging)
        } else if self.flags.user_stopped {
            Some(BlockReason::Stopped)
        } else if self.flags.soft_estop {
            Some(BlockReason::SoftEstop)
        } else {
            None
        };
        BlockStatus { reason }
    }
}

/// Battery summary line
pub fn battery_summary(battery_low: bool, is_charging: bool, is_fully_charged: bool) -> String {
    let mut parts = Vec::new();
    if battery_low {
        parts.push("BATTERY LOW!");
    } else if is_fully_charged {
        parts.push("Fully charged");
    }
    if is_charging {
        parts.push("[Charging]");
    }
    if parts.is_empty() {
        return "Normal".to_string();
    }
    parts.join(" ")
}
