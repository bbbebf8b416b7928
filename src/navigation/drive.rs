// src/navigation/drive.rs
// Hold-to-drive buttons: while a button is held a twist is published every
// repeat period; any kind of release publishes exactly one zero twist.

use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{DrivingConfig, SpeedPreset};
use crate::ros_interface::{twist, Bridge, Publisher, RosError, TWIST_TYPE};

/// The four drive buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveDirection {
    /// Straight ahead
    Forward,
    /// Straight back
    Reverse,
    /// Turn on the spot, counterclockwise
    Left,
    /// Turn on the spot, clockwise
    Right,
}

impl DriveDirection {
    /// Every button, in display order
    pub const ALL: [DriveDirection; 4] = [
        DriveDirection::Forward,
        DriveDirection::Reverse,
        DriveDirection::Left,
        DriveDirection::Right,
    ];

    /// (linear, angular) multipliers applied to the selected speed
    pub fn factors(self) -> (f64, f64) {
        match self {
            DriveDirection::Forward => (1.0, 0.0),
            DriveDirection::Reverse => (-1.0, 0.0),
            DriveDirection::Left => (0.0, 1.0),
            DriveDirection::Right => (0.0, -1.0),
        }
    }

    fn index(self) -> usize {
        match self {
            DriveDirection::Forward => 0,
            DriveDirection::Reverse => 1,
            DriveDirection::Left => 2,
            DriveDirection::Right => 3,
        }
    }
}

/// Pointer/touch events that end a hold. All of them stop the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseCause {
    /// Button released
    MouseUp,
    /// Pointer left the button
    MouseLeave,
    /// Touch moved off the button
    TouchLeave,
    /// Touch cancelled by the platform
    TouchCancel,
}

#[derive(Debug, Clone, Copy, Default)]
struct DriveButton {
    next_fire: Option<Instant>,
}

/// Hold-to-drive teleoperation
#[derive(Debug)]
pub struct DrivingControls {
    cmd_vel: Publisher,
    period: Duration,
    presets: Vec<SpeedPreset>,
    speed: SpeedPreset,
    buttons: [DriveButton; 4],
}

impl DrivingControls {
    /// Controls publishing on `cmd_vel_topic`, starting at the configured speed
    pub fn new(config: &DrivingConfig, cmd_vel_topic: &str) -> Self {
        let speed = config
            .speed_presets
            .get(config.default_speed)
            .copied()
            .unwrap_or(SpeedPreset { linear: 0.0, angular: 0.0 });
        DrivingControls {
            cmd_vel: Publisher::new(cmd_vel_topic, TWIST_TYPE),
            period: Duration::from_millis(config.repeat_period_ms),
            presets: config.speed_presets.clone(),
            speed,
            buttons: [DriveButton::default(); 4],
        }
    }

    /// Selected speed
    pub fn speed(&self) -> SpeedPreset {
        self.speed
    }

    /// Select a speed preset; returns false if the index is out of range
    pub fn select_speed(&mut self, index: usize) -> bool {
        match self.presets.get(index) {
            Some(preset) => {
                self.speed = *preset;
                debug!("Speed set to {:?}", preset);
                true
            }
            None => false,
        }
    }

    /// Whether `direction` is currently held
    pub fn is_held(&self, direction: DriveDirection) -> bool {
        self.buttons[direction.index()].next_fire.is_some()
    }

    /// Whether any button is held
    pub fn any_held(&self) -> bool {
        self.buttons.iter().any(|b| b.next_fire.is_some())
    }

    /// Start repeating. The first twist goes out one period after `now`.
    pub fn press(&mut self, direction: DriveDirection, now: Instant) -> bool {
        let button = &mut self.buttons[direction.index()];
        if button.next_fire.is_some() {
            warn!("Timer already running for {:?}", direction);
            return false;
        }
        button.next_fire = Some(now + self.period);
        true
    }

    /// Stop repeating and send a zero twist. Releasing an idle button does
    /// nothing and returns false.
    pub fn release(
        &mut self,
        bridge: &mut dyn Bridge,
        direction: DriveDirection,
        cause: ReleaseCause,
    ) -> Result<bool, RosError> {
        let button = &mut self.buttons[direction.index()];
        if button.next_fire.take().is_none() {
            return Ok(false);
        }
        debug!("{:?} released ({:?})", direction, cause);
        self.send_twist(bridge, 0.0, 0.0)?;
        Ok(true)
    }

    /// Fire every repeat that is due at `now`; returns how many twists were sent
    pub fn poll(&mut self, bridge: &mut dyn Bridge, now: Instant) -> Result<usize, RosError> {
        let mut sent = 0;
        for direction in DriveDirection::ALL {
            let (linear, angular) = direction.factors();
            while let Some(due) = self.buttons[direction.index()].next_fire {
                if now < due {
                    break;
                }
                self.send_twist(bridge, self.speed.linear * linear, self.speed.angular * angular)?;
                self.buttons[direction.index()].next_fire = Some(due + self.period);
                sent += 1;
            }
        }
        Ok(sent)
    }

    /// Publish a planar velocity command
    pub fn send_twist(&self, bridge: &mut dyn Bridge, linear: f64, angular: f64) -> Result<(), RosError> {
        self.cmd_vel.publish(bridge, twist(linear, angular))
    }
}
