//! Operator interface seam
//!
//! The console core never touches a DOM or a window. Everything the operator
//! sees goes through [`ConsoleView`]; map overlays are drawn through
//! [`Canvas`].

mod canvas;

use std::time::Duration;

pub use canvas::*;

use crate::core::geometry::Point2D;
use crate::core::locations::{Destination, ValidationError};
use crate::core::status::{BlockStatus, StatusSummary};
use crate::ros_interface::ConnectionState;

/// Alert colour classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information
    Info,
    /// Something completed
    Success,
    /// Operator action refused or degraded
    Warning,
    /// Failure or safety block
    Danger,
}

/// Alert shown to the operator; `duration` of `None` means it stays until
/// replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown
    pub message: String,
    /// Colour class
    pub severity: Severity,
    /// Time until dismissal
    pub duration: Option<Duration>,
}

impl Notice {
    /// Auto-dismissing notice
    pub fn timed(message: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Notice {
            message: message.into(),
            severity,
            duration: Some(duration),
        }
    }
}

/// Persistent connection banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Hidden while connected
    pub visible: bool,
    /// Text shown
    pub message: String,
    /// Colour class
    pub severity: Severity,
}

impl From<&ConnectionState> for Banner {
    fn from(state: &ConnectionState) -> Self {
        match state {
            ConnectionState::Connected => Banner {
                visible: false,
                message: "Connected".to_string(),
                severity: Severity::Success,
            },
            ConnectionState::Error(_) => Banner {
                visible: true,
                message: "Failed to connect".to_string(),
                severity: Severity::Danger,
            },
            ConnectionState::Closed => Banner {
                visible: true,
                message: "Not connected".to_string(),
                severity: Severity::Danger,
            },
        }
    }
}

/// Canvas layers stacked over the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Map image
    Map,
    /// Robot marker and goal target
    Robot,
    /// Tracked people
    People,
    /// Saved destinations
    Locations,
}

impl Layer {
    /// Every layer, bottom first
    pub const ALL: [Layer; 4] = [Layer::Map, Layer::Robot, Layer::People, Layer::Locations];
}

/// Everything the console shows to the operator
pub trait ConsoleView {
    /// Transient or persistent alert
    fn show_notice(&mut self, notice: &Notice);
    /// Connection banner
    fn set_connection_banner(&mut self, banner: &Banner);
    /// System status line
    fn set_system_status(&mut self, summary: &StatusSummary);
    /// Battery line
    fn set_battery_status(&mut self, text: &str);
    /// Enable/disable go and drive controls; the reason replaces their tooltips
    fn set_controls_blocked(&mut self, status: &BlockStatus);
    /// Inline error of the destination editor, `None` hides it
    fn set_editor_error(&mut self, error: Option<&ValidationError>);
    /// Destination editor list
    fn render_editor(&mut self, entries: &[&Destination]);
    /// Destination selector, with the selected entry highlighted
    fn render_selector(&mut self, entries: &[&Destination], selected: Option<&str>);
    /// Swap go/stop buttons
    fn set_navigation_active(&mut self, active: bool);
    /// Current goal target for map overlays
    fn set_goal_target(&mut self, target: Option<&Destination>);
    /// Swap estop/reset buttons
    fn set_estop_engaged(&mut self, engaged: bool);
    /// Fetch and show the map image at `url`
    fn load_map_image(&mut self, url: &str);
    /// Repaint one layer
    fn redraw(&mut self, layer: Layer);
    /// Hover label at an image position, `None` hides it
    fn set_tooltip(&mut self, tooltip: Option<(&str, Point2D)>);
}
