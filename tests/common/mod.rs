// tests/common/mod.rs
// Recording doubles shared by the integration tests.

#![allow(dead_code)]

use robot_console::core::geometry::Point2D;
use robot_console::core::locations::{Destination, ValidationError};
use robot_console::core::status::{BlockStatus, StatusSummary};
use robot_console::ros_interface::{Bridge, RequestId, RosError};
use robot_console::view::{Banner, ConsoleView, Layer, Notice};
use serde_json::Value;

/// Bridge that remembers everything sent through it
#[derive(Debug, Default)]
pub struct RecordingBridge {
    pub published: Vec<(String, Value)>,
    pub subscribed: Vec<(String, u32)>,
    pub calls: Vec<(RequestId, String, Value)>,
    /// Publishing on these topics fails
    pub failing_topics: Vec<String>,
    next_request: RequestId,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published on `topic`, oldest first
    pub fn on_topic(&self, topic: &str) -> Vec<&Value> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, msg)| msg)
            .collect()
    }

    /// Most recent request id for `service`
    pub fn last_call(&self, service: &str) -> Option<RequestId> {
        self.calls.iter().rev().find(|(_, s, _)| s == service).map(|(id, _, _)| *id)
    }

    pub fn calls_to(&self, service: &str) -> Vec<&(RequestId, String, Value)> {
        self.calls.iter().filter(|(_, s, _)| s == service).collect()
    }

    pub fn clear(&mut self) {
        self.published.clear();
        self.subscribed.clear();
        self.calls.clear();
    }
}

impl Bridge for RecordingBridge {
    fn publish(&mut self, topic: &str, _msg_type: &str, msg: Value) -> Result<(), RosError> {
        if self.failing_topics.iter().any(|t| t == topic) {
            return Err(RosError::PublishError(format!("{} unavailable", topic)));
        }
        self.published.push((topic.to_string(), msg));
        Ok(())
    }

    fn subscribe(&mut self, topic: &str, _msg_type: &str, throttle_rate: u32) -> Result<(), RosError> {
        self.subscribed.push((topic.to_string(), throttle_rate));
        Ok(())
    }

    fn call_service(&mut self, service: &str, args: Value) -> Result<RequestId, RosError> {
        self.next_request += 1;
        self.calls.push((self.next_request, service.to_string(), args));
        Ok(self.next_request)
    }
}

/// View that keeps the latest value of everything shown
#[derive(Debug, Default)]
pub struct RecordingView {
    pub notices: Vec<Notice>,
    pub banner: Option<Banner>,
    pub status_line: Option<String>,
    pub battery: Option<String>,
    pub blocked: Option<BlockStatus>,
    pub editor_error: Option<ValidationError>,
    pub editor: Vec<String>,
    pub selector: Vec<String>,
    pub selected: Option<String>,
    pub navigation_active: bool,
    pub goal_target: Option<String>,
    pub estop_engaged: bool,
    pub map_urls: Vec<String>,
    pub redraws: Vec<Layer>,
    pub tooltip: Option<String>,
}

impl RecordingView {
    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}

impl ConsoleView for RecordingView {
    fn show_notice(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn set_connection_banner(&mut self, banner: &Banner) {
        self.banner = Some(banner.clone());
    }

    fn set_system_status(&mut self, summary: &StatusSummary) {
        self.status_line = Some(summary.to_string());
    }

    fn set_battery_status(&mut self, text: &str) {
        self.battery = Some(text.to_string());
    }

    fn set_controls_blocked(&mut self, status: &BlockStatus) {
        self.blocked = Some(*status);
    }

    fn set_editor_error(&mut self, error: Option<&ValidationError>) {
        self.editor_error = error.cloned();
    }

    fn render_editor(&mut self, entries: &[&Destination]) {
        self.editor = entries.iter().map(|d| d.name.clone()).collect();
    }

    fn render_selector(&mut self, entries: &[&Destination], selected: Option<&str>) {
        self.selector = entries.iter().map(|d| d.name.clone()).collect();
        self.selected = selected.map(str::to_string);
    }

    fn set_navigation_active(&mut self, active: bool) {
        self.navigation_active = active;
    }

    fn set_goal_target(&mut self, target: Option<&Destination>) {
        self.goal_target = target.map(|d| d.name.clone());
    }

    fn set_estop_engaged(&mut self, engaged: bool) {
        self.estop_engaged = engaged;
    }

    fn load_map_image(&mut self, url: &str) {
        self.map_urls.push(url.to_string());
    }

    fn redraw(&mut self, layer: Layer) {
        self.redraws.push(layer);
    }

    fn set_tooltip(&mut self, tooltip: Option<(&str, Point2D)>) {
        self.tooltip = tooltip.map(|(name, _)| name.to_string());
    }
}
