// src/main.rs
// Entry point for the robot console. Rosbridge frames and operator intents
// arrive on stdin, one JSON document per line; frames for the robot leave on
// stdout. A websocket relay on either side is all that is needed to put the
// console in front of a real robot.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use log::{debug, error, info, warn};
use robot_console::core::geometry::Point2D;
use robot_console::core::locations::{Destination, ValidationError};
use robot_console::core::status::{BlockStatus, StatusSummary};
use robot_console::ros_interface::ConnectionState;
use robot_console::view::{Banner, Layer, Notice, Severity};
use robot_console::{BridgeEvent, Console, ConsoleConfig, ConsoleView, OperatorIntent, RosbridgeClient};

/// View that reports everything through the log
struct LogView;

impl ConsoleView for LogView {
    fn show_notice(&mut self, notice: &Notice) {
        match notice.severity {
            Severity::Danger => error!("{}", notice.message),
            Severity::Warning => warn!("{}", notice.message),
            Severity::Info | Severity::Success => info!("{}", notice.message),
        }
    }

    fn set_connection_banner(&mut self, banner: &Banner) {
        if banner.visible {
            warn!("{}", banner.message);
        }
    }

    fn set_system_status(&mut self, summary: &StatusSummary) {
        info!("System status: {}", summary);
    }

    fn set_battery_status(&mut self, text: &str) {
        info!("Battery: {}", text);
    }

    fn set_controls_blocked(&mut self, status: &BlockStatus) {
        match status.reason {
            Some(reason) => warn!("Controls disabled: {}", reason),
            None => debug!("Controls enabled"),
        }
    }

    fn set_editor_error(&mut self, error: Option<&ValidationError>) {
        if let Some(err) = error {
            warn!("{}", err);
        }
    }

    fn render_editor(&mut self, entries: &[&Destination]) {
        debug!("Editor holds {} locations", entries.len());
    }

    fn render_selector(&mut self, entries: &[&Destination], selected: Option<&str>) {
        let names: Vec<&str> = entries.iter().map(|d| d.name.as_str()).collect();
        info!("Destinations: {:?} (selected {:?})", names, selected);
    }

    fn set_navigation_active(&mut self, active: bool) {
        debug!("Navigation active: {}", active);
    }

    fn set_goal_target(&mut self, target: Option<&Destination>) {
        if let Some(target) = target {
            info!("Travelling to {}", target.name);
        }
    }

    fn set_estop_engaged(&mut self, engaged: bool) {
        debug!("Soft estop engaged: {}", engaged);
    }

    fn load_map_image(&mut self, url: &str) {
        info!("Map image at {}", url);
    }

    fn redraw(&mut self, _layer: Layer) {}

    fn set_tooltip(&mut self, tooltip: Option<(&str, Point2D)>) {
        if let Some((name, _)) = tooltip {
            debug!("Pointer over {}", name);
        }
    }
}

fn flush_outgoing(console: &mut Console<RosbridgeClient, LogView>, out: &mut impl Write) -> io::Result<()> {
    for frame in console.bridge_mut().drain_outgoing() {
        writeln!(out, "{}", frame)?;
    }
    out.flush()
}

fn handle_line(console: &mut Console<RosbridgeClient, LogView>, line: &str) -> Result<(), Box<dyn Error>> {
    let document: serde_json::Value = serde_json::from_str(line)?;
    if document.get("op").is_some() {
        if let Some(event) = RosbridgeClient::decode(line)? {
            console.handle_event(event)?;
        }
    } else {
        let intent: OperatorIntent = serde_json::from_value(document)?;
        console.handle_intent(intent, Instant::now())?;
    }
    Ok(())
}

/// Main function to initialize and run the console
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting robot console...");

    let config = match std::env::args().nth(1) {
        Some(path) => ConsoleConfig::from_yaml_file(path)?,
        None => ConsoleConfig::default(),
    };

    let mut console = Console::new(config, RosbridgeClient::new(), LogView);
    console.handle_event(BridgeEvent::Connection(ConnectionState::Connected))?;
    console.start()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    flush_outgoing(&mut console, &mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = handle_line(&mut console, &line) {
            error!("Failed to handle input: {}", e);
        }
        if let Err(e) = console.tick(Instant::now()) {
            error!("Failed to send drive command: {}", e);
        }
        flush_outgoing(&mut console, &mut out)?;
    }

    console.handle_event(BridgeEvent::Connection(ConnectionState::Closed))?;
    info!("Robot console stopped");
    Ok(())
}
