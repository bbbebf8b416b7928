// src/console.rs
// The console: routes bridge traffic and operator intents to the core
// components, sends the resulting commands and tells the view what changed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ConsoleConfig;
use crate::core::geometry::Point2D;
use crate::core::locations::{Destination, LocationRegistry};
use crate::core::map::{MapView, Size};
use crate::core::status::{battery_summary, SensorStatusBits, SystemStatus};
use crate::core::tracking::{PeopleTracker, RobotTracker};
use crate::navigation::{
    DriveDirection, DrivingControls, GoalLifecycle, GoalRequest, NavigationError, ReleaseCause,
    ResultDisposition, StopOutcome, UndockOutcome,
};
use crate::ros_interface::{
    bool_msg, decode, parse_message_constants, parse_param_value, tf_subscription_goal, Bridge,
    BridgeEvent, BoolMsg, ConnectionState, MapStatus, MoveBaseActionResult, Publisher, RequestId,
    SaveParamResponse, SensorStatus, SimpleBatteryStatus, Subscriber, TfActionFeedback,
    TrackedPersons, TriggerResponse, BATTERY_STATUS_TYPE, BOOL_TYPE, MAP_STATUS_TYPE,
    MOVE_BASE_RESULT_TYPE, SENSOR_STATUS_TYPE, TF_FEEDBACK_TYPE, TF_SUBSCRIPTION_GOAL_TYPE,
    TRACKED_PERSONS_TYPE,
};
use crate::view::{
    draw_world_poses, find_closest_location, Banner, Canvas, ConsoleView, Layer, Notice, Severity,
    Style,
};
use crate::ConsoleError;

/// Everything the operator can do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum OperatorIntent {
    /// Drive button pressed
    DrivePress {
        /// Button
        direction: DriveDirection,
    },
    /// Drive button released
    DriveRelease {
        /// Button
        direction: DriveDirection,
        /// How the hold ended
        cause: ReleaseCause,
    },
    /// Speed selector changed
    SelectSpeed {
        /// Preset index
        index: usize,
    },
    /// Destination picked in the selector
    SelectDestination {
        /// Saved destination name
        name: String,
    },
    /// Travel to the selected destination
    Go,
    /// Cancel travel
    Stop,
    /// Engage the soft emergency stop
    EngageEstop,
    /// Release the soft emergency stop
    ResetEstop,
    /// Open the destination editor
    OpenEditor,
    /// Add the robot's current pose to the editor
    AddLocation {
        /// Name for the new destination
        name: String,
    },
    /// Remove a destination from the editor
    RemoveLocation {
        /// Destination name
        name: String,
    },
    /// Save the editor and persist it
    CommitLocations,
    /// Audible cues on or off
    SetSound {
        /// New setting
        enabled: bool,
    },
    /// Destinations overlay on or off
    ShowLocations {
        /// New setting
        enabled: bool,
    },
    /// Pointer moved over the map
    PointerMove {
        /// Image x
        x: f64,
        /// Image y
        y: f64,
    },
    /// Single click on the map
    PointerClick {
        /// Image x
        x: f64,
        /// Image y
        y: f64,
    },
    /// Double click on the map
    PointerDoubleClick {
        /// Image x
        x: f64,
        /// Image y
        y: f64,
    },
    /// Drawing surface resized
    CanvasResized {
        /// Pixels
        width: f64,
        /// Pixels
        height: f64,
    },
    /// Map image decoded
    MapImageLoaded {
        /// Pixels
        width: f64,
        /// Pixels
        height: f64,
    },
}

/// Outstanding service calls, keyed by request id
#[derive(Debug, Clone, PartialEq)]
enum PendingCall {
    NextId,
    Locations,
    SensorConstants,
    Undock,
    SetParam(String),
    Persist(String),
}

/// Topics the console listens to
#[derive(Debug)]
struct Subscriptions {
    tf: Subscriber,
    people: Subscriber,
    map: Subscriber,
    sensor_status: Subscriber,
    battery: Subscriber,
    soft_estop: Subscriber,
    move_base_result: Subscriber,
}

impl Subscriptions {
    fn new(config: &ConsoleConfig) -> Self {
        let ros = &config.ros;
        Subscriptions {
            tf: Subscriber::new(&format!("{}/feedback", ros.tf_republisher), TF_FEEDBACK_TYPE, 0),
            people: Subscriber::new(&ros.topics.tracked_persons, TRACKED_PERSONS_TYPE, ros.people_throttle_ms),
            map: Subscriber::new(&ros.topics.map_updated, MAP_STATUS_TYPE, 0),
            sensor_status: Subscriber::new(&ros.topics.sensor_status, SENSOR_STATUS_TYPE, ros.status_throttle_ms),
            battery: Subscriber::new(&ros.topics.battery_status, BATTERY_STATUS_TYPE, ros.status_throttle_ms),
            soft_estop: Subscriber::new(&ros.topics.soft_estop_get, BOOL_TYPE, 0),
            move_base_result: Subscriber::new(
                &format!("{}/result", config.navigation.action_server),
                MOVE_BASE_RESULT_TYPE,
                0,
            ),
        }
    }

    fn all(&self) -> [&Subscriber; 7] {
        [
            &self.tf,
            &self.people,
            &self.map,
            &self.sensor_status,
            &self.battery,
            &self.soft_estop,
            &self.move_base_result,
        ]
    }
}

/// Operator console over a bridge `B`, reporting to a view `V`
pub struct Console<B: Bridge, V: ConsoleView> {
    config: ConsoleConfig,
    bridge: B,
    view: V,
    subscriptions: Subscriptions,
    estop_setter: Publisher,
    map: MapView,
    robot: RobotTracker,
    people: PeopleTracker,
    status: SystemStatus,
    locations: LocationRegistry,
    goals: GoalLifecycle,
    driving: DrivingControls,
    pending: HashMap<RequestId, PendingCall>,
    selected: Option<String>,
    show_locations: bool,
    connection: ConnectionState,
}

impl<B: Bridge, V: ConsoleView> Console<B, V> {
    /// Create a console; nothing is sent until [`Console::start`]
    pub fn new(config: ConsoleConfig, bridge: B, view: V) -> Self {
        let goals = GoalLifecycle::new(
            &config.navigation,
            &config.ros.client_id,
            &config.ros.topics.cmd_mode,
            &config.ros.services.undock,
        );
        let driving = DrivingControls::new(&config.driving, &config.ros.topics.cmd_vel);
        Console {
            subscriptions: Subscriptions::new(&config),
            estop_setter: Publisher::new(&config.ros.topics.soft_estop_set, BOOL_TYPE),
            map: MapView::new(),
            robot: RobotTracker::new(),
            people: PeopleTracker::new(),
            status: SystemStatus::new(),
            locations: LocationRegistry::new(),
            goals,
            driving,
            pending: HashMap::new(),
            selected: None,
            show_locations: config.ui.show_locations,
            connection: ConnectionState::Closed,
            config,
            bridge,
            view,
        }
    }

    /// Bridge the console sends through
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Mutable bridge, e.g. to drain its outbox
    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Operator view
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable operator view
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Active configuration
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Map state
    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Robot pose
    pub fn robot(&self) -> &RobotTracker {
        &self.robot
    }

    /// Tracked people
    pub fn people(&self) -> &PeopleTracker {
        &self.people
    }

    /// Safety status
    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    /// Destination registry
    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    /// Goal lifecycle
    pub fn goals(&self) -> &GoalLifecycle {
        &self.goals
    }

    /// Hold-to-drive controls
    pub fn driving(&self) -> &DrivingControls {
        &self.driving
    }

    /// Last reported connection state
    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    /// Name of the selected destination
    pub fn selected_destination(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Number of service calls still waiting for a reply
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.config.ui.notice_timeout_ms)
    }

    fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let notice = Notice::timed(message, severity, self.notice_duration());
        self.view.show_notice(&notice);
    }

    /// Subscribe to every stream, request transforms, query the status
    /// constants and load saved destinations
    pub fn start(&mut self) -> Result<(), ConsoleError> {
        info!("Starting console as {}", self.config.ros.client_id);
        for subscriber in self.subscriptions.all() {
            subscriber.subscribe(&mut self.bridge)?;
        }

        let ros = &self.config.ros;
        let frames = vec![ros.robot_frame.clone(), ros.odom_frame.clone()];
        let tf_goal = tf_subscription_goal(
            &format!("{}_tf", ros.client_id),
            &frames,
            &ros.fixed_frame,
            ros.tf_angular_thres,
            ros.tf_trans_thres,
            ros.tf_rate,
        );
        let tf_topic = format!("{}/goal", ros.tf_republisher);
        self.bridge.publish(&tf_topic, TF_SUBSCRIPTION_GOAL_TYPE, tf_goal)?;

        let rosapi = self.config.ros.rosapi.clone();
        let id = rosapi.message_details(&mut self.bridge, SENSOR_STATUS_TYPE)?;
        self.pending.insert(id, PendingCall::SensorConstants);
        let id = rosapi.get_param(&mut self.bridge, &self.config.ros.params.next_id)?;
        self.pending.insert(id, PendingCall::NextId);
        let id = rosapi.get_param(&mut self.bridge, &self.config.ros.params.locations)?;
        self.pending.insert(id, PendingCall::Locations);

        self.refresh_status();
        self.view.set_estop_engaged(false);
        self.view.set_navigation_active(false);
        Ok(())
    }

    /// Advance time-driven behaviour (drive button repeats)
    pub fn tick(&mut self, now: Instant) -> Result<(), ConsoleError> {
        self.driving.poll(&mut self.bridge, now)?;
        Ok(())
    }

    /// Handle one event from the bridge
    pub fn handle_event(&mut self, event: BridgeEvent) -> Result<(), ConsoleError> {
        match event {
            BridgeEvent::Connection(state) => {
                self.on_connection(state);
                Ok(())
            }
            BridgeEvent::Message { topic, msg } => self.on_message(&topic, &msg),
            BridgeEvent::ServiceResponse { id, result, values } => {
                self.on_service_response(id, result, &values)
            }
        }
    }

    fn on_connection(&mut self, state: ConnectionState) {
        match &state {
            ConnectionState::Connected => info!("Connected to websocket server."),
            ConnectionState::Error(reason) => error!("Error connecting to websocket server: {}", reason),
            ConnectionState::Closed => warn!("Connection to websocket server closed."),
        }
        self.view.set_connection_banner(&Banner::from(&state));
        self.connection = state;
    }

    fn on_message(&mut self, topic: &str, msg: &Value) -> Result<(), ConsoleError> {
        let subs = &self.subscriptions;
        if subs.tf.matches(topic) {
            let feedback: TfActionFeedback = decode(msg)?;
            for stamped in feedback.feedback.transforms {
                let frame = stamped.child_frame_id.trim_start_matches('/');
                if frame == self.config.ros.robot_frame {
                    self.robot.update(stamped.transform.into());
                    self.view.redraw(Layer::Robot);
                } else if frame == self.config.ros.odom_frame {
                    self.people.update_odom(stamped.transform.into());
                } else {
                    debug!("Ignoring transform for frame {}", frame);
                }
            }
        } else if subs.people.matches(topic) {
            let persons: TrackedPersons = decode(msg)?;
            if self.people.update_tracks(&persons.relative_poses()) {
                self.view.redraw(Layer::People);
            }
        } else if subs.map.matches(topic) {
            let status: MapStatus = decode(msg)?;
            self.map.set_metadata(status.info.into());
            let url = format!(
                "{}?s={}&ns={}",
                self.config.ui.map_image_url, status.header.stamp.secs, status.header.stamp.nsecs
            );
            self.view.load_map_image(&url);
            self.redraw_overlays();
        } else if subs.sensor_status.matches(topic) {
            let sensor: SensorStatus = decode(msg)?;
            if self.status.on_sensor_status(sensor.sensor_status) {
                self.refresh_status();
            }
        } else if subs.battery.matches(topic) {
            let battery: SimpleBatteryStatus = decode(msg)?;
            let text = battery_summary(battery.battery_low, battery.is_charging, battery.is_fully_charged);
            self.view.set_battery_status(&text);
        } else if subs.soft_estop.matches(topic) {
            let estop: BoolMsg = decode(msg)?;
            self.status.on_soft_estop(estop.data);
            self.view.set_estop_engaged(estop.data);
            self.refresh_status();
        } else if subs.move_base_result.matches(topic) {
            let result: MoveBaseActionResult = decode(msg)?;
            self.on_goal_result(&result)?;
        } else {
            warn!("Message on unexpected topic {}", topic);
        }
        Ok(())
    }

    fn on_service_response(&mut self, id: RequestId, result: bool, values: &Value) -> Result<(), ConsoleError> {
        let call = match self.pending.remove(&id) {
            Some(call) => call,
            None => {
                debug!("Reply to unknown request {}", id);
                return Ok(());
            }
        };

        match call {
            PendingCall::NextId => {
                if !result {
                    warn!("Failed to read {}", self.config.ros.params.next_id);
                    return Ok(());
                }
                if let Some(next_id) = parse_param_value(values)?.and_then(|v| v.as_u64()) {
                    self.locations.load_next_id(next_id);
                }
            }
            PendingCall::Locations => {
                if !result {
                    warn!("Failed to read {}", self.config.ros.params.locations);
                    return Ok(());
                }
                let name = &self.config.ros.params.locations;
                let entries: Vec<Destination> = match parse_param_value(values) {
                    Ok(Some(value @ Value::Array(_))) => serde_json::from_value(value).unwrap_or_else(|e| {
                        warn!("Ignoring malformed {}: {}", name, e);
                        Vec::new()
                    }),
                    Ok(Some(other)) => {
                        warn!("Ignoring {}: expected a list, got {}", name, other);
                        Vec::new()
                    }
                    Ok(None) => Vec::new(),
                    Err(e) => {
                        warn!("Ignoring unreadable {}: {}", name, e);
                        Vec::new()
                    }
                };
                self.locations.load_saved(entries);
                self.locations_changed();
            }
            PendingCall::SensorConstants => {
                if !result {
                    warn!("Schema query for {} failed, status stays unresolved", SENSOR_STATUS_TYPE);
                    return Ok(());
                }
                let constants = parse_message_constants(values)?;
                if let Some(bits) = SensorStatusBits::from_constants(&constants) {
                    if self.status.resolve_constants(bits) {
                        self.refresh_status();
                    }
                }
            }
            PendingCall::Undock => {
                let response: TriggerResponse = if result {
                    decode(values)?
                } else {
                    TriggerResponse {
                        success: false,
                        message: values.as_str().unwrap_or("service call failed").to_string(),
                    }
                };
                match self.goals.on_undock_response(&mut self.bridge, id, &response) {
                    Ok(UndockOutcome::Issued(goal)) => self.goal_started(&goal.target),
                    Ok(UndockOutcome::Ignored) => {}
                    Err(err @ NavigationError::UndockFailed(_)) => {
                        self.notify(err.to_string(), Severity::Warning);
                        return Err(err.into());
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            PendingCall::SetParam(name) => {
                if !result {
                    warn!("Setting {} failed", name);
                }
            }
            PendingCall::Persist(name) => {
                let saved = result && decode::<SaveParamResponse>(values).map(|r| r.success).unwrap_or(false);
                if saved {
                    info!("Persisted {}", name);
                } else {
                    let msg = format!("Failed to persist {}", name);
                    error!("{}", msg);
                    self.notify(msg, Severity::Danger);
                }
            }
        }
        Ok(())
    }

    fn on_goal_result(&mut self, result: &MoveBaseActionResult) -> Result<(), ConsoleError> {
        match self.goals.on_result(&mut self.bridge, result)? {
            ResultDisposition::Finished(_) => {
                self.notify("Navigation ended", Severity::Info);
                self.goal_cleared();
            }
            ResultDisposition::Stale { seq } => debug!("Result for superseded goal {} dropped", seq),
            ResultDisposition::Foreign => debug!("Result for foreign goal {}", result.status.goal_id.id),
        }
        Ok(())
    }

    /// Handle one operator action at time `now`
    pub fn handle_intent(&mut self, intent: OperatorIntent, now: Instant) -> Result<(), ConsoleError> {
        debug!("Intent {:?}", intent);
        match intent {
            OperatorIntent::DrivePress { direction } => {
                if let Some(reason) = self.status.block_status().reason {
                    self.notify(format!("Cannot drive: {}", reason), Severity::Danger);
                    return Err(NavigationError::Blocked(reason).into());
                }
                self.driving.press(direction, now);
            }
            OperatorIntent::DriveRelease { direction, cause } => {
                self.driving.release(&mut self.bridge, direction, cause)?;
            }
            OperatorIntent::SelectSpeed { index } => {
                if !self.driving.select_speed(index) {
                    warn!("No speed preset {}", index);
                }
            }
            OperatorIntent::SelectDestination { name } => self.select_destination(&name)?,
            OperatorIntent::Go => self.go()?,
            OperatorIntent::Stop => self.stop()?,
            OperatorIntent::EngageEstop => {
                warn!("Soft emergency stop requested");
                self.estop_setter.publish(&mut self.bridge, bool_msg(true))?;
            }
            OperatorIntent::ResetEstop => {
                info!("Soft emergency stop reset requested");
                self.estop_setter.publish(&mut self.bridge, bool_msg(false))?;
            }
            OperatorIntent::OpenEditor => {
                self.locations.open_editor();
                self.view.set_editor_error(None);
                self.view.render_editor(&self.locations.editing_list());
            }
            OperatorIntent::AddLocation { name } => self.add_location(&name)?,
            OperatorIntent::RemoveLocation { name } => {
                self.locations.remove(&name);
                self.view.render_editor(&self.locations.editing_list());
            }
            OperatorIntent::CommitLocations => self.commit_locations()?,
            OperatorIntent::SetSound { enabled } => self.goals.set_sound_enabled(enabled),
            OperatorIntent::ShowLocations { enabled } => {
                self.show_locations = enabled;
                self.view.redraw(Layer::Locations);
            }
            OperatorIntent::PointerMove { x, y } => self.on_pointer_move(Point2D::new(x, y)),
            OperatorIntent::PointerClick { x, y } => {
                self.pick_destination(Point2D::new(x, y));
            }
            OperatorIntent::PointerDoubleClick { x, y } => {
                if self.pick_destination(Point2D::new(x, y)) {
                    self.go()?;
                }
            }
            OperatorIntent::CanvasResized { width, height } => {
                self.map.resize_canvas(Size::new(width, height));
                self.redraw_all();
            }
            OperatorIntent::MapImageLoaded { width, height } => {
                info!("Map image loaded");
                self.map.set_image_size(Size::new(width, height));
                self.redraw_all();
            }
        }
        Ok(())
    }

    fn select_destination(&mut self, name: &str) -> Result<(), ConsoleError> {
        if self.locations.saved(name).is_none() {
            return Err(ConsoleError::UnknownDestination(name.to_string()));
        }
        self.selected = Some(name.to_string());
        self.view.render_selector(&self.locations.saved_list(), self.selected.as_deref());
        Ok(())
    }

    /// Navigate to the selected destination
    fn go(&mut self) -> Result<(), ConsoleError> {
        let destination = match self.selected.as_deref().and_then(|name| self.locations.saved(name)) {
            Some(destination) => destination.clone(),
            None => {
                self.notify("Cannot travel: no destination selected", Severity::Warning);
                return Err(ConsoleError::NoDestinationSelected);
            }
        };

        let block = self.status.block_status();
        let docked = self.status.is_docked();
        match self.goals.request_goal(&mut self.bridge, destination, block, docked) {
            Ok(GoalRequest::Issued(goal)) => self.goal_started(&goal.target),
            Ok(GoalRequest::UndockRequested(id)) => {
                self.pending.insert(id, PendingCall::Undock);
            }
            Err(err @ NavigationError::Blocked(_)) => {
                self.notify(err.to_string(), Severity::Danger);
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ConsoleError> {
        match self.goals.request_stop(&mut self.bridge)? {
            StopOutcome::Cancelled(_) | StopOutcome::UndockAbandoned(Some(_)) => self.goal_cleared(),
            StopOutcome::UndockAbandoned(None) | StopOutcome::NothingActive => {}
        }
        Ok(())
    }

    fn goal_started(&mut self, target: &Destination) {
        self.view.set_navigation_active(true);
        self.view.set_goal_target(Some(target));
        self.view.redraw(Layer::Locations);
    }

    fn goal_cleared(&mut self) {
        self.view.set_navigation_active(false);
        self.view.set_goal_target(None);
        self.view.redraw(Layer::Locations);
    }

    fn add_location(&mut self, name: &str) -> Result<(), ConsoleError> {
        let pose = match self.robot.world_location() {
            Some(pose) => pose,
            None => {
                self.notify("Robot position not known yet", Severity::Warning);
                return Err(ConsoleError::RobotPoseUnknown);
            }
        };
        if let Err(err) = self.locations.add(name, pose) {
            self.view.set_editor_error(Some(&err));
            return Err(err.into());
        }
        self.view.set_editor_error(None);
        self.view.render_editor(&self.locations.editing_list());
        Ok(())
    }

    /// Promote the editor, write both parameters and ask for each to be
    /// persisted. The two persist calls are independent; a failure is only
    /// reported, the in-memory commit stands.
    fn commit_locations(&mut self) -> Result<(), ConsoleError> {
        let snapshot = self.locations.commit();
        let rosapi = self.config.ros.rosapi.clone();
        let params = self.config.ros.params.clone();

        let id = rosapi.set_param(&mut self.bridge, &params.next_id, &Value::from(snapshot.next_id))?;
        self.pending.insert(id, PendingCall::SetParam(params.next_id.clone()));
        let locations = serde_json::to_value(&snapshot.locations)?;
        let id = rosapi.set_param(&mut self.bridge, &params.locations, &locations)?;
        self.pending.insert(id, PendingCall::SetParam(params.locations.clone()));

        for param in [&params.next_id, &params.locations] {
            let id = self
                .bridge
                .call_service(&self.config.ros.services.save_param, serde_json::json!({ "param": param }))?;
            self.pending.insert(id, PendingCall::Persist(param.clone()));
        }

        self.locations_changed();
        Ok(())
    }

    /// Saved set changed: refresh the selector and the overlay
    fn locations_changed(&mut self) {
        if let Some(name) = &self.selected {
            if self.locations.saved(name).is_none() {
                self.selected = None;
            }
        }
        self.view.render_selector(&self.locations.saved_list(), self.selected.as_deref());
        self.view.redraw(Layer::Locations);
    }

    fn on_pointer_move(&mut self, image_coord: Point2D) {
        if !self.show_locations {
            return;
        }
        let frame = match self.map.frame() {
            Some(frame) => frame,
            None => return,
        };
        let saved = self.locations.saved_list();
        match find_closest_location(&frame, &saved, image_coord, self.config.ui.pick_radius) {
            Some(location) => self.view.set_tooltip(Some((location.name.as_str(), image_coord))),
            None => self.view.set_tooltip(None),
        }
    }

    /// Select the destination under the pointer; true if one was found
    fn pick_destination(&mut self, image_coord: Point2D) -> bool {
        if !self.show_locations {
            return false;
        }
        let frame = match self.map.frame() {
            Some(frame) => frame,
            None => return false,
        };
        let saved = self.locations.saved_list();
        let name = match find_closest_location(&frame, &saved, image_coord, self.config.ui.pick_radius) {
            Some(location) => location.name.clone(),
            None => return false,
        };
        self.selected = Some(name);
        self.view.render_selector(&self.locations.saved_list(), self.selected.as_deref());
        true
    }

    fn refresh_status(&mut self) {
        self.view.set_system_status(&self.status.summary());
        self.view.set_controls_blocked(&self.status.block_status());
    }

    fn redraw_overlays(&mut self) {
        for layer in [Layer::Robot, Layer::People, Layer::Locations] {
            self.view.redraw(layer);
        }
    }

    fn redraw_all(&mut self) {
        for layer in Layer::ALL {
            self.view.redraw(layer);
        }
    }

    /// Draw one overlay layer. The map layer itself (the image) belongs to the
    /// surface; overlays stay empty until the map is ready.
    pub fn render(&self, layer: Layer, canvas: &mut dyn Canvas) {
        canvas.clear();
        let frame = match self.map.frame() {
            Some(frame) => frame,
            None => return,
        };
        match layer {
            Layer::Map => {}
            Layer::Robot => {
                if let Some(pose) = self.robot.world_location() {
                    draw_world_poses(canvas, &frame, [&pose], Style::Robot);
                }
            }
            Layer::People => draw_world_poses(canvas, &frame, self.people.people(), Style::Person),
            Layer::Locations => {
                if !self.show_locations {
                    return;
                }
                let poses: Vec<_> = self.locations.saved_list().iter().map(|d| d.pose()).collect();
                draw_world_poses(canvas, &frame, &poses, Style::Location);
                if let Some(target) = self.goals.current_target() {
                    draw_world_poses(canvas, &frame, [&target.pose()], Style::Target);
                }
            }
        }
    }
}
