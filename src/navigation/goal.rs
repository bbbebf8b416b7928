// src/navigation/goal.rs
// Owns the single outstanding navigation goal: undock first when docked,
// supersede the previous goal on a new request, and discard results that belong
// to goals which are no longer current.
//
// Limitation: the action result is not inspected for success, so the finish cue
// and notice are the same whether the goal was reached or aborted.

use log::{debug, info, warn};

use super::NavigationError;
use crate::config::NavigationConfig;
use crate::core::locations::Destination;
use crate::core::status::BlockStatus;
use crate::ros_interface::{
    goal_id, move_base_goal, uint16, Bridge, MoveBaseActionResult, Publisher, RequestId,
    RosError, TriggerResponse, GOAL_ID_TYPE, MODE_SOUND_DOUBLE_BEEP, MODE_SOUND_LONG_BEEP,
    MOVE_BASE_GOAL_TYPE, UINT16_TYPE,
};

/// A goal that has been sent to the planner
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGoal {
    /// Sequence number assigned at issue time
    pub seq: u64,
    /// Action goal id on the wire
    pub goal_id: String,
    /// Where the robot is headed
    pub target: Destination,
}

/// Lifecycle state
#[derive(Debug, Clone, PartialEq)]
pub enum GoalState {
    /// No goal outstanding
    Idle,
    /// Waiting for the charging station to release the robot. A goal that was
    /// active when the request came in stays outstanding until it is replaced.
    PendingUndock {
        /// Undock service call
        request: RequestId,
        /// Goal to send once undocked
        destination: Destination,
        /// Goal still outstanding on the planner
        previous: Option<ActiveGoal>,
    },
    /// Goal sent and not yet finished
    Active(ActiveGoal),
}

/// Accepted goal request
#[derive(Debug, Clone, PartialEq)]
pub enum GoalRequest {
    /// Goal sent right away
    Issued(ActiveGoal),
    /// Undock requested, goal follows on success
    UndockRequested(RequestId),
}

/// What happened to an undock reply
#[derive(Debug, Clone, PartialEq)]
pub enum UndockOutcome {
    /// Reply to a request that is no longer pending
    Ignored,
    /// Robot released, goal sent
    Issued(ActiveGoal),
}

/// How a result event was handled
#[derive(Debug, Clone, PartialEq)]
pub enum ResultDisposition {
    /// Result for the current goal; the lifecycle is back to idle
    Finished(ActiveGoal),
    /// Result for a superseded or cancelled goal; discarded
    Stale {
        /// Sequence number of the discarded goal
        seq: u64,
    },
    /// Goal id not issued by this console
    Foreign,
}

/// Effect of a stop request
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// Active goal cancelled
    Cancelled(ActiveGoal),
    /// Pending undock dropped, plus any goal it would have replaced
    UndockAbandoned(Option<ActiveGoal>),
    /// Nothing to stop
    NothingActive,
}

/// Navigation goal lifecycle
#[derive(Debug)]
pub struct GoalLifecycle {
    goal_topic: Publisher,
    cancel_topic: Publisher,
    mode_topic: Publisher,
    goal_id_prefix: String,
    goal_frame: String,
    undock_service: String,
    sound_enabled: bool,
    goal_counter: u64,
    state: GoalState,
}

impl GoalLifecycle {
    /// Create the lifecycle for the action server in `config`
    pub fn new(config: &NavigationConfig, client_id: &str, mode_topic: &str, undock_service: &str) -> Self {
        GoalLifecycle {
            goal_topic: Publisher::new(&format!("{}/goal", config.action_server), MOVE_BASE_GOAL_TYPE),
            cancel_topic: Publisher::new(&format!("{}/cancel", config.action_server), GOAL_ID_TYPE),
            mode_topic: Publisher::new(mode_topic, UINT16_TYPE),
            goal_id_prefix: format!("{}_goal_", client_id),
            goal_frame: config.goal_frame.clone(),
            undock_service: undock_service.to_string(),
            sound_enabled: config.sound_enabled,
            goal_counter: 0,
            state: GoalState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> &GoalState {
        &self.state
    }

    /// Sequence number of the most recently issued goal (0 before the first)
    pub fn goal_counter(&self) -> u64 {
        self.goal_counter
    }

    /// Whether audible cues are played
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Turn audible cues on or off
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    /// Goal currently outstanding on the planner, if any
    pub fn active_goal(&self) -> Option<&ActiveGoal> {
        match &self.state {
            GoalState::Active(goal) => Some(goal),
            GoalState::PendingUndock { previous, .. } => previous.as_ref(),
            GoalState::Idle => None,
        }
    }

    /// Target pose shown to observers, `None` when no goal is outstanding
    pub fn current_target(&self) -> Option<&Destination> {
        self.active_goal().map(|goal| &goal.target)
    }

    /// Sequence number encoded in a goal id issued by this console
    pub fn parse_goal_seq(&self, goal_id: &str) -> Option<u64> {
        goal_id.strip_prefix(&self.goal_id_prefix)?.parse().ok()
    }

    /// Request navigation to `destination`
    pub fn request_goal(
        &mut self,
        bridge: &mut dyn Bridge,
        destination: Destination,
        block: BlockStatus,
        docked: bool,
    ) -> Result<GoalRequest, NavigationError> {
        if let Some(reason) = block.reason {
            warn!("Cannot travel to {}: {}", destination.name, reason);
            return Err(NavigationError::Blocked(reason));
        }

        if docked {
            let request = bridge.call_service(&self.undock_service, serde_json::json!({}))?;
            info!("Docked, requesting undock before travelling to {}", destination.name);
            let previous = match std::mem::replace(&mut self.state, GoalState::Idle) {
                GoalState::Active(goal) => Some(goal),
                GoalState::PendingUndock { previous, .. } => previous,
                GoalState::Idle => None,
            };
            self.state = GoalState::PendingUndock {
                request,
                destination,
                previous,
            };
            return Ok(GoalRequest::UndockRequested(request));
        }

        let previous = self.take_active();
        let goal = self.issue(bridge, destination, previous)?;
        Ok(GoalRequest::Issued(goal))
    }

    /// Handle the reply to an undock request
    pub fn on_undock_response(
        &mut self,
        bridge: &mut dyn Bridge,
        request: RequestId,
        response: &TriggerResponse,
    ) -> Result<UndockOutcome, NavigationError> {
        let pending = matches!(&self.state, GoalState::PendingUndock { request: r, .. } if *r == request);
        if !pending {
            debug!("Ignoring reply to stale undock request {}", request);
            return Ok(UndockOutcome::Ignored);
        }

        let (destination, previous) = match std::mem::replace(&mut self.state, GoalState::Idle) {
            GoalState::PendingUndock { destination, previous, .. } => (destination, previous),
            other => {
                self.state = other;
                return Ok(UndockOutcome::Ignored);
            }
        };

        if !response.success {
            warn!("Failed to exit charging station: {}", response.message);
            if let Some(goal) = previous {
                self.state = GoalState::Active(goal);
            }
            return Err(NavigationError::UndockFailed(response.message.clone()));
        }

        let goal = self.issue(bridge, destination, previous)?;
        Ok(UndockOutcome::Issued(goal))
    }

    /// Handle a result event from the action server
    pub fn on_result(
        &mut self,
        bridge: &mut dyn Bridge,
        result: &MoveBaseActionResult,
    ) -> Result<ResultDisposition, NavigationError> {
        let seq = match self.parse_goal_seq(&result.status.goal_id.id) {
            Some(seq) => seq,
            None => return Ok(ResultDisposition::Foreign),
        };

        let current = self.active_goal().map(|goal| goal.seq);
        if current != Some(seq) {
            debug!("Discarding result for stale goal {} (current {:?})", seq, current);
            return Ok(ResultDisposition::Stale { seq });
        }

        debug!("Goal {} ended with status {} {}", seq, result.status.status, result.status.text);
        let finished = match self.take_active() {
            Some(goal) => goal,
            None => return Ok(ResultDisposition::Stale { seq }),
        };
        info!("Navigation to {} ended", finished.target.name);
        self.play_sound(bridge, MODE_SOUND_DOUBLE_BEEP);
        Ok(ResultDisposition::Finished(finished))
    }

    /// Cancel whatever is outstanding without waiting for acknowledgement
    pub fn request_stop(&mut self, bridge: &mut dyn Bridge) -> Result<StopOutcome, NavigationError> {
        info!("Stop command issued");
        match std::mem::replace(&mut self.state, GoalState::Idle) {
            GoalState::Active(goal) => {
                self.cancel(bridge, &goal)?;
                Ok(StopOutcome::Cancelled(goal))
            }
            GoalState::PendingUndock { previous, .. } => {
                if let Some(goal) = &previous {
                    self.cancel(bridge, goal)?;
                }
                Ok(StopOutcome::UndockAbandoned(previous))
            }
            GoalState::Idle => Ok(StopOutcome::NothingActive),
        }
    }

    /// Remove the outstanding goal from the state, leaving any pending undock
    fn take_active(&mut self) -> Option<ActiveGoal> {
        if let GoalState::PendingUndock { previous, .. } = &mut self.state {
            return previous.take();
        }
        match std::mem::replace(&mut self.state, GoalState::Idle) {
            GoalState::Active(goal) => Some(goal),
            other => {
                self.state = other;
                None
            }
        }
    }

    fn cancel(&self, bridge: &mut dyn Bridge, goal: &ActiveGoal) -> Result<(), RosError> {
        info!("Cancelling goal {} ({})", goal.seq, goal.target.name);
        self.cancel_topic.publish(bridge, goal_id(&goal.goal_id))
    }

    /// Cancel `previous`, then send a new goal and make it current
    fn issue(
        &mut self,
        bridge: &mut dyn Bridge,
        destination: Destination,
        previous: Option<ActiveGoal>,
    ) -> Result<ActiveGoal, RosError> {
        if let Some(goal) = &previous {
            self.cancel(bridge, goal)?;
        }

        self.goal_counter += 1;
        let goal = ActiveGoal {
            seq: self.goal_counter,
            goal_id: format!("{}{}", self.goal_id_prefix, self.goal_counter),
            target: destination,
        };
        info!("Go to {} as goal {}", goal.target.name, goal.seq);
        self.goal_topic.publish(
            bridge,
            move_base_goal(&goal.goal_id, &self.goal_frame, &goal.target.pose()),
        )?;
        self.state = GoalState::Active(goal.clone());

        self.play_sound(bridge, MODE_SOUND_LONG_BEEP);
        Ok(goal)
    }

    /// Audible cue; the goal state has already changed, so a failure is only logged
    fn play_sound(&self, bridge: &mut dyn Bridge, sound: u16) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = self.mode_topic.publish(bridge, uint16(sound)) {
            warn!("Failed to play sound {}: {}", sound, e);
        }
    }
}
