//! Report types for drill timing.

use serde::Serialize;

use crate::models::ActionKind;

/// Computed timing of one action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionTiming {
    pub agent_id: String,
    pub action_index: usize,
    pub kind: ActionKind,
    /// Path length in drawing units.
    pub length: f64,
    /// Physical minimum duration.
    pub min_duration: f64,
    /// Earliest time the action may start (its start event).
    pub start: f64,
    /// Earliest time the action is complete (its end event).
    pub finish: f64,
    /// finish - start
    pub available: f64,
    /// available - min_duration; negative in shortest-path mode at merge events.
    pub slack: f64,
    /// Whether the slack was too small to stretch the action.
    pub critical: bool,
}

/// A pass linked to a receiving action.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SyncLink {
    pub passer_id: String,
    pub pass_index: usize,
    pub receiver_id: String,
    pub receive_index: usize,
    /// Distance between the pass arrival and the receiver arrival.
    pub distance: f64,
}

/// Everything the optimizer learned about a drill.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScheduleReport {
    /// Per-action timings in agent order, then chain order.
    pub timings: Vec<ActionTiming>,
    pub sync_links: Vec<SyncLink>,
    /// Latest event time in the drill.
    pub makespan: f64,
}

impl ScheduleReport {
    /// Timing of a given action, if present.
    pub fn timing(&self, agent_id: &str, action_index: usize) -> Option<&ActionTiming> {
        self.timings
            .iter()
            .find(|t| t.agent_id == agent_id && t.action_index == action_index)
    }

    pub fn critical_actions(&self) -> impl Iterator<Item = &ActionTiming> {
        self.timings.iter().filter(|t| t.critical)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
