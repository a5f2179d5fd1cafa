//! Slack allocation: turning event times into per-action speed and wait.
//!
//! Actions off the critical path are stretched to fill their window, first by
//! slowing down and, once the agent would drop below its minimum speed, by
//! pausing before the action starts.

use crate::interner::{AgentIdx, AgentInterner};
use crate::{log_changes, log_checks};
use crate::models::{ActionKind, Drill, Pace};

use super::cost::CostModel;
use super::graph::TimingGraph;
use super::types::ActionTiming;

/// Speed and wait chosen for one action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    pub speed: Option<f64>,
    pub wait_before: f64,
}

/// Choose speed and wait for an action given its time window.
///
/// `available` is the time between its start and end events. When the slack
/// (`available - min_duration`) exceeds `slack_threshold` the action is slowed
/// to `floor(length / available)`; agents are never slowed below
/// `min_agent_speed`, so the remaining time becomes `wait_before`. Ball actions
/// have no speed floor. Otherwise agents move at top speed and actions whose
/// duration is not speed-governed get no speed at all.
///
/// A zero-length pass or shot with slack gets `Some(0.0)`; consumers must not
/// derive a travel time from that speed.
pub fn assign(
    kind: ActionKind,
    length: f64,
    available: f64,
    min_duration: f64,
    cost: &CostModel,
    slack_threshold: f64,
) -> Assignment {
    let slack = available - min_duration;

    if slack > slack_threshold {
        let desired = length / available;
        if kind.pace() == Pace::Ball || desired >= cost.min_agent_speed {
            return Assignment {
                speed: Some(desired.floor()),
                wait_before: 0.0,
            };
        }
        let travel_time = length / cost.min_agent_speed;
        return Assignment {
            speed: Some(cost.min_agent_speed),
            wait_before: available - travel_time,
        };
    }

    let speed = match kind.pace() {
        Pace::Agent => Some(cost.max_agent_speed),
        Pace::Ball | Pace::Fixed => None,
    };
    Assignment {
        speed,
        wait_before: 0.0,
    }
}

/// Assignments for a whole drill, computed before anything is written.
#[derive(Clone, Debug, Default)]
pub struct Allocation {
    /// Indexed `[agent][action]`.
    pub assignments: Vec<Vec<Assignment>>,
    pub timings: Vec<ActionTiming>,
}

impl Allocation {
    /// Write every assignment into the drill's actions.
    pub fn apply(&self, drill: &mut Drill) {
        for (agent, chain) in drill.agents.iter_mut().zip(&self.assignments) {
            for (action, assignment) in agent.actions.iter_mut().zip(chain) {
                action.speed = assignment.speed;
                action.wait_before = assignment.wait_before;
            }
        }
    }
}

/// Derive an assignment for every chain edge of the graph.
pub fn allocate(
    graph: &TimingGraph,
    times: &[f64],
    drill: &Drill,
    agents: &AgentInterner,
    cost: &CostModel,
    slack_threshold: f64,
    verbosity: u8,
) -> Allocation {
    let mut allocation = Allocation {
        assignments: Vec::with_capacity(drill.agents.len()),
        timings: Vec::with_capacity(drill.action_count()),
    };

    for (a, agent) in drill.agents.iter().enumerate() {
        let agent_id = agents.resolve(a as AgentIdx).unwrap_or_default();
        let mut chain = Vec::with_capacity(agent.actions.len());
        for (i, action) in agent.actions.iter().enumerate() {
            let Some(edge) = graph.chain_edge(a as u32, i as u32) else {
                continue;
            };
            let start = times[edge.from as usize];
            let finish = times[edge.to as usize];
            let available = finish - start;
            let min_duration = edge.weight;
            let slack = available - min_duration;
            let length = cost.length(&action.path);
            let critical = slack <= slack_threshold;

            log_checks!(
                verbosity,
                "[allocate] {}#{} available={:.3} min={:.3} slack={:.3} {}",
                agent_id,
                i,
                available,
                min_duration,
                slack,
                if critical { "critical" } else { "stretch" }
            );
            let assignment = assign(
                action.kind,
                length,
                available,
                min_duration,
                cost,
                slack_threshold,
            );
            log_changes!(
                verbosity,
                "[allocate] {}#{} {} speed={:?} wait={:.3}",
                agent_id,
                i,
                action.kind,
                assignment.speed,
                assignment.wait_before
            );

            chain.push(assignment);
            allocation.timings.push(ActionTiming {
                agent_id: agent_id.to_string(),
                action_index: i,
                kind: action.kind,
                length,
                min_duration,
                start,
                finish,
                available,
                slack,
                critical,
            });
        }
        allocation.assignments.push(chain);
    }

    allocation
}
