//! Dependency graph of timing events.
//!
//! Built fresh for every optimization request and dropped afterwards. Events and
//! edges live in flat vectors and refer to each other by index.

use crate::interner::AgentIdx;
use crate::models::Drill;

use super::cost::CostModel;

/// Index of an event in [`TimingGraph::events`].
pub type EventId = u32;

/// What point in time an event marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingEvent {
    /// Synthetic source preceding every agent; fixed at time 0.
    Origin,
    /// Agent is free to start its first action.
    AgentReady { agent: AgentIdx },
    /// Agent has finished the action at `action`.
    ActionDone { agent: AgentIdx, action: u32 },
}

/// Why an edge exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// Origin to an agent's ready event.
    Release,
    /// Execution of one action.
    Chain { agent: AgentIdx, action: u32 },
    /// Pass completion gating a receiver's completion.
    Sync,
}

/// Directed edge with a minimum duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingEdge {
    pub from: EventId,
    pub to: EventId,
    pub weight: f64,
    pub kind: EdgeKind,
}

/// DAG of timing events for one drill.
#[derive(Clone, Debug, Default)]
pub struct TimingGraph {
    pub events: Vec<TimingEvent>,
    pub edges: Vec<TimingEdge>,
    /// Outgoing edge indices, indexed by event.
    pub outgoing: Vec<Vec<usize>>,
    /// Incoming edge indices, indexed by event.
    pub incoming: Vec<Vec<usize>>,
    /// Ready event of each agent.
    pub agent_ready: Vec<EventId>,
    /// Completion event of each action, indexed `[agent][action]`.
    pub action_done: Vec<Vec<EventId>>,
    /// Chain edge of each action, indexed `[agent][action]`.
    pub chain_edges: Vec<Vec<usize>>,
    origin: EventId,
}

impl TimingGraph {
    /// Build the raw (unsynchronized) graph for a drill.
    ///
    /// Each agent contributes a ready event followed by one completion event per
    /// action, linked by chain edges weighted with the action's minimum duration.
    /// The origin is added last and released into every agent's ready event.
    pub fn build(drill: &Drill, cost: &CostModel) -> Self {
        let n_events = drill.agents.len() + drill.action_count() + 1;
        let mut graph = TimingGraph {
            events: Vec::with_capacity(n_events),
            edges: Vec::with_capacity(n_events),
            outgoing: Vec::with_capacity(n_events),
            incoming: Vec::with_capacity(n_events),
            agent_ready: Vec::with_capacity(drill.agents.len()),
            action_done: Vec::with_capacity(drill.agents.len()),
            chain_edges: Vec::with_capacity(drill.agents.len()),
            origin: 0,
        };

        for (a, agent) in drill.agents.iter().enumerate() {
            let agent_idx = a as AgentIdx;
            let ready = graph.add_event(TimingEvent::AgentReady { agent: agent_idx });
            graph.agent_ready.push(ready);

            let mut done = Vec::with_capacity(agent.actions.len());
            let mut chain = Vec::with_capacity(agent.actions.len());
            let mut prev = ready;
            for (i, action) in agent.actions.iter().enumerate() {
                let action_idx = i as u32;
                let end = graph.add_event(TimingEvent::ActionDone {
                    agent: agent_idx,
                    action: action_idx,
                });
                let edge = graph.add_edge(
                    prev,
                    end,
                    cost.min_duration(action),
                    EdgeKind::Chain {
                        agent: agent_idx,
                        action: action_idx,
                    },
                );
                done.push(end);
                chain.push(edge);
                prev = end;
            }
            graph.action_done.push(done);
            graph.chain_edges.push(chain);
        }

        let origin = graph.add_event(TimingEvent::Origin);
        graph.origin = origin;
        for ready in graph.agent_ready.clone() {
            graph.add_edge(origin, ready, 0.0, EdgeKind::Release);
        }

        graph
    }

    pub fn origin(&self) -> EventId {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn add_event(&mut self, event: TimingEvent) -> EventId {
        let id = self.events.len() as EventId;
        self.events.push(event);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Add an edge and return its index.
    pub fn add_edge(&mut self, from: EventId, to: EventId, weight: f64, kind: EdgeKind) -> usize {
        let idx = self.edges.len();
        self.edges.push(TimingEdge {
            from,
            to,
            weight,
            kind,
        });
        self.outgoing[from as usize].push(idx);
        self.incoming[to as usize].push(idx);
        idx
    }

    /// Completion event of a given action, if it exists.
    pub fn done_event(&self, agent: AgentIdx, action: u32) -> Option<EventId> {
        self.action_done
            .get(agent as usize)
            .and_then(|chain| chain.get(action as usize))
            .copied()
    }

    /// Chain edge of a given action, if it exists.
    pub fn chain_edge(&self, agent: AgentIdx, action: u32) -> Option<&TimingEdge> {
        self.chain_edges
            .get(agent as usize)
            .and_then(|chain| chain.get(action as usize))
            .map(|&idx| &self.edges[idx])
    }

    /// Iterate over all synchronization edges.
    pub fn sync_edges(&self) -> impl Iterator<Item = &TimingEdge> {
        self.edges.iter().filter(|e| e.kind == EdgeKind::Sync)
    }
}
