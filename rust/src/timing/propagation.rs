//! Earliest-time propagation over the timing graph.

use std::collections::VecDeque;

use crate::config::PropagationMode;
use crate::log_debug;

use super::graph::{EventId, TimingGraph};

/// Error types for propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// Mutually synchronized passes formed a cycle in the event graph.
    CircularDependency,
}

impl std::fmt::Display for PropagationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropagationError::CircularDependency => {
                write!(f, "Circular dependency detected in timing graph")
            }
        }
    }
}

impl std::error::Error for PropagationError {}

/// Order events so that every edge points forward (Kahn's algorithm).
pub fn topological_order(graph: &TimingGraph) -> Result<Vec<EventId>, PropagationError> {
    let mut in_degree: Vec<usize> = graph.incoming.iter().map(|edges| edges.len()).collect();

    let mut queue: VecDeque<EventId> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &degree)| degree == 0)
        .map(|(id, _)| id as EventId)
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(event) = queue.pop_front() {
        order.push(event);
        for &edge_idx in &graph.outgoing[event as usize] {
            let to = graph.edges[edge_idx].to;
            let degree = &mut in_degree[to as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(to);
            }
        }
    }

    if order.len() != graph.len() {
        return Err(PropagationError::CircularDependency);
    }
    Ok(order)
}

/// Compute the earliest time of every event, indexed by [`EventId`].
///
/// The origin is fixed at 0. Other events combine `pred + weight` over their
/// incoming edges: the maximum in [`PropagationMode::CriticalPath`], the minimum in
/// [`PropagationMode::ShortestPath`]. Events unreachable from the origin stay at
/// 0 in critical-path mode and infinity in shortest-path mode.
pub fn propagate(
    graph: &TimingGraph,
    mode: PropagationMode,
    verbosity: u8,
) -> Result<Vec<f64>, PropagationError> {
    let order = topological_order(graph)?;

    let unset = match mode {
        PropagationMode::CriticalPath => 0.0,
        PropagationMode::ShortestPath => f64::INFINITY,
    };
    let mut times = vec![unset; graph.len()];
    if graph.is_empty() {
        return Ok(times);
    }
    times[graph.origin() as usize] = 0.0;

    for event in order {
        let idx = event as usize;
        if event == graph.origin() {
            continue;
        }

        let arrivals = graph.incoming[idx].iter().map(|&e| {
            let edge = &graph.edges[e];
            times[edge.from as usize] + edge.weight
        });
        let time = match mode {
            PropagationMode::CriticalPath => arrivals.fold(unset, f64::max),
            PropagationMode::ShortestPath => arrivals.fold(unset, f64::min),
        };
        times[idx] = time;

        log_debug!(verbosity, "[propagate] {:?} at {:.3}", graph.events[idx], time);
    }

    Ok(times)
}
