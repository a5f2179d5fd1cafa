//! Synchronization of passes with receiving actions.
//!
//! A pass is linked to another agent's run or dribble when both end within the
//! sync radius of each other. The receiver cannot be complete before the ball
//! arrives, so a zero-weight edge runs from the pass completion to the receiver
//! completion.

use crate::config::SyncMatching;
use crate::interner::{AgentIdx, AgentInterner};
use crate::log_checks;
use crate::models::{ActionKind, Drill, Point};

use super::graph::{EdgeKind, TimingGraph};
use super::types::SyncLink;

/// A run or dribble that could receive a pass.
#[derive(Clone, Copy, Debug)]
struct Receiver {
    agent: AgentIdx,
    action: u32,
    arrival: Point,
}

fn collect_receivers(drill: &Drill) -> Vec<Receiver> {
    let mut receivers = Vec::new();
    for (a, agent) in drill.agents.iter().enumerate() {
        for (i, action) in agent.actions.iter().enumerate() {
            if action.kind.can_receive() {
                receivers.push(Receiver {
                    agent: a as AgentIdx,
                    action: i as u32,
                    arrival: action.path.arrival(),
                });
            }
        }
    }
    receivers
}

/// Add synchronization edges for every pass in the drill.
///
/// A receiver matches when its arrival point is strictly closer than `radius` to
/// the pass arrival. Agents never synchronize with themselves. With
/// [`SyncMatching::All`] every match is linked; with [`SyncMatching::Nearest`]
/// only the closest one (the earliest in drill order on ties).
pub fn link_passes(
    graph: &mut TimingGraph,
    drill: &Drill,
    agents: &AgentInterner,
    radius: f64,
    matching: SyncMatching,
    verbosity: u8,
) -> Vec<SyncLink> {
    let receivers = collect_receivers(drill);
    let mut links = Vec::new();

    for (a, agent) in drill.agents.iter().enumerate() {
        let passer = a as AgentIdx;
        let passer_id = agents.resolve(passer).unwrap_or_default();
        for (i, action) in agent.actions.iter().enumerate() {
            if action.kind != ActionKind::Pass {
                continue;
            }
            let target = action.path.arrival();

            let mut matches: Vec<(Receiver, f64)> = receivers
                .iter()
                .filter(|r| r.agent != passer)
                .map(|r| (*r, r.arrival.distance(&target)))
                .filter(|(_, d)| *d < radius)
                .collect();

            if matching == SyncMatching::Nearest {
                let nearest = matches.iter().copied().fold(None, |best, m| match best {
                    Some((_, d)) if d <= m.1 => best,
                    _ => Some(m),
                });
                matches = nearest.into_iter().collect();
            }

            if matches.is_empty() {
                log_checks!(
                    verbosity,
                    "[sync] {}#{} pass has no receiver within {}",
                    passer_id,
                    i,
                    radius
                );
                continue;
            }

            for (receiver, distance) in matches {
                let (Some(from), Some(to)) = (
                    graph.done_event(passer, i as u32),
                    graph.done_event(receiver.agent, receiver.action),
                ) else {
                    continue;
                };
                graph.add_edge(from, to, 0.0, EdgeKind::Sync);

                let receiver_id = agents.resolve(receiver.agent).unwrap_or_default();
                log_checks!(
                    verbosity,
                    "[sync] {}#{} pass -> {}#{} (distance {:.2})",
                    passer_id,
                    i,
                    receiver_id,
                    receiver.action,
                    distance
                );
                links.push(SyncLink {
                    passer_id: passer_id.to_string(),
                    pass_index: i,
                    receiver_id: receiver_id.to_string(),
                    receive_index: receiver.action as usize,
                    distance,
                });
            }
        }
    }

    links
}
