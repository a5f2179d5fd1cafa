//! Drill optimizer: the single entry point tying the timing components together.

use thiserror::Error;

use crate::config::{OptimizerConfig, PropagationMode, SyncMatching};
use crate::interner::AgentInterner;
use crate::models::Drill;
use crate::{log_changes, log_checks};

use super::allocation::allocate;
use super::cost::CostModel;
use super::graph::TimingGraph;
use super::propagation::{propagate, PropagationError};
use super::sync::link_passes;
use super::types::ScheduleReport;

/// Errors that can occur while optimizing a drill.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("Duplicate agent id: {0}")]
    DuplicateAgent(String),
    #[error("Non-finite geometry in action {action} of agent {agent}")]
    InvalidGeometry { agent: String, action: usize },
    #[error("Circular dependency detected")]
    CircularDependency,
}

impl From<PropagationError> for OptimizeError {
    fn from(err: PropagationError) -> Self {
        match err {
            PropagationError::CircularDependency => OptimizeError::CircularDependency,
        }
    }
}

/// Assigns speeds and waits to every action of a drill.
///
/// Holds only configuration; each call builds its own graph, so one optimizer
/// can serve any number of drills.
#[derive(Clone, Debug)]
pub struct DrillOptimizer {
    cost: CostModel,
    propagation: PropagationMode,
    matching: SyncMatching,
    sync_radius: f64,
    slack_threshold: f64,
    verbosity: u8,
}

impl DrillOptimizer {
    /// Create an optimizer, rejecting unusable configurations.
    pub fn new(config: &OptimizerConfig) -> Result<Self, OptimizeError> {
        config.validate().map_err(OptimizeError::InvalidConfig)?;
        let propagation = PropagationMode::parse(&config.propagation)
            .ok_or_else(|| OptimizeError::UnknownStrategy(config.propagation.clone()))?;
        let matching = SyncMatching::parse(&config.sync_matching)
            .ok_or_else(|| OptimizeError::UnknownStrategy(config.sync_matching.clone()))?;

        Ok(Self {
            cost: CostModel::from(config),
            propagation,
            matching,
            sync_radius: config.sync_radius,
            slack_threshold: config.slack_threshold,
            verbosity: config.verbosity,
        })
    }

    fn validate(&self, drill: &Drill) -> Result<AgentInterner, OptimizeError> {
        let agents = AgentInterner::for_drill(drill).map_err(OptimizeError::DuplicateAgent)?;
        for agent in &drill.agents {
            if let Some(action) = agent.actions.iter().position(|a| !a.path.is_finite()) {
                return Err(OptimizeError::InvalidGeometry {
                    agent: agent.id.clone(),
                    action,
                });
            }
        }
        Ok(agents)
    }

    /// Annotate `drill` in place and report the computed timings.
    ///
    /// On error the drill is left untouched.
    pub fn run(&self, drill: &mut Drill) -> Result<ScheduleReport, OptimizeError> {
        let agents = self.validate(drill)?;
        log_checks!(
            self.verbosity,
            "[optimize] {} agents, {} actions",
            agents.len(),
            drill.action_count()
        );

        let mut graph = TimingGraph::build(drill, &self.cost);
        let sync_links = link_passes(
            &mut graph,
            drill,
            &agents,
            self.sync_radius,
            self.matching,
            self.verbosity,
        );
        let times = propagate(&graph, self.propagation, self.verbosity)?;

        let allocation = allocate(
            &graph,
            &times,
            drill,
            &agents,
            &self.cost,
            self.slack_threshold,
            self.verbosity,
        );
        let makespan = times
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold(0.0, f64::max);

        allocation.apply(drill);
        log_changes!(
            self.verbosity,
            "[optimize] done: makespan={:.3}, {} sync links",
            makespan,
            sync_links.len()
        );

        Ok(ScheduleReport {
            timings: allocation.timings,
            sync_links,
            makespan,
        })
    }

    /// Return an annotated copy of `drill`.
    pub fn optimize(&self, drill: &Drill) -> Result<Drill, OptimizeError> {
        let mut annotated = drill.clone();
        self.run(&mut annotated)?;
        Ok(annotated)
    }
}

/// Annotate a drill with per-action speed and wait using `config`.
pub fn optimize(drill: &Drill, config: &OptimizerConfig) -> Result<Drill, OptimizeError> {
    DrillOptimizer::new(config)?.optimize(drill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, ActionKind, ActionPath, Agent, Point};

    fn make_action(kind: ActionKind, from: (f64, f64), to: (f64, f64)) -> Action {
        Action::new(
            kind,
            ActionPath::straight(Point::new(from.0, from.1), Point::new(to.0, to.1)),
        )
    }

    /// A runs `run_len` along the x axis; B passes 500 units into A's arrival point.
    fn make_give_and_go(run_len: f64) -> Drill {
        Drill::new(vec![
            Agent::new(
                "A",
                vec![make_action(ActionKind::Run, (0.0, 0.0), (run_len, 0.0))],
            ),
            Agent::new(
                "B",
                vec![make_action(ActionKind::Pass, (run_len, 500.0), (run_len, 0.0))],
            ),
        ])
    }

    fn config_with(propagation: &str, sync_matching: &str) -> OptimizerConfig {
        OptimizerConfig {
            propagation: propagation.to_string(),
            sync_matching: sync_matching.to_string(),
            ..OptimizerConfig::default()
        }
    }

    #[test]
    fn test_synchronized_pass_on_critical_path() {
        let mut drill = make_give_and_go(350.0);
        let optimizer = DrillOptimizer::new(&OptimizerConfig::default()).unwrap();
        let report = optimizer.run(&mut drill).unwrap();

        let run = &drill.agents[0].actions[0];
        let pass = &drill.agents[1].actions[0];
        assert_eq!(run.speed, Some(350.0));
        assert_eq!(run.wait_before, 0.0);
        assert_eq!(pass.speed, None);
        assert_eq!(pass.wait_before, 0.0);

        assert_eq!(report.sync_links.len(), 1);
        assert!((report.timing("A", 0).unwrap().finish - 1.0).abs() < 1e-9);
        assert!((report.timing("B", 0).unwrap().finish - 1.0).abs() < 1e-9);
        assert!((report.makespan - 1.0).abs() < 1e-9);
        assert_eq!(report.critical_actions().count(), 2);
    }

    #[test]
    fn test_receiver_slowed_to_meet_pass() {
        let annotated = optimize(&make_give_and_go(175.0), &OptimizerConfig::default()).unwrap();
        let run = &annotated.agents[0].actions[0];
        assert_eq!(run.speed, Some(175.0));
        assert_eq!(run.wait_before, 0.0);
    }

    #[test]
    fn test_receiver_waits_when_too_slow() {
        let annotated = optimize(&make_give_and_go(70.0), &OptimizerConfig::default()).unwrap();
        let run = &annotated.agents[0].actions[0];
        assert_eq!(run.speed, Some(100.0));
        assert!((run.wait_before - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_path_mode_ignores_late_pass() {
        let config = config_with("shortest_path", "all");
        let annotated = optimize(&make_give_and_go(175.0), &config).unwrap();
        let run = &annotated.agents[0].actions[0];
        assert_eq!(run.speed, Some(350.0));
        assert_eq!(run.wait_before, 0.0);
    }

    #[test]
    fn test_unsynchronized_chain_runs_flat_out() {
        let drill = Drill::new(vec![Agent::new(
            "A",
            vec![
                make_action(ActionKind::Run, (0.0, 0.0), (200.0, 0.0)),
                make_action(ActionKind::Dribble, (200.0, 0.0), (200.0, 90.0)),
                make_action(ActionKind::Turn, (200.0, 90.0), (200.0, 90.0)),
                make_action(ActionKind::Shoot, (200.0, 90.0), (600.0, 90.0)),
            ],
        )]);
        let optimizer = DrillOptimizer::new(&OptimizerConfig::default()).unwrap();
        let annotated = optimizer.optimize(&drill).unwrap();

        let speeds: Vec<Option<f64>> = annotated.agents[0].actions.iter().map(|a| a.speed).collect();
        assert_eq!(speeds, vec![Some(350.0), Some(350.0), None, None]);
        assert!(annotated.agents[0].actions.iter().all(|a| a.wait_before == 0.0));
    }

    #[test]
    fn test_downstream_actions_shift_after_sync() {
        let mut drill = make_give_and_go(175.0);
        drill.agents[0]
            .actions
            .push(make_action(ActionKind::Dribble, (175.0, 0.0), (525.0, 0.0)));
        let optimizer = DrillOptimizer::new(&OptimizerConfig::default()).unwrap();
        let report = optimizer.run(&mut drill).unwrap();

        let dribble = report.timing("A", 1).unwrap();
        assert!((dribble.start - 1.0).abs() < 1e-9);
        assert!((dribble.finish - 2.0).abs() < 1e-9);
        assert!(dribble.critical);
        assert!((report.makespan - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_matching_links_one_receiver() {
        let mut drill = make_give_and_go(175.0);
        drill.agents.push(Agent::new(
            "C",
            vec![make_action(ActionKind::Run, (0.0, 50.0), (175.0, 10.0))],
        ));

        let optimizer = DrillOptimizer::new(&config_with("critical_path", "all")).unwrap();
        assert_eq!(optimizer.run(&mut drill.clone()).unwrap().sync_links.len(), 2);

        let optimizer = DrillOptimizer::new(&config_with("critical_path", "nearest")).unwrap();
        let report = optimizer.run(&mut drill).unwrap();
        assert_eq!(report.sync_links.len(), 1);
        assert_eq!(report.sync_links[0].receiver_id, "A");
        // C is no longer tied to the pass and keeps top speed
        assert_eq!(drill.agents[2].actions[0].speed, Some(350.0));
    }

    #[test]
    fn test_idempotent() {
        let drill = make_give_and_go(70.0);
        let optimizer = DrillOptimizer::new(&OptimizerConfig::default()).unwrap();
        let first = optimizer.optimize(&drill).unwrap();
        let second = optimizer.optimize(&drill).unwrap();
        assert_eq!(first, second);

        let again = optimizer.optimize(&first).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn test_empty_drill() {
        let mut drill = Drill::default();
        let report = DrillOptimizer::new(&OptimizerConfig::default())
            .unwrap()
            .run(&mut drill)
            .unwrap();
        assert!(report.timings.is_empty());
        assert_eq!(report.makespan, 0.0);
    }

    #[test]
    fn test_cycle_leaves_drill_untouched() {
        // A receives B's pass before passing to B, while B receives A's pass before passing to A
        let mut drill = Drill::new(vec![
            Agent::new(
                "A",
                vec![
                    make_action(ActionKind::Run, (50.0, 50.0), (0.0, 100.0)),
                    make_action(ActionKind::Pass, (0.0, 100.0), (100.0, 0.0)),
                ],
            ),
            Agent::new(
                "B",
                vec![
                    make_action(ActionKind::Run, (50.0, -50.0), (100.0, 0.0)),
                    make_action(ActionKind::Pass, (100.0, 0.0), (0.0, 100.0)),
                ],
            ),
        ]);
        drill.agents[0].actions[0].speed = Some(42.0);
        let before = drill.clone();

        let optimizer = DrillOptimizer::new(&OptimizerConfig::default()).unwrap();
        assert_eq!(
            optimizer.run(&mut drill),
            Err(OptimizeError::CircularDependency)
        );
        assert_eq!(drill, before);
    }

    #[test]
    fn test_duplicate_agent_rejected() {
        let drill = Drill::new(vec![Agent::new("A", vec![]), Agent::new("A", vec![])]);
        assert_eq!(
            optimize(&drill, &OptimizerConfig::default()),
            Err(OptimizeError::DuplicateAgent("A".to_string()))
        );
    }

    #[test]
    fn test_non_finite_geometry_rejected() {
        let drill = Drill::new(vec![Agent::new(
            "A",
            vec![
                make_action(ActionKind::Run, (0.0, 0.0), (1.0, 0.0)),
                make_action(ActionKind::Run, (0.0, 0.0), (f64::INFINITY, 0.0)),
            ],
        )]);
        assert_eq!(
            optimize(&drill, &OptimizerConfig::default()),
            Err(OptimizeError::InvalidGeometry {
                agent: "A".to_string(),
                action: 1
            })
        );
    }

    #[test]
    fn test_bad_config_rejected() {
        let err = DrillOptimizer::new(&config_with("longest", "all")).unwrap_err();
        assert_eq!(err, OptimizeError::UnknownStrategy("longest".to_string()));
        assert_eq!(err.to_string(), "Unknown strategy: longest");

        let err = DrillOptimizer::new(&config_with("critical_path", "best")).unwrap_err();
        assert_eq!(err, OptimizeError::UnknownStrategy("best".to_string()));

        let config = OptimizerConfig {
            max_agent_speed: -1.0,
            ..OptimizerConfig::default()
        };
        assert!(matches!(
            DrillOptimizer::new(&config),
            Err(OptimizeError::InvalidConfig(_))
        ));
    }
}
