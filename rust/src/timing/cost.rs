//! Physical cost model: path lengths and minimum durations.

use crate::config::OptimizerConfig;
use crate::models::{Action, ActionPath, Pace, Point};

/// Speed limits and fixed costs used to turn geometry into time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostModel {
    pub max_agent_speed: f64,
    pub min_agent_speed: f64,
    pub ball_speed: f64,
    pub curvature_factor: f64,
    pub baseline_duration: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::from(&OptimizerConfig::default())
    }
}

impl From<&OptimizerConfig> for CostModel {
    fn from(config: &OptimizerConfig) -> Self {
        Self {
            max_agent_speed: config.max_agent_speed,
            min_agent_speed: config.min_agent_speed,
            ball_speed: config.ball_speed,
            curvature_factor: config.curvature_factor,
            baseline_duration: config.baseline_duration,
        }
    }
}

/// Sum of consecutive segment lengths along a polyline.
fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

impl CostModel {
    /// Distance covered by an action's path.
    ///
    /// Freeform paths without drawn points are approximated as the straight
    /// distance scaled by the curvature factor.
    pub fn length(&self, path: &ActionPath) -> f64 {
        match path {
            ActionPath::Straight { start, end } => start.distance(end),
            ActionPath::Freeform { start, end, points } if points.is_empty() => {
                start.distance(end) * self.curvature_factor
            }
            ActionPath::Freeform { points, .. } => polyline_length(points),
        }
    }

    /// Shortest physically possible duration of an action.
    pub fn min_duration(&self, action: &Action) -> f64 {
        match action.kind.pace() {
            Pace::Ball => self.length(&action.path) / self.ball_speed,
            Pace::Agent => self.length(&action.path) / self.max_agent_speed,
            Pace::Fixed => self.baseline_duration,
        }
    }
}
