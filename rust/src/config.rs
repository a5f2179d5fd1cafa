//! Configuration types for the drill optimizer.

use pyo3::prelude::*;

/// How earliest event times are combined where several edges converge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropagationMode {
    /// An event waits for all of its prerequisites (max over incoming edges).
    CriticalPath,
    /// An event fires on its first prerequisite (min over incoming edges).
    /// Under-constrains synchronized receivers; kept for compatibility.
    ShortestPath,
}

impl PropagationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "critical_path" => Some(Self::CriticalPath),
            "shortest_path" => Some(Self::ShortestPath),
            _ => None,
        }
    }
}

/// Which receivers a pass is synchronized with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMatching {
    /// Every eligible receiver within the sync radius.
    All,
    /// Only the closest eligible receiver within the sync radius.
    Nearest,
}

impl SyncMatching {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "nearest" => Some(Self::Nearest),
            _ => None,
        }
    }
}

/// Physical constants and thresholds for the drill optimizer.
///
/// Distances are in drawing units (px), times in abstract time-units.
#[pyclass]
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    /// Top speed of a running or dribbling agent
    #[pyo3(get, set)]
    pub max_agent_speed: f64,
    /// Slowest speed an agent is allowed to move at; slower pacing becomes a wait
    #[pyo3(get, set)]
    pub min_agent_speed: f64,
    /// Speed of a passed or shot ball
    #[pyo3(get, set)]
    pub ball_speed: f64,
    /// Length multiplier for freeform paths drawn without intermediate points
    #[pyo3(get, set)]
    pub curvature_factor: f64,
    /// Duration of actions that are not distance-governed (tackle, turn)
    #[pyo3(get, set)]
    pub baseline_duration: f64,
    /// Max distance between a pass arrival and a receiver arrival to link them
    #[pyo3(get, set)]
    pub sync_radius: f64,
    /// Slack below which an action is treated as critical
    #[pyo3(get, set)]
    pub slack_threshold: f64,
    /// Propagation mode: "critical_path" or "shortest_path"
    #[pyo3(get, set)]
    pub propagation: String,
    /// Receiver matching: "all" or "nearest"
    #[pyo3(get, set)]
    pub sync_matching: String,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_agent_speed: 350.0,
            min_agent_speed: 100.0,
            ball_speed: 500.0,
            curvature_factor: 1.2,
            baseline_duration: 0.5,
            sync_radius: 30.0,
            slack_threshold: 0.05,
            propagation: "critical_path".to_string(),
            sync_matching: "all".to_string(),
            verbosity: 0,
        }
    }
}

#[pymethods]
impl OptimizerConfig {
    #[new]
    #[pyo3(signature = (
        max_agent_speed=None,
        min_agent_speed=None,
        ball_speed=None,
        curvature_factor=None,
        baseline_duration=None,
        sync_radius=None,
        slack_threshold=None,
        propagation=None,
        sync_matching=None,
        verbosity=0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        max_agent_speed: Option<f64>,
        min_agent_speed: Option<f64>,
        ball_speed: Option<f64>,
        curvature_factor: Option<f64>,
        baseline_duration: Option<f64>,
        sync_radius: Option<f64>,
        slack_threshold: Option<f64>,
        propagation: Option<String>,
        sync_matching: Option<String>,
        verbosity: u8,
    ) -> Self {
        let defaults = Self::default();
        Self {
            max_agent_speed: max_agent_speed.unwrap_or(defaults.max_agent_speed),
            min_agent_speed: min_agent_speed.unwrap_or(defaults.min_agent_speed),
            ball_speed: ball_speed.unwrap_or(defaults.ball_speed),
            curvature_factor: curvature_factor.unwrap_or(defaults.curvature_factor),
            baseline_duration: baseline_duration.unwrap_or(defaults.baseline_duration),
            sync_radius: sync_radius.unwrap_or(defaults.sync_radius),
            slack_threshold: slack_threshold.unwrap_or(defaults.slack_threshold),
            propagation: propagation.unwrap_or(defaults.propagation),
            sync_matching: sync_matching.unwrap_or(defaults.sync_matching),
            verbosity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "OptimizerConfig(max_agent_speed={}, min_agent_speed={}, ball_speed={}, propagation={:?}, sync_matching={:?})",
            self.max_agent_speed,
            self.min_agent_speed,
            self.ball_speed,
            self.propagation,
            self.sync_matching
        )
    }
}

impl OptimizerConfig {
    /// Check physical constants for values the optimizer cannot work with.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("max_agent_speed", self.max_agent_speed),
            ("min_agent_speed", self.min_agent_speed),
            ("ball_speed", self.ball_speed),
            ("curvature_factor", self.curvature_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }

        let non_negative = [
            ("baseline_duration", self.baseline_duration),
            ("sync_radius", self.sync_radius),
            ("slack_threshold", self.slack_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be non-negative, got {}", name, value));
            }
        }

        if self.min_agent_speed > self.max_agent_speed {
            return Err(format!(
                "min_agent_speed ({}) exceeds max_agent_speed ({})",
                self.min_agent_speed, self.max_agent_speed
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OptimizerConfig::default();
        assert!((config.max_agent_speed - 350.0).abs() < 1e-9);
        assert!((config.min_agent_speed - 100.0).abs() < 1e-9);
        assert!((config.ball_speed - 500.0).abs() < 1e-9);
        assert!((config.sync_radius - 30.0).abs() < 1e-9);
        assert_eq!(
            PropagationMode::parse(&config.propagation),
            Some(PropagationMode::CriticalPath)
        );
        assert_eq!(SyncMatching::parse(&config.sync_matching), Some(SyncMatching::All));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(
            PropagationMode::parse("shortest_path"),
            Some(PropagationMode::ShortestPath)
        );
        assert_eq!(PropagationMode::parse("dijkstra"), None);
        assert_eq!(SyncMatching::parse("nearest"), Some(SyncMatching::Nearest));
        assert_eq!(SyncMatching::parse("closest"), None);
    }

    #[test]
    fn test_validate_rejects_bad_speeds() {
        let config = OptimizerConfig {
            ball_speed: 0.0,
            ..OptimizerConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("ball_speed"));

        let config = OptimizerConfig {
            min_agent_speed: 400.0,
            ..OptimizerConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("exceeds"));

        let config = OptimizerConfig {
            sync_radius: f64::NAN,
            ..OptimizerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
