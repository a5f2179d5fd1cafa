//! Core data types for drill descriptions.
//!
//! A drill is a set of agents, each owning an ordered chain of actions. The
//! optimizer only ever writes the `speed` and `wait_before` fields of an action;
//! geometry and kinds are read-only inputs.

use serde::{Deserialize, Serialize};

/// A point on the drill plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// What governs an action's minimum duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pace {
    /// Travels at ball speed (passes and shots).
    Ball,
    /// Travels at most at the agent's top speed (runs and dribbles).
    Agent,
    /// Takes a fixed baseline time regardless of geometry.
    Fixed,
}

/// Kind of an atomic action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Run,
    Dribble,
    Pass,
    Shoot,
    Tackle,
    Turn,
}

impl ActionKind {
    pub fn pace(self) -> Pace {
        match self {
            ActionKind::Pass | ActionKind::Shoot => Pace::Ball,
            ActionKind::Run | ActionKind::Dribble => Pace::Agent,
            ActionKind::Tackle | ActionKind::Turn => Pace::Fixed,
        }
    }

    /// Whether this action can be the receiving end of a pass.
    pub fn can_receive(self) -> bool {
        self.pace() == Pace::Agent
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Run => "run",
            ActionKind::Dribble => "dribble",
            ActionKind::Pass => "pass",
            ActionKind::Shoot => "shoot",
            ActionKind::Tackle => "tackle",
            ActionKind::Turn => "turn",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry of an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ActionPath {
    /// Straight segment between two points.
    Straight { start: Point, end: Point },
    /// Hand-drawn path. `points` may be empty when only the endpoints were captured.
    Freeform {
        start: Point,
        end: Point,
        #[serde(default)]
        points: Vec<Point>,
    },
}

impl ActionPath {
    pub fn straight(start: Point, end: Point) -> Self {
        ActionPath::Straight { start, end }
    }

    pub fn freeform(start: Point, end: Point, points: Vec<Point>) -> Self {
        ActionPath::Freeform { start, end, points }
    }

    pub fn start(&self) -> Point {
        match self {
            ActionPath::Straight { start, .. } | ActionPath::Freeform { start, .. } => *start,
        }
    }

    /// Where the action finishes: the segment end, or the last drawn point of a freeform path.
    pub fn arrival(&self) -> Point {
        match self {
            ActionPath::Straight { end, .. } => *end,
            ActionPath::Freeform { end, points, .. } => points.last().copied().unwrap_or(*end),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            ActionPath::Straight { start, end } => start.is_finite() && end.is_finite(),
            ActionPath::Freeform { start, end, points } => {
                start.is_finite() && end.is_finite() && points.iter().all(Point::is_finite)
            }
        }
    }
}

/// One action in an agent's chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ActionKind,
    pub path: ActionPath,
    /// Assigned travel speed; `None` when the duration is not speed-governed.
    #[serde(default)]
    pub speed: Option<f64>,
    /// Pause before the action starts.
    #[serde(default)]
    pub wait_before: f64,
}

impl Action {
    pub fn new(kind: ActionKind, path: ActionPath) -> Self {
        Self {
            kind,
            path,
            speed: None,
            wait_before: 0.0,
        }
    }
}

/// A player with its own ordered action chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Agent {
    pub fn new(id: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            id: id.into(),
            actions,
        }
    }
}

/// A full drill description.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drill {
    #[serde(default)]
    pub agents: Vec<Agent>,
}

impl Drill {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Total number of actions across all agents.
    pub fn action_count(&self) -> usize {
        self.agents.iter().map(|a| a.actions.len()).sum()
    }
}
