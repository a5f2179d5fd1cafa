//! Drill timing: schedules every agent's action chain against the others.
//!
//! Pipeline: cost model -> event graph -> pass synchronization -> earliest-time
//! propagation -> slack allocation.

mod allocation;
mod cost;
mod graph;
mod optimizer;
mod propagation;
mod sync;
mod types;

pub use allocation::{allocate, assign, Allocation, Assignment};
pub use cost::CostModel;
pub use graph::{EdgeKind, EventId, TimingEdge, TimingEvent, TimingGraph};
pub use optimizer::{optimize, DrillOptimizer, OptimizeError};
pub use propagation::{propagate, topological_order, PropagationError};
pub use sync::link_passes;
pub use types::{ActionTiming, ScheduleReport, SyncLink};
