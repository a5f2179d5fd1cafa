//! Agent id interning.
//!
//! Maps agent id strings to dense indices so the timing graph can refer to agents
//! by position and resolve names only at the reporting boundary.

use rustc_hash::FxHashMap;

use crate::models::Drill;

/// Dense agent index (position in the drill's agent list).
pub type AgentIdx = u32;

/// Interner for agent ids, preserving insertion order.
#[derive(Debug, Clone)]
pub struct AgentInterner {
    to_idx: FxHashMap<String, AgentIdx>,
    from_idx: Vec<String>,
}

impl AgentInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Register a new agent id.
    ///
    /// Returns `None` if the id was already registered; agent ids must be unique
    /// within a drill.
    pub fn insert_unique(&mut self, id: &str) -> Option<AgentIdx> {
        if self.to_idx.contains_key(id) {
            return None;
        }
        let idx = self.from_idx.len() as AgentIdx;
        self.from_idx.push(id.to_string());
        self.to_idx.insert(id.to_string(), idx);
        Some(idx)
    }

    /// Intern every agent of a drill in order.
    ///
    /// Returns the first repeated id on failure.
    pub fn for_drill(drill: &Drill) -> Result<Self, String> {
        let mut interner = Self::with_capacity(drill.agents.len());
        for agent in &drill.agents {
            if interner.insert_unique(&agent.id).is_none() {
                return Err(agent.id.clone());
            }
        }
        Ok(interner)
    }

    #[inline]
    pub fn resolve(&self, idx: AgentIdx) -> Option<&str> {
        self.from_idx.get(idx as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}

impl Default for AgentInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
