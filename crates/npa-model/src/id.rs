//! Stable node identity

use std::fmt;

use serde::{Deserialize, Serialize};

/// Synthetic identifier of a document node
///
/// Display numbers ("1.2.3") move around on every structural edit; a
/// `NodeId` never does, so it is the only valid key across mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic counter handing out [`NodeId`]s
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Make sure ids handed out from now on are above `seen`
    pub fn bump_past(&mut self, seen: NodeId) {
        if seen.0 >= self.next {
            self.next = seen.0 + 1;
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
