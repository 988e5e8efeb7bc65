//! Identifier allocation.
//!
//! Every graph owns its own allocator, so ids from independent graphs
//! never share a sequence.

use super::error::{GraphError, Result};
use super::link::LinkId;
use super::node::NodeId;

/// Monotonic id counters for nodes and links.
///
/// Counters are kept one bit wider than the ids so that handing out
/// `u32::MAX` leaves the sequence exhausted instead of wrapping to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next_node_id: u64,
    next_link_id: u64,
}

impl IdAllocator {
    /// Create an allocator starting both sequences at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator resuming from the given next ids.
    pub fn starting_at(next_node_id: u32, next_link_id: u32) -> Self {
        Self {
            next_node_id: next_node_id.into(),
            next_link_id: next_link_id.into(),
        }
    }

    /// Allocate the next node id.
    pub fn next_node(&mut self) -> Result<NodeId> {
        let id = self.peek_node()?;
        self.next_node_id += 1;
        Ok(id)
    }

    /// Allocate the next link id.
    pub fn next_link(&mut self) -> Result<LinkId> {
        let id = u32::try_from(self.next_link_id).map_err(|_| GraphError::IdsExhausted("link"))?;
        self.next_link_id += 1;
        Ok(LinkId(id))
    }

    /// Record an externally assigned node id so it is never handed out again.
    pub fn observe_node(&mut self, id: NodeId) {
        self.next_node_id = self.next_node_id.max(u64::from(id.0) + 1);
    }

    /// Record an externally assigned link id so it is never handed out again.
    pub fn observe_link(&mut self, id: LinkId) {
        self.next_link_id = self.next_link_id.max(u64::from(id.0) + 1);
    }

    /// The id the next node will receive.
    pub fn peek_node(&self) -> Result<NodeId> {
        u32::try_from(self.next_node_id)
            .map(NodeId)
            .map_err(|_| GraphError::IdsExhausted("node"))
    }
}
