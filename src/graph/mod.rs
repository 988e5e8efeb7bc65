//! Graph data structures and operations.
//!
//! This module provides the graph container: named nodes, directed links
//! named after their endpoints, and the indices that keep lookups by id,
//! by name and by endpoint pair consistent.

mod data;
mod engine;
mod error;
mod ids;
mod link;
mod node;
mod options;

pub use data::{Data, MAX_MERGE_DEPTH, data_from_value, merge_data};
pub use engine::Graph;
pub use error::{GraphError, Result};
pub use ids::IdAllocator;
pub use link::{Link, LinkEnd, LinkId, LinkInput, LinkKey, LinkSpec, NodeHandle, link_name};
pub use node::{Node, NodeId, NodeInput, NodeKey, NodeSpec, default_node_name};
pub use options::{DEFAULT_FRICTION, DEFAULT_GRAVITY, GraphOptions};
