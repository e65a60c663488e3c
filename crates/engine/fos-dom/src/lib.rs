//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree that raises primitive mutation events
//! (`DOMNodeInserted`, `DOMAttrModified`, ...) as it is edited.

mod node;
mod tree;
mod operations;
pub mod events;
pub mod walker;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::DomTree;
pub use operations::{DomError, DomResult};
pub use events::{DomEvent, DomEventType, EventListeners};
pub use walker::{next_node, Ancestors, Descendants};

use serde::{Deserialize, Serialize};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Convert the sentinel into `None`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }

    /// Raw arena index
    pub fn index(self) -> u32 {
        self.0
    }
}
