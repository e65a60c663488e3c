//! DOM Events
//!
//! Primitive mutation events raised synchronously while the tree is edited,
//! and the per-node listener registry they propagate through.

use std::collections::HashMap;

use crate::{DomTree, NodeId};

/// Primitive mutation event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::enum_variant_names)]
pub enum DomEventType {
    DOMNodeInserted,
    DOMNodeRemoved,
    DOMAttrModified,
    DOMCharacterDataModified,
    DOMSubtreeModified,
}

impl DomEventType {
    pub const ALL: [DomEventType; 5] = [
        DomEventType::DOMNodeInserted,
        DomEventType::DOMNodeRemoved,
        DomEventType::DOMAttrModified,
        DomEventType::DOMCharacterDataModified,
        DomEventType::DOMSubtreeModified,
    ];

    /// Event type string as seen by listeners
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DOMNodeInserted => "DOMNodeInserted",
            Self::DOMNodeRemoved => "DOMNodeRemoved",
            Self::DOMAttrModified => "DOMAttrModified",
            Self::DOMCharacterDataModified => "DOMCharacterDataModified",
            Self::DOMSubtreeModified => "DOMSubtreeModified",
        }
    }

    /// Parse an event type string; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// DOM mutation event
///
/// For insertion and removal the event is raised on the parent whose child
/// list changed and `related_node` is the inserted or removed child.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub event_type: DomEventType,
    pub target: NodeId,
    pub related_node: Option<NodeId>,
    pub prev_value: Option<String>,
    pub new_value: Option<String>,
    pub attr_name: Option<String>,
    pub bubbles: bool,
}

impl DomEvent {
    fn new(event_type: DomEventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            related_node: None,
            prev_value: None,
            new_value: None,
            attr_name: None,
            bubbles: true,
        }
    }

    /// Create node inserted event
    pub fn node_inserted(parent: NodeId, child: NodeId) -> Self {
        Self {
            related_node: Some(child),
            ..Self::new(DomEventType::DOMNodeInserted, parent)
        }
    }

    /// Create node removed event
    pub fn node_removed(parent: NodeId, child: NodeId) -> Self {
        Self {
            related_node: Some(child),
            ..Self::new(DomEventType::DOMNodeRemoved, parent)
        }
    }

    /// Create attribute modified event
    pub fn attr_modified(
        target: NodeId,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> Self {
        Self {
            prev_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
            attr_name: Some(name.to_string()),
            ..Self::new(DomEventType::DOMAttrModified, target)
        }
    }

    /// Create character data modified event
    pub fn char_data_modified(target: NodeId, old_value: &str, new_value: &str) -> Self {
        Self {
            prev_value: Some(old_value.to_string()),
            new_value: Some(new_value.to_string()),
            ..Self::new(DomEventType::DOMCharacterDataModified, target)
        }
    }

    /// Create subtree modified event
    pub fn subtree_modified(target: NodeId) -> Self {
        Self::new(DomEventType::DOMSubtreeModified, target)
    }
}

/// Per-node mutation event listeners
///
/// `L` is whatever handle the subscriber uses to find its own state.
#[derive(Debug)]
pub struct EventListeners<L> {
    by_node: HashMap<NodeId, Vec<(DomEventType, L)>>,
}

impl<L> Default for EventListeners<L> {
    fn default() -> Self {
        Self {
            by_node: HashMap::new(),
        }
    }
}

impl<L: Copy + PartialEq> EventListeners<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to `kind` events reaching `node`
    pub fn add_listener(&mut self, node: NodeId, kind: DomEventType, listener: L) {
        self.by_node.entry(node).or_default().push((kind, listener));
    }

    /// Unsubscribe one listener
    pub fn remove_listener(&mut self, node: NodeId, kind: DomEventType, listener: L) -> bool {
        let Some(entries) = self.by_node.get_mut(&node) else {
            return false;
        };
        let Some(pos) = entries.iter().position(|&(k, l)| k == kind && l == listener) else {
            return false;
        };
        entries.remove(pos);
        if entries.is_empty() {
            self.by_node.remove(&node);
        }
        true
    }

    /// Listeners on `node` for `kind`, in subscription order
    pub fn listeners(&self, node: NodeId, kind: DomEventType) -> impl Iterator<Item = L> + '_ {
        self.by_node
            .get(&node)
            .into_iter()
            .flatten()
            .filter(move |(k, _)| *k == kind)
            .map(|&(_, l)| l)
    }

    /// Clear all listeners for a node
    pub fn clear_node(&mut self, node: NodeId) {
        self.by_node.remove(&node);
    }

    /// Total number of subscriptions
    pub fn len(&self) -> usize {
        self.by_node.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Every listener the event reaches: the target's first, then each
    /// ancestor's up to the root when the event bubbles.
    pub fn propagation_path(&self, tree: &DomTree, event: &DomEvent) -> Vec<L> {
        if !event.bubbles {
            return self.listeners(event.target, event.event_type).collect();
        }
        tree.inclusive_ancestors(event.target)
            .flat_map(|node| self.listeners(node, event.event_type))
            .collect()
    }
}
