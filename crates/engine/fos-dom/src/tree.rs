//! DOM Tree (arena-based allocation)
//!
//! Every edit raises its primitive mutation events into an internal
//! journal; the owner drains it with [`DomTree::take_events`] right after
//! the edit and dispatches the events synchronously.

use crate::walker::{Ancestors, Descendants};
use crate::{DomError, DomEvent, DomResult, Node, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    events: Vec<DomEvent>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            events: Vec::new(),
        }
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Get a node or fail with `NotFound`
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Whether `id` names a node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of nodes in the tree (detached ones included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the document node always exists
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Node::element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::comment(content.to_string()))
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    /// Children of a node in order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self
            .get(id)
            .map_or(NodeId::NONE, |node| node.first_child);
        std::iter::successors(first.to_option(), move |&child| {
            self.get(child)?.next_sibling.to_option()
        })
    }

    /// Descendants of `root` in document order, `root` excluded
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants::new(self, root)
    }

    /// `node`, its parent, and so on up to the root
    pub fn inclusive_ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors::new(self, node)
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `new_child` before `ref_child` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_insertable(parent, new_child)?;

        let mut before = match ref_child {
            Some(r) if self.parent(r) != Some(parent) => return Err(DomError::NotAChild),
            Some(r) => r,
            None => NodeId::NONE,
        };
        if before == new_child {
            before = self.node(new_child)?.next_sibling;
        }

        if let Some(old_parent) = self.parent(new_child) {
            self.remove_child(old_parent, new_child)?;
        }

        self.link_before(parent, new_child, before);
        self.events.push(DomEvent::node_inserted(parent, new_child));
        self.events.push(DomEvent::subtree_modified(parent));
        Ok(new_child)
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild);
        }

        self.unlink(child);
        self.events.push(DomEvent::node_removed(parent, child));
        self.events.push(DomEvent::subtree_modified(parent));
        Ok(child)
    }

    /// Read an attribute of an element
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?.as_element()?.get_attr(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> DomResult<Option<String>> {
        let elem = self
            .get_mut(node)
            .ok_or(DomError::NotFound(node))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        let old = elem.set_attr(name, value.to_string());

        self.events.push(DomEvent::attr_modified(node, name, old.as_deref(), Some(value)));
        self.events.push(DomEvent::subtree_modified(node));
        Ok(old)
    }

    /// Remove an attribute; no event is raised when it was absent
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        let elem = self
            .get_mut(node)
            .ok_or(DomError::NotFound(node))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        let Some(old) = elem.remove_attr(name) else {
            return Ok(None);
        };

        self.events.push(DomEvent::attr_modified(node, name, Some(&old), None));
        self.events.push(DomEvent::subtree_modified(node));
        Ok(Some(old))
    }

    /// Replace the data of a text or comment node, returning the old data
    pub fn set_character_data(&mut self, node: NodeId, data: &str) -> DomResult<String> {
        let slot = self
            .get_mut(node)
            .ok_or(DomError::NotFound(node))?
            .character_data_mut()
            .ok_or(DomError::InvalidNodeType)?;
        let old = std::mem::replace(slot, data.to_string());

        self.events.push(DomEvent::char_data_modified(node, &old, data));
        self.events.push(DomEvent::subtree_modified(node));
        Ok(old)
    }

    /// Drain the events raised since the last call, in the order raised
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether edits have raised events nobody has drained yet
    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if !self.node(parent)?.can_have_children() {
            return Err(DomError::HierarchyRequest);
        }
        self.node(child)?;
        if child == self.root() || self.inclusive_ancestors(parent).any(|a| a == child) {
            tracing::trace!(parent = parent.0, child = child.0, "rejected insertion into own subtree");
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    /// Link a detached node under `parent` before `before` (NONE = last)
    fn link_before(&mut self, parent: NodeId, child: NodeId, before: NodeId) {
        let prev = if before.is_valid() {
            self.nodes[before.0 as usize].prev_sibling
        } else {
            self.nodes[parent.0 as usize].last_child
        };

        let node = &mut self.nodes[child.0 as usize];
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = before;

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = child;
        } else {
            self.nodes[parent.0 as usize].first_child = child;
        }
        if before.is_valid() {
            self.nodes[before.0 as usize].prev_sibling = child;
        } else {
            self.nodes[parent.0 as usize].last_child = child;
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let node = &mut self.nodes[child.0 as usize];
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;

        if prev.is_valid() {
            self.nodes[prev.0 as usize].next_sibling = next;
        } else if parent.is_valid() {
            self.nodes[parent.0 as usize].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.0 as usize].prev_sibling = prev;
        } else if parent.is_valid() {
            self.nodes[parent.0 as usize].last_child = prev;
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
