//! Tree traversal
//!
//! Document-order descendant walk (the `nextNode` step of a TreeWalker
//! rooted at a node) and an inclusive-ancestor iterator.

use crate::{DomTree, NodeId};

/// Next node after `cursor` in document order, staying inside `root`'s
/// subtree. `cursor == None` starts the walk; `root` itself is never
/// returned. Returns `None` at the end of the traversal.
pub fn next_node(tree: &DomTree, root: NodeId, cursor: Option<NodeId>) -> Option<NodeId> {
    let Some(current) = cursor else {
        return tree.get(root)?.first_child.to_option();
    };

    let node = tree.get(current)?;
    if let Some(child) = node.first_child.to_option() {
        return Some(child);
    }

    let mut at = current;
    loop {
        if at == root {
            return None;
        }
        let node = tree.get(at)?;
        if let Some(sibling) = node.next_sibling.to_option() {
            return Some(sibling);
        }
        at = node.parent.to_option()?;
    }
}

/// Iterator over the descendants of a node in document order
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    cursor: Option<NodeId>,
    done: bool,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(tree: &'a DomTree, root: NodeId) -> Self {
        Self {
            tree,
            root,
            cursor: None,
            done: false,
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.done {
            return None;
        }
        match next_node(self.tree, self.root, self.cursor) {
            Some(node) => {
                self.cursor = Some(node);
                Some(node)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Iterator from a node up to the root, the node itself included
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(tree: &'a DomTree, start: NodeId) -> Self {
        let next = tree.get(start).map(|_| start);
        Self { tree, next }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self
            .tree
            .get(current)
            .and_then(|node| node.parent.to_option());
        Some(current)
    }
}
