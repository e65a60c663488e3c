use fos_dom::{DomEventType, NodeId};
use serde::Serialize;

/// Mutation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

impl MutationType {
    /// Record type for a primitive event kind; `None` for kinds that never
    /// produce a record
    pub fn from_event(kind: DomEventType) -> Option<Self> {
        match kind {
            DomEventType::DOMAttrModified => Some(Self::Attributes),
            DomEventType::DOMCharacterDataModified => Some(Self::CharacterData),
            DomEventType::DOMNodeInserted | DomEventType::DOMNodeRemoved => Some(Self::ChildList),
            DomEventType::DOMSubtreeModified => None,
        }
    }

    /// The `type` string scripts see
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::CharacterData => "characterData",
            Self::ChildList => "childList",
        }
    }
}

/// Mutation record
///
/// Read-only once built; serializes with the script-visible field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    #[serde(rename = "type")]
    mutation_type: MutationType,
    target: NodeId,
    added_nodes: Vec<NodeId>,
    removed_nodes: Vec<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    attribute_name: Option<String>,
    attribute_namespace: Option<String>,
    old_value: Option<String>,
}

impl MutationRecord {
    pub(crate) fn new(mutation_type: MutationType, target: NodeId) -> Self {
        Self {
            mutation_type,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            attribute_namespace: None,
            old_value: None,
        }
    }

    pub(crate) fn with_attribute_name(mut self, name: Option<String>) -> Self {
        self.attribute_name = name;
        self
    }

    pub(crate) fn with_old_value(mut self, value: Option<String>) -> Self {
        self.old_value = value;
        self
    }

    pub(crate) fn with_added(mut self, node: Option<NodeId>) -> Self {
        self.added_nodes.extend(node);
        self
    }

    pub(crate) fn with_removed(mut self, node: Option<NodeId>) -> Self {
        self.removed_nodes.extend(node);
        self
    }

    pub fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// Node the registration was watching, not necessarily the changed one
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn added_nodes(&self) -> &[NodeId] {
        &self.added_nodes
    }

    pub fn removed_nodes(&self) -> &[NodeId] {
        &self.removed_nodes
    }

    /// Always `None`: primitive events carry no sibling information
    pub fn previous_sibling(&self) -> Option<NodeId> {
        self.previous_sibling
    }

    /// Always `None`, see [`MutationRecord::previous_sibling`]
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute_name.as_deref()
    }

    /// Attributes live in the null namespace
    pub fn attribute_namespace(&self) -> Option<&str> {
        self.attribute_namespace.as_deref()
    }

    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }
}
