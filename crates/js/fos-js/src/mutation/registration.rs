use fos_dom::{DomEvent, DomEventType, DomTree, NodeId};

use super::{applies_to, HandleError, MutationObserverInit, MutationRecord, MutationType, ObserverId};
use crate::region::Idx;

/// Handle to a registration in the page region
pub type RegistrationId = Idx<Registration>;

/// One `observe(node, options)` call of one observer
#[derive(Debug, Clone)]
pub struct Registration {
    node: NodeId,
    options: MutationObserverInit,
    observer: ObserverId,
}

impl Registration {
    /// `options` is copied, attribute filter included, so the caller's
    /// storage need not outlive the call
    pub(crate) fn new(node: NodeId, options: &MutationObserverInit, observer: ObserverId) -> Self {
        Self {
            node,
            options: options.clone(),
            observer,
        }
    }

    /// The node `observe()` was called with
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn options(&self) -> &MutationObserverInit {
        &self.options
    }

    /// Owning observer
    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    /// Primitive event kinds to subscribe to on `node`
    pub fn subscriptions(&self) -> Vec<DomEventType> {
        self.options.subscriptions()
    }

    /// Turn a primitive event into a record, or `Ok(None)` when this
    /// registration does not observe it.
    ///
    /// Missing event fields become absent record fields; only a target that
    /// is not a live node fails.
    pub fn handle(&self, tree: &DomTree, event: &DomEvent) -> Result<Option<MutationRecord>, HandleError> {
        let kind = event.event_type;
        let Some(mutation_type) = MutationType::from_event(kind) else {
            return Ok(None);
        };

        let target = event.target;
        if !tree.contains(target) {
            return Err(HandleError::InvalidTarget(target));
        }

        if !applies_to(tree, self.node, &self.options, target, kind, event) {
            return Ok(None);
        }

        let record = MutationRecord::new(mutation_type, self.node);
        let record = match kind {
            DomEventType::DOMAttrModified => {
                let old_value = if self.options.attribute_old_value {
                    event.prev_value.clone()
                } else {
                    None
                };
                record
                    .with_attribute_name(event.attr_name.clone())
                    .with_old_value(old_value)
            }
            DomEventType::DOMCharacterDataModified if self.options.character_data_old_value => {
                record.with_old_value(event.prev_value.clone())
            }
            DomEventType::DOMNodeInserted => record.with_added(event.related_node),
            DomEventType::DOMNodeRemoved => record.with_removed(event.related_node),
            _ => record,
        };
        Ok(Some(record))
    }
}
