use fos_dom::{DomEvent, DomEventType, DomTree, NodeId};

use super::MutationObserverInit;

/// Whether a primitive event on `target` is observable by a registration
/// on `observed` with `options`.
///
/// Checks run in a fixed order: attribute filter, `subtree`, direct target
/// match, and finally (for `childList` registrations) a document-order walk
/// of `observed`'s descendants looking for `target`. The walk is the only
/// step that is not constant time.
pub fn applies_to(
    tree: &DomTree,
    observed: NodeId,
    options: &MutationObserverInit,
    target: NodeId,
    kind: DomEventType,
    event: &DomEvent,
) -> bool {
    if kind == DomEventType::DOMAttrModified {
        if let Some(filter) = options.active_attribute_filter() {
            let Some(name) = event.attr_name.as_deref() else {
                return false;
            };
            if !filter.iter().any(|allowed| allowed == name) {
                return false;
            }
        }
    }

    if options.subtree {
        return true;
    }
    if target == observed {
        return true;
    }
    if !options.child_list {
        return false;
    }

    tree.descendants(observed).any(|node| node == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        tree: DomTree,
        body: NodeId,
        div: NodeId,
        span: NodeId,
        aside: NodeId,
    }

    /// root > body > (div > span, aside)
    fn fixture() -> Fixture {
        let mut tree = DomTree::new();
        let body = tree.create_element("body");
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        let aside = tree.create_element("aside");
        tree.append_child(tree.root(), body).unwrap();
        tree.append_child(body, div).unwrap();
        tree.append_child(div, span).unwrap();
        tree.append_child(body, aside).unwrap();
        tree.take_events();
        Fixture {
            tree,
            body,
            div,
            span,
            aside,
        }
    }

    fn attr_event(target: NodeId, name: &str) -> DomEvent {
        DomEvent::attr_modified(target, name, None, Some("v"))
    }

    fn check(f: &Fixture, observed: NodeId, options: &MutationObserverInit, event: &DomEvent) -> bool {
        applies_to(&f.tree, observed, options, event.target, event.event_type, event)
    }

    #[test]
    fn test_direct_target() {
        let f = fixture();
        let opts = MutationObserverInit {
            attributes: true,
            ..Default::default()
        };

        assert!(check(&f, f.div, &opts, &attr_event(f.div, "id")));
        assert!(!check(&f, f.div, &opts, &attr_event(f.span, "id")));
    }

    #[test]
    fn test_subtree_accepts_anything() {
        let f = fixture();
        let opts = MutationObserverInit {
            attributes: true,
            subtree: true,
            ..Default::default()
        };

        assert!(check(&f, f.div, &opts, &attr_event(f.aside, "id")));
    }

    #[test]
    fn test_child_list_walks_descendants() {
        let f = fixture();
        let opts = MutationObserverInit {
            child_list: true,
            ..Default::default()
        };

        let below = DomEvent::node_inserted(f.span, f.aside);
        assert!(check(&f, f.body, &opts, &below));

        let outside = DomEvent::node_inserted(f.aside, f.span);
        assert!(!check(&f, f.div, &opts, &outside));
    }

    #[test]
    fn test_attribute_filter() {
        let f = fixture();
        let opts = MutationObserverInit {
            attributes: true,
            attribute_filter: Some(vec!["class".into(), "hidden".into()]),
            ..Default::default()
        };

        assert!(check(&f, f.div, &opts, &attr_event(f.div, "class")));
        assert!(!check(&f, f.div, &opts, &attr_event(f.div, "id")));

        let mut nameless = attr_event(f.div, "class");
        nameless.attr_name = None;
        assert!(!check(&f, f.div, &opts, &nameless));

        // the filter only constrains attribute events
        let text = DomEvent::char_data_modified(f.div, "a", "b");
        assert!(check(&f, f.div, &opts, &text));
    }

    #[test]
    fn test_filter_checked_before_subtree() {
        let f = fixture();
        let opts = MutationObserverInit {
            subtree: true,
            attribute_filter: Some(vec!["class".into()]),
            ..Default::default()
        };

        assert!(!check(&f, f.body, &opts, &attr_event(f.span, "style")));
        assert!(check(&f, f.body, &opts, &attr_event(f.span, "class")));
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let f = fixture();
        let opts = MutationObserverInit {
            attributes: true,
            attribute_filter: Some(Vec::new()),
            ..Default::default()
        };

        assert!(check(&f, f.div, &opts, &attr_event(f.div, "anything")));
    }
}
