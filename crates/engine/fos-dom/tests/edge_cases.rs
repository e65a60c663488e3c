//! Edge case tests for fos-dom
//!
//! Boundary conditions of tree edits and the primitive events they raise.

use fos_dom::{DomError, DomEvent, DomEventType, DomTree, EventListeners, NodeId};

fn kinds(events: &[DomEvent]) -> Vec<DomEventType> {
    events.iter().map(|e| e.event_type).collect()
}

// ============================================================================
// INSERTION
// ============================================================================

#[test]
fn test_moving_a_node_raises_removal_first() {
    let mut tree = DomTree::new();
    let a = tree.create_element("a");
    let b = tree.create_element("b");
    let child = tree.create_element("span");
    tree.append_child(tree.root(), a).unwrap();
    tree.append_child(tree.root(), b).unwrap();
    tree.append_child(a, child).unwrap();
    tree.take_events();

    tree.append_child(b, child).unwrap();
    let events = tree.take_events();

    assert_eq!(
        kinds(&events),
        vec![
            DomEventType::DOMNodeRemoved,
            DomEventType::DOMSubtreeModified,
            DomEventType::DOMNodeInserted,
            DomEventType::DOMSubtreeModified,
        ]
    );
    assert_eq!(events[0].target, a);
    assert_eq!(events[2].target, b);
    assert_eq!(events[2].related_node, Some(child));
    assert_eq!(tree.children(a).count(), 0);
    assert_eq!(tree.parent(child), Some(b));
}

#[test]
fn test_insert_before_self_keeps_position() {
    let mut tree = DomTree::new();
    let list = tree.create_element("ul");
    let items: Vec<NodeId> = (0..3).map(|_| tree.create_element("li")).collect();
    tree.append_child(tree.root(), list).unwrap();
    for &item in &items {
        tree.append_child(list, item).unwrap();
    }

    tree.insert_before(list, items[1], Some(items[1])).unwrap();
    assert_eq!(tree.children(list).collect::<Vec<_>>(), items);
}

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let list = tree.create_element("ul");
    let first = tree.create_element("li");
    let second = tree.create_element("li");
    tree.append_child(tree.root(), list).unwrap();
    tree.append_child(list, second).unwrap();

    tree.insert_before(list, first, Some(second)).unwrap();
    assert_eq!(tree.children(list).collect::<Vec<_>>(), vec![first, second]);
}

#[test]
fn test_cycles_are_rejected() {
    let mut tree = DomTree::new();
    let outer = tree.create_element("div");
    let inner = tree.create_element("div");
    tree.append_child(tree.root(), outer).unwrap();
    tree.append_child(outer, inner).unwrap();
    tree.take_events();

    assert_eq!(tree.append_child(inner, outer), Err(DomError::HierarchyRequest));
    assert_eq!(tree.append_child(outer, outer), Err(DomError::HierarchyRequest));
    assert_eq!(tree.append_child(inner, tree.root()), Err(DomError::HierarchyRequest));
    assert!(!tree.has_pending_events());
}

#[test]
fn test_text_cannot_have_children() {
    let mut tree = DomTree::new();
    let text = tree.create_text("leaf");
    let span = tree.create_element("span");

    assert_eq!(tree.append_child(text, span), Err(DomError::HierarchyRequest));
}

#[test]
fn test_reference_must_be_a_child() {
    let mut tree = DomTree::new();
    let list = tree.create_element("ul");
    let stray = tree.create_element("li");
    let item = tree.create_element("li");
    tree.append_child(tree.root(), list).unwrap();

    assert_eq!(tree.insert_before(list, item, Some(stray)), Err(DomError::NotAChild));
    assert_eq!(tree.remove_child(list, stray), Err(DomError::NotAChild));
}

// ============================================================================
// ATTRIBUTES AND CHARACTER DATA
// ============================================================================

#[test]
fn test_removing_absent_attribute_is_silent() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");

    assert_eq!(tree.remove_attribute(div, "missing"), Ok(None));
    assert!(!tree.has_pending_events());
}

#[test]
fn test_attribute_events_carry_values() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");

    tree.set_attribute(div, "class", "a").unwrap();
    tree.set_attribute(div, "class", "b").unwrap();
    tree.remove_attribute(div, "class").unwrap();

    let attr_events: Vec<_> = tree
        .take_events()
        .into_iter()
        .filter(|e| e.event_type == DomEventType::DOMAttrModified)
        .collect();
    assert_eq!(attr_events.len(), 3);
    assert_eq!(attr_events[0].prev_value, None);
    assert_eq!(attr_events[1].prev_value.as_deref(), Some("a"));
    assert_eq!(attr_events[1].new_value.as_deref(), Some("b"));
    assert_eq!(attr_events[2].new_value, None);
    assert!(attr_events.iter().all(|e| e.attr_name.as_deref() == Some("class")));
}

#[test]
fn test_attributes_need_an_element() {
    let mut tree = DomTree::new();
    let text = tree.create_text("x");

    assert_eq!(tree.set_attribute(text, "id", "a"), Err(DomError::InvalidNodeType));
    assert_eq!(
        tree.set_attribute(NodeId::NONE, "id", "a"),
        Err(DomError::NotFound(NodeId::NONE))
    );
}

#[test]
fn test_character_data_on_comment() {
    let mut tree = DomTree::new();
    let comment = tree.create_comment("old");

    assert_eq!(tree.set_character_data(comment, "new").unwrap(), "old");
    let events = tree.take_events();
    assert_eq!(events[0].event_type, DomEventType::DOMCharacterDataModified);
    assert_eq!(events[0].prev_value.as_deref(), Some("old"));
    assert_eq!(events[0].new_value.as_deref(), Some("new"));

    let div = tree.create_element("div");
    assert_eq!(tree.set_character_data(div, "x"), Err(DomError::InvalidNodeType));
}

// ============================================================================
// PROPAGATION
// ============================================================================

#[test]
fn test_propagation_follows_ancestors() {
    let mut tree = DomTree::new();
    let outer = tree.create_element("div");
    let inner = tree.create_element("p");
    tree.append_child(tree.root(), outer).unwrap();
    tree.append_child(outer, inner).unwrap();

    let mut listeners = EventListeners::new();
    listeners.add_listener(tree.root(), DomEventType::DOMAttrModified, "root");
    listeners.add_listener(outer, DomEventType::DOMAttrModified, "outer");
    listeners.add_listener(outer, DomEventType::DOMNodeInserted, "outer-insert");
    listeners.add_listener(inner, DomEventType::DOMAttrModified, "inner");

    let event = DomEvent::attr_modified(inner, "id", None, Some("x"));
    assert_eq!(
        listeners.propagation_path(&tree, &event),
        vec!["inner", "outer", "root"]
    );

    // detached nodes only reach their own listeners
    let detached = tree.create_element("span");
    listeners.add_listener(detached, DomEventType::DOMAttrModified, "detached");
    let event = DomEvent::attr_modified(detached, "id", None, Some("x"));
    assert_eq!(listeners.propagation_path(&tree, &event), vec!["detached"]);
}

#[test]
fn test_removing_one_of_duplicate_listeners() {
    let tree = DomTree::new();
    let mut listeners = EventListeners::new();
    listeners.add_listener(tree.root(), DomEventType::DOMNodeInserted, 7u32);
    listeners.add_listener(tree.root(), DomEventType::DOMNodeInserted, 7u32);

    assert!(listeners.remove_listener(tree.root(), DomEventType::DOMNodeInserted, 7));
    assert_eq!(
        listeners.listeners(tree.root(), DomEventType::DOMNodeInserted).count(),
        1
    );
}
