//! Page - Document, event loop and script objects of one loaded page
//!
//! All script-driven document edits go through the page so the primitive
//! events they raise reach mutation observer registrations before the edit
//! call returns. Observer callbacks run later, from [`Page::run_tick`].

use fos_dom::{DomEvent, DomResult, DomTree, EventListeners, NodeId};

use crate::event_loop::EventLoop;
use crate::mutation::{
    HandleError, MutationCallback, MutationObserver, MutationObserverInit, MutationRecord,
    ObserverError, ObserverId, Registration, RegistrationId,
};
use crate::region::{PageRegion, RegionStats};

/// Work the page's event loop runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    NotifyMutationObserver(ObserverId),
}

/// Page configuration options
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Document URL
    pub url: String,

    /// Upper bound on ticks run by [`Page::run_until_idle`]
    pub max_drain_ticks: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            max_drain_ticks: 64,
        }
    }
}

/// A loaded page
#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    tree: DomTree,
    listeners: EventListeners<RegistrationId>,
    region: PageRegion,
    event_loop: EventLoop<Task>,
}

impl Page {
    /// Create a page with an empty document
    pub fn new() -> Self {
        Self::with_config(PageConfig::default())
    }

    pub fn with_config(config: PageConfig) -> Self {
        tracing::debug!(url = %config.url, "creating page");
        Self {
            config,
            tree: DomTree::new(),
            listeners: EventListeners::new(),
            region: PageRegion::new(),
            event_loop: EventLoop::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Read access to the document
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    // ---- document editing ----

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.tree.create_element(name)
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.tree.create_comment(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let result = self.tree.append_child(parent, child);
        self.flush_mutation_events();
        result
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let result = self.tree.insert_before(parent, new_child, ref_child);
        self.flush_mutation_events();
        result
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        let result = self.tree.remove_child(parent, child);
        self.flush_mutation_events();
        result
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<Option<String>> {
        let result = self.tree.set_attribute(node, name, value);
        self.flush_mutation_events();
        result
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        let result = self.tree.remove_attribute(node, name);
        self.flush_mutation_events();
        result
    }

    pub fn set_character_data(&mut self, node: NodeId, data: &str) -> DomResult<String> {
        let result = self.tree.set_character_data(node, data);
        self.flush_mutation_events();
        result
    }

    /// Deliver a primitive event raised outside the page's own edit methods.
    /// An event whose target is not a live node is logged and dropped.
    pub fn dispatch_event(&mut self, event: &DomEvent) -> Result<(), HandleError> {
        if !self.tree.contains(event.target) {
            let err = HandleError::InvalidTarget(event.target);
            tracing::warn!(
                event = event.event_type.as_str(),
                error = %err,
                "dropping mutation event"
            );
            return Err(err);
        }

        let path = self.listeners.propagation_path(&self.tree, event);
        for registration_id in path {
            let Some(registration) = self.region.registrations.get(registration_id) else {
                continue;
            };
            match registration.handle(&self.tree, event) {
                Ok(Some(record)) => {
                    let observer_id = registration.observer();
                    if let Some(observer) = self.region.observers.get_mut(observer_id) {
                        tracing::trace!(
                            observer = observer_id.raw(),
                            kind = record.mutation_type().as_str(),
                            "queued mutation record"
                        );
                        observer.enqueue(record, &mut self.event_loop);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        registration = registration_id.raw(),
                        event = event.event_type.as_str(),
                        error = %err,
                        "dropping mutation event"
                    );
                }
            }
        }
        Ok(())
    }

    fn flush_mutation_events(&mut self) {
        for event in self.tree.take_events() {
            // already logged; edits only journal events on live nodes
            let _ = self.dispatch_event(&event);
        }
    }

    // ---- MutationObserver ----

    /// `new MutationObserver(callback)`
    pub fn create_observer<C>(&mut self, callback: C) -> ObserverId
    where
        C: MutationCallback + 'static,
    {
        let observers = &mut self.region.observers;
        let id = observers.alloc_with(|id| MutationObserver::new(id, Box::new(callback)));
        tracing::debug!(observer = id.raw(), "mutation observer created");
        id
    }

    /// `observer.observe(node, options)`; `None` means all options off
    pub fn observe(
        &mut self,
        observer: ObserverId,
        node: NodeId,
        options: Option<&MutationObserverInit>,
    ) -> Result<RegistrationId, ObserverError> {
        if self.region.observers.get(observer).is_none() {
            return Err(ObserverError::UnknownObserver(observer));
        }
        self.tree.node(node)?;

        let default_options = MutationObserverInit::default();
        let registration = Registration::new(node, options.unwrap_or(&default_options), observer);
        let kinds = registration.subscriptions();
        let id = self.region.registrations.alloc(registration);
        for kind in &kinds {
            self.listeners.add_listener(node, *kind, id);
        }
        if let Some(owner) = self.region.observers.get_mut(observer) {
            owner.add_registration(id);
        }

        tracing::debug!(
            observer = observer.raw(),
            registration = id.raw(),
            node = node.index(),
            subscriptions = kinds.len(),
            "observing node"
        );
        Ok(id)
    }

    /// `observer.disconnect()`
    pub fn disconnect(&mut self, observer: ObserverId) -> Result<(), ObserverError> {
        self.observer_mut(observer)?.disconnect();
        Ok(())
    }

    /// `observer.takeRecords()`
    pub fn take_records(&mut self, observer: ObserverId) -> Result<Vec<MutationRecord>, ObserverError> {
        Ok(self.observer_mut(observer)?.take_records())
    }

    pub fn observer(&self, id: ObserverId) -> Option<&MutationObserver> {
        self.region.observers.get(id)
    }

    pub fn registration(&self, id: RegistrationId) -> Option<&Registration> {
        self.region.registrations.get(id)
    }

    fn observer_mut(&mut self, id: ObserverId) -> Result<&mut MutationObserver, ObserverError> {
        self.region
            .observers
            .get_mut(id)
            .ok_or(ObserverError::UnknownObserver(id))
    }

    // ---- event loop ----

    /// Run one turn of the event loop. Tasks queued while it runs wait for
    /// the next turn. Returns how many tasks ran.
    ///
    /// Calling it from inside a running task, e.g. from an observer
    /// callback, runs nothing and returns 0.
    pub fn run_tick(&mut self) -> usize {
        if !self.event_loop.begin_turn() {
            tracing::warn!("run_tick called from inside a task, ignored");
            return 0;
        }
        self.event_loop.tick(0);
        let mut ran = 0;
        while let Some(task) = self.event_loop.next_macrotask() {
            self.run_task(task.payload);
            ran += 1;
        }
        self.event_loop.end_turn();
        ran
    }

    /// Run ticks until no work is left or `max_drain_ticks` is reached.
    /// Returns how many ticks ran.
    pub fn run_until_idle(&mut self) -> usize {
        if self.event_loop.is_running() {
            tracing::warn!("run_until_idle called from inside a task, ignored");
            return 0;
        }
        let mut ticks = 0;
        while self.event_loop.has_pending_work() {
            if ticks == self.config.max_drain_ticks {
                tracing::warn!(ticks, "event loop still busy, giving up");
                break;
            }
            self.run_tick();
            ticks += 1;
        }
        ticks
    }

    pub fn has_pending_tasks(&self) -> bool {
        self.event_loop.has_pending_work()
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::NotifyMutationObserver(id) => self.notify_mutation_observer(id),
        }
    }

    fn notify_mutation_observer(&mut self, id: ObserverId) {
        let Some(observer) = self.region.observers.get_mut(id) else {
            return;
        };
        let Some((records, mut callback)) = observer.begin_delivery() else {
            return;
        };

        tracing::debug!(observer = id.raw(), records = records.len(), "delivering mutation records");
        if let Err(err) = callback.call(&records, self) {
            tracing::error!(
                observer = id.raw(),
                error = %err,
                stack = err.stack().unwrap_or("<no stack>"),
                "mutation observer callback failed"
            );
        }

        if let Some(observer) = self.region.observers.get_mut(id) {
            observer.finish_delivery(callback);
        }
    }

    /// Tear the page down, releasing every observer, registration and
    /// queued record at once
    pub fn close(self) -> RegionStats {
        let stats = self.region.release();
        tracing::info!(
            url = %self.config.url,
            observers = stats.observers,
            registrations = stats.registrations,
            pending_records = stats.pending_records,
            "page closed"
        );
        stats
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsError;
    use fos_dom::DomError;

    fn noop(_: &[MutationRecord], _: &mut Page) -> Result<(), JsError> {
        Ok(())
    }

    #[test]
    fn test_config_defaults() {
        let page = Page::new();
        assert_eq!(page.url(), "about:blank");
        assert_eq!(page.config().max_drain_ticks, 64);
        assert!(!page.has_pending_tasks());
    }

    #[test]
    fn test_observe_registers_listeners() {
        let mut page = Page::new();
        let div = page.create_element("div");
        page.append_child(page.tree().root(), div).unwrap();
        let observer = page.create_observer(noop);

        let opts = MutationObserverInit {
            child_list: true,
            attributes: true,
            ..Default::default()
        };
        let registration = page.observe(observer, div, Some(&opts)).unwrap();

        assert_eq!(page.listeners.len(), 3);
        assert_eq!(page.observer(observer).unwrap().registrations(), &[registration]);
        assert_eq!(page.registration(registration).unwrap().node(), div);
    }

    #[test]
    fn test_observe_rejects_unknown_node() {
        let mut page = Page::new();
        let observer = page.create_observer(noop);

        let err = page.observe(observer, NodeId::NONE, None).unwrap_err();
        assert!(matches!(err, ObserverError::Dom(DomError::NotFound(_))));
    }

    #[test]
    fn test_unknown_observer() {
        let mut other = Page::new();
        let foreign = other.create_observer(noop);

        let mut page = Page::new();
        assert!(matches!(page.disconnect(foreign), Err(ObserverError::UnknownObserver(_))));
    }

    #[test]
    fn test_dispatch_rejects_dead_target() {
        let mut page = Page::new();
        let div = page.create_element("div");
        page.append_child(page.tree().root(), div).unwrap();
        let observer = page.create_observer(noop);
        let opts = MutationObserverInit {
            attributes: true,
            subtree: true,
            ..Default::default()
        };
        page.observe(observer, page.tree().root(), Some(&opts)).unwrap();

        let event = DomEvent::attr_modified(NodeId::NONE, "id", None, Some("a"));
        assert_eq!(
            page.dispatch_event(&event),
            Err(HandleError::InvalidTarget(NodeId::NONE))
        );
        assert!(page.observer(observer).unwrap().pending_records().is_empty());
        assert!(!page.has_pending_tasks());

        let event = DomEvent::attr_modified(div, "id", None, Some("a"));
        assert_eq!(page.dispatch_event(&event), Ok(()));
        assert_eq!(page.observer(observer).unwrap().pending_records().len(), 1);
    }

    #[test]
    fn test_close_reports_region() {
        let mut page = Page::new();
        let div = page.create_element("div");
        page.append_child(page.tree().root(), div).unwrap();
        let observer = page.create_observer(noop);
        let opts = MutationObserverInit {
            attributes: true,
            ..Default::default()
        };
        page.observe(observer, div, Some(&opts)).unwrap();
        page.set_attribute(div, "id", "a").unwrap();

        let stats = page.close();
        assert_eq!(stats.observers, 1);
        assert_eq!(stats.registrations, 1);
        assert_eq!(stats.pending_records, 1);
    }
}
