use std::fmt;

use super::{MutationRecord, RegistrationId};
use crate::event_loop::EventLoop;
use crate::page::{Page, Task};
use crate::region::Idx;
use crate::JsError;

/// Handle to an observer in the page region; also what the event loop
/// carries to invoke it
pub type ObserverId = Idx<MutationObserver>;

/// Script callback of a mutation observer
///
/// Invoked with the whole batch. The page is handed back so the callback
/// can inspect and mutate the document; mutations it makes are delivered
/// on a later tick.
pub trait MutationCallback {
    fn call(&mut self, records: &[MutationRecord], page: &mut Page) -> Result<(), JsError>;
}

impl<F> MutationCallback for F
where
    F: FnMut(&[MutationRecord], &mut Page) -> Result<(), JsError>,
{
    fn call(&mut self, records: &[MutationRecord], page: &mut Page) -> Result<(), JsError> {
        self(records, page)
    }
}

/// Mutation observer
pub struct MutationObserver {
    id: ObserverId,
    /// `None` only while the callback is running
    callback: Option<Box<dyn MutationCallback>>,
    connected: bool,
    /// A deferred notification is outstanding
    scheduled: bool,
    /// Records in observation order
    pending: Vec<MutationRecord>,
    registrations: Vec<RegistrationId>,
}

impl MutationObserver {
    pub(crate) fn new(id: ObserverId, callback: Box<dyn MutationCallback>) -> Self {
        Self {
            id,
            callback: Some(callback),
            connected: true,
            scheduled: false,
            pending: Vec::new(),
            registrations: Vec::new(),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Records queued but not yet delivered
    pub fn pending_records(&self) -> &[MutationRecord] {
        &self.pending
    }

    /// Registrations created by `observe()`, in call order
    pub fn registrations(&self) -> &[RegistrationId] {
        &self.registrations
    }

    pub(crate) fn add_registration(&mut self, registration: RegistrationId) {
        self.registrations.push(registration);
    }

    /// Stop delivering. A notification already scheduled still fires but
    /// delivers nothing; registrations and queued records are kept.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Always empty; the pending queue is left untouched.
    // TODO: drain and return `pending` (full takeRecords() semantics).
    pub fn take_records(&self) -> Vec<MutationRecord> {
        Vec::new()
    }

    /// Queue a record and request one deferred notification if none is
    /// outstanding.
    pub(crate) fn enqueue(&mut self, record: MutationRecord, event_loop: &mut EventLoop<Task>) {
        self.pending.push(record);
        if !self.scheduled {
            self.scheduled = true;
            event_loop.set_timeout(Task::NotifyMutationObserver(self.id), 0);
        }
    }

    /// Start the deferred notification: returns the batch to deliver and
    /// the callback to deliver it to, or `None` when nothing is delivered.
    /// Turns do not nest, so the callback is always present here.
    ///
    /// A disconnected observer re-arms `scheduled` without requesting a new
    /// task, so it goes quiet while records keep accumulating.
    pub(crate) fn begin_delivery(&mut self) -> Option<(Vec<MutationRecord>, Box<dyn MutationCallback>)> {
        if !self.connected {
            self.scheduled = true;
            return None;
        }
        self.scheduled = false;
        if self.pending.is_empty() {
            return None;
        }
        let callback = self.callback.take()?;
        Some((std::mem::take(&mut self.pending), callback))
    }

    pub(crate) fn finish_delivery(&mut self, callback: Box<dyn MutationCallback>) {
        self.callback = Some(callback);
    }
}

impl fmt::Debug for MutationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationObserver")
            .field("id", &self.id)
            .field("connected", &self.connected)
            .field("scheduled", &self.scheduled)
            .field("pending", &self.pending.len())
            .field("registrations", &self.registrations)
            .field("in_callback", &self.callback.is_none())
            .finish()
    }
}
