//! MutationObserver
//!
//! Turns the DOM's synchronous primitive mutation events into batched
//! `MutationRecord` lists delivered to script callbacks on a later tick.
//!
//! - [`applies`]: decides whether one primitive event is visible to one
//!   registration
//! - [`Registration`]: one `observe(node, options)` call
//! - [`MutationObserver`]: pending queue, scheduling flag, callback

mod applies;
mod observer;
mod options;
mod record;
mod registration;

pub use applies::applies_to;
pub use observer::{MutationCallback, MutationObserver, ObserverId};
pub use options::MutationObserverInit;
pub use record::{MutationRecord, MutationType};
pub use registration::{Registration, RegistrationId};

use fos_dom::{DomError, NodeId};

/// Errors surfaced to the script caller
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// `observe()` got a node that is not part of the page
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error("unknown mutation observer {0:?}")]
    UnknownObserver(ObserverId),
}

/// Failure to turn one primitive event into a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    #[error("event target {0:?} is not a live node")]
    InvalidTarget(NodeId),
}
