//! fOS JavaScript Runtime
//!
//! Script-facing pieces of a page that do not need the interpreter itself:
//!
//! - Cooperative event loop (zero-delay timers, macrotasks)
//! - MutationObserver (batched, deferred DOM change notifications)
//! - Page region (bulk allocation released when the page closes)

mod event_loop;
mod page;
mod region;
pub mod mutation;

pub use event_loop::{EventLoop, Task as LoopTask};
pub use page::{Page, PageConfig, Task};
pub use region::{Arena, Idx, PageRegion, RegionStats};
pub use mutation::{
    HandleError, MutationCallback, MutationObserver, MutationObserverInit, MutationRecord,
    MutationType, ObserverError, ObserverId, Registration, RegistrationId,
};

/// JavaScript error
#[derive(Debug, Clone, thiserror::Error)]
pub enum JsError {
    #[error("JavaScript error: {0}")]
    Runtime(String),

    #[error("Type error: {0}")]
    TypeError(String),

    /// A value thrown by script, with the engine's stack trace when known
    #[error("Uncaught exception: {message}")]
    Exception {
        message: String,
        stack: Option<String>,
    },
}

impl JsError {
    /// Stack trace captured by the script engine
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Exception { stack, .. } => stack.as_deref(),
            _ => None,
        }
    }
}
