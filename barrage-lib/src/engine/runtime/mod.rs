//! Internal runtime plumbing for the dispatch worker thread.
//!
//! The runtime is split so construction-time concerns stay separate from the
//! long-lived loop:
//! - [`thread`] handles thread bootstrap and shared state capture.
//! - [`worker`] runs the tick/reconcile loop.

mod thread;
mod worker;
