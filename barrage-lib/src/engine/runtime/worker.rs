//! Dispatch worker loop implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::WORKER_POLL_MS;
use crate::surface::{RenderingSurface, SurfaceEvent};

use super::super::{dispatch, reconcile, RunState, Shared};

/// Captured shared state passed from `Barrage::initialize_thread` into the
/// detached worker thread.
pub(in crate::engine) struct WorkerContext<S> {
    pub(in crate::engine) shared: Shared<S>,
    pub(in crate::engine) events: Receiver<SurfaceEvent>,
}

/// Guard that keeps `worker_exists` in sync with worker lifetime.
struct WorkerGuard {
    exists: Arc<AtomicBool>,
}

impl WorkerGuard {
    fn new(exists: Arc<AtomicBool>) -> Self {
        exists.store(true, Ordering::Relaxed);
        Self { exists }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        self.exists.store(false, Ordering::Relaxed);
    }
}

/// Run the dispatch loop until aborted.
///
/// The loop owns the single tick deadline: while armed, one tick fires per
/// dispatch interval, and the next tick is scheduled only after the current
/// body completes, so ticks never overlap. Between ticks the worker drains
/// surface events (traversal completions) and watches the rearm epoch, which
/// restarts the deadline when a control operation requests it.
pub(in crate::engine) fn run_dispatch_loop<S: RenderingSurface>(ctx: WorkerContext<S>) {
    let _guard = WorkerGuard::new(ctx.shared.worker_exists.clone());
    let interval = Duration::from_millis(ctx.shared.options.dispatch_interval_ms);
    let poll = Duration::from_millis(WORKER_POLL_MS);

    let mut seen_epoch = ctx.shared.rearm_epoch.load(Ordering::SeqCst);
    let mut next_tick = Instant::now() + interval;

    loop {
        if ctx.shared.abort.load(Ordering::SeqCst) {
            break;
        }

        match ctx.events.recv_timeout(poll) {
            Ok(SurfaceEvent::TraversalEnded(handle)) => {
                reconcile::handle_traversal_end(&ctx.shared, handle);
            }
            Err(RecvTimeoutError::Timeout) => {}
            // The surface dropped its sender; keep ticking regardless.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(poll),
        }

        let epoch = ctx.shared.rearm_epoch.load(Ordering::SeqCst);
        if epoch != seen_epoch {
            seen_epoch = epoch;
            next_tick = Instant::now() + interval;
        }

        let armed = { *ctx.shared.run_state.lock().unwrap() == RunState::Armed };
        if armed && Instant::now() >= next_tick {
            dispatch::dispatch_one(&ctx.shared);
            next_tick = Instant::now() + interval;
        }
    }
}
