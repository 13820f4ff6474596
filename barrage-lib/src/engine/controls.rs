//! Transport and lifecycle operations for `Barrage`.
//!
//! Methods here coordinate run-state transitions with the dispatch worker
//! and expose the user-facing control surface (enqueue, start/stop, safe-area
//! updates, teardown, and status accessors).

use std::sync::atomic::Ordering;

use log::{info, warn};

use crate::channel::build_channels;
use crate::queue::BarrageItem;
use crate::surface::RenderingSurface;

use super::{dispatch, reconcile, Barrage, RunState};

impl<S: RenderingSurface + 'static> Barrage<S> {
    /// Append an item to the pending queue.
    ///
    /// The item waits its turn; the dispatch loop releases one per tick.
    pub fn enqueue_item(&self, item: BarrageItem) {
        if self.is_inert() {
            return;
        }
        self.shared.queue.lock().unwrap().enqueue(item);
    }

    /// Arm the dispatch loop.
    ///
    /// The first tick fires one full interval from now; starting while
    /// already armed resets the deadline.
    pub fn start(&self) {
        if self.is_inert() {
            return;
        }
        info!("dispatch loop armed");
        *self.shared.run_state.lock().unwrap() = RunState::Armed;
        self.rearm();
    }

    /// Disarm the dispatch loop.
    ///
    /// Pending items stay queued and in-flight traversals keep running (and
    /// are still reconciled); no new items are released until the next
    /// [`Barrage::start`].
    pub fn stop(&self) {
        if self.is_inert() {
            return;
        }
        info!("dispatch loop disarmed");
        *self.shared.run_state.lock().unwrap() = RunState::Idle;
    }

    /// Move the top safe area to `new_safe_area`.
    ///
    /// Rebuilds the lane table, shifts every live element by the difference,
    /// releases one pending item immediately so the layout change feels
    /// responsive, and re-arms the loop with a fresh interval.
    pub fn update_top_safe_area(&self, new_safe_area: f64) {
        if self.is_inert() || !new_safe_area.is_finite() {
            return;
        }

        let delta = {
            let mut safe_area = self.shared.safe_area.lock().unwrap();
            let delta = new_safe_area - *safe_area;
            *safe_area = new_safe_area;
            delta
        };
        info!("safe area moved to {} (delta {})", new_safe_area, delta);

        {
            let options = &self.shared.options;
            let mut channels = self.shared.channels.lock().unwrap();
            *channels = build_channels(
                options.lane_count,
                options.lane_height,
                options.lane_gap,
                new_safe_area,
            );
        }
        reconcile::shift_live_elements(&self.shared, delta);

        // One immediate dispatch bypassing the timer, then a fresh interval.
        dispatch::dispatch_one(&self.shared);
        *self.shared.run_state.lock().unwrap() = RunState::Armed;
        self.rearm();
    }

    /// Tear the engine down: stop the dispatch worker, remove every live
    /// element, and empty the queue.
    ///
    /// Safe to call more than once; the engine is inert afterwards.
    pub fn destroy(&self) {
        self.shared.abort.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker_handle.lock().unwrap().take() {
            info!("tearing down dispatch worker");
            if handle.join().is_err() {
                warn!("dispatch worker panicked during join");
            }
        }

        let handles: Vec<_> = {
            let mut live = self.shared.live.lock().unwrap();
            live.drain(..).map(|element| element.handle).collect()
        };
        {
            let mut surface = self.shared.surface.lock().unwrap();
            for handle in handles {
                surface.remove(handle);
            }
        }

        self.shared.queue.lock().unwrap().clear();
        self.shared.channels.lock().unwrap().clear();
        self.shared.picker.lock().unwrap().reset();
        *self.shared.run_state.lock().unwrap() = RunState::Idle;
        self.inert.store(true, Ordering::SeqCst);
    }

    /// Number of items waiting for a lane.
    pub fn queue_len(&self) -> usize {
        self.shared.queue.lock().unwrap().len()
    }

    /// Number of elements currently traversing.
    pub fn live_len(&self) -> usize {
        self.shared.live.lock().unwrap().len()
    }

    /// Current top safe area.
    pub fn top_safe_area(&self) -> f64 {
        *self.shared.safe_area.lock().unwrap()
    }

    /// Current dispatch-loop state.
    pub fn run_state(&self) -> RunState {
        *self.shared.run_state.lock().unwrap()
    }

    /// True while the worker is alive and the loop is armed.
    pub fn is_running(&self) -> bool {
        self.shared.worker_exists.load(Ordering::SeqCst) && self.run_state() == RunState::Armed
    }

    fn rearm(&self) {
        self.shared.rearm_epoch.fetch_add(1, Ordering::SeqCst);
    }
}
