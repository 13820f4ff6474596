//! Dispatch-worker bootstrap for `Barrage`.

use std::sync::atomic::Ordering;
use std::sync::mpsc::Receiver;
use std::thread;

use crate::surface::{RenderingSurface, SurfaceEvent};

use super::super::Barrage;
use super::worker::{run_dispatch_loop, WorkerContext};

impl<S: RenderingSurface + 'static> Barrage<S> {
    /// Spawn the dispatch worker for this engine.
    ///
    /// Called once at construction; the worker stays alive, armed or not,
    /// until `destroy` aborts it.
    pub(in crate::engine) fn initialize_thread(&self, events: Receiver<SurfaceEvent>) {
        self.shared.worker_exists.store(true, Ordering::SeqCst);

        let context = WorkerContext {
            shared: self.shared.clone(),
            events,
        };
        let handle = thread::spawn(move || run_dispatch_loop(context));
        *self.worker_handle.lock().unwrap() = Some(handle);
    }
}
