//! High-level overlay playback controller.

mod controls;
mod dispatch;
mod reconcile;
mod runtime;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::warn;

use crate::channel::{build_channels, Channel};
use crate::lane::LanePicker;
use crate::options::BarrageOptions;
use crate::queue::PendingQueue;
use crate::surface::{ElementHandle, RenderingSurface};

/// Dispatch-loop state.
///
/// While `Armed`, a tick fires every dispatch interval and releases at most
/// one pending item. `Idle` leaves the queue untouched; in-flight traversals
/// are still reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Armed,
}

/// Engine-side record of one placed element.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LiveElement {
    pub(crate) handle: ElementHandle,
    pub(crate) channel: usize,
    /// Traversal rate (px/s) recorded at dispatch time, used to resume an
    /// interrupted traversal at the original speed.
    pub(crate) rate: f64,
}

/// Shared engine state, captured by both the controller and the dispatch
/// worker.
pub(crate) struct Shared<S> {
    pub(crate) surface: Arc<Mutex<S>>,
    pub(crate) options: Arc<BarrageOptions>,
    pub(crate) channels: Arc<Mutex<Vec<Channel>>>,
    pub(crate) queue: Arc<Mutex<PendingQueue>>,
    pub(crate) live: Arc<Mutex<Vec<LiveElement>>>,
    pub(crate) picker: Arc<Mutex<LanePicker>>,
    pub(crate) safe_area: Arc<Mutex<f64>>,
    pub(crate) run_state: Arc<Mutex<RunState>>,
    pub(crate) abort: Arc<AtomicBool>,
    pub(crate) worker_exists: Arc<AtomicBool>,
    /// Bumped to make the worker restart its tick deadline.
    pub(crate) rearm_epoch: Arc<AtomicU64>,
}

impl<S> Clone for Shared<S> {
    fn clone(&self) -> Self {
        Self {
            surface: self.surface.clone(),
            options: self.options.clone(),
            channels: self.channels.clone(),
            queue: self.queue.clone(),
            live: self.live.clone(),
            picker: self.picker.clone(),
            safe_area: self.safe_area.clone(),
            run_state: self.run_state.clone(),
            abort: self.abort.clone(),
            worker_exists: self.worker_exists.clone(),
            rearm_epoch: self.rearm_epoch.clone(),
        }
    }
}

/// Lane-scheduled overlay engine.
///
/// `Barrage` owns the pending queue, the lane table, the live-element
/// registry, and the dispatch worker; rendering is delegated to the attached
/// [`RenderingSurface`]. Instances are independent of each other.
pub struct Barrage<S: RenderingSurface> {
    shared: Shared<S>,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
    inert: AtomicBool,
}

impl<S: RenderingSurface + 'static> Barrage<S> {
    /// Build an engine around `surface`.
    ///
    /// A surface that cannot resolve its container produces an inert engine:
    /// no lanes are created and every operation is a harmless no-op.
    /// Otherwise the dispatch loop comes up armed, with its first tick one
    /// full interval out; [`Barrage::stop`] disarms it.
    pub fn new(mut surface: S, options: BarrageOptions) -> Self {
        let options = options.sanitized();
        let resolvable = surface.container().is_some();
        if !resolvable {
            warn!("container unresolvable; engine is inert");
        } else if options.lane_count == 0 {
            warn!("lane_count is 0; dispatched items will queue indefinitely");
        }
        surface.configure(&options);

        let channels = if resolvable {
            build_channels(
                options.lane_count,
                options.lane_height,
                options.lane_gap,
                options.safe_area,
            )
        } else {
            Vec::new()
        };

        let (sender, receiver) = std::sync::mpsc::channel();
        surface.connect_events(sender);

        let shared = Shared {
            surface: Arc::new(Mutex::new(surface)),
            queue: Arc::new(Mutex::new(PendingQueue::new(
                options.max_queue_len,
                options.overflow,
            ))),
            channels: Arc::new(Mutex::new(channels)),
            live: Arc::new(Mutex::new(Vec::new())),
            picker: Arc::new(Mutex::new(LanePicker::new())),
            safe_area: Arc::new(Mutex::new(options.safe_area)),
            run_state: Arc::new(Mutex::new(if resolvable {
                RunState::Armed
            } else {
                RunState::Idle
            })),
            abort: Arc::new(AtomicBool::new(false)),
            worker_exists: Arc::new(AtomicBool::new(false)),
            rearm_epoch: Arc::new(AtomicU64::new(0)),
            options: Arc::new(options),
        };

        let engine = Self {
            shared,
            worker_handle: Mutex::new(None),
            inert: AtomicBool::new(!resolvable),
        };
        if resolvable {
            engine.initialize_thread(receiver);
        }
        engine
    }

    /// The effective (sanitized) engine options.
    pub fn options(&self) -> &BarrageOptions {
        &self.shared.options
    }

    /// Clone of the attached surface handle, for callers that also drive its
    /// rendering.
    pub fn surface(&self) -> Arc<Mutex<S>> {
        self.shared.surface.clone()
    }

    pub(crate) fn is_inert(&self) -> bool {
        self.inert.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::mpsc::Sender;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::queue::BarrageItem;
    use crate::surface::{ContainerGeometry, ElementGeometry, Placement, SurfaceEvent};

    #[derive(Default)]
    struct MockState {
        container_width: Option<f64>,
        element_width: f64,
        next_id: u64,
        placed: Vec<(String, f64, Duration)>,
        geometry: HashMap<u64, ElementGeometry>,
        shifts: Vec<(u64, f64)>,
        restarts: Vec<(u64, Duration)>,
        removed: Vec<u64>,
        events: Option<Sender<SurfaceEvent>>,
    }

    /// Recording surface; clones share state so tests can observe the
    /// instance handed to the engine.
    #[derive(Clone)]
    struct MockSurface {
        state: Arc<Mutex<MockState>>,
    }

    impl MockSurface {
        fn new(container_width: Option<f64>, element_width: f64) -> Self {
            Self {
                state: Arc::new(Mutex::new(MockState {
                    container_width,
                    element_width,
                    ..MockState::default()
                })),
            }
        }

        fn placed_texts(&self) -> Vec<String> {
            self.state
                .lock()
                .unwrap()
                .placed
                .iter()
                .map(|(text, _, _)| text.clone())
                .collect()
        }

        fn fire_traversal_end(&self, id: u64) {
            let state = self.state.lock().unwrap();
            state
                .events
                .as_ref()
                .expect("events connected")
                .send(SurfaceEvent::TraversalEnded(ElementHandle(id)))
                .expect("worker alive");
        }
    }

    impl RenderingSurface for MockSurface {
        fn container(&self) -> Option<ContainerGeometry> {
            self.state
                .lock()
                .unwrap()
                .container_width
                .map(|width| ContainerGeometry { width })
        }

        fn connect_events(&mut self, events: Sender<SurfaceEvent>) {
            self.state.lock().unwrap().events = Some(events);
        }

        fn place(&mut self, item: &BarrageItem, placement: Placement) -> ElementHandle {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let id = state.next_id;
            let left = state.container_width.unwrap_or(0.0);
            let width = state.element_width;
            state
                .placed
                .push((item.text.clone(), placement.top, placement.duration));
            state.geometry.insert(id, ElementGeometry { left, width });
            ElementHandle(id)
        }

        fn geometry(&self, handle: ElementHandle) -> Option<ElementGeometry> {
            self.state.lock().unwrap().geometry.get(&handle.0).copied()
        }

        fn shift_vertical(&mut self, handle: ElementHandle, delta: f64) {
            self.state.lock().unwrap().shifts.push((handle.0, delta));
        }

        fn restart_traversal(&mut self, handle: ElementHandle, duration: Duration) {
            self.state.lock().unwrap().restarts.push((handle.0, duration));
        }

        fn remove(&mut self, handle: ElementHandle) {
            let mut state = self.state.lock().unwrap();
            state.geometry.remove(&handle.0);
            state.removed.push(handle.0);
        }
    }

    fn options_with_interval(dispatch_interval_ms: u64) -> BarrageOptions {
        BarrageOptions {
            dispatch_interval_ms,
            ..BarrageOptions::default()
        }
    }

    /// A deadline far enough out that no natural tick fires mid-test.
    const NEVER_MS: u64 = 600_000;

    #[test]
    fn backlog_drains_one_item_per_tick_in_fifo_order() {
        let mock = MockSurface::new(Some(200.0), 20.0);
        let engine = Barrage::new(mock.clone(), options_with_interval(120));
        for text in ["a", "b", "c"] {
            engine.enqueue_item(BarrageItem::text(text));
        }
        engine.start();

        // No tick fires before the first interval elapses.
        thread::sleep(Duration::from_millis(40));
        assert!(mock.placed_texts().is_empty());

        thread::sleep(Duration::from_millis(560));
        assert_eq!(mock.placed_texts(), vec!["a", "b", "c"]);
        assert_eq!(engine.queue_len(), 0);
        assert_eq!(engine.live_len(), 3);
        engine.destroy();
    }

    #[test]
    fn ticks_release_at_most_one_item() {
        let mock = MockSurface::new(Some(200.0), 20.0);
        let engine = Barrage::new(mock.clone(), options_with_interval(200));
        engine.enqueue_item(BarrageItem::text("first"));
        engine.enqueue_item(BarrageItem::text("second"));
        engine.start();

        // Past the first tick, well before the second.
        thread::sleep(Duration::from_millis(290));
        assert_eq!(mock.placed_texts(), vec!["first"]);
        assert_eq!(engine.queue_len(), 1);
        engine.destroy();
    }

    #[test]
    fn stop_leaves_the_backlog_queued() {
        let mock = MockSurface::new(Some(200.0), 20.0);
        let engine = Barrage::new(mock.clone(), options_with_interval(200));
        engine.enqueue_item(BarrageItem::text("first"));
        engine.enqueue_item(BarrageItem::text("second"));
        engine.start();

        thread::sleep(Duration::from_millis(290));
        engine.stop();
        assert!(!engine.is_running());

        thread::sleep(Duration::from_millis(400));
        assert_eq!(mock.placed_texts(), vec!["first"]);
        assert_eq!(engine.queue_len(), 1);
        engine.destroy();
    }

    #[test]
    fn safe_area_update_shifts_live_elements_and_dispatches_immediately() {
        let mut options = options_with_interval(NEVER_MS);
        options.lane_count = 1;
        let mock = MockSurface::new(Some(50.0), 100.0);
        let engine = Barrage::new(mock.clone(), options);

        engine.enqueue_item(BarrageItem::text("x"));
        engine.start();
        assert!(mock.placed_texts().is_empty());

        // Forces the dispatch without waiting out the interval.
        engine.update_top_safe_area(0.0);
        assert_eq!(mock.placed_texts(), vec!["x"]);
        assert_eq!(engine.live_len(), 1);
        {
            let state = mock.state.lock().unwrap();
            assert_eq!(state.placed[0].1, 0.0);
        }

        engine.update_top_safe_area(20.0);
        {
            let state = mock.state.lock().unwrap();
            assert_eq!(state.shifts, vec![(1, 20.0)]);
            // Horizontal progress and rate stay untouched.
            assert!(state.restarts.is_empty());
            assert!(state.removed.is_empty());
        }
        assert_eq!(engine.top_safe_area(), 20.0);
        engine.destroy();
    }

    #[test]
    fn interrupted_traversal_resumes_with_remaining_time() {
        // rate = (element 100 + container 50) / 6s travel = 25 px/s.
        let mock = MockSurface::new(Some(50.0), 100.0);
        let engine = Barrage::new(mock.clone(), options_with_interval(NEVER_MS));
        engine.enqueue_item(BarrageItem::text("x"));
        engine.update_top_safe_area(0.0);
        assert_eq!(engine.live_len(), 1);

        // Element still visible at left=50: remaining (50+100)/25 = 6s.
        mock.fire_traversal_end(1);
        thread::sleep(Duration::from_millis(150));
        {
            let state = mock.state.lock().unwrap();
            assert_eq!(state.restarts.len(), 1);
            assert_eq!(state.restarts[0].0, 1);
            assert!((state.restarts[0].1.as_secs_f64() - 6.0).abs() < 1e-9);
            assert!(state.removed.is_empty());
        }
        assert_eq!(engine.live_len(), 1);
        engine.destroy();
    }

    #[test]
    fn cleared_traversal_detaches_and_removes_the_element() {
        let mock = MockSurface::new(Some(50.0), 100.0);
        let engine = Barrage::new(mock.clone(), options_with_interval(NEVER_MS));
        engine.enqueue_item(BarrageItem::text("x"));
        engine.update_top_safe_area(0.0);

        mock.state.lock().unwrap().geometry.insert(
            1,
            ElementGeometry {
                left: -100.0,
                width: 100.0,
            },
        );
        mock.fire_traversal_end(1);
        thread::sleep(Duration::from_millis(150));
        {
            let state = mock.state.lock().unwrap();
            assert_eq!(state.removed, vec![1]);
            assert!(state.restarts.is_empty());
        }
        assert_eq!(engine.live_len(), 0);
        engine.destroy();
    }

    #[test]
    fn destroy_twice_is_clean() {
        let mock = MockSurface::new(Some(50.0), 10.0);
        let engine = Barrage::new(mock.clone(), options_with_interval(NEVER_MS));
        engine.enqueue_item(BarrageItem::text("x"));
        engine.enqueue_item(BarrageItem::text("y"));
        engine.update_top_safe_area(0.0);
        assert_eq!(engine.live_len(), 1);

        for _ in 0..2 {
            engine.destroy();
            assert_eq!(engine.queue_len(), 0);
            assert_eq!(engine.live_len(), 0);
            assert!(!engine.is_running());
            assert_eq!(engine.run_state(), RunState::Idle);
            assert_eq!(mock.state.lock().unwrap().removed, vec![1]);
        }

        // A destroyed engine is inert.
        engine.enqueue_item(BarrageItem::text("z"));
        assert_eq!(engine.queue_len(), 0);
    }

    #[test]
    fn zero_lanes_accumulate_items_without_dispatching() {
        let mut options = options_with_interval(100);
        options.lane_count = 0;
        let mock = MockSurface::new(Some(200.0), 20.0);
        let engine = Barrage::new(mock.clone(), options);
        engine.enqueue_item(BarrageItem::text("a"));
        engine.enqueue_item(BarrageItem::text("b"));
        engine.start();

        thread::sleep(Duration::from_millis(350));
        assert!(mock.placed_texts().is_empty());
        assert_eq!(engine.queue_len(), 2);
        engine.destroy();
    }

    #[test]
    fn unresolvable_container_makes_the_engine_inert() {
        let mock = MockSurface::new(None, 0.0);
        let engine = Barrage::new(mock.clone(), BarrageOptions::default());

        engine.enqueue_item(BarrageItem::text("lost"));
        engine.start();
        engine.update_top_safe_area(30.0);

        assert_eq!(engine.queue_len(), 0);
        assert!(!engine.is_running());
        assert!(mock.placed_texts().is_empty());
        engine.destroy();
    }
}
