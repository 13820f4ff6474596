//! One dispatch attempt: release the head pending item into a lane.

use std::time::Duration;

use log::debug;

use crate::surface::{Placement, RenderingSurface};

use super::{LiveElement, Shared};

/// Dequeue at most one pending item and hand it to the rendering surface.
///
/// Nothing is dequeued unless a usable lane exists: with an empty lane table
/// or an unresolvable container the backlog is left intact. Returns `true`
/// when an item was dispatched.
pub(in crate::engine) fn dispatch_one<S: RenderingSurface>(shared: &Shared<S>) -> bool {
    if shared.queue.lock().unwrap().is_empty() {
        return false;
    }

    let container = { shared.surface.lock().unwrap().container() };
    let container = match container {
        Some(container) => container,
        None => {
            debug!("container vanished; leaving items queued");
            return false;
        }
    };

    let slot = {
        let channels = shared.channels.lock().unwrap();
        if channels.is_empty() {
            return false;
        }
        let mut picker = shared.picker.lock().unwrap();
        picker
            .pick(channels.len())
            .map(|index| (index, channels[index].top_offset))
    };
    let (channel_index, top) = match slot {
        Some(slot) => slot,
        None => return false,
    };

    let item = { shared.queue.lock().unwrap().dequeue_one() };
    let item = match item {
        Some(item) => item,
        None => return false,
    };

    let duration = Duration::from_secs_f64(shared.options.travel_secs);
    let (handle, width) = {
        let mut surface = shared.surface.lock().unwrap();
        let handle = surface.place(&item, Placement { top, duration });
        let width = surface.geometry(handle).map(|g| g.width).unwrap_or(0.0);
        (handle, width)
    };

    // Full traversal covers the element width plus the container width.
    let rate = (width + container.width) / shared.options.travel_secs;
    shared.live.lock().unwrap().push(LiveElement {
        handle,
        channel: channel_index,
        rate,
    });
    debug!(
        "dispatched into lane {} at {:.1} px/s ({:?})",
        channel_index, rate, handle
    );
    true
}
