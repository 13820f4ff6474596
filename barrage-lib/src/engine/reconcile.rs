//! In-flight traversal reconciliation.

use std::time::Duration;

use log::debug;

use crate::surface::{ElementHandle, RenderingSurface};

use super::Shared;

/// Shift every live element vertically by `delta`, leaving horizontal
/// progress and rate untouched.
pub(in crate::engine) fn shift_live_elements<S: RenderingSurface>(shared: &Shared<S>, delta: f64) {
    let handles: Vec<ElementHandle> = {
        let live = shared.live.lock().unwrap();
        live.iter().map(|element| element.handle).collect()
    };
    if handles.is_empty() {
        return;
    }

    let mut surface = shared.surface.lock().unwrap();
    for handle in handles {
        surface.shift_vertical(handle, delta);
    }
}

/// Handle the natural end of a traversal animation.
///
/// A traversal can end with the element still inside the container when a
/// layout change left its horizontal transition stale. In that case the
/// remaining distance is `left + width` and the traversal resumes from the
/// current position at the rate recorded at dispatch. Once the left edge has
/// cleared the container the element is detached and removed.
pub(in crate::engine) fn handle_traversal_end<S: RenderingSurface>(
    shared: &Shared<S>,
    handle: ElementHandle,
) {
    let record = {
        let live = shared.live.lock().unwrap();
        live.iter()
            .find(|element| element.handle == handle)
            .map(|element| (element.rate, element.channel))
    };
    let (rate, channel) = match record {
        // Already detached; a late event for a removed element is harmless.
        Some(record) => record,
        None => return,
    };

    let geometry = { shared.surface.lock().unwrap().geometry(handle) };
    let geometry = match geometry {
        Some(geometry) => geometry,
        None => {
            detach(shared, handle);
            return;
        }
    };

    if geometry.left > 0.0 && rate > 0.0 {
        let remaining = geometry.left + geometry.width;
        let duration = Duration::from_secs_f64(remaining / rate);
        debug!(
            "traversal interrupted at left={:.1}; resuming for {:.2}s",
            geometry.left,
            duration.as_secs_f64()
        );
        shared
            .surface
            .lock()
            .unwrap()
            .restart_traversal(handle, duration);
    } else {
        debug!("traversal complete; removing element from lane {}", channel);
        detach(shared, handle);
        shared.surface.lock().unwrap().remove(handle);
    }
}

fn detach<S>(shared: &Shared<S>, handle: ElementHandle) {
    shared
        .live
        .lock()
        .unwrap()
        .retain(|element| element.handle != handle);
}
