//! Rendering-surface collaborator contract.
//!
//! The engine owns scheduling, lane assignment, and reconciliation math;
//! element construction, styling, and the traversal animation itself belong
//! to a [`RenderingSurface`] implementation. The boundary is intentionally
//! mechanical so surfaces stay thin.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::options::BarrageOptions;
use crate::queue::BarrageItem;

/// Opaque identifier for a placed element, issued by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

/// Horizontal extent of the container elements traverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    pub width: f64,
}

/// Current bounding box of a placed element, container-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    /// Distance from the container's left edge to the element's left edge.
    /// Negative once the element starts leaving on the left.
    pub left: f64,
    pub width: f64,
}

/// Where and how a dispatched item enters the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Vertical offset of the assigned lane, in the same px units as
    /// [`ElementGeometry`].
    pub top: f64,
    /// Wall-clock duration of the full traversal.
    pub duration: Duration,
}

/// Notifications a surface reports back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A traversal animation reached its natural end. The element may or may
    /// not have fully cleared the container; the engine decides whether to
    /// resume or remove it.
    TraversalEnded(ElementHandle),
}

/// A rendering surface turns dispatched items into moving visual elements.
///
/// Elements enter fully off the container's right edge and traverse toward
/// fully off the left edge over the placement duration. Surfaces report the
/// natural end of each traversal on the channel connected via
/// [`RenderingSurface::connect_events`].
pub trait RenderingSurface: Send {
    /// Resolve the container, if any. An engine built over a surface with no
    /// container is inert.
    fn container(&self) -> Option<ContainerGeometry>;

    /// Receive the style portion of the engine options. Surfaces interpret
    /// what they understand and ignore the rest.
    fn configure(&mut self, _options: &BarrageOptions) {}

    /// Connect the channel traversal events are reported on. Called once,
    /// when the engine attaches to the surface.
    fn connect_events(&mut self, events: Sender<SurfaceEvent>);

    /// Create a moving element for `item` and start its traversal.
    fn place(&mut self, item: &BarrageItem, placement: Placement) -> ElementHandle;

    /// Current bounding box of `handle`, or `None` once it no longer exists.
    fn geometry(&self, handle: ElementHandle) -> Option<ElementGeometry>;

    /// Move `handle` vertically by `delta` without touching its horizontal
    /// traversal.
    fn shift_vertical(&mut self, handle: ElementHandle, delta: f64);

    /// Continue the traversal of `handle` from its current position to fully
    /// off the left edge over `duration`.
    fn restart_traversal(&mut self, handle: ElementHandle, duration: Duration);

    /// Destroy `handle` and release its resources.
    fn remove(&mut self, handle: ElementHandle);
}
