//! Terminal rendering surface.
//!
//! Maps the engine's pixel units onto terminal cells, one column/row per
//! unit. Element positions are interpolated from wall-clock time each frame;
//! traversals that reach their natural end are reported over the connected
//! event channel, and the engine decides whether to resume or remove them.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use ratatui::style::Color;

use barrage_lib::options::BarrageOptions;
use barrage_lib::queue::BarrageItem;
use barrage_lib::surface::{
    ContainerGeometry, ElementGeometry, ElementHandle, Placement, RenderingSurface, SurfaceEvent,
};

/// Placeholder glyph for items that carry an image reference.
const AVATAR_GLYPH: char = '\u{25c9}';

/// One moving element.
struct Element {
    text: String,
    top: f64,
    width: f64,
    from_x: f64,
    to_x: f64,
    started: Instant,
    duration: Duration,
    /// Set once the natural end of the current traversal was reported.
    notified: bool,
}

impl Element {
    /// Left edge at `now`, linearly interpolated along the traversal.
    fn left(&self, now: Instant) -> f64 {
        let total = self.duration.as_secs_f64();
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        if total <= 0.0 || elapsed >= total {
            return self.to_x;
        }
        self.from_x + (self.to_x - self.from_x) * (elapsed / total)
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Drawable snapshot of one element, in cell units.
pub struct ElementFrame {
    pub text: String,
    pub left: i32,
    pub top: i32,
}

/// Rendering surface that scrolls text across the terminal.
pub struct TerminalSurface {
    width: f64,
    next_id: u64,
    elements: HashMap<u64, Element>,
    events: Option<Sender<SurfaceEvent>>,
    color: Color,
}

impl TerminalSurface {
    /// Create a surface spanning `width` terminal columns.
    pub fn new(width: u16) -> Self {
        Self {
            width: width as f64,
            next_id: 0,
            elements: HashMap::new(),
            events: None,
            color: Color::White,
        }
    }

    /// Track a terminal resize. In-flight elements keep their targets.
    pub fn resize(&mut self, width: u16) {
        self.width = width as f64;
    }

    /// Text color resolved from the engine options.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Report traversals that reached their natural end since the last call.
    pub fn pump(&mut self) {
        let now = Instant::now();
        for (id, element) in self.elements.iter_mut() {
            if !element.notified && element.finished(now) {
                element.notified = true;
                if let Some(events) = &self.events {
                    let _ = events.send(SurfaceEvent::TraversalEnded(ElementHandle(*id)));
                }
            }
        }
    }

    /// Snapshot of every element for rendering, in cell units.
    pub fn frames(&self) -> Vec<ElementFrame> {
        let now = Instant::now();
        self.elements
            .values()
            .map(|element| ElementFrame {
                text: element.text.clone(),
                left: element.left(now).round() as i32,
                top: element.top.round() as i32,
            })
            .collect()
    }
}

impl RenderingSurface for TerminalSurface {
    fn container(&self) -> Option<ContainerGeometry> {
        if self.width > 0.0 {
            Some(ContainerGeometry { width: self.width })
        } else {
            None
        }
    }

    fn configure(&mut self, options: &BarrageOptions) {
        self.color = parse_color(&options.color);
    }

    fn connect_events(&mut self, events: Sender<SurfaceEvent>) {
        self.events = Some(events);
    }

    fn place(&mut self, item: &BarrageItem, placement: Placement) -> ElementHandle {
        let text = match &item.image {
            Some(_) => format!("{} {}", AVATAR_GLYPH, item.text),
            None => item.text.clone(),
        };
        let width = text.chars().count() as f64;

        self.next_id += 1;
        self.elements.insert(
            self.next_id,
            Element {
                text,
                top: placement.top,
                width,
                // Fully off the right edge, traversing to fully off the left.
                from_x: self.width,
                to_x: -width,
                started: Instant::now(),
                duration: placement.duration,
                notified: false,
            },
        );
        ElementHandle(self.next_id)
    }

    fn geometry(&self, handle: ElementHandle) -> Option<ElementGeometry> {
        let element = self.elements.get(&handle.0)?;
        Some(ElementGeometry {
            left: element.left(Instant::now()),
            width: element.width,
        })
    }

    fn shift_vertical(&mut self, handle: ElementHandle, delta: f64) {
        if let Some(element) = self.elements.get_mut(&handle.0) {
            element.top += delta;
        }
    }

    fn restart_traversal(&mut self, handle: ElementHandle, duration: Duration) {
        let now = Instant::now();
        if let Some(element) = self.elements.get_mut(&handle.0) {
            element.from_x = element.left(now);
            element.to_x = -element.width;
            element.started = now;
            element.duration = duration;
            element.notified = false;
        }
    }

    fn remove(&mut self, handle: ElementHandle) {
        self.elements.remove(&handle.0);
    }
}

/// Best-effort parse of a CSS-style color; unknown values fall back to white.
fn parse_color(value: &str) -> Color {
    let value = value.trim().to_lowercase();
    if let Some(rgb) = value.strip_prefix("rgb(").and_then(|v| v.strip_suffix(')')) {
        let parts: Vec<u8> = rgb
            .split(',')
            .filter_map(|part| part.trim().parse::<u8>().ok())
            .collect();
        if parts.len() == 3 {
            return Color::Rgb(parts[0], parts[1], parts[2]);
        }
        return Color::White;
    }
    match value.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        _ => Color::White,
    }
}
