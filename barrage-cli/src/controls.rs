//! Keyboard handling and status text.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use barrage_lib::engine::Barrage;
use barrage_lib::queue::BarrageItem;

use crate::surface::TerminalSurface;

/// Values shown in the status panel.
pub struct StatusSnapshot {
    pub running: bool,
    pub queued: usize,
    pub live: usize,
    pub safe_area: f64,
}

pub fn status_text(status: &StatusSnapshot) -> String {
    format!(
        "{} | queued: {} | live: {} | safe area: {:.0}  ::  space pause/resume, up/down safe area, e enqueue, q quit",
        if status.running { "running" } else { "paused" },
        status.queued,
        status.live,
        status.safe_area,
    )
}

/// Drain pending terminal events. Returns `false` once the user quits.
pub fn handle_events(
    engine: &Barrage<TerminalSurface>,
    surface: &Arc<Mutex<TerminalSurface>>,
    paused: &mut bool,
) -> bool {
    while event::poll(Duration::from_millis(0)).unwrap_or(false) {
        let event = match event::read() {
            Ok(event) => event,
            Err(_) => return true,
        };
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return false,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return false
                    }
                    KeyCode::Char(' ') => {
                        if *paused {
                            engine.start();
                        } else {
                            engine.stop();
                        }
                        *paused = !*paused;
                    }
                    KeyCode::Up => {
                        // Safe-area updates re-arm the dispatch loop.
                        engine.update_top_safe_area((engine.top_safe_area() - 1.0).max(0.0));
                        *paused = false;
                    }
                    KeyCode::Down => {
                        engine.update_top_safe_area(engine.top_safe_area() + 1.0);
                        *paused = false;
                    }
                    KeyCode::Char('e') => {
                        engine.enqueue_item(BarrageItem::text("you pressed e"));
                    }
                    _ => {}
                }
            }
            Event::Resize(width, _) => surface.lock().unwrap().resize(width),
            _ => {}
        }
    }
    true
}
