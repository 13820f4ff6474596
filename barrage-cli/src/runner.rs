//! CLI wiring: options, engine + surface construction, and the draw loop.

use std::collections::VecDeque;
use std::error::Error;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::{Duration, Instant};

use clap::ArgMatches;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use barrage_lib::engine::Barrage;
use barrage_lib::options::BarrageOptions;
use barrage_lib::queue::BarrageItem;

use crate::{controls, logging, surface::TerminalSurface, ui};

const DEMO_MESSAGES: [&str; 8] = [
    "first!",
    "this engine is smooth",
    "hello from the back row",
    "no collisions today",
    "coast to coast in six seconds",
    "lane three best lane",
    "pure terminal magic",
    "gg everyone",
];

pub fn run(
    args: &ArgMatches,
    log_buffer: Arc<Mutex<VecDeque<String>>>,
) -> Result<i32, Box<dyn Error>> {
    if let Some(("create", create)) = args.subcommand() {
        return match create.subcommand() {
            Some(("options-json", _)) => {
                println!("{}", BarrageOptions::template_json());
                Ok(0)
            }
            _ => {
                log::error!("unknown create target");
                Ok(-1)
            }
        };
    }

    info!("starting barrage CLI");

    let mut options = match args.get_one::<String>("options-json") {
        Some(path) => BarrageOptions::from_json_file(path)?,
        None => BarrageOptions::default(),
    };
    // Terminal cells, not pixels: lanes are one row tall here.
    options.lane_count = parse(args, "lanes")?;
    options.lane_height = 1.0;
    options.lane_gap = parse(args, "lane-gap")?;
    options.safe_area = parse(args, "safe-area")?;
    options.travel_secs = parse(args, "travel-secs")?;
    options.dispatch_interval_ms = parse(args, "interval-ms")?;

    let feed_ms: u64 = parse(args, "feed-ms")?;
    let feed_interval = Duration::from_millis(feed_ms.max(1));
    let messages = seed_messages(args);
    let quiet = args.get_flag("quiet");

    let (width, _height) = terminal::size()?;
    let engine = Barrage::new(TerminalSurface::new(width), options);
    let surface = engine.surface();
    let color = { surface.lock().unwrap().color() };
    engine.start();

    let _raw_mode = RawModeGuard::enable().ok();
    let mut terminal = if !quiet {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, EnterAlternateScreen, cursor::Hide);
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).ok()
    } else {
        None
    };

    let mut paused = false;
    let mut next_feed = Instant::now();
    let mut feed_index = 0usize;

    // Feed / animate / draw / input loop.
    loop {
        if Instant::now() >= next_feed {
            engine.enqueue_item(messages[feed_index % messages.len()].clone());
            feed_index += 1;
            next_feed += feed_interval;
        }

        {
            surface.lock().unwrap().pump();
        }

        if let Some(term) = terminal.as_mut() {
            let frames = { surface.lock().unwrap().frames() };
            let status = controls::status_text(&controls::StatusSnapshot {
                running: engine.is_running(),
                queued: engine.queue_len(),
                live: engine.live_len(),
                safe_area: engine.top_safe_area(),
            });
            let log_lines = logging::snapshot(&log_buffer);
            ui::draw_overlay(term, &frames, color, &status, &log_lines);
        }

        if !controls::handle_events(&engine, &surface, &mut paused) {
            break;
        }

        sleep(Duration::from_millis(50));
    }

    engine.destroy();

    // Restore the terminal state before exiting.
    if let Some(mut term) = terminal {
        let _ = term.show_cursor();
        let stdout = term.backend_mut();
        let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
    }

    Ok(0)
}

fn parse<T>(args: &ArgMatches, name: &str) -> Result<T, Box<dyn Error>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    args.get_one::<String>(name)
        .unwrap()
        .parse::<T>()
        .map_err(|err| format!("invalid --{} value: {}", name, err).into())
}

fn seed_messages(args: &ArgMatches) -> Vec<BarrageItem> {
    match args.get_many::<String>("message") {
        Some(values) => values.map(|text| BarrageItem::text(text.clone())).collect(),
        None => DEMO_MESSAGES
            .iter()
            .map(|text| BarrageItem::text(*text))
            .collect(),
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
