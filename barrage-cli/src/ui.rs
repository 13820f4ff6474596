//! Terminal rendering for the barrage viewport and status panels.

use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::surface::ElementFrame;

const LOG_PANEL_LINES: usize = 5;

/// Render one frame: the moving elements plus status and log panels.
pub fn draw_overlay(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    frames: &[ElementFrame],
    color: Color,
    status: &str,
    log_lines: &[String],
) {
    let _ = terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(LOG_PANEL_LINES as u16 + 2),
            ])
            .split(f.size());

        f.render_widget(
            Block::default().borders(Borders::ALL).title("Barrage"),
            chunks[0],
        );
        let viewport = chunks[0].inner(&Margin {
            vertical: 1,
            horizontal: 1,
        });
        let style = Style::default().fg(color);
        let buffer = f.buffer_mut();
        for frame in frames {
            draw_element(buffer, viewport, frame, style);
        }

        let status_widget =
            Paragraph::new(status).block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status_widget, chunks[1]);

        let logs_widget = Paragraph::new(tail(log_lines, LOG_PANEL_LINES).join("\n"))
            .block(Block::default().borders(Borders::ALL).title("Log"));
        f.render_widget(logs_widget, chunks[2]);
    });
}

/// Write one element into the viewport, clipping at both horizontal edges.
fn draw_element(buffer: &mut Buffer, area: Rect, frame: &ElementFrame, style: Style) {
    let y = area.top() as i32 + frame.top;
    if frame.top < 0 || y >= area.bottom() as i32 {
        return;
    }
    let y = y as u16;

    for (i, ch) in frame.text.chars().enumerate() {
        let rel_x = frame.left + i as i32;
        if rel_x < 0 {
            continue;
        }
        let abs_x = area.left() as i32 + rel_x;
        if abs_x >= area.right() as i32 {
            break;
        }
        buffer.get_mut(abs_x as u16, y).set_char(ch).set_style(style);
    }
}

fn tail(lines: &[String], count: usize) -> Vec<&str> {
    let start = lines.len().saturating_sub(count);
    lines[start..].iter().map(|line| line.as_str()).collect()
}
