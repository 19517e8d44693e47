//! Fractal clock driver: one tree per frame, drawn as braille

use crate::canvas::BrailleCanvas;
use crate::colors::{self, ColorState, Palette};
use crate::config::{ClockConfig, RunConfig};
use crate::geometry::{build_frame, Frame};
use crate::help::{render_help_overlay, CLOCK_HELP};
use crate::render::{render, Surface};
use crate::stats::{FrameSample, FrameStats, FrameTimer};
use crate::terminal::Terminal;
use chrono::{Local, NaiveTime};
use crossterm::event::KeyCode;
use crossterm::style::Color;
use crossterm::terminal::size;
use std::io;
use std::time::Instant;

/// Print mode size when stdout is not a terminal
const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Build and paint one frame, then encode it into `term`
pub fn draw_frame(
    term: &mut Terminal,
    canvas: &mut BrailleCanvas,
    now: NaiveTime,
    clock: &ClockConfig,
    palette: &Palette,
) -> Frame {
    let frame = build_frame(now, canvas.size(), clock);
    render(&frame, clock, palette, canvas);
    term.clear();
    canvas.blit(term, palette.background);
    frame
}

pub fn run(config: RunConfig) -> io::Result<()> {
    let mut term = Terminal::new(true)?;
    let mut colors = ColorState::new(config.palette);
    let mut show_help = false;
    let mut show_fps = config.show_fps;
    let mut paused = false;

    let (mut w, mut h) = term.size();
    let mut canvas = BrailleCanvas::new(w, h, config.clock.zoom);
    let mut stats = FrameStats::new();
    let mut timer = FrameTimer::new();

    loop {
        if let Some((code, _mods)) = term.check_key()? {
            if !colors.handle_key(code) {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') => {
                        paused = !paused;
                        if !paused {
                            timer.reset();
                        }
                    }
                    KeyCode::Char('f') | KeyCode::Char('F') => show_fps = !show_fps,
                    KeyCode::Char('?') => show_help = !show_help,
                    _ => {}
                }
            }
        }

        if let Ok((new_w, new_h)) = size() {
            if new_w != w || new_h != h {
                w = new_w;
                h = new_h;
                term.resize(w, h);
                term.clear_screen()?;
                canvas = BrailleCanvas::new(w, h, config.clock.zoom);
                log::debug!("resized to {}x{} cells", w, h);
            }
        }

        // Guard against zero-size terminal
        if w == 0 || h == 0 {
            term.sleep(0.1);
            continue;
        }

        let palette = colors.palette();
        if paused {
            // Keep the last painted frame, overlays still update
            term.clear();
            canvas.blit(&mut term, palette.background);
        } else {
            let started = Instant::now();
            let interval = timer.start(started);
            let frame = build_frame(Local::now().time(), canvas.size(), &config.clock);
            let built = Instant::now();
            render(&frame, &config.clock, &palette, &mut canvas);
            term.clear();
            canvas.blit(&mut term, palette.background);

            stats.record(
                FrameSample {
                    build: built - started,
                    render: built.elapsed(),
                    interval,
                },
                frame.hand_count(),
            );
            log::trace!("{}", stats.summary());
        }

        if show_fps {
            term.set_str(1, 0, &stats.summary(), Some(Color::DarkGrey));
        }
        if show_help {
            render_help_overlay(&mut term, CLOCK_HELP);
        }

        term.present()?;
        term.sleep(config.time_step);
    }

    Ok(())
}

/// Draw a single frame to stdout
pub fn print(config: RunConfig) -> io::Result<()> {
    let (w, h) = config
        .size
        .unwrap_or_else(|| size().unwrap_or(FALLBACK_SIZE));
    let now = config.at.unwrap_or_else(|| Local::now().time());

    let mut term = Terminal::headless(w, h);
    let mut canvas = BrailleCanvas::new(w, h, config.clock.zoom);
    let palette = colors::palette(config.palette);
    let frame = draw_frame(&mut term, &mut canvas, now, &config.clock, &palette);
    log::debug!("printed {} hands at {}", frame.hand_count(), now);

    term.print_to_stdout()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn center_cell_is_lit() {
        let clock = ClockConfig { max_depth: 0, ..ClockConfig::default() };
        let mut term = Terminal::headless(40, 20);
        let mut canvas = BrailleCanvas::new(40, 20, clock.zoom);

        let frame = draw_frame(&mut term, &mut canvas, at(3, 15, 30), &clock, &Palette::default());
        assert_eq!(frame.hand_count(), 3);

        let cell = term.cell(20, 10).unwrap();
        assert_ne!(cell.ch, ' ');
        assert!(matches!(cell.fg, Some(Color::Rgb { .. })));
    }

    #[test]
    fn corners_stay_dark_for_a_small_tree() {
        let clock = ClockConfig { max_depth: 2, start_arm_length: 40.0, ..ClockConfig::default() };
        let mut term = Terminal::headless(60, 30);
        let mut canvas = BrailleCanvas::new(60, 30, clock.zoom);
        draw_frame(&mut term, &mut canvas, at(10, 10, 10), &clock, &Palette::default());

        assert_eq!(term.cell(0, 0).unwrap().ch, ' ');
        assert_eq!(term.cell(59, 29).unwrap().ch, ' ');
    }

    #[test]
    fn same_instant_draws_same_cells() {
        let clock = ClockConfig::default();
        let mut a = Terminal::headless(50, 25);
        let mut b = Terminal::headless(50, 25);
        let mut canvas = BrailleCanvas::new(50, 25, clock.zoom);
        draw_frame(&mut a, &mut canvas, at(18, 42, 7), &clock, &Palette::default());
        draw_frame(&mut b, &mut canvas, at(18, 42, 7), &clock, &Palette::default());
        assert_eq!(a.to_ansi(), b.to_ansi());
    }
}
