use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen, size,
    },
};
use std::fmt::Write as _;
use std::io::{self, Write, stdout};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
        }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        })
    }

    /// Buffer of a fixed size that never touches the tty
    pub fn headless(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen: false,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg);
        }
    }

    /// Write the whole buffer to the screen in one flush
    pub fn present(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        let mut current: Option<Color> = None;

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in row {
                if cell.fg != current {
                    match cell.fg {
                        Some(color) => queue!(out, SetForegroundColor(color))?,
                        None => queue!(out, ResetColor)?,
                    }
                    current = cell.fg;
                }
                queue!(out, Print(cell.ch))?;
            }
        }

        queue!(out, ResetColor)?;
        out.flush()
    }

    /// Check for keypress (non-blocking), returns (code, modifiers)
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some((key_event.code, key_event.modifiers)));
            }
        }
        Ok(None)
    }

    /// Sleep for specified duration; negative or unrepresentable values don't sleep
    pub fn sleep(&self, seconds: f32) {
        if let Ok(delay) = Duration::try_from_secs_f32(seconds) {
            std::thread::sleep(delay);
        }
    }

    /// Buffer as text with ANSI colors (for print mode)
    pub fn to_ansi(&self) -> String {
        let mut text = String::new();
        for row in &self.buffer {
            for cell in row {
                if cell.ch == ' ' {
                    text.push(' ');
                    continue;
                }

                if let Some(color) = cell.fg {
                    match color {
                        Color::Rgb { r, g, b } => {
                            let _ = write!(text, "\x1b[38;2;{};{};{}m", r, g, b);
                        }
                        Color::AnsiValue(v) => {
                            let _ = write!(text, "\x1b[38;5;{}m", v);
                        }
                        Color::DarkGrey => text.push_str("\x1b[90m"),
                        Color::Grey => text.push_str("\x1b[37m"),
                        Color::White => text.push_str("\x1b[97m"),
                        _ => {}
                    }
                }

                text.push(cell.ch);
                text.push_str("\x1b[0m");
            }
            // Trailing blanks add nothing in print mode
            let trimmed = text.trim_end_matches(' ').len();
            text.truncate(trimmed);
            text.push('\n');
        }
        text
    }

    /// Print buffer to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout().lock();
        out.write_all(self.to_ansi().as_bytes())?;
        out.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut term = Terminal::headless(4, 2);
        term.set(-1, 0, 'x', None);
        term.set(4, 1, 'x', None);
        term.set(1, 1, 'x', None);
        assert_eq!(term.cell(1, 1).unwrap().ch, 'x');
        assert!(term.cell(4, 1).is_none());
    }

    #[test]
    fn ansi_output_colors_cells_and_trims_rows() {
        let mut term = Terminal::headless(5, 2);
        term.set(0, 0, '⣿', Some(Color::Rgb { r: 1, g: 2, b: 3 }));
        let text = term.to_ansi();
        assert_eq!(text, "\x1b[38;2;1;2;3m⣿\x1b[0m\n\n");
    }

    #[test]
    fn sleep_tolerates_unrepresentable_delays() {
        let term = Terminal::headless(1, 1);
        term.sleep(f32::INFINITY);
        term.sleep(f32::NAN);
        term.sleep(-1.0);
        term.sleep(f32::MAX);
    }

    #[test]
    fn resize_resets_buffer() {
        let mut term = Terminal::headless(2, 2);
        term.set(0, 0, 'a', None);
        term.resize(3, 1);
        assert_eq!(term.size(), (3, 1));
        assert_eq!(term.cell(0, 0).unwrap().ch, ' ');
        assert!(term.cell(0, 1).is_none());
    }
}
