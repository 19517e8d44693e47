use crate::terminal::Terminal;
use crossterm::style::Color;

pub const CLOCK_HELP: &str = "\
DENDRA CLOCK
───────────────────────
Space   Pause
F       Frame stats
!-()    Color scheme
q/Esc   Quit
?       Close help";

/// Draw a centered, boxed help text into the back buffer.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let (width, height) = term.size();
    let lines: Vec<&str> = help_text.lines().collect();
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let box_w = inner + 2;
    let box_h = lines.len() + 2;
    let left = (width as usize).saturating_sub(box_w) / 2;
    let top = (height as usize).saturating_sub(box_h) / 2;

    let border = Some(Color::White);
    let edge = |term: &mut Terminal, y: usize, l: char, r: char| {
        term.set(left as i32, y as i32, l, border);
        term.set_str(left as i32 + 1, y as i32, &"─".repeat(inner), border);
        term.set((left + box_w - 1) as i32, y as i32, r, border);
    };
    edge(term, top, '┌', '┐');
    edge(term, top + box_h - 1, '└', '┘');

    for (i, line) in lines.iter().enumerate() {
        let y = (top + 1 + i) as i32;
        let padded = format!(" {:<width$} ", line, width = inner - 2);
        term.set(left as i32, y, '│', border);
        term.set_str(left as i32 + 1, y, &padded, Some(Color::Grey));
        term.set((left + box_w - 1) as i32, y, '│', border);
    }
}
