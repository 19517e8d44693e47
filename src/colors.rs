use crossterm::event::KeyCode;

/// Scheme index of the plain white-on-black palette
pub const MONO: u8 = 7;

/// Straight (non-premultiplied) color with alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Stroke and background colors of the clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub foreground: Rgba,
    pub background: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        palette(MONO)
    }
}

/// Palette for a scheme number (0-9)
pub fn palette(scheme: u8) -> Palette {
    let foreground = match scheme {
        1 => Rgba::rgb(255, 140, 40),   // fire
        2 => Rgba::rgb(120, 200, 255),  // ice
        3 => Rgba::rgb(255, 110, 200),  // pink
        4 => Rgba::rgb(255, 215, 90),   // gold
        5 => Rgba::rgb(90, 255, 255),   // electric
        6 => Rgba::rgb(255, 70, 70),    // lava
        7 => Rgba::rgb(255, 255, 255),  // mono
        8 => Rgba::rgb(190, 130, 255),  // violet
        9 => Rgba::rgb(80, 120, 255),   // neon
        _ => Rgba::rgb(80, 255, 120),   // green
    };
    Palette { foreground, background: Rgba::rgb(0, 0, 0) }
}

/// Shared color scheme state
#[derive(Clone, Copy)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme.min(9) }
    }

    /// Handle color scheme key input. Returns true if key was handled.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('!') => self.scheme = 1,  // Shift+1: fire
            KeyCode::Char('@') => self.scheme = 2,  // Shift+2: ice
            KeyCode::Char('#') => self.scheme = 3,  // Shift+3: pink
            KeyCode::Char('$') => self.scheme = 4,  // Shift+4: gold
            KeyCode::Char('%') => self.scheme = 5,  // Shift+5: electric
            KeyCode::Char('^') => self.scheme = 6,  // Shift+6: lava
            KeyCode::Char('&') => self.scheme = 7,  // Shift+7: mono
            KeyCode::Char('*') => self.scheme = 8,  // Shift+8: violet
            KeyCode::Char('(') => self.scheme = 9,  // Shift+9: neon
            KeyCode::Char(')') => self.scheme = 0,  // Shift+0: green
            _ => return false,
        }
        true
    }

    pub fn palette(&self) -> Palette {
        palette(self.scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_is_white_on_black() {
        let p = Palette::default();
        assert_eq!(p.foreground, Rgba::rgb(255, 255, 255));
        assert_eq!(p.background, Rgba::rgb(0, 0, 0));
    }

    #[test]
    fn shifted_digits_select_schemes() {
        let mut colors = ColorState::new(MONO);
        assert!(colors.handle_key(KeyCode::Char('!')));
        assert_eq!(colors.scheme, 1);
        assert!(colors.handle_key(KeyCode::Char(')')));
        assert_eq!(colors.scheme, 0);
        assert!(!colors.handle_key(KeyCode::Char('x')));
        assert_eq!(colors.scheme, 0);
    }

    #[test]
    fn out_of_range_scheme_is_clamped() {
        assert_eq!(ColorState::new(42).scheme, 9);
    }
}
