//! Braille dot canvas
//!
//! Implements `Surface` over an RGBA dot grid, two dots wide and four tall
//! per terminal cell, then encodes each 2x4 block as one braille glyph.
//! Colors are stored premultiplied so both compositing modes are a single
//! multiply-add per channel.

use crate::colors::Rgba;
use crate::render::{Composite, Surface};
use crate::terminal::Terminal;
use crossterm::style::Color;

// Braille constants (2x4 dot grid per character)
const BRAILLE_BASE: u32 = 0x2800;
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

/// Minimum per-channel distance from the background for a dot to show
const LIT_THRESHOLD: f32 = 24.0 / 255.0;

/// Premultiplied RGBA, channels in `[0, 1]`
type Pixel = [f32; 4];

pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    dots_w: usize,
    dots_h: usize,
    zoom: f64,
    pixels: Vec<Pixel>,
    // Dots already painted by the current stroke carry its generation
    stamps: Vec<u32>,
    generation: u32,
    composite: Composite,
    line_width: f64,
    stroke_color: Rgba,
    fill_color: Rgba,
    path: Vec<[(f64, f64); 2]>,
    cursor: Option<(f64, f64)>,
}

impl BrailleCanvas {
    /// Canvas covering `cols` x `rows` terminal cells; logical units are
    /// multiplied by `zoom` to get dots.
    pub fn new(cols: u16, rows: u16, zoom: f64) -> Self {
        let cols = cols as usize;
        let rows = rows as usize;
        let dots_w = cols * DOTS_X;
        let dots_h = rows * DOTS_Y;
        Self {
            cols,
            rows,
            dots_w,
            dots_h,
            zoom,
            pixels: vec![[0.0; 4]; dots_w * dots_h],
            stamps: vec![0; dots_w * dots_h],
            generation: 0,
            composite: Composite::SourceOver,
            line_width: 1.0,
            stroke_color: Rgba::rgb(255, 255, 255),
            fill_color: Rgba::rgb(0, 0, 0),
            path: Vec::new(),
            cursor: None,
        }
    }

    pub fn dots(&self) -> (usize, usize) {
        (self.dots_w, self.dots_h)
    }

    fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.dots_w + x]
    }

    fn premultiply(color: Rgba) -> Pixel {
        let a = color.a.clamp(0.0, 1.0) as f32;
        [
            color.r as f32 / 255.0 * a,
            color.g as f32 / 255.0 * a,
            color.b as f32 / 255.0 * a,
            a,
        ]
    }

    fn blend(&mut self, idx: usize, src: Pixel) {
        let dst = &mut self.pixels[idx];
        match self.composite {
            Composite::SourceOver => {
                let k = 1.0 - src[3];
                for c in 0..4 {
                    dst[c] = src[c] + dst[c] * k;
                }
            }
            Composite::DestinationOver => {
                let k = 1.0 - dst[3];
                for c in 0..4 {
                    dst[c] += src[c] * k;
                }
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, src: Pixel) {
        if x < 0 || y < 0 || x >= self.dots_w as i64 || y >= self.dots_h as i64 {
            return;
        }
        let idx = y as usize * self.dots_w + x as usize;
        if self.stamps[idx] == self.generation {
            return;
        }
        self.stamps[idx] = self.generation;
        self.blend(idx, src);
    }

    /// Plot every dot within `radius` of the segment `a`-`b`.
    ///
    /// Only dots inside both the grid and the segment's bounding box grown
    /// by `radius` are examined, so the cost never exceeds the grid size.
    /// Returns the number of dots examined.
    fn fill_capsule(&mut self, a: (f64, f64), b: (f64, f64), radius: f64, src: Pixel) -> usize {
        if self.dots_w == 0 || self.dots_h == 0 {
            return 0;
        }
        let x_end = (a.0.max(b.0) + radius).ceil().min((self.dots_w - 1) as f64);
        let y_end = (a.1.max(b.1) + radius).ceil().min((self.dots_h - 1) as f64);
        if !(x_end >= 0.0 && y_end >= 0.0) {
            return 0;
        }
        let x0 = (a.0.min(b.0) - radius).floor().max(0.0) as usize;
        let y0 = (a.1.min(b.1) - radius).floor().max(0.0) as usize;

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len2 = dx * dx + dy * dy;
        let r2 = radius * radius;
        let mut visited = 0;

        for y in y0..=y_end as usize {
            for x in x0..=x_end as usize {
                visited += 1;
                let (px, py) = (x as f64 - a.0, y as f64 - a.1);
                let t = if len2 > 0.0 {
                    ((px * dx + py * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (ex, ey) = (px - t * dx, py - t * dy);
                if ex * ex + ey * ey <= r2 {
                    self.plot(x as i64, y as i64, src);
                }
            }
        }
        visited
    }

    /// Rasterize a dot-space segment, already clipped
    fn draw_segment(&mut self, from: (f64, f64), to: (f64, f64), radius: f64, src: Pixel) {
        if radius >= 0.75 {
            self.fill_capsule(from, to, radius, src);
            return;
        }

        // Hairlines: Bresenham
        let (mut x, mut y) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, src);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip of a dot-space segment against the grid grown by `margin`
    fn clip(&self, a: (f64, f64), b: (f64, f64), margin: f64) -> Option<((f64, f64), (f64, f64))> {
        if !(a.0.is_finite() && a.1.is_finite() && b.0.is_finite() && b.1.is_finite()) {
            return None;
        }
        let (xmin, ymin) = (-margin, -margin);
        let (xmax, ymax) = (self.dots_w as f64 + margin, self.dots_h as f64 + margin);
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);

        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, q) in [
            (-dx, a.0 - xmin),
            (dx, xmax - a.0),
            (-dy, a.1 - ymin),
            (dy, ymax - a.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
            }
        }
        if t0 > t1 {
            return None;
        }
        Some((
            (a.0 + t0 * dx, a.1 + t0 * dy),
            (a.0 + t1 * dx, a.1 + t1 * dy),
        ))
    }

    /// Encode the grid into `term`; dots close to `background` stay blank.
    pub fn blit(&self, term: &mut Terminal, background: Rgba) {
        let bg = [
            background.r as f32 / 255.0,
            background.g as f32 / 255.0,
            background.b as f32 / 255.0,
        ];

        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let mut code: u32 = 0;
                let mut sum = [0.0f32; 3];
                let mut lit = 0u32;

                for dy in 0..DOTS_Y {
                    for dx in 0..DOTS_X {
                        let px = self.pixel(cx * DOTS_X + dx, cy * DOTS_Y + dy);
                        // Whatever is uncovered shows the background
                        let rgb = [
                            px[0] + bg[0] * (1.0 - px[3]),
                            px[1] + bg[1] * (1.0 - px[3]),
                            px[2] + bg[2] * (1.0 - px[3]),
                        ];
                        let distance = (0..3).map(|c| (rgb[c] - bg[c]).abs()).fold(0.0, f32::max);
                        if distance > LIT_THRESHOLD {
                            code |= dot_bit(dx, dy);
                            for c in 0..3 {
                                sum[c] += rgb[c];
                            }
                            lit += 1;
                        }
                    }
                }

                if lit > 0 {
                    let ch = char::from_u32(BRAILLE_BASE + code).unwrap_or(' ');
                    let channel = |v: f32| ((v / lit as f32).clamp(0.0, 1.0) * 255.0).round() as u8;
                    let color = Color::Rgb {
                        r: channel(sum[0]),
                        g: channel(sum[1]),
                        b: channel(sum[2]),
                    };
                    term.set(cx as i32, cy as i32, ch, Some(color));
                }
            }
        }
    }
}

/// Braille dot positions:
/// 0 3
/// 1 4
/// 2 5
/// 6 7
#[inline]
fn dot_bit(dx: usize, dy: usize) -> u32 {
    match (dx, dy) {
        (0, 3) => 1 << 6,
        (1, 3) => 1 << 7,
        (0, y) => 1 << y,
        (_, y) => 1 << (y + 3),
    }
}

impl Surface for BrailleCanvas {
    fn size(&self) -> (f64, f64) {
        (self.dots_w as f64 / self.zoom, self.dots_h as f64 / self.zoom)
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
        self.path.clear();
        self.cursor = None;
    }

    fn set_composite(&mut self, mode: Composite) {
        self.composite = mode;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill_color = color;
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.cursor = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if let Some(from) = self.cursor {
            self.path.push([from, (x, y)]);
        }
        self.cursor = Some((x, y));
    }

    fn stroke(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }

        let src = Self::premultiply(self.stroke_color);
        let radius = self.line_width * self.zoom / 2.0;
        let path = std::mem::take(&mut self.path);

        for &[a, b] in &path {
            let a = (a.0 * self.zoom, a.1 * self.zoom);
            let b = (b.0 * self.zoom, b.1 * self.zoom);
            // Culling
            if let Some((from, to)) = self.clip(a, b, radius + 1.0) {
                self.draw_segment(from, to, radius, src);
            }
        }

        self.path = path;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let src = Self::premultiply(self.fill_color);
        let to_dots = |v: f64, max: usize| ((v * self.zoom).round().max(0.0) as usize).min(max);
        let x0 = to_dots(x, self.dots_w);
        let y0 = to_dots(y, self.dots_h);
        let x1 = to_dots(x + width, self.dots_w);
        let y1 = to_dots(y + height, self.dots_h);

        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(py * self.dots_w + px, src);
            }
        }
    }
}
