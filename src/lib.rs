//! Fractal clock for the terminal
//!
//! `geometry` lays out the recursive clock tree for an instant, `render`
//! paints it onto any `Surface`, and `canvas` is the braille surface the
//! binary draws with.

pub mod canvas;
pub mod clock;
pub mod colors;
pub mod config;
pub mod geometry;
pub mod help;
pub mod render;
pub mod settings;
pub mod stats;
pub mod terminal;
