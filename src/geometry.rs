//! Recursive clock-tree geometry
//!
//! Every frame starts from one root clock at the canvas center. Each clock
//! spawns two smaller clocks, one at the tip of its minute hand and one at
//! the tip of its second hand, rotated so their "up" points back along the
//! arm they sit on. Expansion is breadth-first over an explicit queue, so
//! deep trees never touch the call stack and hands land grouped by depth.

use crate::config::ClockConfig;
use chrono::{NaiveTime, Timelike};
use std::f64::consts::{PI, TAU};

/// Hour hands are shorter than the minute/second arms of the root clock
const HOUR_HAND_RATIO: f64 = 0.7;

/// Add two angles and wrap the result into `[0, 2π)`.
///
/// NaN propagates unchanged.
#[inline]
pub fn sum_rotations(a: f64, b: f64) -> f64 {
    let sum = (a + b).rem_euclid(TAU);
    // rem_euclid rounds tiny negative sums up to exactly TAU
    if sum >= TAU {
        0.0
    } else {
        sum
    }
}

/// Number of clocks in a tree of the given depth
pub fn node_count(max_depth: usize) -> usize {
    (1usize << (max_depth + 1)) - 1
}

/// Number of hands in a tree of the given depth
pub fn hand_count(max_depth: usize) -> usize {
    3 + 2 * (node_count(max_depth) - 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandKind {
    Hour,
    Minute,
    Second,
}

/// A clock pointer as a directed segment.
///
/// Angles are radians clockwise from straight up. The endpoint is computed
/// once on construction; a `Hand` is never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hand {
    pub kind: HandKind,
    pub start_x: f64,
    pub start_y: f64,
    pub length: f64,
    pub angle: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Hand {
    pub fn new(kind: HandKind, start_x: f64, start_y: f64, length: f64, angle: f64) -> Self {
        // Screen y grows downward
        let (sin, cos) = angle.sin_cos();
        Self {
            kind,
            start_x,
            start_y,
            length,
            angle,
            end_x: start_x + length * sin,
            end_y: start_y - length * cos,
        }
    }
}

/// Hand angles of an unrotated 12-hour face
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseAngles {
    pub hour: f64,
    pub minute: f64,
    pub second: f64,
}

impl BaseAngles {
    pub fn from_time(now: NaiveTime) -> Self {
        let millis = (now.nanosecond() / 1_000_000).min(999);
        let seconds = now.second() as f64 + millis as f64 / 1000.0;
        let minutes = now.minute() as f64 + seconds / 60.0;
        let hours = now.hour() as f64 + minutes / 60.0;

        Self {
            hour: hours * PI / 6.0,
            minute: minutes * PI / 30.0,
            second: seconds * PI / 30.0,
        }
    }
}

/// A nested clock still waiting to be laid out
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockTask {
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub rotation: f64,
}

impl ClockTask {
    pub fn root(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            x: canvas_width / 2.0,
            y: canvas_height / 2.0,
            depth: 0,
            rotation: 0.0,
        }
    }
}

/// All hands of one frame, indexed by depth
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    levels: Vec<Vec<Hand>>,
}

impl Frame {
    pub fn max_depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn depth(&self, depth: usize) -> &[Hand] {
        self.levels.get(depth).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(depth, hands)` from the root outward
    pub fn depths(&self) -> impl DoubleEndedIterator<Item = (usize, &[Hand])> {
        self.levels.iter().enumerate().map(|(d, hands)| (d, hands.as_slice()))
    }

    pub fn hand_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }
}

/// Lays out clocks for one instant
pub struct FrameBuilder<'a> {
    config: &'a ClockConfig,
    angles: BaseAngles,
}

impl<'a> FrameBuilder<'a> {
    pub fn new(config: &'a ClockConfig, angles: BaseAngles) -> Self {
        Self { config, angles }
    }

    pub fn arm_length(&self, depth: usize) -> f64 {
        self.config.start_arm_length * self.config.length_factor.powi(depth as i32)
    }

    /// Emit the hands of one clock into `out` and return its two children,
    /// or `None` at the depth limit.
    pub fn expand(&self, task: &ClockTask, out: &mut Vec<Hand>) -> Option<[ClockTask; 2]> {
        let length = self.arm_length(task.depth);

        if task.depth == 0 {
            out.push(Hand::new(
                HandKind::Hour,
                task.x,
                task.y,
                length * HOUR_HAND_RATIO,
                sum_rotations(self.angles.hour, task.rotation),
            ));
        }

        let minute = Hand::new(
            HandKind::Minute,
            task.x,
            task.y,
            length,
            sum_rotations(self.angles.minute, task.rotation),
        );
        let second = Hand::new(
            HandKind::Second,
            task.x,
            task.y,
            length,
            sum_rotations(self.angles.second, task.rotation),
        );
        out.push(minute);
        out.push(second);

        if task.depth >= self.config.max_depth {
            return None;
        }

        Some([self.child(task, &minute), self.child(task, &second)])
    }

    fn child(&self, parent: &ClockTask, arm: &Hand) -> ClockTask {
        ClockTask {
            x: arm.end_x,
            y: arm.end_y,
            depth: parent.depth + 1,
            rotation: arm.angle - self.angles.hour + PI,
        }
    }

    pub fn build(&self, canvas_width: f64, canvas_height: f64) -> Frame {
        let max_depth = self.config.max_depth;
        let mut levels: Vec<Vec<Hand>> = (0..=max_depth)
            .map(|d| Vec::with_capacity(if d == 0 { 3 } else { 2usize << d }))
            .collect();

        let mut frontier = vec![ClockTask::root(canvas_width, canvas_height)];
        let mut next = Vec::new();

        for level in levels.iter_mut() {
            next.clear();
            next.reserve(frontier.len() * 2);
            for task in &frontier {
                if let Some(children) = self.expand(task, level) {
                    next.extend_from_slice(&children);
                }
            }
            std::mem::swap(&mut frontier, &mut next);
        }

        let frame = Frame { levels };
        debug_assert_eq!(
            frame.depth(0).len(),
            3,
            "root clock must have hour, minute and second hands"
        );
        debug_assert_eq!(frame.hand_count(), hand_count(max_depth));
        frame
    }
}

/// Compute every hand of the clock tree for `now` on a canvas of the given size
pub fn build_frame(now: NaiveTime, canvas: (f64, f64), config: &ClockConfig) -> Frame {
    FrameBuilder::new(config, BaseAngles::from_time(now)).build(canvas.0, canvas.1)
}
