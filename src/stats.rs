//! Rolling frame timings, owned by whoever drives the animation loop

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSample {
    pub build: Duration,
    pub render: Duration,
    /// Wall time since the previous frame started; `None` after a gap
    pub interval: Option<Duration>,
}

/// Start times of consecutive frames
#[derive(Debug, Default)]
pub struct FrameTimer {
    last_start: Option<Instant>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a frame start, returning the time since the previous one
    pub fn start(&mut self, now: Instant) -> Option<Duration> {
        let interval = self.last_start.map(|last| now.saturating_duration_since(last));
        self.last_start = Some(now);
        interval
    }

    /// Forget the previous start, e.g. when resuming from pause
    pub fn reset(&mut self) {
        self.last_start = None;
    }
}

#[derive(Debug, Default)]
pub struct FrameStats {
    samples: VecDeque<FrameSample>,
    hands: usize,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW),
            hands: 0,
        }
    }

    pub fn record(&mut self, sample: FrameSample, hands: usize) {
        if self.samples.len() == WINDOW {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.hands = hands;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn average(&self, pick: impl Fn(&FrameSample) -> Duration) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().map(pick).sum::<Duration>() / self.samples.len() as u32
    }

    pub fn average_build(&self) -> Duration {
        self.average(|s| s.build)
    }

    pub fn average_render(&self) -> Duration {
        self.average(|s| s.render)
    }

    pub fn fps(&self) -> f64 {
        let intervals: Vec<Duration> = self.samples.iter().filter_map(|s| s.interval).collect();
        if intervals.is_empty() {
            return 0.0;
        }
        let interval = intervals.iter().sum::<Duration>() / intervals.len() as u32;
        if interval.is_zero() {
            0.0
        } else {
            1.0 / interval.as_secs_f64()
        }
    }

    /// One-line overlay text
    pub fn summary(&self) -> String {
        format!(
            "{:>5.1} fps  build {:>6.2}ms  draw {:>6.2}ms  {} hands",
            self.fps(),
            self.average_build().as_secs_f64() * 1000.0,
            self.average_render().as_secs_f64() * 1000.0,
            self.hands,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(build_ms: u64, render_ms: u64, interval_ms: u64) -> FrameSample {
        FrameSample {
            build: Duration::from_millis(build_ms),
            render: Duration::from_millis(render_ms),
            interval: Some(Duration::from_millis(interval_ms)),
        }
    }

    #[test]
    fn empty_stats_are_zero() {
        let stats = FrameStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.average_build(), Duration::ZERO);
        assert_eq!(stats.fps(), 0.0);
    }

    #[test]
    fn averages_over_samples() {
        let mut stats = FrameStats::new();
        stats.record(sample(2, 4, 20), 10);
        stats.record(sample(4, 8, 30), 12);
        assert_eq!(stats.average_build(), Duration::from_millis(3));
        assert_eq!(stats.average_render(), Duration::from_millis(6));
        assert!((stats.fps() - 40.0).abs() < 1e-9);
        assert!(stats.summary().ends_with("12 hands"));
    }

    #[test]
    fn frames_without_interval_do_not_count_toward_fps() {
        let mut stats = FrameStats::new();
        stats.record(FrameSample { interval: None, ..sample(1, 1, 0) }, 3);
        assert_eq!(stats.fps(), 0.0);
        stats.record(sample(1, 1, 25), 3);
        stats.record(FrameSample { interval: None, ..sample(1, 1, 0) }, 3);
        assert!((stats.fps() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn timer_skips_the_gap_after_reset() {
        let t0 = Instant::now();
        let mut timer = FrameTimer::new();
        assert_eq!(timer.start(t0), None);
        assert_eq!(timer.start(t0 + Duration::from_millis(30)), Some(Duration::from_millis(30)));

        // Paused for a minute
        timer.reset();
        assert_eq!(timer.start(t0 + Duration::from_secs(60)), None);
        assert_eq!(
            timer.start(t0 + Duration::from_secs(60) + Duration::from_millis(20)),
            Some(Duration::from_millis(20))
        );
    }

    #[test]
    fn window_drops_oldest() {
        let mut stats = FrameStats::new();
        stats.record(sample(1000, 0, 10), 1);
        for _ in 0..WINDOW {
            stats.record(sample(1, 0, 10), 1);
        }
        assert_eq!(stats.len(), WINDOW);
        assert_eq!(stats.average_build(), Duration::from_millis(1));
    }
}
