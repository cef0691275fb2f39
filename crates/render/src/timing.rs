use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of recent frame times.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    window: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add one sample, evicting the oldest once the window is full.
    pub fn record(&mut self, dt: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(dt);
    }

    /// Run `f`, record how long it took and hand back its output.
    pub fn time<T>(&mut self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.record(start.elapsed());
        out
    }

    pub fn count(&self) -> usize {
        self.window.len()
    }

    pub fn last(&self) -> Option<Duration> {
        self.window.back().copied()
    }

    pub fn average(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        self.window.iter().sum::<Duration>() / self.window.len() as u32
    }

    pub fn min(&self) -> Duration {
        self.window.iter().copied().min().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.window.iter().copied().max().unwrap_or_default()
    }

    /// Frames per second implied by the average, zero when empty.
    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.last(), None);
    }

    #[test]
    fn statistics_over_window() {
        let mut timer = FrameTimer::new(3);
        for ms in [10, 20, 30] {
            timer.record(Duration::from_millis(ms));
        }
        assert_eq!(timer.average(), Duration::from_millis(20));
        assert_eq!(timer.min(), Duration::from_millis(10));
        assert_eq!(timer.max(), Duration::from_millis(30));
        assert!((timer.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn oldest_sample_evicted() {
        let mut timer = FrameTimer::new(2);
        for ms in [10, 20, 30] {
            timer.record(Duration::from_millis(ms));
        }
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.min(), Duration::from_millis(20));
        assert_eq!(timer.last(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn time_records_closure() {
        let mut timer = FrameTimer::new(2);
        let value = timer.time(|| 7);
        assert_eq!(value, 7);
        assert_eq!(timer.count(), 1);
    }
}
