use std::collections::VecDeque;
use std::time::Duration;

/// How far back samples count towards the release velocity.
const HISTORY_LIMIT: Duration = Duration::from_millis(150);

/// Tracks one drag gesture from touch-down to release.
///
/// Samples carry the displacement relative to where the gesture started, which is how touch
/// input reports drags.
#[derive(Debug)]
pub struct SwipeTracker {
    history: VecDeque<Sample>,
    dx: f64,
    dy: f64,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    dx: f64,
    timestamp: Duration,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self {
            history: VecDeque::new(),
            dx: 0.,
            dy: 0.,
        }
    }

    /// Records the displacement from the gesture origin at `timestamp`.
    pub fn push(&mut self, dx: f64, dy: f64, timestamp: Duration) {
        if let Some(last) = self.history.back() {
            if timestamp < last.timestamp {
                trace!(
                    "ignoring sample with timestamp {timestamp:?} earlier than last {:?}",
                    last.timestamp
                );
                return;
            }
        }

        self.history.push_back(Sample { dx, timestamp });
        self.dx = dx;
        self.dy = dy;

        self.trim_history();
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Horizontal velocity over the recent history, in pixels per second.
    pub fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.;
        };

        let total_time = (last.timestamp - first.timestamp).as_secs_f64();
        if total_time == 0. {
            return 0.;
        }

        (last.dx - first.dx) / total_time
    }

    fn trim_history(&mut self) {
        let Some(&Sample { timestamp, .. }) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if timestamp <= first.timestamp + HISTORY_LIMIT {
                break;
            }

            let _ = self.history.pop_front();
        }
    }
}
