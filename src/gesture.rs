//! Interpretation of horizontal drags as page changes.

use std::time::Duration;

use crate::swipe_tracker::SwipeTracker;

/// Direction of a page change, in terms of the item index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards index 0.
    Previous,
    /// Towards the last index.
    Next,
}

impl Direction {
    /// Direction that a drag by `dx` pages towards.
    ///
    /// Content follows the finger: dragging left (negative `dx`) pulls in the next item from the
    /// right edge, dragging right pulls in the previous one from the left edge.
    pub fn from_drag(dx: f64) -> Option<Self> {
        if dx < 0. {
            Some(Direction::Next)
        } else if dx > 0. {
            Some(Direction::Previous)
        } else {
            None
        }
    }

    /// `-1` for [`Direction::Previous`], `1` for [`Direction::Next`].
    pub fn signum(self) -> f64 {
        match self {
            Direction::Previous => -1.,
            Direction::Next => 1.,
        }
    }

    /// Applies the direction to an index, returning `None` when it leaves `0..len`.
    pub fn step(self, idx: usize, len: usize) -> Option<usize> {
        let new_idx = match self {
            Direction::Previous => idx.checked_sub(1)?,
            Direction::Next => idx.checked_add(1)?,
        };
        (new_idx < len).then_some(new_idx)
    }
}

/// Rule deciding whether a carousel takes over a touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    /// Every touch drives the carousel.
    Always,
    /// Only touches that start at or below `min_y` and move mostly horizontally; everything else
    /// is left to vertical scrolling.
    HorizontalBelow { min_y: f64, dominance: f64 },
}

impl Activation {
    pub fn should_activate(&self, touch_y: f64, dx: f64, dy: f64) -> bool {
        match *self {
            Activation::Always => true,
            Activation::HorizontalBelow { min_y, dominance } => {
                touch_y >= min_y && dx.abs() > dominance * dy.abs()
            }
        }
    }
}

/// Outcome of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeDecision {
    /// Change the page in `direction`.
    Commit { direction: Direction, velocity: f64 },
    /// Return to rest without changing the page.
    Cancel { velocity: f64 },
}

/// A drag in progress on one carousel.
#[derive(Debug)]
pub struct SwipeGesture {
    tracker: SwipeTracker,
    /// Item offset at the moment the gesture took over.
    origin: f64,
}

impl SwipeGesture {
    pub fn new(origin: f64) -> Self {
        Self {
            tracker: SwipeTracker::new(),
            origin,
        }
    }

    /// Applies a movement sample and returns the offset the item should be drawn at.
    ///
    /// The item follows the finger 1:1.
    pub fn update(&mut self, dx: f64, dy: f64, timestamp: Duration) -> f64 {
        self.tracker.push(dx, dy, timestamp);
        self.offset()
    }

    pub fn offset(&self) -> f64 {
        self.origin + self.tracker.dx()
    }

    /// Decides what the release at displacement `dx` means.
    ///
    /// The drag commits once it covered `threshold` of the viewport width.
    pub fn release(
        &mut self,
        dx: f64,
        timestamp: Duration,
        viewport_width: f64,
        threshold: f64,
    ) -> SwipeDecision {
        self.tracker.push(dx, self.tracker.dy(), timestamp);
        let velocity = self.tracker.velocity();

        match Direction::from_drag(dx) {
            Some(direction) if dx.abs() >= threshold * viewport_width => {
                SwipeDecision::Commit {
                    direction,
                    velocity,
                }
            }
            _ => SwipeDecision::Cancel { velocity },
        }
    }
}
