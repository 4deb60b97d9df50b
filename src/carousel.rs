//! Paged carousel showing one item of a sequence at a time.
//!
//! The carousel owns the horizontal offset of its current item. A drag moves the item with the
//! finger; a committed release slides it out towards the edge, then the neighbor gets mounted
//! parked just beyond the opposite edge and settles into place. The outgoing and incoming items
//! are never on screen together, the parked position is what makes the motion look continuous.

use std::fmt::Debug;
use std::rc::Rc;
use std::time::Duration;

use bakesale_config::Config;

use crate::animation::{AnimatedScalar, Clock, RequestId};
use crate::gesture::{Activation, Direction, SwipeDecision, SwipeGesture};

/// Items with a stable identity that can be selected directly.
pub trait Keyed {
    type Key: PartialEq + Debug;

    fn key(&self) -> &Self::Key;
}

/// Change the owner of a carousel needs to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    /// A committed swipe finished sliding out and the neighbor was mounted.
    Advanced { idx: usize, direction: Direction },
}

#[derive(Debug)]
pub struct Carousel<T> {
    items: Vec<T>,
    /// Index of the shown item, `None` when nothing is shown.
    current_idx: Option<usize>,
    /// Direction of the last commit, consumed by the next mount to park the incoming item.
    pending_direction: Option<Direction>,
    /// Horizontal offset of the shown item, 0 at rest.
    offset: AnimatedScalar,
    /// Drag in progress.
    gesture: Option<SwipeGesture>,
    /// Animation the carousel is waiting on.
    motion: Motion,
    activation: Activation,
    viewport_width: f64,
    options: Rc<Config>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Idle,
    /// Sliding out after a commit; the index changes once this completes.
    Flinging {
        request: RequestId,
        direction: Direction,
    },
    /// Returning to rest after a cancelled drag.
    SnappingBack { request: RequestId },
    /// Settling a freshly mounted item from its parked position.
    Entering { request: RequestId },
}

impl Motion {
    fn request(&self) -> Option<RequestId> {
        match *self {
            Motion::Idle => None,
            Motion::Flinging { request, .. }
            | Motion::SnappingBack { request }
            | Motion::Entering { request } => Some(request),
        }
    }
}

impl<T> Carousel<T> {
    pub fn new(
        items: Vec<T>,
        activation: Activation,
        viewport_width: f64,
        clock: Clock,
        options: Rc<Config>,
    ) -> Self {
        Self {
            items,
            current_idx: None,
            pending_direction: None,
            offset: AnimatedScalar::new(clock, 0.),
            gesture: None,
            motion: Motion::Idle,
            activation,
            viewport_width,
            options,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_idx(&self) -> Option<usize> {
        self.current_idx
    }

    pub fn current(&self) -> Option<&T> {
        self.current_idx.and_then(|idx| self.items.get(idx))
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Offset the renderer translates the current item by.
    pub fn offset(&self) -> f64 {
        self.offset.value()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn are_animations_ongoing(&self) -> bool {
        self.offset.is_animating()
    }

    /// Shows the item at `idx` without any animation.
    pub fn select_index(&mut self, idx: usize) -> bool {
        if idx >= self.items.len() {
            return false;
        }

        self.current_idx = Some(idx);
        self.rest();
        true
    }

    /// Hides the current item, keeping the sequence.
    pub fn clear_selection(&mut self) {
        self.current_idx = None;
        self.rest();
    }

    /// Replaces the whole sequence and clears the selection.
    ///
    /// In-flight animations are abandoned.
    pub fn reset(&mut self, items: Vec<T>) {
        debug!("resetting carousel with {} items", items.len());
        self.items = items;
        self.current_idx = None;
        self.pending_direction = None;
        self.rest();
    }

    /// Cancels everything in flight before the carousel goes away.
    ///
    /// Outcomes of the cancelled animations are ignored afterwards.
    pub fn teardown(&mut self) {
        self.rest();
    }

    fn rest(&mut self) {
        self.gesture = None;
        self.motion = Motion::Idle;
        self.offset.set(0.);
    }

    /// Moves to the neighbor in `direction` and mounts it with an entry animation.
    ///
    /// Does nothing and returns `false` if there is no such neighbor.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let Some(idx) = self.current_idx else {
            return false;
        };
        let Some(new_idx) = direction.step(idx, self.items.len()) else {
            trace!("ignoring advance {direction:?} past the bounds at {idx}");
            return false;
        };

        debug!("advancing {direction:?} from {idx} to {new_idx}");
        self.current_idx = Some(new_idx);
        self.pending_direction = Some(direction);
        self.mount();
        true
    }

    fn mount(&mut self) {
        self.gesture = None;

        let Some(direction) = self.pending_direction.take() else {
            self.motion = Motion::Idle;
            self.offset.set(0.);
            return;
        };

        self.offset.set(direction.signum() * self.viewport_width);
        let config = self.options.animations.carousel_entry.0;
        let request = self.offset.animate(0., 0., config);
        self.motion = Motion::Entering { request };
    }

    /// Whether a touch that started at `touch_y` and moved by `(dx, dy)` should start a drag.
    pub fn should_activate(&self, touch_y: f64, dx: f64, dy: f64) -> bool {
        self.current_idx.is_some()
            && !matches!(self.motion, Motion::Flinging { .. })
            && self.activation.should_activate(touch_y, dx, dy)
    }

    /// Starts a drag from wherever the item currently is.
    ///
    /// Refused while nothing is shown or while a committed swipe is still sliding out.
    pub fn gesture_begin(&mut self) -> bool {
        if self.current_idx.is_none() || matches!(self.motion, Motion::Flinging { .. }) {
            return false;
        }

        let origin = self.offset.value();
        self.offset.set(origin);
        self.motion = Motion::Idle;
        self.gesture = Some(SwipeGesture::new(origin));
        true
    }

    pub fn gesture_update(&mut self, dx: f64, dy: f64, timestamp: Duration) -> bool {
        let Some(gesture) = &mut self.gesture else {
            return false;
        };

        let offset = gesture.update(dx, dy, timestamp);
        self.offset.set(offset);
        true
    }

    /// Finishes the drag with the release displacement `dx`.
    ///
    /// A commit towards a missing neighbor snaps back like a cancel does.
    pub fn gesture_end(&mut self, dx: f64, timestamp: Duration) -> Option<SwipeDecision> {
        let mut gesture = self.gesture.take()?;

        let threshold = self.options.gestures.commit_threshold.0;
        let decision = gesture.release(dx, timestamp, self.viewport_width, threshold);
        self.offset.set(gesture.offset());

        match decision {
            SwipeDecision::Commit {
                direction,
                velocity,
            } => {
                let has_neighbor = self
                    .current_idx
                    .and_then(|idx| direction.step(idx, self.items.len()))
                    .is_some();

                if has_neighbor {
                    debug!("swipe committed {direction:?}");
                    let target = -direction.signum() * self.viewport_width;
                    let config = self.options.animations.swipe_fling.0;
                    let request = self.offset.animate(target, velocity, config);
                    self.motion = Motion::Flinging { request, direction };
                } else {
                    debug!("swipe committed {direction:?} with no neighbor, snapping back");
                    self.snap_back(velocity);
                }
            }
            SwipeDecision::Cancel { velocity } => self.snap_back(velocity),
        }

        Some(decision)
    }

    /// Abandons the drag, e.g. when the system takes the touch away.
    pub fn gesture_cancel(&mut self) {
        if self.gesture.take().is_some() {
            self.snap_back(0.);
        }
    }

    fn snap_back(&mut self, velocity: f64) {
        let config = self.options.animations.swipe_snap_back.0;
        let request = self.offset.animate(0., velocity, config);
        self.motion = Motion::SnappingBack { request };
    }

    /// Advances the offset animation and runs the continuations of finished requests.
    pub fn advance_animations(&mut self) -> Option<CarouselEvent> {
        self.offset.advance_animations();

        let mut event = None;
        for outcome in self.offset.take_outcomes() {
            if self.motion.request() != Some(outcome.request) {
                trace!("ignoring stale animation outcome {outcome:?}");
                continue;
            }

            let motion = self.motion;
            self.motion = Motion::Idle;

            let Motion::Flinging { direction, .. } = motion else {
                continue;
            };
            if !outcome.completed {
                continue;
            }

            if self.advance(direction) {
                if let Some(idx) = self.current_idx {
                    event = Some(CarouselEvent::Advanced { idx, direction });
                }
            } else {
                // The neighbor went away while sliding out.
                self.snap_back(0.);
            }
        }

        event
    }
}

impl<T: Keyed> Carousel<T> {
    /// Jumps straight to the item with `key`.
    ///
    /// Leaves the pending direction alone since no swipe is involved.
    pub fn select_by_key(&mut self, key: &T::Key) -> bool {
        let Some(idx) = self.items.iter().position(|item| item.key() == key) else {
            debug!("no item with key {key:?}");
            return false;
        };

        self.current_idx = Some(idx);
        self.gesture = None;
        self.motion = Motion::Idle;
        self.offset.set(0.);
        true
    }
}
