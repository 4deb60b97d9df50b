use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Animation, Clock};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one animation request on an [`AnimatedScalar`].
///
/// Ids increase monotonically across the whole process, so a continuation holding an older id
/// can always tell that it has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// How an animation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationOutcome {
    pub request: RequestId,
    /// `true` if the animation reached its target, `false` if it was superseded or cancelled.
    pub completed: bool,
}

/// A scalar that at most one animation drives at a time.
///
/// The value is what the renderer reads every frame. Starting a new animation, setting the value
/// directly or cancelling supersedes the running animation, whose outcome then resolves with
/// `completed: false`. Outcomes queue up until the owner takes them.
#[derive(Debug)]
pub struct AnimatedScalar {
    clock: Clock,
    /// Value while no animation is running.
    rest: f64,
    running: Option<(RequestId, Animation)>,
    outcomes: Vec<AnimationOutcome>,
}

impl AnimatedScalar {
    pub fn new(clock: Clock, value: f64) -> Self {
        Self {
            clock,
            rest: value,
            running: None,
            outcomes: Vec::new(),
        }
    }

    pub fn value(&self) -> f64 {
        match &self.running {
            Some((_, anim)) => anim.value(),
            None => self.rest,
        }
    }

    /// Value the scalar ends up at once the running animation, if any, completes.
    pub fn target(&self) -> f64 {
        match &self.running {
            Some((_, anim)) => anim.to(),
            None => self.rest,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.running.is_some()
    }

    /// Jumps to `value`, superseding any running animation.
    pub fn set(&mut self, value: f64) {
        self.supersede();
        self.rest = value;
    }

    /// Starts animating from the current value to `to`.
    pub fn animate(
        &mut self,
        to: f64,
        initial_velocity: f64,
        config: bakesale_config::Animation,
    ) -> RequestId {
        let from = self.value();
        self.supersede();

        let id = RequestId::next();
        let anim = Animation::new(self.clock.clone(), from, to, initial_velocity, config);
        trace!(?id, from, to, "starting animation");
        self.running = Some((id, anim));
        id
    }

    /// Stops the running animation where it currently is.
    pub fn cancel(&mut self) {
        self.supersede();
    }

    fn supersede(&mut self) {
        if let Some((id, anim)) = self.running.take() {
            trace!(?id, "animation superseded");
            self.rest = anim.value();
            self.outcomes.push(AnimationOutcome {
                request: id,
                completed: false,
            });
        }
    }

    pub fn advance_animations(&mut self) {
        let Some((id, anim)) = &self.running else {
            return;
        };

        if anim.is_done() {
            self.rest = anim.to();
            self.outcomes.push(AnimationOutcome {
                request: *id,
                completed: true,
            });
            self.running = None;
        }
    }

    /// Takes the outcomes resolved since the last call, oldest first.
    pub fn take_outcomes(&mut self) -> Vec<AnimationOutcome> {
        mem::take(&mut self.outcomes)
    }
}
