//! Free-running back-and-forth motion of the splash title.

use std::rc::Rc;

use bakesale_config::Config;

use crate::animation::{AnimatedScalar, Clock, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillationState {
    Idle,
    /// Heading to the right extreme.
    MovingToB,
    /// Heading to the left extreme.
    MovingToA,
}

/// Moves a scalar between `-amplitude` and `amplitude` until torn down.
///
/// Every completed leg schedules the next one. Once [`Oscillation::stop`] is called, late
/// outcomes find the oscillation dead and schedule nothing, which is what ends the loop.
#[derive(Debug)]
pub struct Oscillation {
    offset: AnimatedScalar,
    state: OscillationState,
    /// Request of the leg in flight.
    leg: Option<RequestId>,
    alive: bool,
    amplitude: f64,
    legs_started: u64,
    options: Rc<Config>,
}

impl Oscillation {
    pub fn new(clock: Clock, viewport_width: f64, options: Rc<Config>) -> Self {
        let margin = options.splash.title_margin.0;
        Self {
            offset: AnimatedScalar::new(clock, 0.),
            state: OscillationState::Idle,
            leg: None,
            alive: true,
            amplitude: ((viewport_width - margin) / 2.).max(0.),
            legs_started: 0,
            options,
        }
    }

    pub fn start(&mut self) {
        if !self.alive || self.state != OscillationState::Idle {
            return;
        }

        self.start_leg(OscillationState::MovingToB);
    }

    /// Tears the oscillation down for good.
    pub fn stop(&mut self) {
        if !self.alive {
            return;
        }

        debug!("stopping title oscillation after {} legs", self.legs_started);
        self.alive = false;
        self.leg = None;
        self.offset.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.alive && self.state != OscillationState::Idle
    }

    pub fn state(&self) -> OscillationState {
        self.state
    }

    pub fn offset(&self) -> f64 {
        self.offset.value()
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn legs_started(&self) -> u64 {
        self.legs_started
    }

    fn start_leg(&mut self, state: OscillationState) {
        let target = match state {
            OscillationState::Idle => 0.,
            OscillationState::MovingToB => self.amplitude,
            OscillationState::MovingToA => -self.amplitude,
        };

        let config = self.options.animations.title_oscillation.0;
        self.leg = Some(self.offset.animate(target, 0., config));
        self.state = state;
        self.legs_started += 1;
    }

    pub fn advance_animations(&mut self) {
        self.offset.advance_animations();

        for outcome in self.offset.take_outcomes() {
            if !self.alive {
                trace!("oscillation leg finished after teardown, not rescheduling");
                continue;
            }
            if self.leg != Some(outcome.request) || !outcome.completed {
                continue;
            }

            let next = match self.state {
                OscillationState::MovingToB => OscillationState::MovingToA,
                OscillationState::MovingToA | OscillationState::Idle => OscillationState::MovingToB,
            };
            self.start_leg(next);
        }
    }
}
