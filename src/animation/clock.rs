use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::utils::get_monotonic_time;

/// Shareable frame clock for animations.
///
/// The clock reads the monotonic time once and keeps returning it until [`Clock::clear`] is
/// called, so that everything animated within one frame sees the same instant. Time can be scaled
/// with a rate, which is how the animation slowdown setting is applied.
#[derive(Debug, Clone)]
pub struct Clock {
    inner: Rc<RefCell<Inner>>,
}

#[derive(Debug)]
struct Inner {
    /// Latched raw time, `None` until the next read.
    raw: Option<Duration>,
    /// Raw time at the last read, used to compute rate-scaled deltas.
    last_raw: Duration,
    /// Rate-scaled time handed out to animations.
    scaled: Duration,
    rate: f64,
    complete_instantly: bool,
}

impl Clock {
    pub fn new() -> Self {
        Self::with_time(get_monotonic_time())
    }

    /// Creates a clock frozen at the given time.
    ///
    /// Used by tests to step time manually with [`Clock::set_unadjusted`].
    pub fn with_time(time: Duration) -> Self {
        let inner = Inner {
            raw: Some(time),
            last_raw: time,
            scaled: time,
            rate: 1.,
            complete_instantly: false,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Returns the current rate-scaled time.
    pub fn now(&self) -> Duration {
        self.inner.borrow_mut().now()
    }

    /// Returns the current time without rate scaling.
    pub fn now_unadjusted(&self) -> Duration {
        self.inner.borrow_mut().raw()
    }

    /// Latches the raw clock time.
    pub fn set_unadjusted(&mut self, time: Duration) {
        self.inner.borrow_mut().raw = Some(time);
    }

    /// Drops the latched time so that the next read fetches it again.
    pub fn clear(&mut self) {
        self.inner.borrow_mut().raw = None;
    }

    pub fn rate(&self) -> f64 {
        self.inner.borrow().rate
    }

    /// Changes the rate for time passing from now on.
    pub fn set_rate(&mut self, rate: f64) {
        let mut inner = self.inner.borrow_mut();
        // Account for the time that passed at the old rate first.
        inner.now();
        inner.rate = rate.clamp(0., 1000.);
    }

    pub fn should_complete_instantly(&self) -> bool {
        self.inner.borrow().complete_instantly
    }

    pub fn set_complete_instantly(&mut self, value: bool) {
        self.inner.borrow_mut().complete_instantly = value;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Clock {}

impl Inner {
    fn raw(&mut self) -> Duration {
        *self.raw.get_or_insert_with(get_monotonic_time)
    }

    fn now(&mut self) -> Duration {
        let raw = self.raw();
        if raw == self.last_raw {
            return self.scaled;
        }

        // Raw time going backwards only happens with manually set time in tests.
        if raw > self.last_raw {
            let delta = (raw - self.last_raw).mul_f64(self.rate);
            self.scaled = self.scaled.saturating_add(delta);
        } else {
            let delta = (self.last_raw - raw).mul_f64(self.rate);
            self.scaled = self.scaled.saturating_sub(delta);
        }

        self.last_raw = raw;
        self.scaled
    }
}
