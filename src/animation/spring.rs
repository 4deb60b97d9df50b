use std::time::Duration;

/// Physical parameters of a damped spring with unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub damping: f64,
    pub stiffness: f64,
    /// Distance from the target under which the spring counts as settled.
    pub epsilon: f64,
}

/// Damped harmonic oscillator moving a value from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub from: f64,
    pub to: f64,
    pub initial_velocity: f64,
    pub params: SpringParams,
}

impl SpringParams {
    pub fn new(damping_ratio: f64, stiffness: f64, epsilon: f64) -> Self {
        let stiffness = stiffness.max(0.);
        let critical_damping = 2. * stiffness.sqrt();

        Self {
            damping: damping_ratio.max(0.) * critical_damping,
            stiffness,
            epsilon: epsilon.max(0.),
        }
    }

    /// Decay rate of the oscillation envelope.
    fn beta(&self) -> f64 {
        self.damping / 2.
    }

    /// Undamped angular frequency.
    fn omega0(&self) -> f64 {
        self.stiffness.sqrt()
    }
}

impl From<bakesale_config::animations::SpringParams> for SpringParams {
    fn from(p: bakesale_config::animations::SpringParams) -> Self {
        Self::new(p.damping_ratio, f64::from(p.stiffness), p.epsilon)
    }
}

impl Spring {
    pub fn value_at(&self, t: Duration) -> f64 {
        self.position(t.as_secs_f64())
    }

    /// Returns the time after which the spring stays within epsilon of its target.
    pub fn duration(&self) -> Duration {
        let beta = self.params.beta();
        if beta <= f64::EPSILON {
            // Undamped springs never come to rest.
            return Duration::MAX;
        }

        if (self.to - self.from).abs() <= f64::EPSILON && self.initial_velocity == 0. {
            return Duration::ZERO;
        }

        // The oscillation envelope decays as e^(-beta t), which bounds the critically damped and
        // underdamped cases.
        let envelope_time = (-self.params.epsilon.ln() / beta).max(0.);
        if beta <= self.params.omega0() + f64::from(f32::EPSILON) {
            return Duration::try_from_secs_f64(envelope_time).unwrap_or(Duration::MAX);
        }

        // Overdamped springs creep towards the target much slower than the envelope, so walk
        // forward until the value itself is close enough.
        let mut t = envelope_time;
        for _ in 0..10_000 {
            let value = self.position(t);
            if !value.is_finite() {
                break;
            }
            if (self.to - value).abs() <= self.params.epsilon {
                return Duration::from_secs_f64(t);
            }
            t += 0.001;
        }

        Duration::try_from_secs_f64(t).unwrap_or(Duration::MAX)
    }

    /// Position at `t` seconds, the solution of ẍ + bẋ + kx = 0 around `to`.
    fn position(&self, t: f64) -> f64 {
        let beta = self.params.beta();
        let omega0 = self.params.omega0();
        let v0 = self.initial_velocity;
        let x0 = self.from - self.to;

        let envelope = (-beta * t).exp();

        let offset = if (beta - omega0).abs() <= f64::from(f32::EPSILON) {
            // Critically damped.
            x0 + (beta * x0 + v0) * t
        } else if beta < omega0 {
            // Underdamped.
            let omega1 = (omega0 * omega0 - beta * beta).sqrt();
            x0 * (omega1 * t).cos() + (beta * x0 + v0) / omega1 * (omega1 * t).sin()
        } else {
            // Overdamped.
            let omega2 = (beta * beta - omega0 * omega0).sqrt();
            x0 * (omega2 * t).cosh() + (beta * x0 + v0) / omega2 * (omega2 * t).sinh()
        };

        self.to + envelope * offset
    }
}
