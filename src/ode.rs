//! Adaptive-step integration of small ODE systems, used to produce the phase data.
//!
//! Two explicit methods with local error control:
//! - Euler, error estimated from the change of the derivative over the step (order h^2);
//! - second order Runge-Kutta (Ralston weights), error from two difference criteria (order h^3).
//!
//! The attempted step is clipped so that the last stored time is exactly `t_end`.

use crate::error::{PhaseError, Result};
use crate::utils::{axpy, max_abs_diff, norm_diff};
use crate::Dataset;
use log::{debug, info};
use std::fmt;
use std::str::FromStr;

const SAFETY_FACTOR: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const EULER_MAX_FACTOR: f64 = 2.0;
const RK2_MAX_FACTOR: f64 = 5.0;
const EULER_REJECT_FACTOR: f64 = 0.5;

// Ralston: c2 = b21 = 2/3, p1 + p2 = 1, p2 * c2 = 1/2
const RK2_B21: f64 = 2. / 3.;
const RK2_P1: f64 = 1. / 4.;
const RK2_P2: f64 = 3. / 4.;

pub trait OdeSystem {
    /// Number of state components.
    fn dim(&self) -> usize;
    /// Right-hand side dy/dt = f(t, y).
    fn rhs(&self, t: f64, y: &[f64]) -> Vec<f64>;
}

/// y1' = y2, y2' = (mu (1 - y1^2) y2 - y1) / p
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanDerPol {
    /// stiffness
    pub mu: f64,
    /// scaling of the second equation
    pub p: f64,
}

impl Default for VanDerPol {
    fn default() -> Self {
        VanDerPol { mu: 6.0, p: 1.0 }
    }
}

impl VanDerPol {
    pub fn new(mu: f64, p: f64) -> Result<VanDerPol> {
        if p == 0. || !p.is_finite() || !mu.is_finite() {
            return Err(PhaseError::InvalidParameter(format!(
                "Van der Pol needs finite mu and non-zero p, got mu = {}, p = {}",
                mu, p
            )));
        }
        Ok(VanDerPol { mu, p })
    }
}

impl OdeSystem for VanDerPol {
    fn dim(&self) -> usize {
        2
    }

    fn rhs(&self, _t: f64, y: &[f64]) -> Vec<f64> {
        vec![y[1], (self.mu * (1. - y[0] * y[0]) * y[1] - y[0]) / self.p]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Euler,
    Rk2,
}

impl FromStr for Method {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Method> {
        match s.to_ascii_lowercase().as_str() {
            "euler" => Ok(Method::Euler),
            "rk2" => Ok(Method::Rk2),
            other => Err(PhaseError::InvalidParameter(format!(
                "unknown method {:?}, expected euler or rk2",
                other
            ))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Method::Euler => write!(f, "euler"),
            Method::Rk2 => write!(f, "rk2"),
        }
    }
}

/// Step size control of the adaptive solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepControl {
    pub initial_step: f64,
    pub tolerance: f64,
    pub min_step: f64,
    pub max_steps: usize,
}

impl Default for StepControl {
    fn default() -> Self {
        StepControl {
            initial_step: 0.1,
            tolerance: 1e-4,
            min_step: 1e-12,
            max_steps: 10_000_000,
        }
    }
}

/// Accepted states, the first one being the initial condition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
}

impl Trajectory {
    fn push(&mut self, t: f64, y: &[f64]) {
        self.t.push(t);
        self.y.push(y.to_vec());
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Project the components i and j onto a Dataset, in time order.
    pub fn phase(&self, i: usize, j: usize) -> Dataset {
        let mut dataset = Dataset::new(self.len());
        for y in self.y.iter() {
            dataset.push(y[i], y[j]);
        }
        dataset
    }
}

/// Outcome of one step attempt.
struct Attempt {
    y_next: Vec<f64>,
    error: f64,
}

fn euler_attempt<S: OdeSystem>(system: &S, t: f64, y: &[f64], h: f64) -> Attempt {
    let f_curr = system.rhs(t, y);
    let y_next = axpy(h, &f_curr, y);
    let f_next = system.rhs(t + h, &y_next);
    let error = 0.5 * h.abs() * max_abs_diff(&f_next, &f_curr);
    Attempt { y_next, error }
}

fn rk2_attempt<S: OdeSystem>(system: &S, t: f64, y: &[f64], h: f64) -> Attempt {
    let k1: Vec<f64> = system.rhs(t, y).iter().map(|v| h * v).collect();
    let k2: Vec<f64> = system
        .rhs(t + RK2_B21 * h, &axpy(RK2_B21, &k1, y))
        .iter()
        .map(|v| h * v)
        .collect();
    let y_next = axpy(RK2_P2, &k2, &axpy(RK2_P1, &k1, y));
    let hf_next: Vec<f64> = system
        .rhs(t + h, &y_next)
        .iter()
        .map(|v| h * v)
        .collect();
    let error1 = norm_diff(&k2, &k1) / 4.;
    let error2 = norm_diff(&hf_next, &k1) / 6.;
    Attempt {
        y_next,
        error: error1.max(error2),
    }
}

/// Factor applied to h after an attempt with the given error.
/// Rejected steps only use the lower bound, and Euler halves the reduced step once more.
fn step_factor(method: Method, error: f64, tolerance: f64, accepted: bool) -> f64 {
    let (order_root, max_factor) = match method {
        Method::Euler => (2., EULER_MAX_FACTOR),
        Method::Rk2 => (3., RK2_MAX_FACTOR),
    };
    if error == 0. {
        return if accepted { max_factor } else { MIN_FACTOR };
    }
    let factor = SAFETY_FACTOR * (tolerance / error).powf(1. / order_root);
    if accepted {
        factor.clamp(MIN_FACTOR, max_factor)
    } else {
        let factor = factor.max(MIN_FACTOR).min(1.);
        match method {
            Method::Euler => factor * EULER_REJECT_FACTOR,
            Method::Rk2 => factor,
        }
    }
}

fn check_inputs<S: OdeSystem>(
    system: &S,
    t0: f64,
    y0: &[f64],
    t_end: f64,
    control: &StepControl,
) -> Result<()> {
    if y0.len() != system.dim() {
        return Err(PhaseError::InvalidParameter(format!(
            "initial state has {} components, the system needs {}",
            y0.len(),
            system.dim()
        )));
    }
    if !(t0.is_finite() && t_end.is_finite()) || t_end < t0 {
        return Err(PhaseError::InvalidParameter(format!(
            "time interval [{}, {}] is not valid",
            t0, t_end
        )));
    }
    if !(control.initial_step > 0.) || !(control.tolerance > 0.) || !(control.min_step > 0.) {
        return Err(PhaseError::InvalidParameter(format!(
            "step {}, tolerance {}, and minimum step {} must be positive",
            control.initial_step, control.tolerance, control.min_step
        )));
    }
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(PhaseError::InvalidParameter(format!(
            "initial state {:?} is not finite",
            y0
        )));
    }
    Ok(())
}

/// Integrate `system` from (t0, y0) to t_end with adaptive steps.
pub fn solve<S: OdeSystem>(
    system: &S,
    method: Method,
    t0: f64,
    y0: &[f64],
    t_end: f64,
    control: &StepControl,
) -> Result<Trajectory> {
    check_inputs(system, t0, y0, t_end, control)?;
    let mut trajectory = Trajectory::default();
    let mut t = t0;
    let mut y = y0.to_vec();
    let mut h = control.initial_step;
    let mut rejected = 0usize;
    trajectory.push(t, &y);

    while t < t_end {
        if trajectory.len() > control.max_steps {
            return Err(PhaseError::TooManySteps(control.max_steps));
        }
        let remaining = t_end - t;
        let clipped = h >= remaining;
        let h_attempt = if clipped { remaining } else { h };
        let attempt = match method {
            Method::Euler => euler_attempt(system, t, &y, h_attempt),
            Method::Rk2 => rk2_attempt(system, t, &y, h_attempt),
        };
        if !attempt.error.is_finite() || attempt.y_next.iter().any(|v| !v.is_finite()) {
            return Err(PhaseError::NonFinite { t });
        }
        if attempt.error <= control.tolerance {
            // land exactly on t_end when the step was clipped
            t = if clipped { t_end } else { t + h_attempt };
            y = attempt.y_next;
            trajectory.push(t, &y);
            h = h_attempt * step_factor(method, attempt.error, control.tolerance, true);
        } else {
            rejected += 1;
            h = h_attempt * step_factor(method, attempt.error, control.tolerance, false);
            if h < control.min_step {
                return Err(PhaseError::StepUnderflow { t, h });
            }
        }
    }

    info!(
        "{} integration to t = {}: {} accepted steps, {} rejected",
        method,
        t_end,
        trajectory.len() - 1,
        rejected
    );
    debug!("final state {:?}", y);
    Ok(trajectory)
}
